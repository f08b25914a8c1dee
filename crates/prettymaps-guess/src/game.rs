use crate::country::{Country, CountryDataset, CountrySelector};
use crate::geocoding::{self, Geocoder, ResolvedPlace};
use crate::mastodon::{self, GamePost, PublishedGame, Publisher};
use crate::places::{self, Place, PlaceSearch, PlacesApi};
use crate::prelude::*;
use crate::render::{self, MapRenderer, PresetSelector};
use crate::{http, poll, Config, Result};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Validated parameters of a single game
#[derive(Debug, Clone)]
pub struct GameParams {
    pub(crate) country: CountrySelector,
    pub(crate) nb_picks: usize,
    pub(crate) preset: PresetSelector,
    pub(crate) radius_km: u32,
    pub(crate) poll_hours: u32,
}

/// One of the places offered in the poll
#[derive(Debug)]
struct Pick {
    place: Place,
    resolved: ResolvedPlace,
    option: String,
}

/// All the components a game talks to. They are shared behind [`Arc`]s so
/// that the tests can keep their own handles to the fakes.
pub(crate) struct Game {
    pub(crate) countries: CountryDataset,
    pub(crate) places: Arc<dyn PlacesApi>,
    pub(crate) geocoder: Arc<dyn Geocoder>,
    pub(crate) renderer: Arc<dyn MapRenderer>,
    pub(crate) publisher: Arc<dyn Publisher>,
}

impl Game {
    /// Loads the countries dataset and creates the clients of the real services
    pub(crate) async fn connect(config: Config) -> Result<Self> {
        let countries = CountryDataset::load(&config.country).await?;

        let http = http::create_client()?;

        let places = places::client(config.places, http.clone());
        let geocoder = geocoding::client(config.geocoding, http.clone());
        let renderer = render::Prettymaps::new(config.render);
        let publisher = mastodon::client(
            config.mastodon,
            http,
            http::create_client_without_retries()?,
        );

        Ok(Self {
            countries,
            places: Arc::new(places),
            geocoder: Arc::new(geocoder),
            renderer: Arc::new(renderer),
            publisher: Arc::new(publisher),
        })
    }

    pub(crate) async fn play(
        &self,
        params: &GameParams,
        rng: &mut (impl Rng + Send),
    ) -> Result<PublishedGame> {
        let country = self.countries.select(&params.country, rng)?;

        info!(country = %country.name, "Selected the country");

        let search = PlaceSearch::new(params.radius_km);
        let mut picks: Vec<Pick> = Vec::with_capacity(params.nb_picks);

        while picks.len() < params.nb_picks {
            let pick = self.find_distinct_pick(country, &search, &picks, rng).await?;
            picks.push(pick);
        }

        info!(
            picks = %picks.iter().map(|pick| &pick.option).join(" -- "),
            "Random picks"
        );

        let correct = &picks[rng.gen_range(0..picks.len())];

        info!(
            place = %correct.place.name,
            id = %correct.place.id,
            address = %correct.resolved.display_name,
            "Correct pick"
        );

        let preset = render::select_preset(&*self.renderer, &params.preset, rng).await?;

        info!(%preset, "Rendering the map");

        let image = self
            .renderer
            .render(&correct.resolved.display_name, &preset)
            .await?;

        let mut options: Vec<_> = picks.iter().map(|pick| pick.option.clone()).collect();
        options.shuffle(rng);

        let post = GamePost {
            country: country.name.clone(),
            image,
            options,
            answer: correct.option.clone(),
            poll_hours: params.poll_hours,
        };

        mastodon::publish_game(&*self.publisher, &post, chrono::Utc::now()).await
    }

    /// Mastodon rejects polls with duplicate options, so the places whose
    /// options are already taken are skipped. Skipped places count against
    /// the same search budget as the points with no places around them.
    async fn find_distinct_pick(
        &self,
        country: &Country,
        search: &PlaceSearch,
        picks: &[Pick],
        rng: &mut (impl Rng + Send),
    ) -> Result<Pick> {
        let geocoder = &*self.geocoder;

        places::find_place(&*self.places, country, search, rng, |place| async move {
            let resolved = geocoder.reverse(place.point).await?;
            let option = poll::poll_option(&place.name, &resolved.address);

            if picks.iter().any(|pick| pick.option == option) {
                debug!(%option, "The place was already picked, retrying");
                return Ok(None);
            }

            Ok(Some(Pick {
                place,
                resolved,
                option,
            }))
        })
        .await
    }
}
