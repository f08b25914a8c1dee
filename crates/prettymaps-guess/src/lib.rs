mod args;
mod config;
mod country;
mod error;
mod game;
mod geocoding;
mod http;
mod mastodon;
mod observability;
mod places;
mod poll;
mod render;
mod util;

pub use crate::error::*;
pub use args::{parse_error_exit_code, Args};
use config::Config;
pub use game::GameParams;
pub use observability::*;

#[allow(unused_imports)]
mod prelude {
    pub(crate) use crate::error::prelude::*;
    pub(crate) use crate::http::prelude::*;
    pub(crate) use crate::observability::logging::prelude::*;
    pub(crate) use crate::util::prelude::*;
}

/// Plays a single game: finds the places, renders the map of one of them
/// and publishes the map with the poll to Mastodon.
pub async fn run(args: &Args) -> Result {
    launch(args, std::env::vars(), game::Game::connect).await
}

/// The arguments and the config are both checked before any component is
/// connected, so invalid input never reaches the network or the file system.
async fn launch<Connect, Fut>(
    args: &Args,
    vars: impl IntoIterator<Item = (String, String)>,
    connect: Connect,
) -> Result
where
    Connect: FnOnce(Config) -> Fut,
    Fut: std::future::Future<Output = Result<game::Game>>,
{
    use rand::SeedableRng;

    let params = args.validate()?;
    let config = Config::from_vars(vars)?;

    tracing::info!(?config, "Loaded config");

    let game = connect(config).await?;

    let mut rng = rand::rngs::StdRng::from_entropy();

    let published = game.play(&params, &mut rng).await?;

    tracing::info!(
        image = %published.image.id,
        poll = %published.poll.id,
        answer = %published.answer.id,
        url = ?published.image.url,
        "The game was published"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{vars, REQUIRED};
    use crate::error::ErrorKind;
    use crate::game::tests::Fixture;
    use crate::places::tests::{point_feature, FakePlacesApi};
    use clap::Parser;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn fixture() -> Fixture {
        Fixture::new(FakePlacesApi::new([
            vec![point_feature("N1", "Place A", 0.25, 0.25)],
            vec![point_feature("N2", "Place B", 0.75, 0.75)],
        ]))
    }

    async fn launch_with(fixture: &Fixture, args: &[&str], vars: Vec<(String, String)>) -> Result {
        let args = std::iter::once("prettymaps-guess").chain(args.iter().copied());
        let args = Args::try_parse_from(args).unwrap();
        let connected = AtomicBool::new(false);

        let result = launch(&args, vars, |_config| async {
            connected.store(true, Ordering::SeqCst);
            Ok(fixture.game())
        })
        .await;

        assert_eq!(connected.load(Ordering::SeqCst), result.is_ok());
        result
    }

    fn assert_untouched(fixture: &Fixture) {
        assert!(fixture.places.queries.lock().is_empty());
        assert!(fixture.geocoder.points.lock().is_empty());
        assert!(fixture.renderer.renders.lock().is_empty());
        assert!(fixture.publisher.calls().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn publishes_the_game() {
        let fixture = fixture();

        launch_with(&fixture, &["-c", "Testland", "-n", "2"], vars(REQUIRED))
            .await
            .unwrap();

        assert_eq!(fixture.places.queries.lock().len(), 2);
        assert_eq!(fixture.publisher.calls().len(), 4);
    }

    #[test_log::test(tokio::test)]
    async fn out_of_range_nb_picks_does_nothing() {
        for nb_picks in ["1", "0", "-3", "5"] {
            let fixture = fixture();

            let err = launch_with(&fixture, &["-c", "Testland", "-n", nb_picks], vars(REQUIRED))
                .await
                .unwrap_err();

            assert!(matches!(err.kind(), ErrorKind::Args { .. }), "{nb_picks}: {err}");
            assert_untouched(&fixture);
        }
    }

    #[test_log::test(tokio::test)]
    async fn missing_env_var_does_nothing() {
        for missing in REQUIRED {
            let fixture = fixture();
            let vars = vars(REQUIRED)
                .into_iter()
                .filter(|(key, _)| key != missing.0)
                .collect();

            let err = launch_with(&fixture, &["-c", "Testland", "-n", "2"], vars)
                .await
                .unwrap_err();

            assert!(matches!(err.kind(), ErrorKind::Config { .. }), "{}: {err}", missing.0);
            assert_untouched(&fixture);
        }
    }
}
