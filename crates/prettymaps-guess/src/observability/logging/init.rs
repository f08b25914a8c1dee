use crate::config::from_env;
use crate::observability::GLOBAL_LABELS;
use crate::prelude::*;
use crate::Result;
use serde::Deserialize;
use serde_with::serde_as;
use std::collections::HashMap;
use std::ops::Deref;
use tracing_subscriber::prelude::*;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

const LOG_FILTER_ENV: &str = "PRETTYMAPS_GUESS_LOG";

/// Handle to the background task that ships logs to Loki, if it is enabled.
/// It must be shut down before the process exits, otherwise the last log
/// records may be lost.
pub struct LoggingTask {
    loki: Option<(tokio::task::JoinHandle<()>, tracing_loki::BackgroundTaskController)>,
}

impl LoggingTask {
    pub async fn shutdown(self) {
        let Some((task, controller)) = self.loki else {
            return;
        };

        info!("Waiting for the logging task to finish nicely...");

        let start = std::time::Instant::now();
        controller.shutdown().await;
        let result = task.await;

        eprintln!(
            "Stopped logging task in {:.2?}: {result:?}",
            start.elapsed()
        );
    }
}

/// Initializes the global logger. With `verbose` the logs of this crate
/// are enabled down to the `debug` level.
pub fn init_logging(verbose: bool) -> Result<LoggingTask> {
    from_env::<LoggingConfig>("")?.init_logging(verbose)
}

#[serde_as]
#[derive(Deserialize)]
struct LoggingConfig {
    loki_url: Option<url::Url>,

    #[serde_as(as = "Option<serde_with::json::JsonString>")]
    #[serde(default)]
    loki_labels: Option<HashMap<String, String>>,
}

impl LoggingConfig {
    fn init_logging(self, verbose: bool) -> Result<LoggingTask> {
        let env_filter =
            EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

        let env_filter = if verbose {
            let directive = concat!(env!("CARGO_CRATE_NAME"), "=debug")
                .parse::<Directive>()
                .fatal_ctx(|| "Invalid verbose logging directive")?;
            env_filter.add_directive(directive)
        } else {
            env_filter
        };

        let fmt = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(std::env::var("COLORS").as_deref() != Ok("0"))
            .pretty();

        let (loki, loki_task) = match self.loki_url {
            Some(loki_url) => {
                let labels = self
                    .loki_labels
                    .unwrap_or_default()
                    .into_iter()
                    .chain(
                        GLOBAL_LABELS
                            .iter()
                            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned())),
                    );

                let mut builder = tracing_loki::builder();
                for (key, value) in labels {
                    builder = builder
                        .label(key, value)
                        .fatal_ctx(|| "Invalid Loki label")?;
                }

                let (layer, controller, task) = builder
                    .build_controller_url(loki_url)
                    .fatal_ctx(|| "Failed to create the Loki logging layer")?;

                (Some(layer), Some((tokio::spawn(task), controller)))
            }
            None => (None, None),
        };

        tracing_subscriber::registry()
            .with(fmt)
            .with(loki)
            .with(env_filter)
            .with(tracing_error::ErrorLayer::default())
            .init();

        init_panic_hook();

        Ok(LoggingTask { loki: loki_task })
    }
}

fn init_panic_hook() {
    let current_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        // The default hook must be called first, otherwise the panic may be
        // lost if it happened inside of the `tracing` machinery itself.
        current_hook(panic_info);

        let backtrace = std::backtrace::Backtrace::capture();
        let location = panic_info.location().map(|location| {
            format!(
                "{}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            )
        });

        // If the panic message was formatted using interpolated values,
        // it will be a `String`. Otherwise, it will be a `&str`.
        let payload = panic_info.payload();
        let message = payload
            .downcast_ref::<String>()
            .map(<_>::deref)
            .or_else(|| payload.downcast_ref::<&str>().map(<_>::deref))
            .unwrap_or("<unknown>");

        let span_trace = tracing_error::SpanTrace::capture();

        error!(
            target: "panic",
            thread = std::thread::current().name(),
            location,
            span_trace = %span_trace,
            backtrace = format_args!("\n{backtrace}"),
            "{message}"
        );
    }));
}
