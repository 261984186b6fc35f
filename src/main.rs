use std::process::ExitCode;

use dwd_webcam_bot::bot;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let result = match bot::load_options() {
        Ok(options) => {
            let metrics = options.metrics_file.as_ref().and_then(|_| install_metrics());

            tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting dwd-webcam-bot");

            let result = bot::run(&options).await;

            if let (Some(handle), Some(path)) = (metrics, options.metrics_file.as_ref()) {
                if let Err(e) = std::fs::write(path, handle.render()) {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to write metrics file");
                }
            }

            result
        }
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Run failed");
    }

    ExitCode::from(bot::exit_status(&result))
}

fn install_metrics() -> Option<PrometheusHandle> {
    let handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Prometheus metrics recorder");
            return None;
        }
    };

    metrics::describe_counter!(
        "webcam_candidates_skipped_total",
        "Webcams drawn from the pool that did not yield an image, by reason"
    );
    metrics::describe_counter!(
        "webcam_images_acquired_total",
        "Images downloaded and uploaded, by webcam"
    );

    Some(handle)
}
