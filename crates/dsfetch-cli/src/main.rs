use std::process::ExitCode;

use dsfetch_hub::{Pipeline, Settings};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match Settings::hardcoded().and_then(Pipeline::from_settings) {
        Ok(mut pipeline) => pipeline.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Dataset download aborted");
            ExitCode::FAILURE
        }
    }
}
