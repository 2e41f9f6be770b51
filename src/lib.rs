pub mod config;
pub mod models;
pub mod pipeline;

pub use models::{MedicalQuery, MedicalResponse, UserMedicalProfile};
pub use pipeline::orchestrator::MedicalAiService;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries and integration harnesses embedding
/// this pipeline. Library consumers with their own subscriber skip this.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Medguard pipeline v{}", config::APP_VERSION);
}
