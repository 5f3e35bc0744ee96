use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::{AlmSubmissionUseCase, DocumentExtractor, GenerationOrchestrator};
use crate::domain::error::Result;
use crate::infrastructure::alm_clients::AlmRouter;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::LlmProviderFactory;
use crate::interfaces::http::{start_server, HttpState};

pub fn run() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    if let Err(e) = serve() {
        error!(error = %e, "qualimed stopped");
        std::process::exit(1);
    }
}

fn serve() -> Result<()> {
    let config = AppConfig::load()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        hosted_model = %config.hosted.model,
        "Configuration loaded"
    );

    let orchestrator = GenerationOrchestrator::new(
        Arc::new(DocumentExtractor::new()),
        Arc::new(LlmProviderFactory::new(config.clone())),
    );
    let alm = AlmSubmissionUseCase::new(Arc::new(AlmRouter::new()));
    let state = HttpState::new(orchestrator, alm, config);

    actix_web::rt::System::new().block_on(async move {
        let server = start_server(state)?;
        server.await
    })?;
    Ok(())
}
