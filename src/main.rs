//! vacgen - asynchronous job-queue server for LLM vacancy-text generation.
//!
//! ## Quick Start
//!
//! ```bash
//! # Start with defaults (port 8000, engine at localhost:11434)
//! vacgen
//!
//! # Custom configuration
//! VACGEN_ENGINE_URL=http://192.168.1.100:11434 VACGEN_PORT=9000 vacgen
//! ```

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vacgen::engine::OllamaEngine;
use vacgen::{run_server, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vacgen=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Load configuration
    let config = ServiceConfig::from_env();
    let engine = Arc::new(OllamaEngine::new(config.engine.clone()));

    run_server(config, engine).await
}
