pub mod advice;
pub mod config;
pub mod goals;
pub mod mood;
pub mod session;
pub mod stats;
pub mod tasks;

use std::sync::Arc;

use focusjuju_core::{Config, LlmMessageSource, MessageSource, MessageTable};
use serde::Serialize;
use tracing::warn;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// The hosted model when enabled and configured, the built-in table otherwise.
pub fn message_source(config: &Config) -> Arc<dyn MessageSource> {
    if config.llm.enabled {
        match LlmMessageSource::from_config(&config.llm) {
            Ok(source) => return Arc::new(source),
            Err(e) => warn!(error = %e, "language model unavailable, using built-in messages"),
        }
    }
    Arc::new(MessageTable::builtin())
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}
