//! # Transports
//!
//! Two front ends share one [`Environment`]:
//!
//! * [`console`]: line-oriented TCP, one command per line.
//! * [`http`]: `GET /eval/{command}` answering with a `mailto:` link.
//!
//! Commands run on tokio's blocking pool because the environment lock is a std
//! mutex and `!save`/`!load` do file I/O.

pub mod console;
pub mod http;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::NornConfig;
use crate::environment::Environment;
use crate::error::{Error, InternalResult};

/// Sent back in place of a result when a command fails to parse or evaluate.
pub const REJECT: &str = "Must enter valid command";

/// Runs `command` against `environment` off the async runtime.
pub async fn execute(environment: Arc<Environment>, command: String) -> InternalResult<String> {
    tokio::task::spawn_blocking(move || environment.execute(&command))
        .await
        .map_err(|e| Error::internal(format!("command task failed: {}", e)))?
}

/// Serves both transports until one of them fails or Ctrl+C is received.
pub async fn serve(config: &NornConfig, environment: Arc<Environment>) -> InternalResult<()> {
    let console_listener = TcpListener::bind(config.console.address()).await?;
    info!("console listening on {}", console_listener.local_addr()?);
    let http_listener = TcpListener::bind(config.http.address()).await?;
    info!("http listening on {}", http_listener.local_addr()?);

    tokio::select! {
        result = console::run(console_listener, environment.clone()) => result,
        result = http::run(http_listener, environment) => result,
        result = tokio::signal::ctrl_c() => {
            info!("shutting down");
            result.map_err(Error::from)
        }
    }
}
