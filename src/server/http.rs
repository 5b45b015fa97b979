//! HTTP transport.
//!
//! `GET /eval/{command}` runs the percent-decoded remainder of the path as one
//! command. The body is a `mailto:` link for the result followed by the result
//! itself, or [`REJECT`] when the command fails.

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::debug;

use super::{execute, REJECT};
use crate::environment::Environment;
use crate::error::InternalResult;

pub fn router(environment: Arc<Environment>) -> Router {
    Router::new()
        .route("/eval/{*command}", get(eval_command))
        .route("/health", get(health))
        .with_state(environment)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener, environment: Arc<Environment>) -> InternalResult<()> {
    axum::serve(listener, router(environment)).await?;
    Ok(())
}

/// Body for a successful command.
pub fn mailto(output: &str) -> String {
    format!(
        "<a href=\"mailto:{}\">email these recipients</a><br>{}",
        output, output
    )
}

// A path that does not decode to UTF-8 is a bad command like any other.
async fn eval_command(
    State(environment): State<Arc<Environment>>,
    command: Result<Path<String>, PathRejection>,
) -> Html<String> {
    let command = match command {
        Ok(Path(command)) => command,
        Err(rejection) => {
            debug!("rejected undecodable path: {}", rejection);
            return Html(REJECT.to_string());
        }
    };
    match execute(environment, command.clone()).await {
        Ok(output) => Html(mailto(&output)),
        Err(e) => {
            debug!("rejected {:?}: {}", command, e);
            Html(REJECT.to_string())
        }
    }
}

async fn health() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailto() {
        assert_eq!(
            mailto("a@x, b@x"),
            "<a href=\"mailto:a@x, b@x\">email these recipients</a><br>a@x, b@x"
        );
    }
}
