//! Line-oriented console transport.
//!
//! A client receives [`GREETING`] on connect, then one response line per command
//! line it sends. A failed command answers [`REJECT`] and the connection stays
//! open. EOF or an I/O error closes only that connection.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::{execute, REJECT};
use crate::environment::Environment;
use crate::error::InternalResult;

pub const GREETING: &str = "Welcome to the Norn e-mail address management system.";

/// Accepts connections forever, one task per connection.
pub async fn run(listener: TcpListener, environment: Arc<Environment>) -> InternalResult<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("accept failed: {}", e);
                continue;
            }
        };

        let environment = environment.clone();
        let span = info_span!("connection", id = %Uuid::new_v4(), %peer);
        tokio::spawn(
            async move {
                match handle_connection(socket, peer, environment).await {
                    Ok(()) => info!("closed"),
                    Err(e) => warn!("connection error: {}", e),
                }
            }
            .instrument(span),
        );
    }
}

async fn handle_connection(
    socket: TcpStream,
    peer: SocketAddr,
    environment: Arc<Environment>,
) -> std::io::Result<()> {
    info!("client connected from {}", peer);
    let (reader, mut writer) = socket.into_split();
    let mut lines = BufReader::new(reader).lines();

    writer.write_all(format!("{}\n", GREETING).as_bytes()).await?;

    while let Some(line) = lines.next_line().await? {
        let response = match execute(environment.clone(), line.clone()).await {
            Ok(output) => output,
            Err(e) => {
                debug!("rejected {:?}: {}", line, e);
                REJECT.to_string()
            }
        };
        writer.write_all(format!("{}\n", response).as_bytes()).await?;
    }

    Ok(())
}
