use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use application::PrinterBridge;
use domain::StatusEvent;
use domain::event::StatusSink;

use crate::wire::{EventLine, Request, Response};

/// Serves the method channel over a pair of byte streams.
///
/// Requests are read one per line and each runs on its own task, so
/// responses may come back out of order. Status events are written to the
/// same output between responses.
pub struct BridgeServer {
    bridge: Arc<PrinterBridge>,
}

impl BridgeServer {
    pub fn new(bridge: Arc<PrinterBridge>) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &Arc<PrinterBridge> {
        &self.bridge
    }

    /// Runs until `input` reaches EOF, then disconnects every printer
    pub async fn serve<R, W>(&self, input: R, output: W) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_lines(output, rx));

        self.bridge
            .listen(Arc::new(EventForwarder { tx: tx.clone() }))
            .await;

        let mut in_flight = JoinSet::new();
        let mut lines = BufReader::new(input).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let (id, call) = match Request::parse(&line) {
                Ok(request) => request.into_call(),
                Err(response) => {
                    warn!(line = %line, "Malformed request");
                    send(&tx, &response);
                    continue;
                }
            };

            debug!(id, method = %call.method, "Request received");
            let bridge = self.bridge.clone();
            let tx = tx.clone();
            in_flight.spawn(async move {
                let response = bridge.handle(&call).await;
                send(&tx, &Response::new(id, response));
            });
        }

        // requests already read must finish before the sweep, or a late
        // connect would outlive it
        debug!(pending = in_flight.len(), "Input closed, waiting for requests");
        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Request task failed");
            }
        }
        info!("Input closed, disconnecting printers");
        self.bridge.service().registry().disconnect_all().await;
        self.bridge.cancel().await;
        drop(tx);

        match writer.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e)),
        }
    }
}

struct EventForwarder {
    tx: UnboundedSender<String>,
}

#[async_trait]
impl StatusSink for EventForwarder {
    async fn publish(
        &self,
        event: StatusEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let line = serde_json::to_string(&EventLine::from(event))?;
        self.tx.send(line)?;
        Ok(())
    }
}

fn send<T: Serialize>(tx: &UnboundedSender<String>, frame: &T) {
    match serde_json::to_string(frame) {
        Ok(line) => {
            if tx.send(line).is_err() {
                warn!("Output closed, dropping frame");
            }
        }
        Err(e) => error!(error = %e, "Failed to encode frame"),
    }
}

async fn write_lines<W>(mut output: W, mut rx: UnboundedReceiver<String>) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(())
}
