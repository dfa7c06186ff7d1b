use crate::application::CommandProcessor;
use crate::common::OutboundMessage;
use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex, OwnedMutexGuard};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info, warn};
use uuid::Uuid;

/// WebSocket front end: answers command frames and streams outbound updates.
///
/// Every client gets answers to its commands. Outbound updates go to one
/// client at a time; the next client takes over when that one disconnects.
pub struct WebSocketServer {
    processor: Arc<CommandProcessor>,
    outbound: Arc<Mutex<mpsc::Receiver<OutboundMessage>>>,
}

impl WebSocketServer {
    pub fn new(processor: Arc<CommandProcessor>, outbound: mpsc::Receiver<OutboundMessage>) -> Self {
        Self {
            processor,
            outbound: Arc::new(Mutex::new(outbound)),
        }
    }

    pub async fn run(self, address: &str) -> Result<()> {
        let listener = TcpListener::bind(address).await?;
        info!("Listening on ws://{}", listener.local_addr()?);
        self.serve(listener).await
    }

    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        loop {
            let (stream, peer) = listener.accept().await?;
            let processor = self.processor.clone();
            let outbound = self.outbound.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer, processor, outbound).await {
                    warn!(%peer, "Connection ended with error: {}", e);
                }
            });
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    processor: Arc<CommandProcessor>,
    outbound: Arc<Mutex<mpsc::Receiver<OutboundMessage>>>,
) -> Result<()> {
    let session = Uuid::new_v4();
    let ws = accept_async(stream).await?;
    info!(%peer, %session, "Client connected");

    let mut drain = outbound.clone().try_lock_owned().ok();
    if drain.is_none() {
        info!(%session, "Another client receives updates; serving commands only for now");
    }
    let (mut sink, mut source) = ws.split();

    loop {
        tokio::select! {
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let response = processor.process_text(&text).await;
                    sink.send(Message::Text(serde_json::to_string(&response)?)).await?;
                }
                Some(Ok(Message::Ping(payload))) => sink.send(Message::Pong(payload)).await?,
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },
            guard = outbound.clone().lock_owned(), if drain.is_none() => {
                info!(%session, "Client now receives updates");
                drain = Some(guard);
            }
            message = next_outbound(&mut drain), if drain.is_some() => match message {
                Some(message) => match serde_json::to_string(&message) {
                    Ok(text) => sink.send(Message::Text(text)).await?,
                    Err(e) => error!(%session, "Failed to encode outbound message: {}", e),
                },
                None => break,
            },
        }
    }

    info!(%peer, %session, "Client disconnected");
    Ok(())
}

async fn next_outbound(drain: &mut Option<OwnedMutexGuard<mpsc::Receiver<OutboundMessage>>>) -> Option<OutboundMessage> {
    match drain {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}
