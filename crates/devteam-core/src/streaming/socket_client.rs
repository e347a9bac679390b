use std::time::Duration;

use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::{TcpStream, UnixStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use super::{FeedEndpoint, FeedMessage, FeedStatus};
use crate::constants::RECONNECT_DELAY_MS;
use crate::error::ConsoleError;
use crate::models::RawEvent;

const CHANNEL_CAPACITY: usize = 256;

enum FeedStream {
    Tcp(TcpStream),
    Unix(UnixStream),
    Ws(Box<WebSocketStream<MaybeTlsStream<TcpStream>>>),
}

/// Client for the event push channel: one JSON frame per line on a raw
/// socket, or one per text message on the backend's websocket
pub struct LiveFeedConnector {
    endpoint: FeedEndpoint,
    reconnect_delay: Duration,
}

/// A running connector. Dropping it aborts the connection task and closes the
/// channel, so nothing is delivered after teardown.
pub struct FeedSubscription {
    rx: mpsc::Receiver<FeedMessage>,
    task: JoinHandle<()>,
}

impl FeedSubscription {
    pub async fn next(&mut self) -> Option<FeedMessage> {
        self.rx.recv().await
    }

    /// Non-blocking poll for hosts that drain between frames.
    pub fn try_next(&mut self) -> Option<FeedMessage> {
        self.rx.try_recv().ok()
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.task.abort();
        self.rx.close();
    }
}

impl LiveFeedConnector {
    pub fn new(endpoint: FeedEndpoint) -> Self {
        Self {
            endpoint,
            reconnect_delay: Duration::from_millis(RECONNECT_DELAY_MS),
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn endpoint(&self) -> &FeedEndpoint {
        &self.endpoint
    }

    /// Spawn the connection loop on the current tokio runtime.
    pub fn subscribe(self) -> FeedSubscription {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(self.run(tx));
        FeedSubscription { rx, task }
    }

    async fn connect(&self) -> Result<FeedStream, ConsoleError> {
        let stream = match &self.endpoint {
            FeedEndpoint::Tcp(addr) => FeedStream::Tcp(TcpStream::connect(addr).await?),
            FeedEndpoint::Unix(path) => FeedStream::Unix(UnixStream::connect(path).await?),
            FeedEndpoint::Ws(url) => {
                let (ws, _response) = connect_async(url.as_str()).await?;
                FeedStream::Ws(Box::new(ws))
            }
        };
        Ok(stream)
    }

    /// Run the connector, sending status changes and events through the channel.
    /// Reconnects after a delay whenever the connection is lost; returns once the
    /// receiving side is gone.
    pub async fn run(self, tx: mpsc::Sender<FeedMessage>) {
        loop {
            if tx.send(FeedMessage::Status(FeedStatus::Connecting)).await.is_err() {
                return;
            }

            match self.connect().await {
                Ok(stream) => {
                    info!("Connected to event feed at {}", self.endpoint);
                    if tx.send(FeedMessage::Status(FeedStatus::Connected)).await.is_err() {
                        return;
                    }
                    let result = match stream {
                        FeedStream::Tcp(s) => self.read_stream(s, &tx).await,
                        FeedStream::Unix(s) => self.read_stream(s, &tx).await,
                        FeedStream::Ws(ws) => self.read_websocket(*ws, &tx).await,
                    };
                    match result {
                        Ok(true) => debug!("Event feed at {} closed", self.endpoint),
                        Ok(false) => {
                            debug!("Feed receiver dropped");
                            return;
                        }
                        Err(e) => debug!("Event feed read error: {}", e),
                    }
                }
                Err(e) => {
                    debug!("Failed to connect to event feed at {}: {}", self.endpoint, e);
                }
            }

            if tx.send(FeedMessage::Status(FeedStatus::Disconnected)).await.is_err() {
                return;
            }
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    /// Returns `Ok(false)` if the receiver went away mid-stream.
    async fn read_stream<R: AsyncRead + Unpin>(
        &self,
        stream: R,
        tx: &mpsc::Sender<FeedMessage>,
    ) -> Result<bool, ConsoleError> {
        let mut lines = BufReader::new(stream).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if !forward_frame(&line, tx).await {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Same contract as `read_stream`, one frame per text message.
    async fn read_websocket(
        &self,
        mut ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
        tx: &mpsc::Sender<FeedMessage>,
    ) -> Result<bool, ConsoleError> {
        while let Some(message) = ws.next().await {
            match message? {
                Message::Text(text) => {
                    if !forward_frame(&text, tx).await {
                        return Ok(false);
                    }
                }
                Message::Close(_) => break,
                // Pings are answered by tungstenite itself
                _ => {}
            }
        }

        Ok(true)
    }
}

/// Parse and send one frame. Malformed frames are dropped; returns false only
/// when the receiver is gone.
async fn forward_frame(frame: &str, tx: &mpsc::Sender<FeedMessage>) -> bool {
    match RawEvent::from_frame(frame) {
        Ok(event) => tx.send(FeedMessage::Event(event)).await.is_ok(),
        Err(e) => {
            debug!("Dropping frame: {} - line: {}", e, frame);
            true
        }
    }
}
