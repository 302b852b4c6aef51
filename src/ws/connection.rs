//! Live monitor connection with bounded reconnection.
//!
//! One spawned task owns the socket. It reconnects after a fixed delay up
//! to a fixed number of attempts and stops when the owner signals shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::ws::message::{parse_event, MonitorEvent, WsEnvelope};

/// Callback receiving every well-formed inbound event.
pub type EventHandler = Arc<dyn Fn(MonitorEvent) + Send + Sync>;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long `close` waits for the task before aborting it.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

// == Reconnect Policy ==
/// Fixed-delay, bounded reconnection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Reconnect attempts allowed after a drop or a failed connect
    pub max_attempts: u32,
    /// Pause before each attempt
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(3000),
        }
    }
}

// == Helpers ==
/// Fresh identifier for one live session.
pub fn generate_client_id() -> String {
    format!("client-{}", uuid::Uuid::new_v4().simple())
}

/// `<ws-origin>/ws/monitor/<client-id>`.
pub fn monitor_url(ws_origin: &str, client_id: &str) -> String {
    format!("{}/ws/monitor/{}", ws_origin.trim_end_matches('/'), client_id)
}

/// Derives the WebSocket origin from an http(s) base URL.
///
/// `https` maps to `wss`, `http` to `ws`; the path is dropped since the
/// live endpoint hangs off the host root.
pub fn ws_origin(base_url: &str) -> Result<String> {
    let (scheme, rest) = base_url
        .split_once("://")
        .ok_or_else(|| ClientError::InvalidUrl(format!("missing scheme in '{}'", base_url)))?;

    let ws_scheme = match scheme.to_ascii_lowercase().as_str() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => {
            return Err(ClientError::InvalidUrl(format!(
                "unsupported scheme '{}' in '{}'",
                other, base_url
            )))
        }
    };

    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return Err(ClientError::InvalidUrl(format!("missing host in '{}'", base_url)));
    }
    Ok(format!("{}://{}", ws_scheme, host))
}

// == Live Connection ==
/// Handle to the task driving one live session.
#[derive(Debug)]
pub struct LiveConnection {
    client_id: String,
    connected: Arc<AtomicBool>,
    shutdown: watch::Sender<bool>,
    outbound: mpsc::UnboundedSender<WsEnvelope>,
    task: JoinHandle<Result<()>>,
}

impl LiveConnection {
    /// Starts the connection task. Returns immediately; the first connect
    /// happens in the background.
    pub fn spawn(
        client_id: String,
        url: String,
        policy: ReconnectPolicy,
        handler: EventHandler,
    ) -> Self {
        let connected = Arc::new(AtomicBool::new(false));
        let (shutdown, shutdown_rx) = watch::channel(false);
        let (outbound, outbound_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(
            url,
            policy,
            handler,
            connected.clone(),
            shutdown_rx,
            outbound_rx,
        ));

        Self {
            client_id,
            connected,
            shutdown,
            outbound,
            task,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// True while the socket is open.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// True until the task has stopped, including while reconnecting.
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Queues an envelope for sending.
    ///
    /// Envelopes still queued when the socket drops are discarded, not
    /// replayed on the next session.
    pub fn send(&self, envelope: WsEnvelope) -> Result<()> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }
        self.outbound
            .send(envelope)
            .map_err(|_| ClientError::NotConnected)
    }

    /// Signals shutdown and waits for the task to stop.
    ///
    /// Returns the error that made the task give up, if it had already
    /// exhausted its reconnect attempts.
    pub async fn close(mut self) -> Result<()> {
        let _ = self.shutdown.send(true);
        let outcome = match tokio::time::timeout(CLOSE_TIMEOUT, &mut self.task).await {
            Ok(Ok(result)) => result,
            Ok(Err(err)) if err.is_cancelled() => Ok(()),
            Ok(Err(err)) => Err(ClientError::Internal(format!(
                "live connection task failed: {}",
                err
            ))),
            Err(_) => {
                warn!("live connection task did not stop in time, aborting");
                self.task.abort();
                Ok(())
            }
        };
        self.connected.store(false, Ordering::SeqCst);
        outcome
    }
}

impl Drop for LiveConnection {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// == Connection Task ==
/// How one open session ended.
enum Session {
    ClosedByOwner,
    Lost(WsError),
}

async fn run(
    url: String,
    policy: ReconnectPolicy,
    handler: EventHandler,
    connected: Arc<AtomicBool>,
    mut shutdown: watch::Receiver<bool>,
    mut outbound: mpsc::UnboundedReceiver<WsEnvelope>,
) -> Result<()> {
    let mut attempts: u32 = 0;

    let outcome = loop {
        if *shutdown.borrow() {
            break Ok(());
        }

        let attempt = tokio::select! {
            result = tokio_tungstenite::connect_async(url.as_str()) => result,
            _ = shutdown.changed() => break Ok(()),
        };

        let failure = match attempt {
            Ok((socket, _)) => {
                attempts = 0;
                connected.store(true, Ordering::SeqCst);
                info!("Live connection open: {}", url);

                let session = pump(socket, &handler, &mut shutdown, &mut outbound).await;
                connected.store(false, Ordering::SeqCst);
                match session {
                    Session::ClosedByOwner => {
                        info!("Live connection closed: {}", url);
                        break Ok(());
                    }
                    Session::Lost(err) => {
                        warn!("Live connection lost: {}: {}", url, err);
                        let dropped = discard_pending(&mut outbound);
                        if dropped > 0 {
                            warn!("Discarded {} unsent live messages", dropped);
                        }
                        err
                    }
                }
            }
            Err(err) => {
                warn!("Live connection to {} failed: {}", url, err);
                err
            }
        };

        attempts += 1;
        if attempts > policy.max_attempts {
            warn!(
                "Giving up on live connection after {} reconnect attempts",
                policy.max_attempts
            );
            break Err(ClientError::from(failure));
        }

        info!(
            "Reconnecting in {}ms (attempt {}/{})",
            policy.delay.as_millis(),
            attempts,
            policy.max_attempts
        );
        tokio::select! {
            _ = tokio::time::sleep(policy.delay) => {}
            _ = shutdown.changed() => break Ok(()),
        }
    };

    connected.store(false, Ordering::SeqCst);
    outcome
}

/// Moves frames until the socket drops or the owner asks to stop.
async fn pump(
    socket: Socket,
    handler: &EventHandler,
    shutdown: &mut watch::Receiver<bool>,
    outbound: &mut mpsc::UnboundedReceiver<WsEnvelope>,
) -> Session {
    let (mut sink, mut source) = socket.split();

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                let _ = sink.send(Message::Close(None)).await;
                return Session::ClosedByOwner;
            }
            Some(envelope) = outbound.recv() => {
                let text = match serde_json::to_string(&envelope) {
                    Ok(text) => text,
                    Err(err) => {
                        warn!("Could not encode outbound live message: {}", err);
                        continue;
                    }
                };
                if let Err(err) = sink.send(Message::Text(text)).await {
                    return Session::Lost(err);
                }
            }
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => dispatch(&text, handler),
                Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                    Ok(text) => dispatch(text, handler),
                    Err(_) => debug!("dropping non-utf8 binary live frame"),
                },
                Some(Ok(Message::Close(_))) | None => {
                    return Session::Lost(WsError::ConnectionClosed)
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Session::Lost(err),
            },
        }
    }
}

/// Empties the outbound queue, returning how many envelopes were dropped.
fn discard_pending(outbound: &mut mpsc::UnboundedReceiver<WsEnvelope>) -> usize {
    let mut dropped = 0;
    while outbound.try_recv().is_ok() {
        dropped += 1;
    }
    dropped
}

fn dispatch(text: &str, handler: &EventHandler) {
    if let Some(event) = parse_event(text) {
        handler(event);
    }
}
