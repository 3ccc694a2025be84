//! Shared engine behind the three live WebSocket products.
//!
//! One task owns the socket outright. Session types are cheap channel handles
//! that feed it commands; everything the server sends comes back in arrival
//! order through the event sink the caller supplied. Each product plugs in a
//! [`LiveCodec`] that maps its command and event types onto wire frames.

pub mod agent;
pub mod listen;
pub mod speak;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::protocol::Message;

use crate::protocol::CloseReason;
use crate::transport::ws::WsStream;
use crate::{Error, Result};

const TRACE_LOG_MAX_BYTES: usize = 1024;
const TRACE_TRUNCATE_SUFFIX: &str = "... (truncated)";

/// All live endpoints expect a keepalive at least every 30 seconds or they
/// time the connection out. The engine sends one on this cadence on its own.
pub(crate) const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);
const KEEPALIVE_FRAME: &str = r#"{"type":"KeepAlive"}"#;

const COMMAND_BUFFER: usize = 64;

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Message-level socket abstraction so the engine can run against a mock in
/// tests.
pub(crate) trait SocketTransport: Send {
    fn send(&mut self, message: Message) -> BoxFuture<'_, Result<()>>;
    fn next_msg(&mut self) -> BoxFuture<'_, Result<Option<Message>>>;
}

impl SocketTransport for WsStream {
    fn send(&mut self, message: Message) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            SinkExt::send(self, message).await?;
            Ok(())
        })
    }

    fn next_msg(&mut self) -> BoxFuture<'_, Result<Option<Message>>> {
        Box::pin(async move {
            match StreamExt::next(self).await {
                Some(message) => Ok(Some(message?)),
                None => Ok(None),
            }
        })
    }
}

/// How one live product maps onto the wire.
pub(crate) trait LiveCodec {
    type Command: Send + 'static;
    type Event: Send + 'static;

    /// Turn a command into the frame that carries it.
    fn encode(command: Self::Command) -> Result<Message>;

    /// The command that asks the server for a graceful shutdown.
    fn close_command() -> Self::Command;

    /// Decode one inbound text frame. Must not fail; malformed input becomes
    /// an event the caller can see.
    fn decode_text(text: &str) -> Self::Event;

    /// Decode one inbound binary frame, or `None` if the product has no
    /// binary downstream.
    fn decode_binary(bytes: Vec<u8>) -> Option<Self::Event>;

    /// The terminal event reporting why the session ended.
    fn closed_event(reason: CloseReason) -> Self::Event;
}

enum Command<C> {
    Send {
        command: C,
        ack: oneshot::Sender<Result<()>>,
    },
    Close {
        ack: oneshot::Sender<()>,
    },
}

/// Channel handle onto a running session task.
pub(crate) struct Handle<C> {
    commands: mpsc::Sender<Command<C>>,
    open: Arc<AtomicBool>,
}

impl<C> Clone for Handle<C> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            open: Arc::clone(&self.open),
        }
    }
}

impl<C> Handle<C> {
    /// Queue a command and wait until the engine has written it out.
    pub(crate) async fn send(&self, command: C) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Send { command, ack: tx })
            .await
            .map_err(|_| Error::ConnectionClosed)?;
        rx.await.map_err(|_| Error::ConnectionClosed)?
    }

    /// Gracefully close the session. Safe to call more than once; extra
    /// calls are no-ops. Returns once the connection is down; the terminal
    /// event follows on the sink and is not waited for.
    pub(crate) async fn close(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        if self
            .commands
            .send(Command::Close { ack: tx })
            .await
            .is_err()
        {
            return Ok(());
        }
        let _ = rx.await;
        Ok(())
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

/// Start the session task. The handle it returns is the only way in; the
/// `events` sink is the only way out. A full sink stalls the socket read
/// rather than dropping events.
pub(crate) fn spawn<C, T>(mut transport: T, events: mpsc::Sender<C::Event>) -> Handle<C::Command>
where
    C: LiveCodec + 'static,
    T: SocketTransport + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command<C::Command>>(COMMAND_BUFFER);
    let open = Arc::new(AtomicBool::new(true));
    let open_task = Arc::clone(&open);

    tokio::spawn(async move {
        let mut keepalive = tokio::time::interval_at(
            tokio::time::Instant::now() + KEEPALIVE_INTERVAL,
            KEEPALIVE_INTERVAL,
        );
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(Command::Send { command, ack }) => {
                        let result = match C::encode(command) {
                            Ok(frame) => {
                                if let Message::Text(text) = &frame {
                                    tracing::trace!(
                                        "Sending frame: {}",
                                        safe_truncate(text, TRACE_LOG_MAX_BYTES)
                                    );
                                }
                                transport.send(frame).await
                            }
                            Err(err) => Err(err),
                        };
                        let _ = ack.send(result);
                    }
                    Some(Command::Close { ack }) => {
                        shutdown::<C, T>(&mut transport).await;
                        open_task.store(false, Ordering::SeqCst);
                        // Ack before the terminal event: close() must not
                        // wait on sink capacity.
                        let _ = ack.send(());
                        let _ = events.send(C::closed_event(CloseReason::Requested)).await;
                        break;
                    }
                    None => {
                        // Every handle is gone; tear the socket down quietly.
                        shutdown::<C, T>(&mut transport).await;
                        open_task.store(false, Ordering::SeqCst);
                        let _ = events.send(C::closed_event(CloseReason::Requested)).await;
                        break;
                    }
                },
                msg = transport.next_msg() => match msg {
                    Ok(Some(Message::Text(text))) => {
                        tracing::trace!(
                            "Received frame: {}",
                            safe_truncate(&text, TRACE_LOG_MAX_BYTES)
                        );
                        let _ = events.send(C::decode_text(&text)).await;
                    }
                    Ok(Some(Message::Binary(bytes))) => {
                        if let Some(event) = C::decode_binary(bytes.into()) {
                            let _ = events.send(event).await;
                        }
                    }
                    Ok(Some(Message::Ping(payload))) => {
                        tracing::debug!("Received Ping, sending Pong");
                        let _ = transport.send(Message::Pong(payload)).await;
                    }
                    Ok(Some(Message::Close(frame))) => {
                        tracing::info!("WebSocket connection closed by server");
                        let reason = frame.map_or(CloseReason::Dropped, |frame| {
                            CloseReason::Server {
                                code: frame.code.into(),
                                reason: frame.reason.to_string(),
                            }
                        });
                        open_task.store(false, Ordering::SeqCst);
                        let _ = events.send(C::closed_event(reason)).await;
                        break;
                    }
                    Ok(Some(_)) => {}
                    Ok(None) => {
                        open_task.store(false, Ordering::SeqCst);
                        let _ = events.send(C::closed_event(CloseReason::Dropped)).await;
                        break;
                    }
                    Err(err) => {
                        open_task.store(false, Ordering::SeqCst);
                        let _ = events
                            .send(C::closed_event(CloseReason::Error(err.to_string())))
                            .await;
                        break;
                    }
                },
                _ = keepalive.tick() => {
                    if let Err(err) = transport.send(Message::Text(KEEPALIVE_FRAME.into())).await {
                        tracing::debug!("Keepalive write failed: {err}");
                    }
                }
            }
        }
    });

    Handle {
        commands: cmd_tx,
        open,
    }
}

/// Best-effort graceful shutdown: the product's close command, then the
/// WebSocket close handshake.
async fn shutdown<C, T>(transport: &mut T)
where
    C: LiveCodec,
    T: SocketTransport,
{
    if let Ok(frame) = C::encode(C::close_command()) {
        let _ = transport.send(frame).await;
    }
    let _ = transport.send(Message::Close(None)).await;
}

fn safe_truncate(s: &str, max_bytes: usize) -> std::borrow::Cow<'_, str> {
    if s.len() <= max_bytes {
        return std::borrow::Cow::Borrowed(s);
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    std::borrow::Cow::Owned(format!(
        "{} {} {} bytes",
        &s[..end],
        TRACE_TRUNCATE_SUFFIX,
        s.len() - end
    ))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{BoxFuture, Message, Result, SocketTransport};
    use crate::Error;
    use tokio::sync::mpsc;

    /// Socket double driven by channels. Tests feed inbound frames through
    /// `incoming` and watch what the engine writes on `outgoing`.
    pub struct MockTransport {
        pub incoming: mpsc::Receiver<Result<Option<Message>>>,
        pub outgoing: mpsc::Sender<Message>,
    }

    impl MockTransport {
        pub fn pair(
            capacity: usize,
        ) -> (
            Self,
            mpsc::Sender<Result<Option<Message>>>,
            mpsc::Receiver<Message>,
        ) {
            let (in_tx, in_rx) = mpsc::channel(capacity);
            let (out_tx, out_rx) = mpsc::channel(capacity);
            (
                Self {
                    incoming: in_rx,
                    outgoing: out_tx,
                },
                in_tx,
                out_rx,
            )
        }
    }

    impl SocketTransport for MockTransport {
        fn send(&mut self, message: Message) -> BoxFuture<'_, Result<()>> {
            let outgoing = self.outgoing.clone();
            Box::pin(async move {
                outgoing
                    .send(message)
                    .await
                    .map_err(|_| Error::ConnectionClosed)?;
                Ok(())
            })
        }

        fn next_msg(&mut self) -> BoxFuture<'_, Result<Option<Message>>> {
            Box::pin(async move {
                match self.incoming.recv().await {
                    Some(item) => item,
                    None => Ok(None),
                }
            })
        }
    }
}
