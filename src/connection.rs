//! The outbound half of a single client's message stream, wrapped so
//! concurrent broadcast tasks can write to it safely.

use std::pin::Pin;

use axum::extract::ws::Message;
use futures::Sink;
use futures::SinkExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::message::OutboundMessage;

type BoxedSink = Pin<Box<dyn Sink<Message, Error = axum::Error> + Send>>;

/// Per-connection write guard. A peer may be broadcast to by many
/// concurrently-running message handlers; wrapping the sink in a mutex keeps
/// each JSON frame write indivisible.
///
/// The sink is boxed behind `Sink<Message, Error = axum::Error>` rather than
/// naming `SplitSink<WebSocket, Message>` directly so tests can drive a
/// connection without a real socket upgrade.
pub struct Connection {
    pub id: Uuid,
    sink: Mutex<BoxedSink>,
}

impl Connection {
    pub fn new<S>(sink: S) -> Self
    where
        S: Sink<Message, Error = axum::Error> + Send + 'static,
    {
        Self {
            id: Uuid::new_v4(),
            sink: Mutex::new(Box::pin(sink)),
        }
    }

    /// Serialize `message` and write it as a single text frame. Returns an
    /// error if the underlying socket write failed, which callers treat as
    /// "this peer is gone".
    pub async fn send(&self, message: &OutboundMessage) -> anyhow::Result<()> {
        let json = serde_json::to_string(message)?;
        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(json)).await?;
        Ok(())
    }

    pub async fn send_raw(&self, message: Message) -> anyhow::Result<()> {
        let mut sink = self.sink.lock().await;
        sink.send(message).await?;
        Ok(())
    }

    pub async fn close(&self) {
        let mut sink = self.sink.lock().await;
        let _ = sink.close().await;
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::recording_connection;
    use crate::message::OutboundMessage;

    #[tokio::test]
    async fn send_records_the_json_frame() {
        let (conn, sent, _fail) = recording_connection();
        let msg = OutboundMessage::SetLeader {
            board_id: "B".to_string(),
            user_id: "U1".to_string(),
        };
        conn.send(&msg).await.unwrap();
        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn send_surfaces_sink_failure() {
        let (conn, _sent, fail) = recording_connection();
        fail.store(true, std::sync::atomic::Ordering::SeqCst);
        let msg = OutboundMessage::SetLeader {
            board_id: "B".to_string(),
            user_id: "U1".to_string(),
        };
        assert!(conn.send(&msg).await.is_err());
    }
}
