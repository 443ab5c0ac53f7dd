//! WebSocket relay transport

use super::{ClientMessage, RelayMessage, RelayTransport};
use crate::error::{Error, Result};
use crate::event::Event;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Transport that opens a WebSocket per send and waits for the relay's `OK`
#[derive(Debug, Clone, Default)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    /// Create a transport with no pooled connections
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RelayTransport for WebSocketTransport {
    async fn send(&self, relay: &str, event: &Event) -> Result<()> {
        let (mut ws, _) = connect_async(relay)
            .await
            .map_err(|e| Error::Relay(format!("connect failed: {}", e)))?;

        let frame = ClientMessage::Event(event).to_json()?;
        ws.send(Message::Text(frame))
            .await
            .map_err(|e| Error::Relay(format!("send failed: {}", e)))?;

        let outcome = loop {
            let Some(message) = ws.next().await else {
                break Err(Error::Relay("connection closed before OK".to_string()));
            };
            let text = match message {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) => {
                    break Err(Error::Relay("connection closed before OK".to_string()))
                }
                Ok(_) => continue,
                Err(e) => break Err(Error::Relay(format!("read failed: {}", e))),
            };

            match RelayMessage::from_json(&text) {
                Ok(RelayMessage::Ok {
                    event_id,
                    accepted,
                    message,
                }) if event_id == event.id => {
                    break if accepted {
                        Ok(())
                    } else {
                        Err(Error::Relay(format!("rejected: {}", message)))
                    };
                }
                Ok(RelayMessage::Notice(notice)) => {
                    tracing::debug!(relay, %notice, "Relay notice");
                }
                Ok(RelayMessage::Auth(_)) => {
                    tracing::debug!(relay, "Relay requested authentication");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(relay, error = %e, "Ignoring unparseable relay frame");
                }
            }
        };

        let _ = ws.close(None).await;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Kind, Tags};
    use tokio::net::TcpListener;

    fn event() -> Event {
        Event {
            id: "ab".repeat(32),
            pubkey: "cd".repeat(32),
            created_at: 1_700_000_000,
            kind: Kind::TEXT_NOTE,
            tags: Tags::new(),
            content: "gm".to_string(),
            sig: "ef".repeat(64),
        }
    }

    /// Accept one connection, read the EVENT frame and answer with `reply`
    async fn spawn_relay(reply: impl Fn(&str) -> Vec<String> + Send + 'static) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            while let Some(Ok(message)) = ws.next().await {
                if let Message::Text(text) = message {
                    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
                    let id = value[1]["id"].as_str().unwrap().to_string();
                    for frame in reply(&id) {
                        ws.send(Message::Text(frame)).await.unwrap();
                    }
                }
            }
        });
        format!("ws://{}", addr)
    }

    #[tokio::test]
    async fn test_accepted() {
        let relay = spawn_relay(|id| {
            vec![
                r#"["NOTICE","hello"]"#.to_string(),
                format!(r#"["OK","{}",true,""]"#, "other-event"),
                format!(r#"["OK","{}",true,""]"#, id),
            ]
        })
        .await;
        WebSocketTransport::new().send(&relay, &event()).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected() {
        let relay =
            spawn_relay(|id| vec![format!(r#"["OK","{}",false,"blocked: spam"]"#, id)]).await;
        let err = WebSocketTransport::new()
            .send(&relay, &event())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("blocked: spam"));
    }

    #[tokio::test]
    async fn test_connect_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = WebSocketTransport::new()
            .send(&format!("ws://{}", addr), &event())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Relay(_)));
    }
}
