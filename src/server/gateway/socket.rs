use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::Extension;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

use crate::tokio_tools::spawn_named_task;

use super::hub::Gateway;

const LOG_TARGET: &str = "server::socket";

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Extension(gateway): Extension<Arc<Gateway>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, gateway))
}

async fn handle_socket(socket: WebSocket, gateway: Arc<Gateway>) {
    let (mut sink, mut stream) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let client = gateway.connect(tx);

    let writer = spawn_named_task(format!("ws-writer-{client}"), async move {
        let mut outbound = UnboundedReceiverStream::new(rx);
        while let Some(frame) = outbound.next().await {
            if sink.send(Message::Text(frame.to_string())).await.is_err() {
                break;
            }
        }
    });

    while let Some(received) = stream.next().await {
        match received {
            Ok(Message::Text(text)) => gateway.handle_text(client, &text),
            Ok(Message::Binary(bytes)) => {
                gateway.handle_text(client, &String::from_utf8_lossy(&bytes))
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Err(err) => {
                debug!(target: LOG_TARGET, client_id = %client, error = %err, "socket read failed");
                break;
            }
        }
    }

    gateway.disconnect(client);
    writer.abort();
}
