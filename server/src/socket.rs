//! WebSocket connection loop.
//!
//! Reads binary frames, decodes each into a `ClientMessage` and writes back one
//! `ServerMessage` per frame. While a request is in flight the loop keeps
//! polling the socket: a close, an error or the end of the stream drops the
//! in-flight request future, which cancels any store call it is awaiting.
//!
//! Frames that arrive during a request are queued and served in order.

use std::collections::VecDeque;
use std::fmt::Display;

use axum::body::Bytes;
use axum::extract::ws::Message;
use futures::{Sink, SinkExt, Stream, StreamExt};
use prost::Message as ProstMessage;

use crate::client_connection::ClientConnection;
use crate::proto;

/// What the loop should do with one read from the socket.
enum Frame {
    Request(Bytes),
    Ping(Bytes),
    Ignored,
    Closed,
}

fn classify<E: Display>(msg: Option<Result<Message, E>>) -> Frame {
    match msg {
        Some(Ok(Message::Binary(data))) => Frame::Request(data),
        Some(Ok(Message::Ping(data))) => Frame::Ping(data),
        Some(Ok(Message::Text(_))) => {
            tracing::debug!("received text message (ignoring)");
            Frame::Ignored
        }
        Some(Ok(Message::Pong(_))) => Frame::Ignored,
        Some(Ok(Message::Close(_))) => {
            tracing::debug!("client sent close");
            Frame::Closed
        }
        Some(Err(e)) => {
            tracing::warn!("websocket receive error: {e}");
            Frame::Closed
        }
        None => {
            tracing::debug!("client disconnected");
            Frame::Closed
        }
    }
}

/// Serve one connection until the client goes away.
///
/// `incoming` and `outgoing` are the two halves of the socket.
pub async fn serve_socket<R, W, E>(
    mut incoming: R,
    mut outgoing: W,
    connection: ClientConnection,
) where
    R: Stream<Item = Result<Message, E>> + Unpin,
    W: Sink<Message> + Unpin,
    E: Display,
{
    let mut queued: VecDeque<Bytes> = VecDeque::new();

    loop {
        let data = match queued.pop_front() {
            Some(data) => data,
            None => match classify(incoming.next().await) {
                Frame::Request(data) => data,
                Frame::Ping(data) => {
                    if outgoing.send(Message::Pong(data)).await.is_err() {
                        return;
                    }
                    continue;
                }
                Frame::Ignored => continue,
                Frame::Closed => return,
            },
        };

        let reply = match proto::ClientMessage::decode(data.as_ref()) {
            Ok(client_message) => {
                tracing::debug!(
                    request_id = ?client_message.request_id,
                    "received ClientMessage"
                );

                let handling = connection.handle_message(client_message);
                tokio::pin!(handling);

                loop {
                    tokio::select! {
                        biased;

                        reply = &mut handling => break reply,
                        msg = incoming.next() => match classify(msg) {
                            Frame::Request(data) => queued.push_back(data),
                            Frame::Ping(data) => {
                                if outgoing.send(Message::Pong(data)).await.is_err() {
                                    return;
                                }
                            }
                            Frame::Ignored => {}
                            Frame::Closed => {
                                tracing::debug!("dropping in-flight request");
                                return;
                            }
                        },
                    }
                }
            }
            Err(e) => {
                tracing::warn!("failed to decode ClientMessage: {e}");
                decode_error(&format!("Failed to decode message: {e}"))
            }
        };

        if outgoing
            .send(Message::Binary(reply.encode_to_vec().into()))
            .await
            .is_err()
        {
            tracing::debug!("client disconnected");
            return;
        }
    }
}

/// Reply to a frame that could not be decoded. There is no request id to echo.
fn decode_error(message: &str) -> proto::ServerMessage {
    proto::ServerMessage {
        response: Some(proto::ServerResponse {
            request_id: None,
            status: Some(proto::google::rpc::Status {
                code: proto::google::rpc::Code::InvalidArgument.into(),
                message: message.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
    }
}
