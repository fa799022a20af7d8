use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures_util::{stream::StreamExt, Sink, SinkExt};
use ocppsim_core::format::error::GenericError;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        client::IntoClientRequest,
        http::{header::SEC_WEBSOCKET_PROTOCOL, HeaderValue},
        Message,
    },
    MaybeTlsStream, WebSocketStream,
};

use crate::v16::interface::WebsocketIo;

/// tokio-tungstenite transport. One handshake per `connect`; fallback and
/// retry policy belong to the core.
#[derive(Default)]
pub struct TokioWsClient {
    socket: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
}

impl TokioWsClient {
    pub fn new() -> Self {
        Self { socket: None }
    }
}

fn transport_err(e: impl std::fmt::Display) -> GenericError {
    GenericError::Transport(e.to_string())
}

#[async_trait::async_trait]
impl WebsocketIo for TokioWsClient {
    async fn connect(
        &mut self,
        url: String,
        protocols: Vec<String>,
    ) -> Result<Option<String>, GenericError> {
        log::debug!("connecting to url: {} offering {:?}", url, protocols);
        let mut req = url.into_client_request().map_err(transport_err)?;
        if !protocols.is_empty() {
            let offer = HeaderValue::from_str(&protocols.join(", ")).map_err(transport_err)?;
            req.headers_mut().insert(SEC_WEBSOCKET_PROTOCOL, offer);
        }
        let (socket, response) = connect_async(req).await.map_err(transport_err)?;
        let selected = response
            .headers()
            .get(SEC_WEBSOCKET_PROTOCOL)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        self.socket = Some(socket);
        Ok(selected)
    }

    fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<String>> {
        let socket = match self.socket.as_mut() {
            Some(sock) => sock,
            None => return Poll::Ready(None),
        };
        loop {
            match socket.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(Message::Ping(payload)))) => {
                    let mut sink = Pin::new(&mut *socket);
                    if let Poll::Ready(Ok(())) = sink.as_mut().poll_ready(cx) {
                        let _ = sink.as_mut().start_send(Message::Pong(payload));
                        let _ = sink.as_mut().poll_flush(cx);
                    }
                    continue;
                }
                Poll::Ready(Some(Ok(Message::Text(s)))) => return Poll::Ready(Some(s.to_string())),
                Poll::Ready(Some(Ok(Message::Pong(_)))) => continue,
                Poll::Ready(Some(Ok(Message::Close(frame)))) => {
                    log::debug!("close frame received: {:?}", frame);
                    self.socket = None;
                    return Poll::Ready(None);
                }
                Poll::Ready(Some(Ok(other))) => {
                    log::warn!("ignoring non-text frame ({} bytes)", other.len());
                    continue;
                }
                Poll::Ready(Some(Err(e))) => {
                    log::warn!("ws error: {}", e);
                    self.socket = None;
                    return Poll::Ready(None);
                }
                Poll::Ready(None) => {
                    self.socket = None;
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }

    async fn send(&mut self, msg: String) -> Result<(), GenericError> {
        match &mut self.socket {
            Some(socket) => socket
                .send(Message::Text(msg.into()))
                .await
                .map_err(transport_err),
            None => Err(GenericError::Offline),
        }
    }

    async fn close(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            let _ = socket.close(None).await;
        }
    }
}
