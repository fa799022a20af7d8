use std::{
    future::Future,
    mem,
    pin::Pin,
    task::{Context, Poll},
};

use ocppsim_core::format::error::GenericError;

use crate::v16::interface::WebsocketIo;

type ConnectFuture<W> = Pin<Box<dyn Future<Output = (W, Result<Option<String>, GenericError>)> + Send>>;

pub(crate) enum WebsocketStage<W: WebsocketIo> {
    Idle(W),
    Connecting(ConnectFuture<W>),
    Connected(W),
    Empty,
}

#[derive(Debug)]
pub enum WebsocketResponse {
    Connected(Option<String>),
    HandshakeFailed(GenericError),
    Disconnected,
    WsMsg(String),
}

/// Owns the transport and turns its lifecycle into one event stream.
pub(crate) struct WebsocketService<W: WebsocketIo> {
    state: WebsocketStage<W>,
}

impl<W: WebsocketIo> WebsocketService<W> {
    pub fn new(ws: W) -> Self {
        Self {
            state: WebsocketStage::Idle(ws),
        }
    }

    pub async fn connect(&mut self, url: String, protocols: Vec<String>) {
        self.close_connection().await;
        let ws = match mem::replace(&mut self.state, WebsocketStage::Empty) {
            WebsocketStage::Idle(ws) => ws,
            other => {
                self.state = other;
                log::error!("connect requested while transport is busy");
                return;
            }
        };
        let future = async move {
            let mut ws = ws;
            let res = ws.connect(url, protocols).await;
            (ws, res)
        };
        self.state = WebsocketStage::Connecting(Box::pin(future));
    }

    pub async fn close_connection(&mut self) {
        match mem::replace(&mut self.state, WebsocketStage::Empty) {
            WebsocketStage::Idle(t) => {
                self.state = WebsocketStage::Idle(t);
            }
            WebsocketStage::Connecting(mut t) => {
                let (mut ws, _) = t.as_mut().await;
                ws.close().await;
                self.state = WebsocketStage::Idle(ws);
            }
            WebsocketStage::Connected(mut t) => {
                t.close().await;
                self.state = WebsocketStage::Idle(t);
            }
            WebsocketStage::Empty => {}
        }
    }

    pub async fn send_msg(&mut self, msg: String) -> Result<(), GenericError> {
        match &mut self.state {
            WebsocketStage::Connected(ws) => ws.send(msg).await,
            _ => Err(GenericError::Offline),
        }
    }
}

impl<W: WebsocketIo> Future for WebsocketService<W> {
    type Output = WebsocketResponse;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            WebsocketStage::Idle(_) | WebsocketStage::Empty => Poll::Pending,
            WebsocketStage::Connecting(fut) => match fut.as_mut().poll(cx) {
                Poll::Ready((ws, Ok(protocol))) => {
                    self.state = WebsocketStage::Connected(ws);
                    Poll::Ready(WebsocketResponse::Connected(protocol))
                }
                Poll::Ready((ws, Err(e))) => {
                    self.state = WebsocketStage::Idle(ws);
                    Poll::Ready(WebsocketResponse::HandshakeFailed(e))
                }
                Poll::Pending => Poll::Pending,
            },
            WebsocketStage::Connected(ws) => match ws.poll_recv(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(Some(t)) => Poll::Ready(WebsocketResponse::WsMsg(t)),
                Poll::Ready(None) => {
                    if let WebsocketStage::Connected(ws) =
                        mem::replace(&mut self.state, WebsocketStage::Empty)
                    {
                        self.state = WebsocketStage::Idle(ws);
                    }
                    Poll::Ready(WebsocketResponse::Disconnected)
                }
            },
        }
    }
}
