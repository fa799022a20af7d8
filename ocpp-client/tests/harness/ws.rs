use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
    task::{Context, Poll},
    time::Duration,
};

use futures::task::AtomicWaker;
use ocppsim_client::v16::WebsocketIo;
use ocppsim_core::format::error::GenericError;
use serde_json::{json, Value};
use tokio::{sync::Notify, time};

/// What the mock CSMS observed on the wire.
#[derive(Clone, Debug, PartialEq)]
pub enum WireEvent {
    Connect {
        url: String,
        protocols: Vec<String>,
    },
    Call {
        unique_id: String,
        action: String,
        payload: Value,
    },
    Result {
        unique_id: String,
        payload: Value,
    },
    Error {
        unique_id: String,
        code: String,
        description: String,
    },
    Closed,
}

#[derive(Default)]
struct Inner {
    is_connected: AtomicBool,
    inbox: Mutex<VecDeque<String>>,
    waker: AtomicWaker,
    outbox: Mutex<VecDeque<WireEvent>>,
    outbox_notify: Notify,
    /// Subprotocols the server accepts; empty accepts the first offered.
    accepted_protocols: Mutex<Vec<String>>,
    statuses: Mutex<Vec<String>>,
    meter_contexts: Mutex<Vec<String>>,
    next_uid: AtomicU64,
}

impl Inner {
    fn push(&self, event: WireEvent) {
        self.outbox.lock().unwrap().push_back(event);
        self.outbox_notify.notify_one();
    }
}

pub struct MockWs {
    inner: Arc<Inner>,
}

impl MockWs {
    pub fn new() -> (Self, MockWsHandle) {
        let inner = Arc::new(Inner::default());
        (
            Self {
                inner: inner.clone(),
            },
            MockWsHandle { inner },
        )
    }
}

#[async_trait::async_trait]
impl WebsocketIo for MockWs {
    async fn connect(
        &mut self,
        url: String,
        protocols: Vec<String>,
    ) -> Result<Option<String>, GenericError> {
        self.inner.push(WireEvent::Connect {
            url,
            protocols: protocols.clone(),
        });
        let accepted = self.inner.accepted_protocols.lock().unwrap().clone();
        let selected = if accepted.is_empty() {
            protocols.first().cloned()
        } else {
            match protocols.iter().find(|p| accepted.contains(p)) {
                Some(p) => Some(p.clone()),
                None => {
                    return Err(GenericError::Transport(
                        "server rejected the offered subprotocols".to_string(),
                    ))
                }
            }
        };
        self.inner.is_connected.store(true, Ordering::Release);
        Ok(selected)
    }

    fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<String>> {
        if !self.inner.is_connected.load(Ordering::Acquire) {
            return Poll::Ready(None);
        }
        if let Some(msg) = self.inner.inbox.lock().unwrap().pop_front() {
            return Poll::Ready(Some(msg));
        }
        self.inner.waker.register(cx.waker());
        if !self.inner.is_connected.load(Ordering::Acquire) {
            return Poll::Ready(None);
        }
        if let Some(msg) = self.inner.inbox.lock().unwrap().pop_front() {
            return Poll::Ready(Some(msg));
        }
        Poll::Pending
    }

    async fn send(&mut self, raw: String) -> Result<(), GenericError> {
        if !self.inner.is_connected.load(Ordering::Acquire) {
            return Err(GenericError::Offline);
        }
        let value: Value = serde_json::from_str(&raw).unwrap();
        let arr = value.as_array().unwrap();
        let unique_id = arr[1].as_str().unwrap().to_string();
        let event = match arr[0].as_u64().unwrap() {
            2 => WireEvent::Call {
                unique_id,
                action: arr[2].as_str().unwrap().to_string(),
                payload: arr[3].clone(),
            },
            3 => WireEvent::Result {
                unique_id,
                payload: arr[2].clone(),
            },
            _ => WireEvent::Error {
                unique_id,
                code: arr[2].as_str().unwrap().to_string(),
                description: arr[3].as_str().unwrap_or_default().to_string(),
            },
        };
        self.inner.push(event);
        Ok(())
    }

    async fn close(&mut self) {
        if self.inner.is_connected.swap(false, Ordering::AcqRel) {
            self.inner.inbox.lock().unwrap().clear();
            self.inner.push(WireEvent::Closed);
        }
    }
}

/// The CSMS side of a [`MockWs`].
#[derive(Clone)]
pub struct MockWsHandle {
    inner: Arc<Inner>,
}

impl MockWsHandle {
    pub fn accept_only(&self, protocols: &[&str]) {
        *self.inner.accepted_protocols.lock().unwrap() =
            protocols.iter().map(|p| p.to_string()).collect();
    }

    /// Next frame or transport event; panics after `timeout_secs` of
    /// (virtual) silence.
    pub async fn next_event(&self, timeout_secs: u64) -> WireEvent {
        let wait = async {
            loop {
                if let Some(ev) = self.inner.outbox.lock().unwrap().pop_front() {
                    return ev;
                }
                self.inner.outbox_notify.notified().await;
            }
        };
        match time::timeout(Duration::from_secs(timeout_secs), wait).await {
            Ok(ev) => ev,
            Err(_) => panic!("nothing on the wire for {} s", timeout_secs),
        }
    }

    fn auto_ack(&self, unique_id: &str, action: &str, payload: &Value) -> bool {
        match action {
            "StatusNotification" => {
                let status = payload["status"].as_str().unwrap_or_default().to_string();
                self.inner.statuses.lock().unwrap().push(status);
                self.send_result(unique_id, json!({}));
                true
            }
            "MeterValues" => {
                let context = payload["meterValue"][0]["sampledValue"][0]["context"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                self.inner.meter_contexts.lock().unwrap().push(context);
                self.send_result(unique_id, json!({}));
                true
            }
            "Heartbeat" => {
                self.send_result(unique_id, json!({"currentTime": chrono::Utc::now()}));
                true
            }
            _ => false,
        }
    }

    /// Waits for a call of `action`, acknowledging status, meter and
    /// heartbeat traffic on the way.
    pub async fn wait_for_call(&self, action: &str, timeout_secs: u64) -> (String, Value) {
        loop {
            match self.next_event(timeout_secs).await {
                WireEvent::Call {
                    unique_id,
                    action: a,
                    payload,
                } => {
                    if a == action {
                        return (unique_id, payload);
                    }
                    if !self.auto_ack(&unique_id, &a, &payload) {
                        panic!("expected {}, got {} {}", action, a, payload);
                    }
                }
                WireEvent::Connect { .. } => {}
                other => panic!("expected {}, got {:?}", action, other),
            }
        }
    }

    /// Waits for the reply to a call this handle sent.
    pub async fn wait_for_reply(&self, unique_id: &str, timeout_secs: u64) -> WireEvent {
        loop {
            let ev = self.next_event(timeout_secs).await;
            match &ev {
                WireEvent::Result { unique_id: u, .. } | WireEvent::Error { unique_id: u, .. }
                    if u == unique_id =>
                {
                    return ev
                }
                WireEvent::Call {
                    unique_id: u,
                    action,
                    payload,
                } => {
                    if !self.auto_ack(u, action, payload) {
                        panic!("unexpected {} while waiting for reply", action);
                    }
                }
                other => panic!("unexpected {:?} while waiting for reply", other),
            }
        }
    }

    pub fn inject(&self, msg: String) {
        assert!(self.inner.is_connected.load(Ordering::Acquire));
        self.inner.inbox.lock().unwrap().push_back(msg);
        self.inner.waker.wake();
    }

    pub fn send_result(&self, unique_id: &str, payload: Value) {
        self.inject(json!([3, unique_id, payload]).to_string());
    }

    pub fn send_call(&self, action: &str, payload: Value) -> String {
        let n = self.inner.next_uid.fetch_add(1, Ordering::Relaxed);
        let unique_id = format!("cs-{}", n);
        self.inject(json!([2, unique_id, action, payload]).to_string());
        unique_id
    }

    /// Server-side drop of the connection.
    pub fn drop_connection(&self) {
        self.inner.is_connected.store(false, Ordering::Release);
        self.inner.inbox.lock().unwrap().clear();
        self.inner.waker.wake();
    }

    pub fn statuses(&self) -> Vec<String> {
        self.inner.statuses.lock().unwrap().clone()
    }

    pub fn meter_contexts(&self) -> Vec<String> {
        self.inner.meter_contexts.lock().unwrap().clone()
    }
}
