use std::collections::{BTreeMap, VecDeque};

use ocppsim_client::v16::{
    ChargePointConfig, ChargePointCore, CoreActions, OperatorCommand, SessionRecord, SimEvent,
    TimerId,
};
use serde_json::{json, Value};

/// Frame as the CSMS would see it.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
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
}

impl Frame {
    fn parse(raw: &str) -> Frame {
        let value: Value = serde_json::from_str(raw).unwrap();
        let arr = value.as_array().unwrap();
        let unique_id = arr[1].as_str().unwrap().to_string();
        match arr[0].as_u64().unwrap() {
            2 => Frame::Call {
                unique_id,
                action: arr[2].as_str().unwrap().to_string(),
                payload: arr[3].clone(),
            },
            3 => Frame::Result {
                unique_id,
                payload: arr[2].clone(),
            },
            4 => Frame::Error {
                unique_id,
                code: arr[2].as_str().unwrap().to_string(),
                description: arr[3].as_str().unwrap().to_string(),
            },
            other => panic!("unexpected message type {}", other),
        }
    }
}

/// Drives a [`ChargePointCore`] by hand: frames, timers and events are
/// collected instead of executed.
pub struct CoreHarness {
    pub core: ChargePointCore,
    pub sent: VecDeque<Frame>,
    pub timers: BTreeMap<TimerId, u64>,
    pub events: Vec<SimEvent>,
    pub saved: Vec<SessionRecord>,
    pub connects: Vec<(String, Vec<String>)>,
    pub disconnects: usize,
}

pub fn test_config() -> ChargePointConfig {
    ChargePointConfig {
        endpoint_url: "ws://csms.test".to_string(),
        charge_point_id: "CP-TEST".to_string(),
        seed: 7,
        ..Default::default()
    }
}

impl CoreHarness {
    pub fn new(config: ChargePointConfig) -> Self {
        super::init_logger();
        Self {
            core: ChargePointCore::new(config),
            sent: VecDeque::new(),
            timers: BTreeMap::new(),
            events: Vec::new(),
            saved: Vec::new(),
            connects: Vec::new(),
            disconnects: 0,
        }
    }

    /// Connected, booted with `interval` and the initial status drained.
    pub fn online(config: ChargePointConfig, interval: u64) -> Self {
        let mut h = Self::new(config);
        let actions = h.core.init();
        h.apply(actions);
        let actions = h.core.ws_connected(Some("ocpp1.6j".to_string()));
        h.apply(actions);
        let (uid, _) = h.take_call("BootNotification");
        h.respond(
            &uid,
            json!({"status": "Accepted", "currentTime": "2024-01-01T00:00:00Z", "interval": interval}),
        );
        h.ack_all("StatusNotification");
        h
    }

    pub fn apply(&mut self, actions: Vec<CoreActions>) {
        for action in actions {
            match action {
                CoreActions::Connect { url, protocols } => self.connects.push((url, protocols)),
                CoreActions::Disconnect => self.disconnects += 1,
                CoreActions::SendWsMsg(raw) => self.sent.push_back(Frame::parse(&raw)),
                CoreActions::AddTimeout(id, ms) => {
                    self.timers.insert(id, ms);
                }
                CoreActions::RemoveTimeout(id) => {
                    self.timers.remove(&id);
                }
                CoreActions::Emit(event) => self.events.push(event),
                CoreActions::SaveSession(record) => self.saved.push(record),
            }
        }
    }

    pub fn command(&mut self, cmd: OperatorCommand) {
        let actions = self.core.operator_command(cmd);
        self.apply(actions);
    }

    pub fn inject(&mut self, raw: &str) {
        let actions = self.core.got_ws_msg(raw.to_string());
        self.apply(actions);
    }

    pub fn respond(&mut self, unique_id: &str, payload: Value) {
        self.inject(&json!([3, unique_id, payload]).to_string());
    }

    pub fn respond_error(&mut self, unique_id: &str, code: &str) {
        self.inject(&json!([4, unique_id, code, "", {}]).to_string());
    }

    pub fn send_call(&mut self, unique_id: &str, action: &str, payload: Value) {
        self.inject(&json!([2, unique_id, action, payload]).to_string());
    }

    /// Fires an armed timer the way the timer service does.
    pub fn fire(&mut self, id: TimerId) {
        assert!(self.timers.remove(&id).is_some(), "{:?} is not armed", id);
        let actions = self.core.handle_timeout(id);
        self.apply(actions);
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn call_timer(&self) -> Option<TimerId> {
        self.timers
            .keys()
            .find(|id| matches!(id, TimerId::Call(_)))
            .copied()
    }

    pub fn disconnect(&mut self) {
        let actions = self.core.ws_disconnected();
        self.apply(actions);
    }

    /// Removes and returns the first call for `action`.
    pub fn take_call(&mut self, action: &str) -> (String, Value) {
        let pos = self
            .sent
            .iter()
            .position(|f| matches!(f, Frame::Call { action: a, .. } if a == action))
            .unwrap_or_else(|| panic!("no {} call in {:?}", action, self.sent));
        match self.sent.remove(pos) {
            Some(Frame::Call {
                unique_id, payload, ..
            }) => (unique_id, payload),
            _ => unreachable!(),
        }
    }

    pub fn try_take_call(&mut self, action: &str) -> Option<(String, Value)> {
        self.has_call(action).then(|| self.take_call(action))
    }

    pub fn has_call(&self, action: &str) -> bool {
        self.sent
            .iter()
            .any(|f| matches!(f, Frame::Call { action: a, .. } if a == action))
    }

    /// Acknowledges every queued call for `action` with an empty result and
    /// returns their payloads.
    pub fn ack_all(&mut self, action: &str) -> Vec<Value> {
        let mut payloads = Vec::new();
        while let Some((uid, payload)) = self.try_take_call(action) {
            self.respond(&uid, json!({}));
            payloads.push(payload);
        }
        payloads
    }

    pub fn take_reply(&mut self, unique_id: &str) -> Frame {
        let pos = self
            .sent
            .iter()
            .position(|f| match f {
                Frame::Result { unique_id: u, .. } | Frame::Error { unique_id: u, .. } => {
                    u == unique_id
                }
                _ => false,
            })
            .unwrap_or_else(|| panic!("no reply to {} in {:?}", unique_id, self.sent));
        self.sent.remove(pos).unwrap()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::StateChanged(change) => Some(change.next.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn logged(&self, needle: &str) -> bool {
        self.events.iter().any(|e| match e {
            SimEvent::Log { text, .. } => text.contains(needle),
            _ => false,
        })
    }

    /// RemoteStart accepted with transaction `transaction_id`; leaves the
    /// session active with the begin sample acknowledged.
    pub fn start_remote(&mut self, transaction_id: i32) {
        self.send_call("cs-start", "RemoteStartTransaction", json!({"idTag": "TAG-1"}));
        self.take_reply("cs-start");
        let (uid, _) = self.take_call("StartTransaction");
        self.respond(
            &uid,
            json!({"transactionId": transaction_id, "idTagInfo": {"status": "Accepted"}}),
        );
        self.ack_all("StatusNotification");
        self.ack_all("MeterValues");
    }

    pub fn tick(&mut self, n: usize) {
        for _ in 0..n {
            if !self.is_armed(TimerId::Tick) {
                return;
            }
            self.fire(TimerId::Tick);
        }
    }
}
