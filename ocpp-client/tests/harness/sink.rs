use std::sync::{Arc, Mutex};

use ocppsim_client::v16::{ConnectorState, EventSink, SimEvent};

/// Event sink whose history stays readable after the charge point moved
/// into its task.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SimEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SimEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn states(&self) -> Vec<ConnectorState> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SimEvent::StateChanged(change) => Some(change.next),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn on_event(&mut self, event: SimEvent) {
        self.events.lock().unwrap().push(event);
    }
}
