use crate::v16::{cp::core::ChargePointCore, interface::TimerId};

/// Recurring tasks. Each owns exactly one timer id, so starting a task that
/// already runs only moves its next deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Periodic {
    Heartbeat,
    MeterValues,
    Tick,
}

impl Periodic {
    pub(crate) fn timer_id(self) -> TimerId {
        match self {
            Periodic::Heartbeat => TimerId::Heartbeat,
            Periodic::MeterValues => TimerId::MeterValues,
            Periodic::Tick => TimerId::Tick,
        }
    }
}

impl ChargePointCore {
    pub(crate) fn start_ticker(&mut self, task: Periodic, interval_ms: u64) {
        log::trace!("start {:?} every {} ms", task, interval_ms);
        self.tickers.insert(task, interval_ms);
        self.add_timeout(task.timer_id(), interval_ms);
    }

    pub(crate) fn stop_ticker(&mut self, task: Periodic) {
        if self.tickers.remove(&task).is_some() {
            log::trace!("stop {:?}", task);
            self.remove_timeout(task.timer_id());
        }
    }

    /// Arms the next period. Returns false when the task was stopped, in
    /// which case the expiry is stale and must be ignored.
    pub(crate) fn rearm_ticker(&mut self, task: Periodic) -> bool {
        match self.tickers.get(&task).copied() {
            Some(interval_ms) => {
                self.add_timeout(task.timer_id(), interval_ms);
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_ticking(&self, task: Periodic) -> bool {
        self.tickers.contains_key(&task)
    }
}
