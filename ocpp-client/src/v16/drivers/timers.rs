use std::{
    collections::{BTreeSet, HashMap},
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use tokio::time::{Instant, Sleep};

use crate::v16::interface::{Timeout, TimerId};

/// Stand-in deadline for delays past what `Instant` can represent.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Timer service on tokio's clock, so paused-time tests drive it too.
pub struct TokioTimerManager {
    timer_deadlines: HashMap<TimerId, Instant>,
    deadline_queue: BTreeSet<(Instant, TimerId)>,
    active_sleep: Option<(Pin<Box<Sleep>>, Instant)>,
}

impl Default for TokioTimerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TokioTimerManager {
    pub fn new() -> Self {
        Self {
            timer_deadlines: HashMap::new(),
            deadline_queue: BTreeSet::new(),
            active_sleep: None,
        }
    }

    fn next_deadline(&self) -> Option<(Instant, TimerId)> {
        self.deadline_queue.iter().next().copied()
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timer_deadlines.contains_key(&id)
    }
}

impl Timeout for TokioTimerManager {
    fn add_or_update_timeout(&mut self, id: TimerId, timeout_ms: u64) {
        let now = Instant::now();
        let when = now
            .checked_add(Duration::from_millis(timeout_ms))
            .unwrap_or(now + FAR_FUTURE);
        if let Some(prev) = self.timer_deadlines.insert(id, when) {
            self.deadline_queue.remove(&(prev, id));
        }
        self.deadline_queue.insert((when, id));
    }

    fn remove_timeout(&mut self, id: TimerId) {
        if let Some(prev) = self.timer_deadlines.remove(&id) {
            self.deadline_queue.remove(&(prev, id));
        }
    }

    fn remove_all_timeouts(&mut self) {
        self.timer_deadlines.clear();
        self.deadline_queue.clear();
        self.active_sleep = None;
    }

    fn poll_timeout(&mut self, cx: &mut Context<'_>) -> Poll<TimerId> {
        loop {
            let Some((deadline, id)) = self.next_deadline() else {
                self.active_sleep = None;
                return Poll::Pending;
            };
            if Instant::now() >= deadline {
                self.deadline_queue.remove(&(deadline, id));
                self.timer_deadlines.remove(&id);
                return Poll::Ready(id);
            }
            if let Some((sleep, armed_for)) = &mut self.active_sleep {
                if *armed_for == deadline {
                    match sleep.as_mut().poll(cx) {
                        Poll::Ready(()) => {
                            self.active_sleep = None;
                            continue;
                        }
                        Poll::Pending => return Poll::Pending,
                    }
                }
            }
            self.active_sleep = Some((Box::pin(tokio::time::sleep_until(deadline)), deadline));
        }
    }
}
