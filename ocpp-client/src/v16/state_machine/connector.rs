//! Connector lifecycle with guarded transitions.
//!
//! The machine is pure: every accepted transition returns the
//! [`StateChange`] the owner must publish, and the Finishing → Available
//! delay is only a pending flag here while the owner arms the timer.

use core::fmt;

use ocppsim_core::v16::types::ChargePointStatus;

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectorState {
    Available,
    Preparing,
    Charging,
    SuspendedEV,
    SuspendedEVSE,
    Finishing,
    Unavailable,
    Faulted,
}

impl ConnectorState {
    pub fn status(&self) -> ChargePointStatus {
        match self {
            ConnectorState::Available => ChargePointStatus::Available,
            ConnectorState::Preparing => ChargePointStatus::Preparing,
            ConnectorState::Charging => ChargePointStatus::Charging,
            ConnectorState::SuspendedEV => ChargePointStatus::SuspendedEV,
            ConnectorState::SuspendedEVSE => ChargePointStatus::SuspendedEVSE,
            ConnectorState::Finishing => ChargePointStatus::Finishing,
            ConnectorState::Unavailable => ChargePointStatus::Unavailable,
            ConnectorState::Faulted => ChargePointStatus::Faulted,
        }
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self, ConnectorState::SuspendedEV | ConnectorState::SuspendedEVSE)
    }
}

impl fmt::Display for ConnectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status().as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    AuthorizeAccepted,
    StartTransaction,
    SuspendEV,
    SuspendEVSE,
    Resume,
    StopTransaction,
    FinishElapsed,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateChange {
    pub previous: ConnectorState,
    pub next: ConnectorState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IllegalTransition {
    pub from: ConnectorState,
    pub trigger: Trigger,
}

impl fmt::Display for IllegalTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not allowed from {}", self.trigger, self.from)
    }
}

impl std::error::Error for IllegalTransition {}

#[derive(Debug)]
pub struct ConnectorStateMachine {
    state: ConnectorState,
    finish_pending: bool,
}

impl Default for ConnectorStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorStateMachine {
    pub fn new() -> Self {
        Self {
            state: ConnectorState::Available,
            finish_pending: false,
        }
    }

    pub fn state(&self) -> ConnectorState {
        self.state
    }

    pub fn finish_pending(&self) -> bool {
        self.finish_pending
    }

    fn target(from: ConnectorState, trigger: Trigger) -> Option<ConnectorState> {
        use ConnectorState::*;
        match (from, trigger) {
            (Available, Trigger::AuthorizeAccepted) => Some(Preparing),
            (Preparing, Trigger::StartTransaction) => Some(Charging),
            (Charging, Trigger::SuspendEV) => Some(SuspendedEV),
            (Charging, Trigger::SuspendEVSE) => Some(SuspendedEVSE),
            (SuspendedEV | SuspendedEVSE, Trigger::Resume) => Some(Charging),
            (Charging, Trigger::StopTransaction) => Some(Finishing),
            (Finishing, Trigger::FinishElapsed) => Some(Available),
            _ => None,
        }
    }

    pub fn fire(&mut self, trigger: Trigger) -> Result<StateChange, IllegalTransition> {
        if trigger == Trigger::FinishElapsed && !self.finish_pending {
            return Err(IllegalTransition {
                from: self.state,
                trigger,
            });
        }
        let next = Self::target(self.state, trigger).ok_or(IllegalTransition {
            from: self.state,
            trigger,
        })?;
        let previous = core::mem::replace(&mut self.state, next);
        self.finish_pending = false;
        Ok(StateChange { previous, next })
    }

    /// Administrative override. Returns `None` when already in `next`.
    pub fn set_state(&mut self, next: ConnectorState) -> Option<StateChange> {
        if self.state == next {
            return None;
        }
        let previous = core::mem::replace(&mut self.state, next);
        self.finish_pending = false;
        Some(StateChange { previous, next })
    }

    /// Marks the Finishing → Available delay as armed. Only meaningful
    /// while in `Finishing`.
    pub fn schedule_finish(&mut self) -> bool {
        self.finish_pending = self.state == ConnectorState::Finishing;
        self.finish_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: [ConnectorState; 8] = [
        ConnectorState::Available,
        ConnectorState::Preparing,
        ConnectorState::Charging,
        ConnectorState::SuspendedEV,
        ConnectorState::SuspendedEVSE,
        ConnectorState::Finishing,
        ConnectorState::Unavailable,
        ConnectorState::Faulted,
    ];
    const TRIGGERS: [Trigger; 6] = [
        Trigger::AuthorizeAccepted,
        Trigger::StartTransaction,
        Trigger::SuspendEV,
        Trigger::SuspendEVSE,
        Trigger::Resume,
        Trigger::StopTransaction,
    ];

    fn machine_in(state: ConnectorState) -> ConnectorStateMachine {
        let mut m = ConnectorStateMachine::new();
        m.set_state(state);
        m
    }

    #[test]
    fn only_listed_transitions_are_accepted() {
        use ConnectorState::*;
        let legal = [
            (Available, Trigger::AuthorizeAccepted, Preparing),
            (Preparing, Trigger::StartTransaction, Charging),
            (Charging, Trigger::SuspendEV, SuspendedEV),
            (Charging, Trigger::SuspendEVSE, SuspendedEVSE),
            (SuspendedEV, Trigger::Resume, Charging),
            (SuspendedEVSE, Trigger::Resume, Charging),
            (Charging, Trigger::StopTransaction, Finishing),
        ];
        for from in STATES {
            for trigger in TRIGGERS {
                let mut m = machine_in(from);
                let expected = legal
                    .iter()
                    .find(|(f, t, _)| *f == from && *t == trigger)
                    .map(|(_, _, next)| *next);
                match (m.fire(trigger), expected) {
                    (Ok(change), Some(next)) => {
                        assert_eq!(change, StateChange { previous: from, next });
                        assert_eq!(m.state(), next);
                    }
                    (Err(err), None) => {
                        assert_eq!(err, IllegalTransition { from, trigger });
                        assert_eq!(m.state(), from);
                    }
                    (got, want) => panic!("{from:?} + {trigger:?}: got {got:?}, want {want:?}"),
                }
            }
        }
    }

    #[test]
    fn set_state_is_idempotent() {
        let mut m = ConnectorStateMachine::new();
        assert_eq!(m.set_state(ConnectorState::Available), None);
        assert_eq!(
            m.set_state(ConnectorState::Faulted),
            Some(StateChange {
                previous: ConnectorState::Available,
                next: ConnectorState::Faulted
            })
        );
        assert_eq!(m.set_state(ConnectorState::Faulted), None);
    }

    #[test]
    fn finishing_reaches_available_once_scheduled() {
        let mut m = machine_in(ConnectorState::Charging);
        m.fire(Trigger::StopTransaction).unwrap();
        assert!(m.fire(Trigger::FinishElapsed).is_err());
        assert!(m.schedule_finish());
        let change = m.fire(Trigger::FinishElapsed).unwrap();
        assert_eq!(change.next, ConnectorState::Available);
        assert!(!m.finish_pending());
    }

    #[test]
    fn explicit_transition_supersedes_pending_finish() {
        let mut m = machine_in(ConnectorState::Finishing);
        assert!(m.schedule_finish());
        m.set_state(ConnectorState::Unavailable);
        assert!(!m.finish_pending());
        assert!(m.fire(Trigger::FinishElapsed).is_err());
        assert_eq!(m.state(), ConnectorState::Unavailable);
    }

    #[test]
    fn schedule_finish_outside_finishing_is_refused() {
        let mut m = machine_in(ConnectorState::Charging);
        assert!(!m.schedule_finish());
        assert!(!m.finish_pending());
    }
}
