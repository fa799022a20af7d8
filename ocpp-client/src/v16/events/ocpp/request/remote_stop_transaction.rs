use ocppsim_core::v16::{
    messages::remote_stop_transaction::{
        RemoteStopTransactionRequest, RemoteStopTransactionResponse,
    },
    types::{Reason, RemoteStartStopStatus},
};

use crate::v16::{cp::core::ChargePointCore, state_machine::session::SessionState};

impl ChargePointCore {
    pub(crate) fn remote_stop_transaction_ocpp(
        &mut self,
        unique_id: String,
        req: RemoteStopTransactionRequest,
    ) {
        let payload = RemoteStopTransactionResponse {
            status: RemoteStartStopStatus::Accepted,
        };
        self.send_result(unique_id, payload);
        if self.session == SessionState::Idle {
            self.log_info("RemoteStopTransaction accepted, no session running");
            return;
        }
        if let (Some(requested), Some(current)) = (req.transaction_id, self.transaction_id()) {
            if requested != current {
                self.log_err(format!(
                    "RemoteStopTransaction for {} while running {}, stopping anyway",
                    requested, current
                ));
            }
        }
        self.stop_session(Reason::Remote);
    }
}
