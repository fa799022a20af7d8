use ocppsim_core::v16::{
    messages::remote_start_transaction::{
        RemoteStartTransactionRequest, RemoteStartTransactionResponse,
    },
    types::RemoteStartStopStatus,
};

use crate::v16::{cp::core::ChargePointCore, state_machine::session::StartRequest};

impl ChargePointCore {
    pub(crate) fn remote_start_transaction_ocpp(
        &mut self,
        unique_id: String,
        req: RemoteStartTransactionRequest,
    ) {
        let payload = RemoteStartTransactionResponse {
            status: RemoteStartStopStatus::Accepted,
        };
        self.send_result(unique_id, payload);
        self.log_info("RemoteStartTransaction accepted");
        self.start_session(StartRequest {
            id_tag: req.id_tag.filter(|t| !t.is_empty()),
            connector_id: req.connector_id.filter(|c| *c > 0),
            skip_authorize: true,
            profile: req.charging_profile,
        });
    }
}
