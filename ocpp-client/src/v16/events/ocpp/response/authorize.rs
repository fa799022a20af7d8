use ocppsim_core::v16::messages::authorize::AuthorizeResponse;

use crate::v16::{
    cp::core::{ChargePointCore, OcppError},
    state_machine::session::SessionState,
};

impl ChargePointCore {
    pub(crate) fn authorize_response(&mut self, res: Result<AuthorizeResponse, OcppError>) {
        if self.session != SessionState::Authorizing {
            log::debug!("authorize response while {:?}", self.session);
            return;
        }
        match res {
            Ok(t) => {
                if t.id_tag_info.is_accepted() {
                    self.log_info("Authorize accepted");
                } else {
                    self.log_err(format!(
                        "Authorize returned {:?}, continuing",
                        t.id_tag_info.status
                    ));
                }
                self.on_authorized();
            }
            Err(e) => {
                self.log_err(format!("Authorize failed: {}, start aborted", e));
                self.abort_start();
            }
        }
    }
}
