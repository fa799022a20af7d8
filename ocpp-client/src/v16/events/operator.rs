use ocppsim_core::v16::types::Reason;

use crate::v16::{
    cp::{config::ChargingMode, core::ChargePointCore},
    interface::SimEvent,
    state_machine::session::{SessionState, StartRequest},
    telemetry::TelemetryConfigPatch,
};

/// Local input, the simulator's equivalent of the buttons on a charger.
#[derive(Clone, Debug, PartialEq)]
pub enum OperatorCommand {
    Connect,
    Disconnect,
    StartCharging {
        id_tag: Option<String>,
        connector_id: Option<usize>,
    },
    StopCharging,
    PlugCable,
    UnplugCable,
    SetPrice(f64),
    SetTargetSoc(f64),
    ApplyTelemetry(TelemetryConfigPatch),
    SetMode(ChargingMode),
}

impl ChargePointCore {
    pub(crate) fn operator_command_helper(&mut self, cmd: OperatorCommand) {
        log::debug!("operator command: {:?}", cmd);
        match cmd {
            OperatorCommand::Connect => self.open_connection(),
            OperatorCommand::Disconnect => self.close_connection(),
            OperatorCommand::StartCharging {
                id_tag,
                connector_id,
            } => self.start_session(StartRequest {
                id_tag,
                connector_id,
                ..Default::default()
            }),
            OperatorCommand::StopCharging => self.stop_session(Reason::Local),
            OperatorCommand::PlugCable => {
                self.cable_connected = true;
                self.log_info("Cable connected");
            }
            OperatorCommand::UnplugCable => {
                self.cable_connected = false;
                self.log_info("Cable disconnected");
                if self.session != SessionState::Idle {
                    self.stop_session(Reason::EVDisconnected);
                }
            }
            OperatorCommand::SetPrice(price) => {
                self.config.price_per_kwh = price;
                self.telemetry.set_price_per_kwh(price);
                self.emit(SimEvent::Metrics(self.telemetry.snapshot()));
            }
            OperatorCommand::SetTargetSoc(target) => {
                self.config.target_soc = target;
                self.telemetry.set_soc_target(target);
            }
            OperatorCommand::ApplyTelemetry(patch) => {
                self.telemetry.apply_config(&patch);
            }
            OperatorCommand::SetMode(mode) => {
                self.config.mode = mode;
                self.log_info(format!("Mode set to {:?}", mode));
            }
        }
    }
}
