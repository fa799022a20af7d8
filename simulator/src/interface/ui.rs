use ocppsim_client::v16::{ConnectionStatus, EventSink, SimEvent};

/// Renders simulator events as log lines, one sink per charge point.
pub struct ConsoleUi {
    charge_point_id: String,
    metrics_seen: u64,
    metrics_every: u64,
}

impl ConsoleUi {
    pub fn new(charge_point_id: impl Into<String>, metrics_every: u64) -> Self {
        Self {
            charge_point_id: charge_point_id.into(),
            metrics_seen: 0,
            metrics_every: metrics_every.max(1),
        }
    }
}

impl EventSink for ConsoleUi {
    fn on_event(&mut self, event: SimEvent) {
        let id = &self.charge_point_id;
        match event {
            SimEvent::Metrics(m) => {
                self.metrics_seen += 1;
                if self.metrics_seen % self.metrics_every == 0 {
                    log::info!(
                        "[{}] {:.2} kW | {:.0} V | {:.1} A | {:.3} kWh | SoC {:.0}% | {:.1} C | cost {:.2} | {} min",
                        id,
                        m.power_kw,
                        m.voltage_v,
                        m.current_a,
                        m.energy_kwh,
                        m.soc,
                        m.temperature_c,
                        m.total_cost,
                        m.duration_min
                    );
                }
            }
            SimEvent::StateChanged(change) => {
                log::info!("[{}] status {} -> {}", id, change.previous, change.next);
            }
            SimEvent::Log { direction, text } => {
                log::trace!("[{}] {:?}: {}", id, direction, text);
            }
            SimEvent::Connection(ConnectionStatus::Connecting { url, protocols }) => {
                log::info!("[{}] connecting to {} ({})", id, url, protocols.join(", "));
            }
            SimEvent::Connection(ConnectionStatus::Connected { protocol }) => {
                log::info!("[{}] online, subprotocol {:?}", id, protocol);
            }
            SimEvent::Connection(ConnectionStatus::Disconnected) => {
                log::info!("[{}] offline", id);
            }
            SimEvent::SessionSaved(record) => {
                log::info!(
                    "[{}] session saved: {:.3} kWh in {} min, avg {:.2} kW, cost {:.2}",
                    id,
                    record.energy_kwh,
                    record.duration_min,
                    record.avg_power_kw,
                    record.total_cost
                );
            }
            SimEvent::IndicatorsReset => {
                self.metrics_seen = 0;
                log::debug!("[{}] indicators reset", id);
            }
        }
    }
}
