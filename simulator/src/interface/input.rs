use flume::Sender;
use ocppsim_client::v16::{ChargingMode, OperatorCommand, TelemetryConfigPatch};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;

pub const HELP: &str = "\
commands (prefix with @<id> to address a single charge point):
  connect | disconnect
  start [idTag] [connectorId] | stop
  plug | unplug
  price <per kWh> | soc <target %> | power <max kW>
  mode normal|fast
  help | quit";

#[derive(Debug, PartialEq)]
pub enum Input {
    Command {
        target: Option<String>,
        command: OperatorCommand,
    },
    Help,
    Quit,
}

fn number(arg: Option<&str>, what: &str) -> Result<f64, String> {
    let arg = arg.ok_or_else(|| format!("missing {}", what))?;
    let value: f64 = arg
        .parse()
        .map_err(|_| format!("invalid {}: {}", what, arg))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("invalid {}: {}", what, arg));
    }
    Ok(value)
}

/// Parses one console line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let mut words = line.split_whitespace().peekable();
    let target = match words.peek() {
        Some(w) if w.starts_with('@') => {
            let id = w[1..].to_string();
            words.next();
            if id.is_empty() {
                return Err("empty charge point id after @".to_string());
            }
            Some(id)
        }
        _ => None,
    };
    let Some(verb) = words.next() else {
        return match target {
            Some(_) => Err("missing command".to_string()),
            None => Ok(None),
        };
    };
    let command = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Some(Input::Help)),
        "quit" | "exit" => return Ok(Some(Input::Quit)),
        "connect" => OperatorCommand::Connect,
        "disconnect" => OperatorCommand::Disconnect,
        "start" => {
            let id_tag = words.next().map(str::to_string);
            let connector_id = match words.next() {
                Some(raw) => Some(
                    raw.parse::<usize>()
                        .ok()
                        .filter(|id| *id > 0)
                        .ok_or_else(|| format!("invalid connector id: {}", raw))?,
                ),
                None => None,
            };
            OperatorCommand::StartCharging {
                id_tag,
                connector_id,
            }
        }
        "stop" => OperatorCommand::StopCharging,
        "plug" => OperatorCommand::PlugCable,
        "unplug" => OperatorCommand::UnplugCable,
        "price" => OperatorCommand::SetPrice(number(words.next(), "price")?),
        "soc" => OperatorCommand::SetTargetSoc(number(words.next(), "target soc")?.min(100.0)),
        "power" => OperatorCommand::ApplyTelemetry(TelemetryConfigPatch {
            max_power_kw: Some(number(words.next(), "power")?),
            ..Default::default()
        }),
        "mode" => match words.next().map(str::to_ascii_lowercase).as_deref() {
            Some("normal") => OperatorCommand::SetMode(ChargingMode::Normal),
            Some("fast") => OperatorCommand::SetMode(ChargingMode::Fast),
            Some(other) => return Err(format!("unknown mode: {}", other)),
            None => return Err("missing mode".to_string()),
        },
        other => return Err(format!("unknown command: {}", other)),
    };
    Ok(Some(Input::Command { target, command }))
}

/// Reads commands until EOF, `quit` or cancellation and routes them to the
/// matching charge points.
pub async fn run_input<R: AsyncBufRead + Unpin>(
    reader: R,
    routes: Vec<(String, Sender<OperatorCommand>)>,
    stop_token: CancellationToken,
) {
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            _ = stop_token.cancelled() => break,
            line = lines.next_line() => line,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                log::debug!("console input closed");
                break;
            }
            Err(e) => {
                log::warn!("console read failed: {}", e);
                break;
            }
        };
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(Input::Help)) => println!("{}", HELP),
            Ok(Some(Input::Quit)) => {
                stop_token.cancel();
                break;
            }
            Ok(Some(Input::Command { target, command })) => {
                let mut delivered = false;
                for (id, tx) in routes.iter() {
                    if target.as_ref().is_some_and(|t| t != id) {
                        continue;
                    }
                    delivered = true;
                    if tx.send(command.clone()).is_err() {
                        log::warn!("[{}] charge point is no longer running", id);
                    }
                }
                if !delivered {
                    log::warn!("no charge point named {:?}", target);
                }
            }
            Err(e) => log::warn!("{}; type `help` for the command list", e),
        }
    }
}
