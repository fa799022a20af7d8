mod harness;

use harness::core::{test_config, CoreHarness, Frame};
use ocppsim_client::v16::{
    ChargePointConfig, ConnectionStatus, ConnectorState, OperatorCommand, SessionState, SimEvent,
    TelemetryConfigPatch, TimerId,
};
use ocppsim_core::format::error::GenericError;
use serde_json::json;

fn context_of(meter_values: &serde_json::Value) -> String {
    meter_values["meterValue"][0]["sampledValue"][0]["context"]
        .as_str()
        .unwrap()
        .to_string()
}

#[test]
fn boot_accepted_starts_heartbeat_with_server_interval() {
    let mut h = CoreHarness::online(test_config(), 30);
    assert_eq!(h.timers.get(&TimerId::Heartbeat), Some(&30_000));
    assert_eq!(h.connects[0].0, "ws://csms.test/ocpp/CentralSystemService/CP-TEST");

    h.fire(TimerId::Heartbeat);
    let (_, payload) = h.take_call("Heartbeat");
    assert_eq!(payload, json!({}));
    assert!(h.is_armed(TimerId::Heartbeat));
}

#[test]
fn boot_rejected_waits_and_retries() {
    let mut h = CoreHarness::new(test_config());
    let actions = h.core.init();
    h.apply(actions);
    let actions = h.core.ws_connected(None);
    h.apply(actions);
    let (uid, payload) = h.take_call("BootNotification");
    assert_eq!(payload["chargePointVendor"], "IGE2A");
    h.respond(
        &uid,
        json!({"status": "Rejected", "currentTime": "2024-01-01T00:00:00Z", "interval": 10}),
    );
    assert_eq!(h.timers.get(&TimerId::Boot), Some(&10_000));
    assert!(!h.is_armed(TimerId::Heartbeat));

    h.fire(TimerId::Boot);
    assert!(h.has_call("BootNotification"));
}

#[test]
fn oversized_boot_interval_is_capped_at_a_day() {
    let mut h = CoreHarness::new(test_config());
    let actions = h.core.init();
    h.apply(actions);
    let actions = h.core.ws_connected(None);
    h.apply(actions);
    let (uid, _) = h.take_call("BootNotification");
    h.respond(
        &uid,
        json!({"status": "Accepted", "currentTime": "2024-01-01T00:00:00Z", "interval": 20000000000000000u64}),
    );
    assert_eq!(h.timers.get(&TimerId::Heartbeat), Some(&86_400_000));
    assert!(h.has_call("StatusNotification"));

    let mut h = CoreHarness::new(test_config());
    let actions = h.core.init();
    h.apply(actions);
    let actions = h.core.ws_connected(None);
    h.apply(actions);
    let (uid, _) = h.take_call("BootNotification");
    h.respond(
        &uid,
        json!({"status": "Pending", "currentTime": "2024-01-01T00:00:00Z", "interval": u64::MAX}),
    );
    assert_eq!(h.timers.get(&TimerId::Boot), Some(&86_400_000));
}

#[test]
fn subprotocol_candidates_are_tried_in_order() {
    let mut h = CoreHarness::new(test_config());
    let actions = h.core.init();
    h.apply(actions);
    for _ in 0..3 {
        let actions = h
            .core
            .ws_connect_failed(GenericError::Transport("400 Bad Request".to_string()));
        h.apply(actions);
    }
    let offered: Vec<Vec<String>> = h.connects.iter().map(|(_, p)| p.clone()).collect();
    assert_eq!(
        offered,
        vec![
            vec!["ocpp1.6j".to_string(), "ocpp1.6".to_string()],
            vec!["ocpp1.6j".to_string()],
            vec!["ocpp1.6".to_string()],
        ]
    );
    assert!(h.logged("All subprotocol candidates failed"));
    assert!(!h.core.is_connected());
    assert!(!h.is_armed(TimerId::Reconnect));
}

#[test]
fn remote_start_and_stop_full_flow() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.send_call("cs-1", "RemoteStartTransaction", json!({"idTag": "TAG-7"}));
    match h.take_reply("cs-1") {
        Frame::Result { payload, .. } => assert_eq!(payload, json!({"status": "Accepted"})),
        other => panic!("unexpected {:?}", other),
    }
    assert!(!h.has_call("Authorize"));
    let (uid, start) = h.take_call("StartTransaction");
    assert_eq!(start["idTag"], "TAG-7");
    assert_eq!(start["connectorId"], 1);
    assert_eq!(start["meterStart"], 1);
    h.respond(&uid, json!({"transactionId": 42, "idTagInfo": {"status": "Accepted"}}));

    assert_eq!(h.core.connector_state(), ConnectorState::Charging);
    assert_eq!(h.core.session_state(), SessionState::Active);
    assert_eq!(h.core.transaction_id(), Some(42));
    let statuses: Vec<String> = h
        .ack_all("StatusNotification")
        .iter()
        .map(|p| p["status"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(statuses, vec!["Preparing", "Charging"]);
    let begin = h.ack_all("MeterValues");
    assert_eq!(context_of(&begin[0]), "Transaction.Begin");
    assert_eq!(begin[0]["transactionId"], 42);
    assert_eq!(h.timers.get(&TimerId::MeterValues), Some(&5000));

    h.tick(30);
    h.fire(TimerId::MeterValues);
    let periodic = h.ack_all("MeterValues");
    assert_eq!(context_of(&periodic[0]), "Sample.Periodic");
    assert_eq!(periodic[0]["meterValue"][0]["sampledValue"].as_array().unwrap().len(), 6);

    h.send_call("cs-2", "RemoteStopTransaction", json!({"transactionId": 42}));
    h.take_reply("cs-2");
    let end = h.ack_all("MeterValues");
    assert_eq!(context_of(&end[0]), "Transaction.End");
    assert_eq!(h.core.connector_state(), ConnectorState::Finishing);
    let (uid, stop) = h.take_call("StopTransaction");
    assert_eq!(stop["transactionId"], 42);
    assert_eq!(stop["reason"], "Remote");
    let meter_stop = stop["meterStop"].as_u64().unwrap();
    assert!(meter_stop > 1);
    assert_eq!(end[0]["meterValue"][0]["sampledValue"][0]["value"], meter_stop.to_string());
    assert!(!h.is_armed(TimerId::MeterValues));

    h.respond(&uid, json!({"idTagInfo": {"status": "Accepted"}}));
    assert_eq!(h.saved.len(), 1);
    assert_eq!(h.saved[0].transaction_id, Some(42));
    assert_eq!(h.saved[0].charge_point_id, "CP-TEST");
    assert!(h.saved[0].energy_kwh > 0.0);
    assert!(h.events.contains(&SimEvent::IndicatorsReset));
    assert_eq!(h.core.meter_register_wh(), meter_stop);
    assert_eq!(h.timers.get(&TimerId::Finishing), Some(&2000));
    assert!(!h.is_armed(TimerId::Tick));

    h.fire(TimerId::Finishing);
    assert_eq!(h.core.connector_state(), ConnectorState::Available);
    assert_eq!(h.core.session_state(), SessionState::Idle);

    // the next session continues from the register
    h.send_call("cs-3", "RemoteStartTransaction", json!({}));
    let (_, start) = h.take_call("StartTransaction");
    assert_eq!(start["meterStart"], meter_stop);
    assert_eq!(start["idTag"], "IGEA-USER-001");
}

#[test]
fn operator_start_authorizes_first() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.command(OperatorCommand::StartCharging {
        id_tag: None,
        connector_id: Some(2),
    });
    assert_eq!(h.core.session_state(), SessionState::Authorizing);
    assert_eq!(h.core.connector_state(), ConnectorState::Preparing);
    let (uid, auth) = h.take_call("Authorize");
    assert_eq!(auth, json!({"idTag": "IGEA-USER-001"}));
    assert!(!h.has_call("StartTransaction"));

    h.respond(&uid, json!({"idTagInfo": {"status": "Invalid"}}));
    let (_, start) = h.take_call("StartTransaction");
    assert_eq!(start["connectorId"], 2);
    assert_eq!(h.core.session_state(), SessionState::Starting { attempt: 1 });
}

#[test]
fn authorize_error_aborts_start() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.command(OperatorCommand::StartCharging {
        id_tag: Some("TAG".to_string()),
        connector_id: None,
    });
    let (uid, _) = h.take_call("Authorize");
    h.respond_error(&uid, "InternalError");
    assert_eq!(h.core.session_state(), SessionState::Idle);
    assert!(!h.has_call("StartTransaction"));
    assert!(!h.is_armed(TimerId::Tick));
}

#[test]
fn start_watchdog_backs_off_then_gives_up() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.send_call("cs-1", "RemoteStartTransaction", json!({"idTag": "TAG-1"}));

    let (uid, _) = h.take_call("StartTransaction");
    h.respond(&uid, json!({"idTagInfo": {"status": "Accepted"}}));
    assert_eq!(h.core.session_state(), SessionState::RetryWait { attempt: 1 });
    assert_eq!(h.timers.get(&TimerId::StartRetry), Some(&1500));

    h.fire(TimerId::StartRetry);
    let (uid, _) = h.take_call("StartTransaction");
    h.respond_error(&uid, "InternalError");
    assert_eq!(h.core.session_state(), SessionState::RetryWait { attempt: 2 });
    assert_eq!(h.timers.get(&TimerId::StartRetry), Some(&3000));

    h.fire(TimerId::StartRetry);
    let (uid, _) = h.take_call("StartTransaction");
    h.respond(&uid, json!({}));

    assert!(h.logged("Start.watchdog.giveup"));
    assert_eq!(h.core.session_state(), SessionState::Idle);
    assert_eq!(h.core.connector_state(), ConnectorState::Preparing);
    assert!(!h.has_call("StartTransaction"));
    assert!(!h.is_armed(TimerId::StartRetry));
    assert!(h.events.contains(&SimEvent::IndicatorsReset));
}

#[test]
fn late_response_after_timeout_is_ignored() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.send_call("cs-1", "RemoteStartTransaction", json!({}));
    h.ack_all("StatusNotification");
    let (uid, _) = h.take_call("StartTransaction");
    let timer = h.call_timer().unwrap();
    assert_eq!(h.timers.get(&timer), Some(&20_000));

    h.fire(timer);
    assert_eq!(h.core.session_state(), SessionState::RetryWait { attempt: 1 });
    assert_eq!(h.core.pending_call_count(), 0);

    h.respond(&uid, json!({"transactionId": 5}));
    assert_eq!(h.core.transaction_id(), None);
    assert_eq!(h.core.session_state(), SessionState::RetryWait { attempt: 1 });
}

#[test]
fn start_while_offline_is_rejected_locally() {
    let mut h = CoreHarness::new(test_config());
    h.command(OperatorCommand::StartCharging {
        id_tag: None,
        connector_id: None,
    });
    assert!(h.sent.is_empty());
    assert!(h.logged("Authorize not sent: transport offline"));
    assert_eq!(h.core.session_state(), SessionState::Idle);
    assert_eq!(h.statuses(), vec!["Preparing"]);
    assert!(h.events.contains(&SimEvent::IndicatorsReset));
}

#[test]
fn disconnect_stops_heartbeat_and_reconnects() {
    let config = ChargePointConfig {
        reconnect_delay_ms: Some(500),
        ..test_config()
    };
    let mut h = CoreHarness::online(config, 60);
    h.fire(TimerId::Heartbeat);
    assert!(h.has_call("Heartbeat"));

    h.disconnect();
    assert!(!h.core.is_connected());
    assert!(!h.is_armed(TimerId::Heartbeat));
    assert!(h.call_timer().is_none());
    assert_eq!(h.core.pending_call_count(), 0);
    assert_eq!(h.core.registration_status(), None);
    assert_eq!(h.timers.get(&TimerId::Reconnect), Some(&500));

    h.fire(TimerId::Reconnect);
    assert_eq!(h.connects.len(), 2);
    let actions = h.core.ws_connected(Some("ocpp1.6".to_string()));
    h.apply(actions);
    assert!(h.has_call("BootNotification"));
}

#[test]
fn operator_disconnect_never_reconnects() {
    let config = ChargePointConfig {
        reconnect_delay_ms: Some(500),
        ..test_config()
    };
    let mut h = CoreHarness::online(config, 60);
    h.command(OperatorCommand::Disconnect);
    assert_eq!(h.disconnects, 1);
    assert!(!h.core.is_connected());
    assert!(!h.is_armed(TimerId::Reconnect));
    assert!(h
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::Connection(ConnectionStatus::Disconnected))));
}

#[test]
fn disconnect_during_stop_still_finishes() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.start_remote(9);
    h.tick(3);
    h.command(OperatorCommand::StopCharging);
    let (_, stop) = h.take_call("StopTransaction");
    assert_eq!(stop["reason"], "Local");

    h.disconnect();
    assert!(h.saved.is_empty());
    assert_eq!(h.core.session_state(), SessionState::Idle);
    assert!(h.is_armed(TimerId::Finishing));
    h.fire(TimerId::Finishing);
    assert_eq!(h.core.connector_state(), ConnectorState::Available);
}

#[test]
fn soc_target_stops_with_user_defined_limit() {
    let mut config = test_config();
    config.target_soc = 30.0;
    config.telemetry.taper_start_soc = 30.0;
    config.telemetry.time_target_min = Some(1.0);
    let mut h = CoreHarness::online(config, 60);
    h.start_remote(11);

    for _ in 0..120 {
        if h.core.session_state() != SessionState::Active {
            break;
        }
        h.tick(1);
        h.ack_all("MeterValues");
    }
    assert_eq!(h.core.session_state(), SessionState::Stopping);
    let (uid, stop) = h.take_call("StopTransaction");
    assert_eq!(stop["reason"], "UserDefinedLimit");
    assert!(h.core.telemetry().soc >= 30.0);
    h.respond(&uid, json!({}));
    assert_eq!(h.saved[0].reason, ocppsim_core::v16::types::Reason::UserDefinedLimit);
}

#[test]
fn zero_power_suspends_and_power_resumes() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.start_remote(3);
    h.command(OperatorCommand::ApplyTelemetry(TelemetryConfigPatch {
        max_power_kw: Some(0.0),
        ..Default::default()
    }));
    h.tick(4);
    assert_eq!(h.core.connector_state(), ConnectorState::Charging);
    h.tick(1);
    assert_eq!(h.core.connector_state(), ConnectorState::SuspendedEV);

    h.command(OperatorCommand::ApplyTelemetry(TelemetryConfigPatch {
        max_power_kw: Some(7.0),
        ..Default::default()
    }));
    h.tick(1);
    assert_eq!(h.core.connector_state(), ConnectorState::Charging);
    assert_eq!(
        h.statuses(),
        vec!["Preparing", "Charging", "SuspendedEV", "Charging"]
    );
}

#[test]
fn stop_from_suspended_goes_to_finishing() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.start_remote(3);
    h.command(OperatorCommand::ApplyTelemetry(TelemetryConfigPatch {
        max_power_kw: Some(0.0),
        ..Default::default()
    }));
    h.tick(5);
    assert_eq!(h.core.connector_state(), ConnectorState::SuspendedEV);
    h.command(OperatorCommand::StopCharging);
    assert_eq!(h.core.connector_state(), ConnectorState::Finishing);
}

#[test]
fn charging_profiles_limit_and_restore() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.start_remote(1);
    h.send_call(
        "cs-p1",
        "SetChargingProfile",
        json!({
            "connectorId": 1,
            "csChargingProfiles": {
                "chargingProfileId": 4,
                "chargingSchedule": {
                    "chargingRateUnit": "A",
                    "chargingSchedulePeriod": [{"startPeriod": 0, "limit": 10}]
                }
            }
        }),
    );
    match h.take_reply("cs-p1") {
        Frame::Result { payload, .. } => assert_eq!(payload["status"], "Accepted"),
        other => panic!("unexpected {:?}", other),
    }
    h.tick(25);
    let limited = h.core.telemetry();
    assert!(limited.current_a <= 10.0 + 1e-9, "{:?}", limited);

    h.send_call("cs-p2", "ClearChargingProfile", json!({}));
    h.take_reply("cs-p2");
    h.tick(1);
    assert!(h.core.telemetry().current_a > 10.0);

    h.send_call(
        "cs-p3",
        "SetChargingProfile",
        json!({
            "connectorId": 1,
            "chargingProfile": {
                "chargingSchedule": {
                    "chargingRateUnit": "W",
                    "chargingSchedulePeriod": [{"startPeriod": 0, "limit": 3700}]
                }
            }
        }),
    );
    h.take_reply("cs-p3");
    h.tick(1);
    assert!(h.core.telemetry().power_kw <= 3.76);
}

#[test]
fn unplugged_cable_blocks_start_and_stops_session() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.command(OperatorCommand::UnplugCable);
    h.command(OperatorCommand::StartCharging {
        id_tag: None,
        connector_id: None,
    });
    assert!(h.logged("Cable not connected"));
    assert!(!h.has_call("Authorize"));

    h.command(OperatorCommand::PlugCable);
    h.start_remote(8);
    h.command(OperatorCommand::UnplugCable);
    let (_, stop) = h.take_call("StopTransaction");
    assert_eq!(stop["reason"], "EVDisconnected");
}

#[test]
fn reset_forces_available_without_stopping() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.start_remote(2);
    h.send_call("cs-r", "Reset", json!({"type": "Soft"}));
    match h.take_reply("cs-r") {
        Frame::Result { payload, .. } => assert_eq!(payload, json!({"status": "Accepted"})),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(h.core.connector_state(), ConnectorState::Available);
    assert_eq!(h.core.session_state(), SessionState::Active);
    assert!(!h.has_call("StopTransaction"));
}

#[test]
fn acknowledged_only_requests() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.send_call("cs-u", "UnlockConnector", json!({"connectorId": 1}));
    h.send_call("cs-a", "ChangeAvailability", json!({"connectorId": 0, "type": "Inoperative"}));
    h.send_call("cs-c", "ChangeConfiguration", json!({"key": "HeartbeatInterval", "value": "30"}));
    for (uid, expected) in [("cs-u", "Unlocked"), ("cs-a", "Accepted"), ("cs-c", "Accepted")] {
        match h.take_reply(uid) {
            Frame::Result { payload, .. } => assert_eq!(payload["status"], expected),
            other => panic!("unexpected {:?}", other),
        }
    }
    assert_eq!(h.core.connector_state(), ConnectorState::Available);
}

#[test]
fn remote_stop_without_session_is_accepted() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.send_call("cs-s", "RemoteStopTransaction", json!({"transactionId": 77}));
    match h.take_reply("cs-s") {
        Frame::Result { payload, .. } => assert_eq!(payload["status"], "Accepted"),
        other => panic!("unexpected {:?}", other),
    }
    assert!(!h.has_call("StopTransaction"));
    assert!(h.logged("no session running"));
}

#[test]
fn unsupported_action_gets_not_supported() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.send_call("cs-x", "DataTransfer", json!({"vendorId": "x"}));
    match h.take_reply("cs-x") {
        Frame::Error {
            code, description, ..
        } => {
            assert_eq!(code, "NotSupported");
            assert_eq!(description, "Action DataTransfer not supported");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn malformed_frames() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.inject("not json at all");
    h.inject(r#"{"hello": 1}"#);
    h.inject(r#"[3, "nobody-asked", {}]"#);
    assert!(h.sent.is_empty());

    h.inject(r#"[2, "bad-1", 42, {}]"#);
    match h.take_reply("bad-1") {
        Frame::Error { code, .. } => assert_eq!(code, "FormationViolation"),
        other => panic!("unexpected {:?}", other),
    }

    h.fire(TimerId::Heartbeat);
    let (uid, _) = h.take_call("Heartbeat");
    h.inject(&json!([4, uid, "NoSuchCode", "x", {}]).to_string());
    assert_eq!(h.core.pending_call_count(), 0);
    assert!(h.call_timer().is_none());
}

#[test]
fn unparseable_boot_error_retries_after_a_minute() {
    let mut h = CoreHarness::new(test_config());
    let actions = h.core.init();
    h.apply(actions);
    let actions = h.core.ws_connected(None);
    h.apply(actions);
    let (uid, _) = h.take_call("BootNotification");
    h.inject(&json!([4, uid, "NoSuchCode", "x", {}]).to_string());
    assert_eq!(h.timers.get(&TimerId::Boot), Some(&60_000));
}

#[test]
fn fast_mode_shortens_meter_interval() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.command(OperatorCommand::SetMode(ocppsim_client::v16::ChargingMode::Fast));
    h.start_remote(5);
    assert_eq!(h.timers.get(&TimerId::MeterValues), Some(&2000));
}

#[test]
fn non_finite_telemetry_patch_is_ignored() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.command(OperatorCommand::ApplyTelemetry(TelemetryConfigPatch {
        taper_start_soc: Some(f64::NAN),
        max_power_kw: Some(f64::INFINITY),
        ..Default::default()
    }));
    h.command(OperatorCommand::SetTargetSoc(90.0));
    h.start_remote(5);
    h.tick(10);
    let snapshot = h.core.telemetry();
    assert!(snapshot.power_kw.is_finite() && snapshot.power_kw <= 7.5);
    assert_eq!(h.core.connector_state(), ConnectorState::Charging);
}

#[test]
fn price_change_is_published() {
    let mut h = CoreHarness::online(test_config(), 60);
    h.command(OperatorCommand::SetPrice(0.5));
    let last_metrics = h.events.iter().rev().find_map(|e| match e {
        SimEvent::Metrics(m) => Some(m.clone()),
        _ => None,
    });
    assert_eq!(last_metrics.unwrap().price_per_kwh, 0.5);
}
