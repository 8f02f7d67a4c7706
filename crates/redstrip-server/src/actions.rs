/*!
 * Action dispatcher for outlet POST actions.
 *
 * Payload validation happens before any hardware I/O, so an invalid
 * request never issues a device command. The accepted action set is the
 * same [`OUTLET_ACTIONS`](crate::resource::OUTLET_ACTIONS) table the
 * document builder advertises.
 */
use serde_json::{json, Value};
use tracing::info;

use redstrip_device::DeviceGateway;

use crate::error::ApiError;
use crate::resource::OutletAction;

/// Parse and validate a PowerControl payload
///
/// The payload must carry a `PowerState` field whose value is exactly
/// `"On"` or `"Off"`, case-sensitively. Anything else is an invalid
/// argument, not a missing resource.
pub fn parse_power_control(body: Option<&Value>) -> Result<bool, ApiError> {
    let state = body
        .and_then(|b| b.get("PowerState"))
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::invalid("PowerState required"))?;
    match state {
        "On" => Ok(true),
        "Off" => Ok(false),
        other => Err(ApiError::invalid(format!("Invalid PowerState: {}", other))),
    }
}

/// Dispatch a resolved outlet action
///
/// Side effects are limited to the addressed outlet. On success the
/// acknowledgment body is `{"status": "success"}`.
pub async fn dispatch(
    gateway: &DeviceGateway,
    index: usize,
    action: OutletAction,
    body: Option<&Value>,
) -> Result<Value, ApiError> {
    match action {
        OutletAction::PowerControl => {
            let on = parse_power_control(body)?;
            gateway.set_outlet_power(index, on).await?;
        }
        OutletAction::ResetMetrics => {
            // The HS300 has no resettable metrics store. Validate that the
            // outlet exists against a fresh snapshot and acknowledge the
            // request for API compatibility; nothing is actually cleared.
            let snapshot = gateway.refresh().await?;
            snapshot.outlet(index)?;
            info!("Reset metrics requested for outlet {} (no-op)", index);
        }
    }
    Ok(json!({"status": "success"}))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use redstrip_device::{
        DeviceError, OutletSnapshot, PowerStrip, Result as DeviceResult, StripSnapshot,
    };

    #[derive(Debug)]
    struct CountingStrip {
        commands: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PowerStrip for CountingStrip {
        async fn refresh(&mut self) -> DeviceResult<StripSnapshot> {
            Ok(StripSnapshot {
                alias: "s".to_string(),
                model: "m".to_string(),
                device_id: "d".to_string(),
                manufacturer: "TP-Link".to_string(),
                outlets: vec![OutletSnapshot {
                    index: 0,
                    alias: "Lamp".to_string(),
                    is_on: false,
                }],
            })
        }

        async fn set_outlet_power(&mut self, index: usize, _on: bool) -> DeviceResult<()> {
            if index >= 1 {
                return Err(DeviceError::OutOfRange { index, count: 1 });
            }
            self.commands.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn gateway_with_counter() -> (DeviceGateway, Arc<AtomicUsize>) {
        let commands = Arc::new(AtomicUsize::new(0));
        let strip = CountingStrip {
            commands: commands.clone(),
        };
        (DeviceGateway::new(strip, Duration::from_secs(1)), commands)
    }

    #[test]
    fn test_parse_power_control() {
        assert!(parse_power_control(Some(&json!({"PowerState": "On"}))).unwrap());
        assert!(!parse_power_control(Some(&json!({"PowerState": "Off"}))).unwrap());
    }

    #[test]
    fn test_parse_power_control_rejects_bad_values() {
        for body in [
            json!({"PowerState": "Maybe"}),
            json!({"PowerState": "on"}),
            json!({"PowerState": "OFF"}),
            json!({"PowerState": 1}),
            json!({}),
        ] {
            assert!(parse_power_control(Some(&body)).is_err());
        }
        assert!(parse_power_control(None).is_err());
    }

    #[tokio::test]
    async fn test_invalid_payload_issues_no_command() {
        let (gateway, commands) = gateway_with_counter();
        let err = dispatch(
            &gateway,
            0,
            OutletAction::PowerControl,
            Some(&json!({"PowerState": "Maybe"})),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert_eq!(commands.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_power_control_dispatches() {
        let (gateway, commands) = gateway_with_counter();
        let ack = dispatch(
            &gateway,
            0,
            OutletAction::PowerControl,
            Some(&json!({"PowerState": "On"})),
        )
        .await
        .unwrap();
        assert_eq!(ack, json!({"status": "success"}));
        assert_eq!(commands.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reset_metrics_is_acknowledged_noop() {
        let (gateway, commands) = gateway_with_counter();
        let ack = dispatch(&gateway, 0, OutletAction::ResetMetrics, None)
            .await
            .unwrap();
        assert_eq!(ack, json!({"status": "success"}));
        assert_eq!(commands.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reset_metrics_out_of_range() {
        let (gateway, _) = gateway_with_counter();
        let err = dispatch(&gateway, 5, OutletAction::ResetMetrics, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
