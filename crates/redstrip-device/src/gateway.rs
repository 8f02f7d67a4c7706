/*!
 * Power-strip gateway abstractions.
 *
 * This module defines the capability trait a power strip must implement,
 * the snapshot types the rest of the system observes, and the serialized
 * gateway that owns the only hardware connection in the process.
 */
use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Error type for device operations
#[derive(Error, Debug)]
pub enum DeviceError {
    /// No matching device answered discovery
    #[error("No power strip found on the network")]
    NotFound,

    /// The device is not connected
    #[error("Device not connected")]
    NotConnected,

    /// The outlet index does not exist on the device
    #[error("Outlet index {index} out of range (device has {count} outlets)")]
    OutOfRange {
        /// The requested outlet index
        index: usize,
        /// The number of outlets the device reported
        count: usize,
    },

    /// Communication error with the device
    #[error("Communication error: {0}")]
    Communication(String),

    /// The device did not answer within the I/O timeout
    #[error("Timed out waiting for the device")]
    Timeout,

    /// The device sent a malformed or unexpected reply
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The device answered but rejected the command
    #[error("Device rejected command (err_code {0})")]
    CommandRejected(i64),

    /// The exchange failed after the command was issued
    ///
    /// Distinct from [`DeviceError::Communication`]: the device was
    /// reachable when the request started, so this is a command execution
    /// failure rather than general unavailability.
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a device reply
    #[error("Invalid device response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for device operations
pub type Result<T> = std::result::Result<T, DeviceError>;

/// A point-in-time view of one outlet on the strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutletSnapshot {
    /// Positional index of the outlet, stable for the lifetime of the connection
    pub index: usize,
    /// The outlet's display name
    pub alias: String,
    /// Whether the outlet relay is on
    pub is_on: bool,
}

/// A point-in-time view of the whole strip, rebuilt on every refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripSnapshot {
    /// The strip's display name
    pub alias: String,
    /// The strip's model string
    pub model: String,
    /// The strip's device identifier
    pub device_id: String,
    /// The strip's manufacturer
    pub manufacturer: String,
    /// Outlets in positional order
    pub outlets: Vec<OutletSnapshot>,
}

impl StripSnapshot {
    /// Get an outlet by index, range-checked against this snapshot
    pub fn outlet(&self, index: usize) -> Result<&OutletSnapshot> {
        self.outlets.get(index).ok_or(DeviceError::OutOfRange {
            index,
            count: self.outlets.len(),
        })
    }
}

/// The power-strip capability trait
///
/// Implementations talk to one physical strip. They are not required to be
/// safe for concurrent use; the [`DeviceGateway`] serializes access.
#[async_trait]
pub trait PowerStrip: Send + Sync + Debug {
    /// Re-read live device state and return a fresh snapshot
    async fn refresh(&mut self) -> Result<StripSnapshot>;

    /// Switch a single outlet on or off
    ///
    /// The index is validated against the device's current outlet set and
    /// an out-of-range index fails with [`DeviceError::OutOfRange`].
    async fn set_outlet_power(&mut self, index: usize, on: bool) -> Result<()>;
}

/// The serialized gateway to the one physical device in the process
///
/// All hardware interaction goes through this type. A mutex guarantees at
/// most one outstanding hardware exchange at a time, and every exchange is
/// bounded by the configured I/O timeout.
#[derive(Debug)]
pub struct DeviceGateway {
    strip: Mutex<Box<dyn PowerStrip>>,
    io_timeout: Duration,
}

impl DeviceGateway {
    /// Create a gateway around a connected strip
    pub fn new<S: PowerStrip + 'static>(strip: S, io_timeout: Duration) -> Self {
        Self {
            strip: Mutex::new(Box::new(strip)),
            io_timeout,
        }
    }

    /// Refresh live device state
    ///
    /// Request handlers call this exactly once per device-backed request,
    /// before resolving outlet indices or building documents.
    pub async fn refresh(&self) -> Result<StripSnapshot> {
        let mut strip = self.strip.lock().await;
        let snapshot = timeout(self.io_timeout, strip.refresh())
            .await
            .map_err(|_| DeviceError::Timeout)??;
        debug!(
            "Refreshed strip '{}' with {} outlets",
            snapshot.alias,
            snapshot.outlets.len()
        );
        Ok(snapshot)
    }

    /// Switch a single outlet on or off
    ///
    /// The range check and the relay command run under one lock acquisition,
    /// so the check always sees the outlet set the command will act on.
    pub async fn set_outlet_power(&self, index: usize, on: bool) -> Result<()> {
        let mut strip = self.strip.lock().await;
        match timeout(self.io_timeout, strip.set_outlet_power(index, on))
            .await
            .map_err(|_| DeviceError::Timeout)?
        {
            Ok(()) => {
                debug!("Outlet {} switched {}", index, if on { "on" } else { "off" });
                Ok(())
            }
            Err(e) => {
                warn!("Failed to switch outlet {}: {}", index, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FakeStrip {
        outlets: Vec<OutletSnapshot>,
    }

    impl FakeStrip {
        fn with_outlets(n: usize) -> Self {
            Self {
                outlets: (0..n)
                    .map(|i| OutletSnapshot {
                        index: i,
                        alias: format!("Plug {}", i),
                        is_on: false,
                    })
                    .collect(),
            }
        }

        fn snapshot(&self) -> StripSnapshot {
            StripSnapshot {
                alias: "Test Strip".to_string(),
                model: "HS300(US)".to_string(),
                device_id: "80061234".to_string(),
                manufacturer: "TP-Link".to_string(),
                outlets: self.outlets.clone(),
            }
        }
    }

    #[async_trait]
    impl PowerStrip for FakeStrip {
        async fn refresh(&mut self) -> Result<StripSnapshot> {
            Ok(self.snapshot())
        }

        async fn set_outlet_power(&mut self, index: usize, on: bool) -> Result<()> {
            let count = self.outlets.len();
            let outlet = self
                .outlets
                .get_mut(index)
                .ok_or(DeviceError::OutOfRange { index, count })?;
            outlet.is_on = on;
            Ok(())
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_refresh_returns_snapshot() {
        let gateway = DeviceGateway::new(FakeStrip::with_outlets(6), Duration::from_secs(1));
        let snapshot = gateway.refresh().await.unwrap();
        assert_eq!(snapshot.outlets.len(), 6);
        assert_eq!(snapshot.outlets[2].index, 2);
    }

    #[tokio::test]
    async fn test_set_outlet_power_round_trip() {
        let gateway = DeviceGateway::new(FakeStrip::with_outlets(6), Duration::from_secs(1));
        gateway.set_outlet_power(3, true).await.unwrap();
        let snapshot = gateway.refresh().await.unwrap();
        assert!(snapshot.outlets[3].is_on);
        assert!(!snapshot.outlets[2].is_on);
    }

    #[tokio::test]
    async fn test_set_outlet_power_out_of_range() {
        let gateway = DeviceGateway::new(FakeStrip::with_outlets(6), Duration::from_secs(1));
        let err = gateway.set_outlet_power(6, true).await.unwrap_err();
        assert!(matches!(
            err,
            DeviceError::OutOfRange { index: 6, count: 6 }
        ));
    }

    #[test]
    fn test_snapshot_outlet_range_check() {
        let snapshot = StripSnapshot {
            alias: "s".to_string(),
            model: "m".to_string(),
            device_id: "d".to_string(),
            manufacturer: "TP-Link".to_string(),
            outlets: vec![],
        };
        assert!(matches!(
            snapshot.outlet(0),
            Err(DeviceError::OutOfRange { index: 0, count: 0 })
        ));
    }
}
