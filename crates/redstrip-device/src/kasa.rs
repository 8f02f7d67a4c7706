/*!
 * TP-Link Kasa smart-strip implementation of the power-strip capability.
 *
 * Each exchange opens a short-lived TCP connection to the device, the same
 * way the vendor app talks to it. The strip keeps no session state, so a
 * connection per exchange keeps reconnect handling trivial.
 */
use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

use redstrip_core::config::DeviceConfig;

use crate::gateway::{
    DeviceError, OutletSnapshot, PowerStrip, Result, StripSnapshot,
};
use crate::protocol::{
    decode_reply_len, encode_frame, parse_relay_reply, parse_sysinfo, relay_request,
    sysinfo_request, SysInfo, KASA_PORT,
};

/// Manufacturer reported for every Kasa strip
pub const MANUFACTURER: &str = "TP-Link";

/// Upper bound on reply frames; sysinfo for a six-outlet strip is ~2 KiB
const MAX_REPLY_LEN: usize = 1 << 20;

/// A TP-Link Kasa smart power strip reachable over TCP
#[derive(Debug)]
pub struct KasaStrip {
    addr: SocketAddr,
}

impl KasaStrip {
    /// Create a strip handle for a known address
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Create a strip handle from a host string, with or without a port
    pub fn from_addr_str(addr: &str) -> Result<Self> {
        if let Ok(addr) = addr.parse::<SocketAddr>() {
            return Ok(Self::new(addr));
        }
        let ip: IpAddr = addr.parse().map_err(|_| {
            DeviceError::Communication(format!("Invalid device address: {}", addr))
        })?;
        Ok(Self::new(SocketAddr::new(ip, KASA_PORT)))
    }

    /// Create a strip handle from configuration, if an address is configured
    pub fn from_config(config: &DeviceConfig) -> Result<Option<Self>> {
        match &config.address {
            Some(addr) => Ok(Some(Self::from_addr_str(addr)?)),
            None => Ok(None),
        }
    }

    /// The device address this handle talks to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Send one request and read back one reply
    async fn exchange(&self, request: &[u8]) -> Result<Vec<u8>> {
        let mut stream = TcpStream::connect(self.addr).await?;
        stream.write_all(&encode_frame(request)).await?;

        let mut len_buf = [0u8; 4];
        stream.read_exact(&mut len_buf).await?;
        let len = decode_reply_len(len_buf, MAX_REPLY_LEN)?;

        let mut body = vec![0u8; len];
        stream.read_exact(&mut body).await?;
        Ok(crate::protocol::decrypt(&body))
    }

    async fn query_sysinfo(&self) -> Result<SysInfo> {
        let reply = self.exchange(&sysinfo_request()).await?;
        parse_sysinfo(&reply)
    }
}

/// Interpret the relay reply once the command has reached the device
///
/// A device-signalled err_code stays a rejection; anything else wrong with
/// the reply (truncation, garbage) is a failure of the command, not general
/// unavailability.
fn relay_outcome(plain: &[u8]) -> Result<()> {
    parse_relay_reply(plain).map_err(|e| match e {
        DeviceError::CommandRejected(code) => DeviceError::CommandRejected(code),
        other => DeviceError::CommandFailed(other.to_string()),
    })
}

/// Build a snapshot from a sysinfo reply
fn snapshot_from_sysinfo(info: &SysInfo) -> StripSnapshot {
    StripSnapshot {
        alias: info.alias.clone(),
        model: info.model.clone(),
        device_id: info.device_id.clone(),
        manufacturer: MANUFACTURER.to_string(),
        outlets: info
            .children
            .iter()
            .enumerate()
            .map(|(index, child)| OutletSnapshot {
                index,
                alias: child.alias.clone(),
                is_on: child.state != 0,
            })
            .collect(),
    }
}

#[async_trait]
impl PowerStrip for KasaStrip {
    async fn refresh(&mut self) -> Result<StripSnapshot> {
        let info = self.query_sysinfo().await?;
        debug!(
            "sysinfo from {}: '{}' ({}), {} outlets",
            self.addr,
            info.alias,
            info.model,
            info.children.len()
        );
        Ok(snapshot_from_sysinfo(&info))
    }

    async fn set_outlet_power(&mut self, index: usize, on: bool) -> Result<()> {
        // Re-read the child list first; the relay command needs the child id
        // and the range check must run against the live outlet set.
        let info = self.query_sysinfo().await?;
        let child = info.children.get(index).ok_or(DeviceError::OutOfRange {
            index,
            count: info.children.len(),
        })?;
        let child_id = info.child_id(child);

        // The device was reachable for the sysinfo query; a failure from
        // here on is a command failure, not general unavailability.
        let reply = self
            .exchange(&relay_request(&child_id, on))
            .await
            .map_err(|e| DeviceError::CommandFailed(e.to_string()))?;
        relay_outcome(&reply)?;
        info!(
            "Outlet {} ('{}') switched {}",
            index,
            child.alias,
            if on { "on" } else { "off" }
        );
        Ok(())
    }
}
