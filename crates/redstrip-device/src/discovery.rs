/*!
 * Network discovery for Kasa power strips.
 *
 * Discovery broadcasts the sysinfo query over UDP and waits for devices to
 * answer. Kasa devices of every kind reply; only those reporting child
 * outlets are power strips.
 */
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::gateway::{DeviceError, Result};
use crate::kasa::KasaStrip;
use crate::protocol::{decrypt, encrypt, parse_sysinfo, sysinfo_request, KASA_PORT};

/// Discover the first power strip answering on the local network
///
/// Devices without child outlets (single plugs, bulbs) are skipped. Fails
/// with [`DeviceError::NotFound`] when nothing suitable answers within the
/// timeout.
pub async fn discover(wait: Duration) -> Result<KasaStrip> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
    socket.set_broadcast(true)?;

    let query = encrypt(&sysinfo_request());
    socket
        .send_to(&query, (Ipv4Addr::BROADCAST, KASA_PORT))
        .await?;
    debug!("Sent discovery broadcast, waiting up to {:?}", wait);

    let deadline = Instant::now() + wait;
    let mut buf = [0u8; 4096];
    loop {
        let (len, peer) = match timeout_at(deadline, socket.recv_from(&mut buf)).await {
            Ok(received) => received?,
            Err(_) => {
                warn!("No power strip answered discovery within {:?}", wait);
                return Err(DeviceError::NotFound);
            }
        };

        let plain = decrypt(&buf[..len]);
        let info = match parse_sysinfo(&plain) {
            Ok(info) => info,
            Err(e) => {
                debug!("Ignoring unparseable discovery reply from {}: {}", peer, e);
                continue;
            }
        };

        if info.children.is_empty() {
            debug!(
                "Ignoring {} at {}: no child outlets",
                info.model, peer
            );
            continue;
        }

        info!(
            "Discovered '{}' ({}) at {} with {} outlets",
            info.alias,
            info.model,
            peer.ip(),
            info.children.len()
        );
        return Ok(KasaStrip::new(SocketAddr::new(peer.ip(), KASA_PORT)));
    }
}
