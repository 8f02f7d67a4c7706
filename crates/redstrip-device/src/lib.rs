/*!
 * redstrip device gateway
 *
 * This crate owns all hardware I/O for redstrip. It provides the
 * [`PowerStrip`](gateway::PowerStrip) capability trait, the TP-Link Kasa
 * smart-strip implementation of it, network discovery, and the serialized
 * [`DeviceGateway`](gateway::DeviceGateway) handed to the HTTP layer.
 *
 * The control channel of a Kasa strip is not safe for concurrent use, so
 * the gateway funnels every refresh and command through a single mutex.
 */

pub mod discovery;
pub mod gateway;
pub mod kasa;
pub mod protocol;

pub use discovery::discover;
pub use gateway::{
    DeviceError, DeviceGateway, OutletSnapshot, PowerStrip, Result, StripSnapshot,
};
pub use kasa::KasaStrip;
