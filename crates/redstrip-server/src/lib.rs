/*!
 * redstrip server
 *
 * This crate maps one TP-Link smart power strip onto a Redfish-shaped
 * resource tree: service root, chassis, outlet collection, per-outlet
 * documents, and POST actions for power control.
 *
 * Request flow: route resolution checks the addressed resource exists,
 * the gateway refreshes live device state exactly once, and the requested
 * document is built from that one snapshot (or the requested action is
 * dispatched as a device command).
 */

pub mod actions;
pub mod documents;
pub mod error;
pub mod resource;
pub mod routes;

pub use error::ApiError;
pub use routes::router;
