/*!
 * redstrip core
 *
 * Shared plumbing for the redstrip workspace: the common error type,
 * the logging bootstrap, and configuration loading.
 */

pub mod config;
pub mod error;
pub mod logging;

/// redstrip core crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
