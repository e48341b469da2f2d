//! Error taxonomy for the attachment core.
//!
//! Only conditions that abort an operation get a named variant; individual
//! user32 call failures stay `anyhow` results that the controller logs and
//! swallows, because window manipulation races with window lifetime and a
//! transient failure must never crash the host.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttachError {
    /// Title lookup found no matching top-level window. Non-fatal for hosts:
    /// lookup races with window creation, so log and retry or skip.
    #[error("no top-level window titled {0:?}")]
    WindowNotFound(String),

    /// Not even the shell's root desktop window could be found; attachment is
    /// unavailable and the window stays a normal foreground window.
    #[error("desktop background surface not found")]
    SurfaceNotFound,
}
