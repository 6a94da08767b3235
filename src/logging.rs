//! Optional `tracing` bootstrap.
//!
//! This crate emits `tracing` events on its own (structural operations at
//! `info`, per-call descent detail at `debug`, clamped configuration at
//! `warn`) but does not install a subscriber unless the `setup_tracing`
//! feature is enabled, since most consumers already run their own. The feature
//! exists mainly for this crate's own examples and tests, and for
//! consumers who want a zero-effort global subscriber controlled by an
//! environment variable, mirroring how logging is wired up elsewhere in
//! the spatial-index ecosystem this crate grew out of.

#![cfg(feature = "setup_tracing")]

use ctor::ctor;
use tracing::Level;

#[ctor]
fn install_subscriber() {
    if std::env::var("FLATRTREE_DEBUG").map_or(true, |v| v == "0" || v == "false" || v.is_empty())
    {
        return;
    }
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();
}
