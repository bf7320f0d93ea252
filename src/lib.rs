//! # brandsite
//!
//! Client layer for the studio marketing site and its authenticated
//! analytics dashboard. All data and auth live behind a hosted Xano API;
//! this crate is the typed HTTP client, the session token store, and the
//! view-state controllers that the site (or the `brandsite` CLI) drives.

pub mod config;
pub mod net;
pub mod session;
pub mod state;
pub mod util;
