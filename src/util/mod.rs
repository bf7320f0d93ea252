//! Utility helpers shared by the client and the view-state controllers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pure text handling and request-lifetime plumbing live here so the
//! network and state modules stay focused on their contracts.

pub mod message;
pub mod scope;
