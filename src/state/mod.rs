//! View-state controllers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each controller owns the state one page needs (auth form, current user,
//! dashboard sections, contact form) and drives the API client to fill it.
//! Rendering lives elsewhere; controllers only hand back plain data and
//! [`Redirect`] instructions.

pub mod auth;
pub mod contact;
pub mod dashboard;
pub mod user;

/// Navigation instruction handed back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
}

impl Redirect {
    #[must_use]
    pub fn to(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }
}
