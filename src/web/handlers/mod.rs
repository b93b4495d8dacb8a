//! API handlers.

pub mod contact;

pub use contact::{submit_contact, AppState};
