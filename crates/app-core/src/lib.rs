//! Core application logic for Primatech Books
//!
//! This crate contains the screen controllers that drive authentication
//! and the profile screen.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod profile;

#[cfg(test)]
mod test_support;

pub use auth::{AuthController, AuthError, Completion};
pub use profile::{ProfileController, ProfileDraft, ProfileState};
