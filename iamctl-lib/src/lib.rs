//! Identity server login library
//!
//! Exchanges a username and password for an access/refresh token pair using
//! the OAuth2 password grant, and persists the result for other tooling.

pub mod auth;
pub mod config;
pub mod error;
pub mod paths;
pub mod store;

mod fs;
mod login;

pub use login::*;
