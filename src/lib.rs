//! Realit - authenticated API client for the Realit photo and video sharing
//! backend.
//!
//! The client attaches the stored access token to every request. When the
//! server answers 401 it refreshes the credential pair once for all
//! concurrent callers, replays each rejected request once, and ends the
//! session if the refresh fails.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod prelude;
pub mod services;
pub mod traits;
