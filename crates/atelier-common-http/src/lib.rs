//! HTTP client utilities for Atelier.

pub mod api;
pub mod client;

pub use api::ApiClient;
pub use client::{build_client, HttpConfig, HttpError};
