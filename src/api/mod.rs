//! HTTP plumbing for the Mendix platform services.
//!
//! `ApiClient` talks to the projects endpoint (app lifecycle and jobs) and
//! the model endpoint (working copies and commits), attaches credentials and
//! request ids, and turns error responses into `PlatformError`s.

mod client;
mod http;
pub(crate) mod types;

pub(crate) use client::{ApiClient, Delivery, Service};
