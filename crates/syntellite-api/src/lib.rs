//! # syntellite-api
//!
//! Typed HTTP client for the Syntellite campaign backend.
//!
//! The backend owns authentication, the actual SMTP delivery, delivery
//! logging, and the active provider profile. This crate covers exactly that
//! surface:
//!
//! - **Auth**: `POST /api/auth/login` and `POST /api/auth/register`
//! - **Sending**: `POST /api/send/test` and `POST /api/send/bulk`
//! - **Delivery logs**: `GET /api/logs`
//! - **Provider profile**: `GET`/`POST /api/provider`
//!
//! All authenticated calls carry a bearer token. A missing token is detected
//! *before* dispatch and reported as [`Error::SessionExpired`] rather than
//! attempted and failed remotely. No request is retried; a failed call
//! surfaces its error once and leaves the caller to retry manually.
//!
//! ## Quick Start
//!
//! ```ignore
//! use syntellite_api::{ApiClient, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = ApiClient::new("http://localhost:4000")?;
//!
//!     let session = client
//!         .login(&Credentials::new("admin@syntellite.com", "secret"))
//!         .await?;
//!     client.set_token(Some(session.token));
//!
//!     for log in client.fetch_logs().await? {
//!         println!("{} {} ({})", log.created_at, log.action, log.status);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod auth;
mod client;
mod error;
pub mod logs;
pub mod provider;
pub mod send;

pub use auth::{AuthSession, Credentials, UserProfile};
pub use client::ApiClient;
pub use error::{Error, Result};
pub use logs::{DeliveryLog, DeliveryStatus};
pub use provider::ProviderProfile;
pub use send::{BulkCampaign, BulkOutcome, TestMessage};
