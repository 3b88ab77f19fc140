//! ParkingBoss tenant API client.
//!
//! This crate is the integration layer between a tenant-facing surface and
//! the ParkingBoss permit API, providing:
//!
//! - Tenant token exchange (fresh per operation, never cached)
//! - Usage, issuance policy and remaining monthly quota
//! - Listing of currently valid permits
//! - Creating and expiring temporary permits
//! - A short-lived permit list cache invalidated by mutations
//!
//! # Quick Start
//!
//! ```no_run
//! use parkline_client::{ClientConfig, NewPermit, ParkingClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ParkingClient::new(ClientConfig::from_env()?)?;
//!
//! println!("remaining: {}", client.remaining_quota().await);
//!
//! let permit_id = client.create_permit(&NewPermit::new("ABC1234")).await?;
//! client.delete_permit(&permit_id).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Every operation fails with [`ApiError::Transport`] or [`ApiError::Parse`]
//! and never returns partial results. The one exception is
//! [`ParkingClient::remaining_quota`], which falls back to zero usage and
//! reports that through [`RemainingQuota::Degraded`].
//!
//! # Configuration
//!
//! See [`ClientConfig::from_env`] for the environment variables.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod json;
pub mod timestamp;
pub mod types;

// Re-export main types
pub use cache::{CachedClient, PermitCache};
pub use client::ParkingClient;
pub use config::{ClientConfig, ConfigError, Credentials};
pub use error::{error_mapping, ApiError, ApiResult, ErrorBody, ErrorKind};
pub use timestamp::{Clock, FixedClock, SystemClock, Timestamps};
pub use types::{
    AuthSession, CancelConfirmation, NewPermit, Permit, RemainingQuota, UsageSnapshot,
    DEFAULT_PERMIT_DURATION,
};
