//! Core library for the `tail-trails` CLI.
//!
//! This crate defines:
//! - The dog park catalog, with search and ordering
//! - Weather fetching with a synthetic fallback, and the advice derived from it
//! - Visit planning
//! - The community feed and profile achievements
//! - Accounts against the hosted backend, plus the demo identity
//! - Configuration and the local session cache
//!
//! It is used by `trails-cli`, but can also be reused by other binaries or services.

pub mod account;
pub mod advice;
pub mod catalog;
pub mod community;
pub mod config;
pub mod demo;
pub mod error;
pub mod model;
pub mod planner;
pub mod provider;
pub mod search;
pub mod session;
pub mod weather;

pub use account::{AccountService, AuthBackend, supabase::SupabaseBackend};
pub use catalog::Park;
pub use config::Config;
pub use error::{AuthError, ValidationError};
pub use model::{Coordinates, WeatherRequest, WeatherSnapshot};
pub use provider::{ProviderId, WeatherProvider};
pub use search::{ParkQuery, SortKey};
pub use session::SessionStore;
pub use weather::WeatherFetcher;
