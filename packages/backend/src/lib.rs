//! Hosted-backend client for the MindToWeb platform.
//!
//! The marketing site and client dashboard delegate all persistence, auth
//! sessions, and change notification to an external hosted backend. This
//! crate is the seam: the [`Backend`] trait describes the table and auth
//! operations the platform needs, [`RestBackend`] implements them over the
//! backend's PostgREST/GoTrue-style HTTP surface, and [`feed`] carries the
//! change-feed contract used to keep discussion threads live.
//!
//! Row-level authorization, session storage, and the realtime wire
//! transport belong to the hosted backend itself and are not modeled here.

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod feed;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod rest;

pub use auth::AuthUser;
pub use backend::{
    Backend, DISCUSSIONS_TABLE, LEADS_TABLE, PROFILES_TABLE, SERVICE_REQUESTS_TABLE,
};
pub use config::BackendConfig;
pub use error::{BackendError, BackendResult};
pub use feed::{ChangeEvent, ChangeFeed, ChannelChangeFeed, EventKind, FeedSubscription};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryBackend;
pub use rest::RestBackend;
