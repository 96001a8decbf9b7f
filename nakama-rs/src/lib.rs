//! Nakama Rust Client
//!
//! Async client for the REST API of a Nakama game server.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nakama_rs::{NakamaClient, Result, WriteStorageObject};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = NakamaClient::new("127.0.0.1", 7350, "defaultkey")?;
//!
//!     // Device auth creates the account on first use
//!     let session = client.authenticate_device("my-device-id", true, None).await?;
//!     println!("Logged in as: {}", session.user_id);
//!
//!     let save = WriteStorageObject::json("saves", "slot1", &serde_json::json!({"level": 3}))?;
//!     client.write_storage_objects(&session, &[save]).await?;
//!
//!     let friends = client.list_friends(&session, Some(20), None, None).await?;
//!     println!("{} friends", friends.friends.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`url`] builds request URLs from a base, a path and ordered query pairs.
//! - [`dispatch`] performs one HTTP call with auth, timeout and status
//!   classification.
//! - [`NakamaClient`] wraps every endpoint on top of the two.

// Tracing macros - no-op when feature disabled
#[cfg(feature = "tracing")]
macro_rules! trace_debug { ($($arg:tt)*) => { tracing::debug!($($arg)*) } }
#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug { ($($arg:tt)*) => {} }

#[cfg(feature = "tracing")]
macro_rules! trace_warn { ($($arg:tt)*) => { tracing::warn!($($arg)*) } }
#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn { ($($arg:tt)*) => {} }

#[macro_use]
mod protojson;

mod api;
mod client;
pub mod dispatch;
mod error;
mod session;
mod types;
pub mod url;

pub use api::{GroupListQuery, MatchListQuery, TournamentListQuery};
pub use client::{NakamaClient, NakamaClientBuilder, DEFAULT_PORT, DEFAULT_SERVER_KEY};
pub use dispatch::{ApiRequest, Authorization, Dispatcher, Outcome};
pub use error::{Error, Result};
pub use protojson::{Int64, ProtoEnum};
pub use session::Session;
pub use types::*;
pub use url::{build_full_url, encode_path_segment, QueryParams};
