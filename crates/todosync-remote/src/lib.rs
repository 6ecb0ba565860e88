//! todosync Remote Store
//!
//! The [`RemoteStore`] capability consumed by the reconciler, and
//! [`MotionClient`], its HTTP implementation against the Motion task API.
//!
//! # Example
//!
//! ```rust,no_run
//! use todosync_remote::{MotionClient, RemoteConfig, RemoteStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MotionClient::new(RemoteConfig::new("api-key").with_workspace_id("ws_1"))?;
//! let tasks = client.list().await?;
//! println!("{} remote task(s)", tasks.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

mod client;
mod dto;
mod error;
mod store;

pub use client::{
    MotionClient, RemoteConfig, API_TOKEN_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, WORKSPACE_ID_ENV,
};
pub use error::{RemoteError, RemoteResult};
pub use store::RemoteStore;
