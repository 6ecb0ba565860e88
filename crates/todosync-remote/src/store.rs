//! Remote store capability
//!
//! The engine only ever talks to the remote through [`RemoteStore`]; the
//! Motion client is one implementation, tests supply in-memory ones.

use crate::error::RemoteResult;
use async_trait::async_trait;
use todosync_model::{RemoteDraft, RemoteId, RemoteRecord};

/// CRUD capability over remote tasks
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Every task visible to this client, fully paginated
    async fn list(&self) -> RemoteResult<Vec<RemoteRecord>>;

    /// Create a task; returns the record with its assigned id
    async fn create(&self, draft: &RemoteDraft) -> RemoteResult<RemoteRecord>;

    /// Overwrite a task's name, description and labels
    async fn update(&self, id: &RemoteId, draft: &RemoteDraft) -> RemoteResult<()>;

    /// Delete a task
    async fn delete(&self, id: &RemoteId) -> RemoteResult<()>;
}
