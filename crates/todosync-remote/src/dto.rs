//! Wire shapes of the Motion task API
//!
//! Only the fields the engine reads are modelled; unknown fields are
//! ignored. Conversion into [`RemoteRecord`] happens here so nothing past
//! the client sees untyped JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use todosync_model::{RemoteDraft, RemoteId, RemoteRecord};

#[derive(Debug, Deserialize)]
pub(crate) struct LabelDto {
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusDto {
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskDto {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) labels: Vec<LabelDto>,
    #[serde(default)]
    pub(crate) status: Option<StatusDto>,
    #[serde(default)]
    pub(crate) completed: bool,
    #[serde(default)]
    pub(crate) created_time: Option<DateTime<Utc>>,
}

impl From<TaskDto> for RemoteRecord {
    fn from(dto: TaskDto) -> Self {
        Self {
            id: RemoteId::new(dto.id),
            name: dto.name,
            description: dto.description,
            labels: dto.labels.into_iter().map(|l| l.name).collect(),
            status: dto.status.map(|s| s.name),
            completed: dto.completed,
            created_time: dto.created_time,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetaDto {
    #[serde(default)]
    pub(crate) next_cursor: Option<String>,
    #[serde(default)]
    pub(crate) page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListTasksDto {
    pub(crate) tasks: Vec<TaskDto>,
    #[serde(default)]
    pub(crate) meta: Option<MetaDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskPayload<'a> {
    pub(crate) name: &'a str,
    pub(crate) description: &'a str,
    pub(crate) labels: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) workspace_id: Option<&'a str>,
}

impl<'a> TaskPayload<'a> {
    pub(crate) fn new(draft: &'a RemoteDraft, workspace_id: Option<&'a str>) -> Self {
        Self {
            name: &draft.name,
            description: &draft.description,
            labels: &draft.labels,
            workspace_id,
        }
    }
}
