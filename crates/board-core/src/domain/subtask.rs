//! Subtask Entity
//!
//! Checklist entry under a task. Never affects board ordering.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind};
use super::wire::nullable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default, alias = "title", deserialize_with = "nullable")]
    pub content: String,
    #[serde(default, rename = "isCompleted", deserialize_with = "nullable")]
    pub is_completed: bool,
}

impl Entity for Subtask {
    const KIND: EntityKind = EntityKind::Subtask;

    fn id(&self) -> &str {
        &self.id
    }
}
