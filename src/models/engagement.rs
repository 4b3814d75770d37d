// src/models/engagement.rs
// DOCUMENTATION: Like and bookmark relation models
// PURPOSE: Existence of a relation row = "liked"/"bookmarked"

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Which relation a toggle operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementKind {
    Like,
    Bookmark,
}

impl EngagementKind {
    /// Relation table backing this kind
    /// Static strings only - this value is interpolated into SQL
    pub fn table(&self) -> &'static str {
        match self {
            EngagementKind::Like => "gym_likes",
            EngagementKind::Bookmark => "gym_bookmarks",
        }
    }
}

/// A like/bookmark relation row
/// Composite uniqueness: at most one row per (gym_id, user_id) per table
#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EngagementRelation {
    pub id: Uuid,
    pub gym_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Result of a toggle call
#[derive(Debug, Clone, Serialize)]
pub struct ToggleResponse {
    /// New state: true = relation now exists
    pub active: bool,

    /// Optimistically adjusted like counter (likes only).
    /// Display approximation, not a server-side aggregate.
    pub thumbs_up: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_table_mapping() {
        assert_eq!(EngagementKind::Like.table(), "gym_likes");
        assert_eq!(EngagementKind::Bookmark.table(), "gym_bookmarks");
    }
}
