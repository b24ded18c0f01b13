use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Recently added university as read for the activity feed.
#[derive(Debug, Clone, FromRow)]
pub struct RecentUniversity {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
