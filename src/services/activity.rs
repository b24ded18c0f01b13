//! Recent-activity feed: newest applications, registrations and universities
//! merged into a single list for the dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationStatus, RecentApplication};
use crate::models::university::RecentUniversity;
use crate::models::user::RecentUser;

/// Maximum number of items in the merged feed.
pub const FEED_LIMIT: usize = 10;

const RECENT_APPLICATIONS: i64 = 5;
const RECENT_REGISTRATIONS: i64 = 3;
const RECENT_UNIVERSITIES: i64 = 2;

/// Badge shown next to a feed entry.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Success,
    Warning,
    Info,
}

impl From<ApplicationStatus> for ActivityStatus {
    fn from(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Approved => ActivityStatus::Success,
            ApplicationStatus::Rejected => ActivityStatus::Warning,
            _ => ActivityStatus::Info,
        }
    }
}

/// A single entry of the recent-activity feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub time: String,
    pub status: ActivityStatus,
    pub created_at: DateTime<Utc>,
}

/// Raw rows the feed is built from.
#[derive(Debug, Default)]
pub struct ActivitySources {
    pub applications: Vec<RecentApplication>,
    pub registrations: Vec<RecentUser>,
    pub universities: Vec<RecentUniversity>,
}

/// Fetch the newest rows of every feed source in parallel.
pub async fn fetch_sources(pool: &PgPool) -> Result<ActivitySources, AppError> {
    let (applications, registrations, universities) = tokio::try_join!(
        fetch_recent_applications(pool),
        fetch_recent_registrations(pool),
        fetch_recent_universities(pool),
    )?;

    Ok(ActivitySources {
        applications,
        registrations,
        universities,
    })
}

async fn fetch_recent_applications(pool: &PgPool) -> Result<Vec<RecentApplication>, AppError> {
    let rows = sqlx::query_as::<_, RecentApplication>(
        r#"
        SELECT a.id, a.status, a.created_at,
               u.first_name, u.last_name,
               un.name AS university_name
        FROM applications a
        LEFT JOIN users u ON u.id = a.user_id
        LEFT JOIN universities un ON un.id = a.university_id
        ORDER BY a.created_at DESC
        LIMIT $1
        "#,
    )
    .bind(RECENT_APPLICATIONS)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Only students and counselors show up as registrations; staff accounts do not.
async fn fetch_recent_registrations(pool: &PgPool) -> Result<Vec<RecentUser>, AppError> {
    let rows = sqlx::query_as::<_, RecentUser>(
        r#"
        SELECT id, first_name, last_name, role, created_at
        FROM users
        WHERE role IN ('STUDENT', 'COUNSELOR')
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(RECENT_REGISTRATIONS)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn fetch_recent_universities(pool: &PgPool) -> Result<Vec<RecentUniversity>, AppError> {
    let rows = sqlx::query_as::<_, RecentUniversity>(
        r#"
        SELECT id, name, created_at
        FROM universities
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(RECENT_UNIVERSITIES)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Merge all sources into one feed, newest first, capped at [`FEED_LIMIT`].
pub fn merge_feed(sources: ActivitySources, now: DateTime<Utc>) -> Vec<ActivityItem> {
    let mut items: Vec<ActivityItem> = sources
        .applications
        .into_iter()
        .map(|app| application_item(app, now))
        .chain(
            sources
                .registrations
                .into_iter()
                .map(|user| registration_item(user, now)),
        )
        .chain(
            sources
                .universities
                .into_iter()
                .map(|uni| university_item(uni, now)),
        )
        .collect();

    // sort_by is stable, so equal timestamps keep source order
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(FEED_LIMIT);
    items
}

fn application_item(app: RecentApplication, now: DateTime<Utc>) -> ActivityItem {
    let applicant = full_name(app.first_name.as_deref(), app.last_name.as_deref())
        .unwrap_or_else(|| "Unknown applicant".to_string());
    let description = match app.university_name {
        Some(university) => format!("{applicant} applied to {university}"),
        None => format!("{applicant} applied for university"),
    };

    ActivityItem {
        id: app.id,
        title: "New Application".to_string(),
        description,
        time: time_ago(app.created_at, now),
        status: app.status.into(),
        created_at: app.created_at,
    }
}

fn registration_item(user: RecentUser, now: DateTime<Utc>) -> ActivityItem {
    let name = full_name(Some(user.first_name.as_str()), Some(user.last_name.as_str()))
        .unwrap_or_default();
    ActivityItem {
        id: user.id,
        title: format!("New {} Registration", user.role),
        description: format!("{name} registered as a {}", user.role),
        time: time_ago(user.created_at, now),
        status: ActivityStatus::Success,
        created_at: user.created_at,
    }
}

fn university_item(uni: RecentUniversity, now: DateTime<Utc>) -> ActivityItem {
    ActivityItem {
        id: uni.id,
        title: "New University Added".to_string(),
        description: format!("{} was added to the system", uni.name),
        time: time_ago(uni.created_at, now),
        status: ActivityStatus::Success,
        created_at: uni.created_at,
    }
}

/// Join the non-blank name parts, or `None` if there are none.
fn full_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Human-readable age of `created_at` relative to `now`.
///
/// Under an hour (or in the future) is "Just now"; under a day counts hours;
/// under a week counts days; older entries show the calendar date.
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - created_at).num_hours();
    let days = hours / 24;

    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{hours} hour{} ago", plural(hours))
    } else if days < 7 {
        format!("{days} day{} ago", plural(days))
    } else {
        created_at.format("%-m/%-d/%Y").to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    fn application(
        status: ApplicationStatus,
        age: Duration,
        first: Option<&str>,
        last: Option<&str>,
        university: Option<&str>,
    ) -> RecentApplication {
        RecentApplication {
            id: Uuid::new_v4(),
            status,
            created_at: now() - age,
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            university_name: university.map(str::to_string),
        }
    }

    fn user(role: UserRole, age: Duration) -> RecentUser {
        RecentUser {
            id: Uuid::new_v4(),
            first_name: "Amina".to_string(),
            last_name: "Okafor".to_string(),
            role,
            created_at: now() - age,
        }
    }

    fn university(name: &str, age: Duration) -> RecentUniversity {
        RecentUniversity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now() - age,
        }
    }

    #[test]
    fn time_ago_buckets() {
        let now = now();
        assert_eq!(time_ago(now, now), "Just now");
        assert_eq!(time_ago(now - Duration::minutes(59), now), "Just now");
        assert_eq!(time_ago(now - Duration::minutes(60), now), "1 hour ago");
        assert_eq!(time_ago(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(time_ago(now - Duration::hours(23), now), "23 hours ago");
        assert_eq!(time_ago(now - Duration::hours(24), now), "1 day ago");
        assert_eq!(time_ago(now - Duration::days(6), now), "6 days ago");
        assert_eq!(time_ago(now - Duration::days(7), now), "3/8/2025");
    }

    #[test]
    fn future_timestamps_are_just_now() {
        let now = now();
        assert_eq!(time_ago(now + Duration::hours(3), now), "Just now");
    }

    #[test]
    fn application_status_mapping() {
        assert_eq!(ActivityStatus::from(ApplicationStatus::Approved), ActivityStatus::Success);
        assert_eq!(ActivityStatus::from(ApplicationStatus::Rejected), ActivityStatus::Warning);
        assert_eq!(ActivityStatus::from(ApplicationStatus::Submitted), ActivityStatus::Info);
        assert_eq!(ActivityStatus::from(ApplicationStatus::UnderReview), ActivityStatus::Info);
    }

    #[test]
    fn items_are_described_per_source() {
        let sources = ActivitySources {
            applications: vec![
                application(
                    ApplicationStatus::Approved,
                    Duration::hours(1),
                    Some("Liam"),
                    Some("Chen"),
                    Some("University of Toronto"),
                ),
                application(ApplicationStatus::Submitted, Duration::hours(2), None, None, None),
            ],
            registrations: vec![user(UserRole::Counselor, Duration::hours(3))],
            universities: vec![university("ETH Zurich", Duration::hours(4))],
        };

        let feed = merge_feed(sources, now());
        assert_eq!(feed.len(), 4);

        assert_eq!(feed[0].title, "New Application");
        assert_eq!(feed[0].description, "Liam Chen applied to University of Toronto");
        assert_eq!(feed[0].status, ActivityStatus::Success);

        assert_eq!(feed[1].description, "Unknown applicant applied for university");
        assert_eq!(feed[1].status, ActivityStatus::Info);

        assert_eq!(feed[2].title, "New COUNSELOR Registration");
        assert_eq!(feed[2].description, "Amina Okafor registered as a COUNSELOR");
        assert_eq!(feed[2].time, "3 hours ago");

        assert_eq!(feed[3].title, "New University Added");
        assert_eq!(feed[3].description, "ETH Zurich was added to the system");
    }

    #[test]
    fn feed_is_newest_first_across_sources() {
        let sources = ActivitySources {
            applications: vec![
                application(ApplicationStatus::Submitted, Duration::days(3), Some("A"), None, None),
                application(ApplicationStatus::Rejected, Duration::days(9), Some("B"), None, None),
            ],
            registrations: vec![user(UserRole::Student, Duration::minutes(5))],
            universities: vec![university("MIT", Duration::days(1))],
        };

        let feed = merge_feed(sources, now());
        let ages: Vec<DateTime<Utc>> = feed.iter().map(|i| i.created_at).collect();
        let mut sorted = ages.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(ages, sorted);
        assert_eq!(feed[0].title, "New STUDENT Registration");
        assert_eq!(feed[0].time, "Just now");
        assert_eq!(feed[3].status, ActivityStatus::Warning);
    }

    #[test]
    fn feed_is_capped() {
        let sources = ActivitySources {
            applications: (0..8)
                .map(|i| {
                    application(ApplicationStatus::Draft, Duration::hours(i), Some("X"), None, None)
                })
                .collect(),
            registrations: (0..5)
                .map(|i| user(UserRole::Student, Duration::minutes(30 * i)))
                .collect(),
            universities: vec![university("Oxford", Duration::days(30))],
        };

        let feed = merge_feed(sources, now());
        assert_eq!(feed.len(), FEED_LIMIT);
        assert!(feed.iter().all(|i| i.title != "New University Added"));
    }

    #[test]
    fn empty_sources_yield_empty_feed() {
        assert!(merge_feed(ActivitySources::default(), now()).is_empty());
    }

    #[test]
    fn serializes_in_camel_case() {
        let feed = merge_feed(
            ActivitySources {
                universities: vec![university("MIT", Duration::hours(2))],
                ..Default::default()
            },
            now(),
        );
        let json = serde_json::to_value(&feed[0]).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["time"], "2 hours ago");
        assert!(json.get("createdAt").is_some());
    }
}
