//! Admin analytics aggregation: platform totals, period-over-period growth,
//! grouped distributions, daily registrations and the recent-activity feed.
//!
//! Every query of one report runs concurrently against the same
//! [`ReportWindow`], so all figures share identical window boundaries.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::application::ApplicationStatus;
use crate::models::session::SessionStatus;
use crate::models::user::UserRole;
use crate::services::activity::{self, ActivityItem};

/// Window length used when the caller does not supply a usable period.
pub const DEFAULT_PERIOD_DAYS: i64 = 30;

/// Longest window a caller may request.
pub const MAX_PERIOD_DAYS: i64 = 365;

/// Number of countries reported in the university distribution.
const TOP_COUNTRIES: i64 = 10;

/// Complete analytics document returned to the admin dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub overview: Overview,
    pub growth: Growth,
    pub distributions: Distributions,
    pub trends: Trends,
    pub timestamp: DateTime<Utc>,
    pub recent_activity: Vec<ActivityItem>,
}

/// Unfiltered platform totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_users: i64,
    pub total_universities: i64,
    pub total_applications: i64,
    pub total_sessions: i64,
    pub period: i64,
}

/// Current-window volumes and their change versus the previous window.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Growth {
    pub new_users: i64,
    pub new_applications: i64,
    pub user_growth_rate: f64,
    pub application_growth_rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distributions {
    pub users_by_role: Vec<RoleCount>,
    pub applications_by_status: Vec<ApplicationStatusCount>,
    pub universities_by_country: Vec<CountryCount>,
    pub sessions_by_status: Vec<SessionStatusCount>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RoleCount {
    pub role: UserRole,
    pub count: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ApplicationStatusCount {
    pub status: ApplicationStatus,
    pub count: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CountryCount {
    pub country: String,
    pub count: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SessionStatusCount {
    pub status: SessionStatus,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub daily_registrations: Vec<DailyCount>,
}

/// New registrations on one UTC calendar day.
///
/// The day is serialized as `_id`, the key existing dashboard clients read.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DailyCount {
    #[serde(rename = "_id")]
    pub day: String,
    pub count: i64,
}

/// Boundaries of the current and previous reporting windows.
///
/// The current window is `[current_start, now]`; the previous one is
/// `[previous_start, current_start)` and has the same length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub current_start: DateTime<Utc>,
    pub previous_start: DateTime<Utc>,
}

impl ReportWindow {
    pub fn new(now: DateTime<Utc>, period_days: i64) -> Self {
        let period = Duration::days(period_days);
        Self {
            current_start: now - period,
            previous_start: now - period - period,
        }
    }
}

/// Normalize the raw `period` query value.
///
/// Missing, blank or non-numeric input falls back to [`DEFAULT_PERIOD_DAYS`];
/// numbers are clamped to `1..=MAX_PERIOD_DAYS`.
pub fn parse_period(raw: Option<&str>) -> i64 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .map_or(DEFAULT_PERIOD_DAYS, |days| days.clamp(1, MAX_PERIOD_DAYS))
}

/// Percentage change from `previous` to `current`, rounded to two decimals.
///
/// An empty previous window yields `0.0` rather than an infinite rate.
pub fn growth_rate(current: i64, previous: i64) -> f64 {
    if previous <= 0 {
        return 0.0;
    }
    let rate = (current - previous) as f64 / previous as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Build the full analytics report for a window of `period_days` ending at `now`.
pub async fn get_report(
    pool: &PgPool,
    period_days: i64,
    now: DateTime<Utc>,
) -> Result<AnalyticsReport, AppError> {
    let window = ReportWindow::new(now, period_days);

    let (overview, growth, distributions, daily_registrations, activity_sources) = tokio::try_join!(
        fetch_overview(pool, period_days),
        fetch_growth(pool, &window),
        fetch_distributions(pool),
        fetch_daily_registrations(pool, &window),
        activity::fetch_sources(pool),
    )?;

    tracing::debug!(
        period_days,
        new_users = growth.new_users,
        new_applications = growth.new_applications,
        "Analytics report assembled"
    );

    Ok(AnalyticsReport {
        overview,
        growth,
        distributions,
        trends: Trends {
            daily_registrations,
        },
        timestamp: now,
        recent_activity: activity::merge_feed(activity_sources, now),
    })
}

async fn fetch_overview(pool: &PgPool, period_days: i64) -> Result<Overview, AppError> {
    let (total_users, total_universities, total_applications, total_sessions) = tokio::try_join!(
        count_rows(pool, "SELECT COUNT(*) FROM users"),
        count_rows(pool, "SELECT COUNT(*) FROM universities"),
        count_rows(pool, "SELECT COUNT(*) FROM applications"),
        count_rows(pool, "SELECT COUNT(*) FROM counseling_sessions"),
    )?;

    Ok(Overview {
        total_users,
        total_universities,
        total_applications,
        total_sessions,
        period: period_days,
    })
}

async fn count_rows(pool: &PgPool, sql: &'static str) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await?;
    Ok(count)
}

async fn fetch_growth(pool: &PgPool, window: &ReportWindow) -> Result<Growth, AppError> {
    let (users, applications) = tokio::try_join!(
        fetch_window_counts(pool, "users", window),
        fetch_window_counts(pool, "applications", window),
    )?;

    Ok(Growth {
        new_users: users.current,
        new_applications: applications.current,
        user_growth_rate: growth_rate(users.current, users.previous),
        application_growth_rate: growth_rate(applications.current, applications.previous),
    })
}

/// Row counts for the current and previous windows of one table.
#[derive(Debug, sqlx::FromRow)]
struct WindowCounts {
    current: i64,
    previous: i64,
}

/// Count rows created in each window with conditional aggregation.
///
/// `table` is always a literal from this module, never caller input.
async fn fetch_window_counts(
    pool: &PgPool,
    table: &'static str,
    window: &ReportWindow,
) -> Result<WindowCounts, AppError> {
    let sql = format!(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN created_at >= $2 THEN 1 ELSE 0 END), 0)::BIGINT AS current,
            COALESCE(SUM(CASE WHEN created_at >= $1 AND created_at < $2 THEN 1 ELSE 0 END), 0)::BIGINT AS previous
        FROM {table}
        WHERE created_at >= $1
        "#
    );

    let row = sqlx::query_as::<_, WindowCounts>(&sql)
        .bind(window.previous_start)
        .bind(window.current_start)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

async fn fetch_distributions(pool: &PgPool) -> Result<Distributions, AppError> {
    let (users_by_role, applications_by_status, universities_by_country, sessions_by_status) = tokio::try_join!(
        fetch_users_by_role(pool),
        fetch_applications_by_status(pool),
        fetch_universities_by_country(pool),
        fetch_sessions_by_status(pool),
    )?;

    Ok(Distributions {
        users_by_role,
        applications_by_status,
        universities_by_country,
        sessions_by_status,
    })
}

async fn fetch_users_by_role(pool: &PgPool) -> Result<Vec<RoleCount>, AppError> {
    let rows = sqlx::query_as::<_, RoleCount>(
        "SELECT role, COUNT(*) AS count FROM users GROUP BY role ORDER BY role",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn fetch_applications_by_status(
    pool: &PgPool,
) -> Result<Vec<ApplicationStatusCount>, AppError> {
    let rows = sqlx::query_as::<_, ApplicationStatusCount>(
        "SELECT status, COUNT(*) AS count FROM applications GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn fetch_universities_by_country(pool: &PgPool) -> Result<Vec<CountryCount>, AppError> {
    let rows = sqlx::query_as::<_, CountryCount>(
        r#"
        SELECT country, COUNT(*) AS count
        FROM universities
        GROUP BY country
        ORDER BY count DESC, country ASC
        LIMIT $1
        "#,
    )
    .bind(TOP_COUNTRIES)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn fetch_sessions_by_status(pool: &PgPool) -> Result<Vec<SessionStatusCount>, AppError> {
    let rows = sqlx::query_as::<_, SessionStatusCount>(
        "SELECT status, COUNT(*) AS count FROM counseling_sessions GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Registrations per UTC day in the current window, oldest day first.
async fn fetch_daily_registrations(
    pool: &PgPool,
    window: &ReportWindow,
) -> Result<Vec<DailyCount>, AppError> {
    let rows = sqlx::query_as::<_, DailyCount>(
        r#"
        SELECT to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS day,
               COUNT(*) AS count
        FROM users
        WHERE created_at >= $1
        GROUP BY day
        ORDER BY day
        "#,
    )
    .bind(window.current_start)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
