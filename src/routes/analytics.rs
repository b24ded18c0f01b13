//! Admin analytics route: aggregated platform statistics for the dashboard.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::Utc;

use crate::errors::AppError;
use crate::middleware::rbac::RequireAdmin;
use crate::services::analytics::{self, AnalyticsReport};
use crate::AppState;

/// Query string as ordered key/value pairs.
///
/// Decoded as pairs rather than a struct so repeated keys never reject the
/// request; an undecodable query string is treated as empty.
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// GET /api/admin/analytics?period=<days>
pub async fn get_analytics(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    query: QueryPairs,
) -> Result<Json<AnalyticsReport>, AppError> {
    let pairs = match query {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Ignoring undecodable query string");
            Vec::new()
        }
    };

    let period_days = analytics::parse_period(first_value(&pairs, "period"));
    tracing::info!(user_id = %admin.id, period_days, "Fetching admin analytics");

    let report = analytics::get_report(&state.db, period_days, Utc::now()).await?;
    Ok(Json(report))
}

/// First value given for `key`; later repeats are ignored.
fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
