//! Seed script for development: populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` and `ADMIN_JWT_SECRET` environment variables (reads .env).

use chrono::{Duration, Utc};
use educonnect_admin::models::application::ApplicationStatus;
use educonnect_admin::models::session::SessionStatus;
use educonnect_admin::models::user::UserRole;
use sqlx::PgPool;
use uuid::Uuid;

/// Sample data is spread over this many days back from now.
const SPREAD_DAYS: i64 = 60;

const UNIVERSITIES: &[(&str, &str, &str)] = &[
    ("University of Toronto", "Canada", "Toronto"),
    ("McGill University", "Canada", "Montreal"),
    ("University of Oxford", "United Kingdom", "Oxford"),
    ("Imperial College London", "United Kingdom", "London"),
    ("Technical University of Munich", "Germany", "Munich"),
    ("University of Melbourne", "Australia", "Melbourne"),
    ("National University of Singapore", "Singapore", "Singapore"),
    ("ETH Zurich", "Switzerland", "Zurich"),
    ("University of Amsterdam", "Netherlands", "Amsterdam"),
    ("Stanford University", "United States", "Stanford"),
];

const FIRST_NAMES: &[&str] = &["Amina", "Liam", "Sofia", "Kenji", "Priya", "Mateo", "Zara", "Noah"];
const LAST_NAMES: &[&str] = &["Okafor", "Chen", "Rossi", "Tanaka", "Sharma", "Garcia", "Ali", "Smith"];

const APPLICATION_STATUSES: &[ApplicationStatus] = &[
    ApplicationStatus::Submitted,
    ApplicationStatus::UnderReview,
    ApplicationStatus::Approved,
    ApplicationStatus::Rejected,
    ApplicationStatus::Draft,
];

const SESSION_STATUSES: &[SessionStatus] = &[
    SessionStatus::Scheduled,
    SessionStatus::Completed,
    SessionStatus::Completed,
    SessionStatus::Cancelled,
    SessionStatus::NoShow,
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL")?;
    let jwt_secret = std::env::var("ADMIN_JWT_SECRET")?;
    let pool = educonnect_admin::db::create_pool(&db_url, 5).await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== EduConnect Seed Script ===");

    let admin_id = seed_admin(&pool).await?;
    let university_ids = seed_universities(&pool).await?;
    let (students, counselors) = seed_people(&pool).await?;
    seed_applications(&pool, &students, &university_ids).await?;
    seed_sessions(&pool, &students, &counselors).await?;

    let token = educonnect_admin::services::auth::issue_token(
        &admin_id.to_string(),
        Some("admin@educonnect.local"),
        UserRole::SuperAdmin,
        &jwt_secret,
        3600,
    )?;

    println!("\n=== Seed complete! ===");
    println!("Admin token (valid 1h):\n{token}");

    Ok(())
}

async fn seed_admin(pool: &PgPool) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, first_name, last_name, role)
         VALUES ('admin@educonnect.local', 'Platform', 'Administrator', 'SUPER_ADMIN')
         ON CONFLICT (email) DO UPDATE SET updated_at = NOW()
         RETURNING id",
    )
    .fetch_one(pool)
    .await?;

    println!("[done] Admin user ready");
    Ok(id)
}

async fn seed_universities(pool: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM universities")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Universities already seeded ({count})");
        return Ok(sqlx::query_scalar("SELECT id FROM universities")
            .fetch_all(pool)
            .await?);
    }

    let now = Utc::now();
    let mut ids = Vec::with_capacity(UNIVERSITIES.len());
    for (i, (name, country, city)) in UNIVERSITIES.iter().enumerate() {
        let created_at = now - Duration::days(SPREAD_DAYS - (i as i64) * 6);
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO universities (name, country, city, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(*name)
        .bind(*country)
        .bind(*city)
        .bind(created_at)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }

    println!("[done] Created {} universities", ids.len());
    Ok(ids)
}

/// Insert students and counselors with registration dates spread over the
/// seed window so the daily trend and growth figures are non-trivial.
async fn seed_people(pool: &PgPool) -> anyhow::Result<(Vec<Uuid>, Vec<Uuid>)> {
    let now = Utc::now();
    let mut students = Vec::new();
    let mut counselors = Vec::new();

    for i in 0..40_i64 {
        let first = FIRST_NAMES[(i as usize) % FIRST_NAMES.len()];
        let last = LAST_NAMES[(i as usize * 3) % LAST_NAMES.len()];
        let role = if i % 8 == 0 {
            UserRole::Counselor
        } else {
            UserRole::Student
        };
        let email = format!(
            "{}.{}.{i}@educonnect.local",
            first.to_lowercase(),
            last.to_lowercase()
        );
        // Denser registrations toward the present
        let age_hours = (i * i * 2) % (SPREAD_DAYS * 24);

        let id: Option<Uuid> = sqlx::query_scalar(
            "INSERT INTO users (email, first_name, last_name, role, created_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (email) DO NOTHING
             RETURNING id",
        )
        .bind(&email)
        .bind(first)
        .bind(last)
        .bind(role)
        .bind(now - Duration::hours(age_hours))
        .fetch_optional(pool)
        .await?;

        match (id, role) {
            (Some(id), UserRole::Counselor) => counselors.push(id),
            (Some(id), _) => students.push(id),
            (None, _) => {}
        }
    }

    println!(
        "[done] Created {} students and {} counselors",
        students.len(),
        counselors.len()
    );
    Ok((students, counselors))
}

async fn seed_applications(
    pool: &PgPool,
    students: &[Uuid],
    universities: &[Uuid],
) -> anyhow::Result<()> {
    if students.is_empty() || universities.is_empty() {
        println!("[skip] No new students or universities for applications");
        return Ok(());
    }

    let now = Utc::now();
    let mut created = 0;
    for (i, student) in students.iter().enumerate() {
        for j in 0..(i % 3 + 1) {
            let university = universities[(i + j * 4) % universities.len()];
            let status = APPLICATION_STATUSES[(i + j) % APPLICATION_STATUSES.len()];
            let age_hours = ((i * 17 + j * 29) as i64) % (SPREAD_DAYS * 24);

            sqlx::query(
                "INSERT INTO applications (user_id, university_id, status, created_at)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(student)
            .bind(university)
            .bind(status)
            .bind(now - Duration::hours(age_hours))
            .execute(pool)
            .await?;
            created += 1;
        }
    }

    println!("[done] Created {created} applications");
    Ok(())
}

async fn seed_sessions(pool: &PgPool, students: &[Uuid], counselors: &[Uuid]) -> anyhow::Result<()> {
    if students.is_empty() || counselors.is_empty() {
        println!("[skip] No new students or counselors for sessions");
        return Ok(());
    }

    let now = Utc::now();
    for (i, student) in students.iter().enumerate() {
        let counselor = counselors[i % counselors.len()];
        let status = SESSION_STATUSES[i % SESSION_STATUSES.len()];
        let scheduled_at = now + Duration::days(i as i64 % 14 - 7);

        sqlx::query(
            "INSERT INTO counseling_sessions (student_id, counselor_id, status, scheduled_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(student)
        .bind(counselor)
        .bind(status)
        .bind(scheduled_at)
        .execute(pool)
        .await?;
    }

    println!("[done] Created {} counseling sessions", students.len());
    Ok(())
}
