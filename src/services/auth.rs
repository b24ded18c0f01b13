//! Bearer token verification for admin endpoints.
//!
//! Tokens are minted by the platform's identity service; this service only
//! verifies them. [`issue_token`] exists for the seed binary and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;
use crate::models::user::UserRole;

/// JWT claims carried by admin tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject. Legacy tokens carry the user id as `id` instead.
    #[serde(alias = "id")]
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Absent or non-string role claims decode as `None`.
    #[serde(default, deserialize_with = "string_claim")]
    pub role: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

/// Sign a token for `subject` with the given role claim.
pub fn issue_token(
    subject: &str,
    email: Option<&str>,
    role: UserRole,
    jwt_secret: &str,
    expiry_secs: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: subject.to_string(),
        email: email.map(str::to_string),
        role: Some(role.as_str().to_string()),
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))
}

/// Keep a claim only when it is a JSON string.
fn string_claim<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Token validation failed");
            AppError::invalid_token()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-jwt";

    #[test]
    fn token_generation_and_validation() {
        let token = issue_token("user-1", Some("a@b.test"), UserRole::Admin, SECRET, 900).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email.as_deref(), Some("a@b.test"));
        assert_eq!(claims.role.as_deref(), Some("ADMIN"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn invalid_token_rejected() {
        let result = validate_token("garbage.token.here", SECRET);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token("user-1", None, UserRole::Admin, SECRET, 900).unwrap();
        assert!(validate_token(&token, "another-secret").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        // Expired well beyond the 60s leeway window
        let token = issue_token("user-1", None, UserRole::Admin, SECRET, -3600).unwrap();
        assert!(validate_token(&token, SECRET).is_err());
    }

    #[test]
    fn legacy_id_claim_accepted() {
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();
        let legacy = serde_json::json!({
            "id": "65f0c0ffee",
            "email": "admin@educonnect.test",
            "role": "admin",
            "exp": exp,
        });
        let token = jsonwebtoken::encode(
            &Header::default(),
            &legacy,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "65f0c0ffee");
        assert_eq!(claims.role.as_deref(), Some("admin"));
        assert_eq!(claims.iat, 0);
    }

    fn sign(claims: &serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn missing_role_claim_still_validates() {
        let exp = (Utc::now() + Duration::minutes(10)).timestamp();
        let token = sign(&serde_json::json!({ "sub": "u1", "exp": exp }));

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "u1");
        assert!(claims.role.is_none());
    }

    #[test]
    fn non_string_role_claim_decodes_as_none() {
        let exp = (Utc::now() + Duration::minutes(10)).timestamp();
        for role in [serde_json::json!(7), serde_json::json!(["ADMIN"]), serde_json::Value::Null] {
            let token = sign(&serde_json::json!({ "sub": "u1", "role": role, "exp": exp }));
            let claims = validate_token(&token, SECRET).unwrap();
            assert!(claims.role.is_none(), "role {role}");
        }
    }
}
