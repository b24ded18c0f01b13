use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub frontend_url: String,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .unwrap_or(3001),
            jwt_secret: env::var("ADMIN_JWT_SECRET")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            tls_cert_path: env::var("TLS_CERT_PATH").ok().filter(|p| !p.is_empty()),
            tls_key_path: env::var("TLS_KEY_PATH").ok().filter(|p| !p.is_empty()),
        })
    }

    /// Certificate and key paths, when both are configured.
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/educonnect".to_string(),
            database_max_connections: 10,
            host: "0.0.0.0".to_string(),
            port: 3001,
            jwt_secret: "secret".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }

    #[test]
    fn tls_requires_both_paths() {
        let mut cfg = config();
        assert!(cfg.tls_paths().is_none());

        cfg.tls_cert_path = Some("cert.pem".to_string());
        assert!(cfg.tls_paths().is_none());

        cfg.tls_key_path = Some("key.pem".to_string());
        assert_eq!(cfg.tls_paths(), Some(("cert.pem", "key.pem")));
    }
}
