use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Environment-level configuration.
///
/// The relay has exactly two knobs: the listening port and the allowed
/// cross-origin value. Everything else is fixed behavior.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub allowed_origin: String,
}

impl Config {
    /// Reads `PORT` (default 5000) and `ORIGIN` (default `*`).
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);
        let allowed_origin = std::env::var("ORIGIN").unwrap_or_else(|_| "*".to_string());
        Self {
            port,
            allowed_origin,
        }
    }

    /// CORS layer for the configured origin; `*` or an unparsable value
    /// allows any origin.
    pub fn cors(&self) -> CorsLayer {
        if self.allowed_origin != "*" {
            match self.allowed_origin.parse::<HeaderValue>() {
                Ok(origin) => {
                    return CorsLayer::new()
                        .allow_origin(origin)
                        .allow_methods(Any)
                        .allow_headers(Any);
                }
                Err(_) => {
                    warn!(origin = %self.allowed_origin, "Invalid ORIGIN value, allowing any origin");
                }
            }
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_builds_for_wildcard_origin() {
        let config = Config {
            port: 5000,
            allowed_origin: "*".to_string(),
        };
        let _ = config.cors();
    }

    #[test]
    fn cors_builds_for_specific_origin() {
        let config = Config {
            port: 5000,
            allowed_origin: "https://example.com".to_string(),
        };
        let _ = config.cors();
    }

    #[test]
    fn cors_falls_back_on_unparsable_origin() {
        let config = Config {
            port: 5000,
            allowed_origin: "not\nan\norigin".to_string(),
        };
        let _ = config.cors();
    }
}
