use std::env;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub search_default_radius_km: f64,
    pub search_default_limit: usize,
    pub search_max_limit: usize,
    /// Offset applied to UTC before evaluating weekly availability windows.
    pub availability_utc_offset_minutes: i32,
    pub server_port: u16,
}

pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 50.0;
pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const DEFAULT_SEARCH_MAX_LIMIT: usize = 100;
pub const DEFAULT_SERVER_PORT: u16 = 3000;

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            search_default_radius_km: parse_or("SEARCH_DEFAULT_RADIUS_KM", env::var("SEARCH_DEFAULT_RADIUS_KM").ok(), DEFAULT_SEARCH_RADIUS_KM),
            search_default_limit: parse_or("SEARCH_DEFAULT_LIMIT", env::var("SEARCH_DEFAULT_LIMIT").ok(), DEFAULT_SEARCH_LIMIT),
            search_max_limit: parse_or("SEARCH_MAX_LIMIT", env::var("SEARCH_MAX_LIMIT").ok(), DEFAULT_SEARCH_MAX_LIMIT),
            availability_utc_offset_minutes: parse_or(
                "AVAILABILITY_UTC_OFFSET_MINUTES",
                env::var("AVAILABILITY_UTC_OFFSET_MINUTES").ok(),
                0,
            ),
            server_port: parse_or("PORT", env::var("PORT").ok(), DEFAULT_SERVER_PORT),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match raw {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {:?}", key, value, default);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "anon".to_string(),
            supabase_jwt_secret: "secret".to_string(),
            search_default_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            search_default_limit: DEFAULT_SEARCH_LIMIT,
            search_max_limit: DEFAULT_SEARCH_MAX_LIMIT,
            availability_utc_offset_minutes: 0,
            server_port: DEFAULT_SERVER_PORT,
        }
    }

    #[test]
    fn parse_or_falls_back_on_garbage() {
        assert_eq!(parse_or("X", Some("abc".to_string()), 7usize), 7);
        assert_eq!(parse_or("X", Some(" 12 ".to_string()), 7usize), 12);
        assert_eq!(parse_or("X", None, -300i32), -300);
        assert_eq!(parse_or("X", Some("-300".to_string()), 0i32), -300);
    }

    #[test]
    fn configured_requires_supabase_settings() {
        let mut config = config();
        assert!(config.is_configured());
        config.supabase_jwt_secret.clear();
        assert!(!config.is_configured());
    }
}
