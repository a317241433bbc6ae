use grpc_jwt_propagation::UnlistedRoutePolicy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where biodata records come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    /// The SIAK HTTP API
    Http { url: String, api_key: String },
    /// A local JSON array of records
    Static { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub source: SourceConfig,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub attempt_timeout: Duration,
    pub fetch_deadline: Duration,
}

#[derive(Clone, PartialEq, Eq)]
pub struct JwtConfig {
    pub secret: String,
    pub token_lifetime: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_lifetime", &self.token_lifetime)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected text or json, got {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Service configuration
    pub service_name: String,
    pub grpc_port: u16,
    pub request_timeout: Duration,
    pub log_format: LogFormat,

    // Upstream
    pub upstream: UpstreamConfig,

    // Auth
    pub jwt: JwtConfig,
    pub unlisted_routes: UnlistedRoutePolicy,
}

impl Config {
    /// Load from the process environment, after reading `.env` if present
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let source = match vars.or("SIAK_SOURCE", "http").to_ascii_lowercase().as_str() {
            "http" => SourceConfig::Http {
                url: vars.required("SIAK_API_URL")?,
                api_key: vars.required("SIAK_API_KEY")?,
            },
            "static" => SourceConfig::Static {
                path: PathBuf::from(vars.required("SIAK_STATIC_PATH")?),
            },
            other => {
                return Err(ConfigError::Invalid {
                    key: "SIAK_SOURCE",
                    value: other.to_string(),
                    reason: "expected http or static".to_string(),
                })
            }
        };

        // Upstream defaults follow the shared HTTP preset
        let preset = resilience::http_upstream_config();

        let max_attempts: u32 = vars.parsed("SIAK_MAX_ATTEMPTS", preset.retry.max_attempts)?;
        if max_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "SIAK_MAX_ATTEMPTS",
                value: "0".to_string(),
                reason: "at least one attempt is required".to_string(),
            });
        }

        let token_lifetime = match vars.get("JWT_DURATION") {
            Some(raw) => parse_duration(&raw).map_err(|reason| ConfigError::Invalid {
                key: "JWT_DURATION",
                value: raw,
                reason,
            })?,
            None => Duration::from_secs(30 * 60),
        };

        Ok(Self {
            service_name: vars.or("SERVICE_NAME", "tracerstudy-siak-service"),
            grpc_port: vars.parsed("PORT_GRPC", 8081)?,
            request_timeout: Duration::from_secs(vars.parsed("GRPC_REQUEST_TIMEOUT_SECS", 60)?),
            log_format: vars.parsed("LOG_FORMAT", LogFormat::Text)?,
            upstream: UpstreamConfig {
                source,
                max_attempts,
                retry_delay: Duration::from_millis(vars.parsed(
                    "SIAK_RETRY_DELAY_MS",
                    preset.retry.delay.as_millis() as u64,
                )?),
                attempt_timeout: Duration::from_secs(vars.parsed("SIAK_ATTEMPT_TIMEOUT_SECS", 10)?),
                fetch_deadline: Duration::from_secs(vars.parsed(
                    "SIAK_FETCH_DEADLINE_SECS",
                    preset.timeout.duration.as_secs(),
                )?),
            },
            jwt: JwtConfig {
                secret: vars.required("JWT_SECRET_KEY")?,
                token_lifetime,
            },
            unlisted_routes: vars.parsed("AUTHZ_UNLISTED_ROUTES", UnlistedRoutePolicy::Allow)?,
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn parsed<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value: raw,
            }),
            None => Ok(default),
        }
    }
}

/// Parse `<n>s`, `<n>m` or `<n>h`
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| "missing unit (s, m or h)".to_string())?;
    let (amount, unit) = raw.split_at(split);

    let amount: u64 = amount
        .parse()
        .map_err(|_| "expected a number before the unit".to_string())?;

    let multiplier = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        other => return Err(format!("unknown unit {other:?}")),
    };
    let seconds = amount
        .checked_mul(multiplier)
        .ok_or_else(|| "duration too large".to_string())?;

    if seconds == 0 {
        return Err("duration must be positive".to_string());
    }

    Ok(Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const BASE: &[(&str, &str)] = &[
        ("SIAK_API_URL", "http://siak.local/api/mhs"),
        ("SIAK_API_KEY", "key"),
        ("JWT_SECRET_KEY", "hs256-shared-key"),
    ];

    #[test]
    fn test_default_config() {
        let config = load(BASE).unwrap();

        assert_eq!(config.service_name, "tracerstudy-siak-service");
        assert_eq!(config.grpc_port, 8081);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.upstream.max_attempts, 3);
        assert_eq!(config.upstream.retry_delay, Duration::from_millis(500));
        assert_eq!(config.upstream.attempt_timeout, Duration::from_secs(10));
        assert_eq!(config.upstream.fetch_deadline, Duration::from_secs(35));
        assert_eq!(config.jwt.token_lifetime, Duration::from_secs(1800));
        assert_eq!(config.unlisted_routes, UnlistedRoutePolicy::Allow);
        assert_eq!(
            config.upstream.source,
            SourceConfig::Http {
                url: "http://siak.local/api/mhs".to_string(),
                api_key: "key".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_secret() {
        let result = load(&[("SIAK_API_URL", "http://x"), ("SIAK_API_KEY", "k")]);
        assert_eq!(result.unwrap_err(), ConfigError::Missing("JWT_SECRET_KEY"));
    }

    #[test]
    fn test_http_source_requires_url() {
        let result = load(&[("JWT_SECRET_KEY", "s")]);
        assert_eq!(result.unwrap_err(), ConfigError::Missing("SIAK_API_URL"));
    }

    #[test]
    fn test_static_source() {
        let config = load(&[
            ("SIAK_SOURCE", "static"),
            ("SIAK_STATIC_PATH", "/data/mhs.json"),
            ("JWT_SECRET_KEY", "s"),
        ])
        .unwrap();

        assert_eq!(
            config.upstream.source,
            SourceConfig::Static {
                path: PathBuf::from("/data/mhs.json")
            }
        );
    }

    #[test]
    fn test_unknown_source() {
        let mut pairs = BASE.to_vec();
        pairs.push(("SIAK_SOURCE", "ftp"));

        assert!(matches!(
            load(&pairs).unwrap_err(),
            ConfigError::Invalid { key: "SIAK_SOURCE", .. }
        ));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            ("PORT_GRPC", "9090"),
            ("JWT_DURATION", "2h"),
            ("AUTHZ_UNLISTED_ROUTES", "deny"),
            ("LOG_FORMAT", "json"),
            ("SIAK_MAX_ATTEMPTS", "5"),
        ]);

        let config = load(&pairs).unwrap();
        assert_eq!(config.grpc_port, 9090);
        assert_eq!(config.jwt.token_lifetime, Duration::from_secs(7200));
        assert_eq!(config.unlisted_routes, UnlistedRoutePolicy::Deny);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.upstream.max_attempts, 5);
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = BASE.to_vec();
        pairs.push(("PORT_GRPC", "eighty"));

        assert!(matches!(
            load(&pairs).unwrap_err(),
            ConfigError::Invalid { key: "PORT_GRPC", .. }
        ));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut pairs = BASE.to_vec();
        pairs.push(("SIAK_MAX_ATTEMPTS", "0"));

        assert!(matches!(
            load(&pairs).unwrap_err(),
            ConfigError::Invalid { key: "SIAK_MAX_ATTEMPTS", .. }
        ));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("45s"), Ok(Duration::from_secs(45)));
        assert_eq!(parse_duration("30m"), Ok(Duration::from_secs(1800)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert!(parse_duration("30").is_err());
        assert!(parse_duration("m").is_err());
        assert!(parse_duration("10d").is_err());
        assert!(parse_duration("0s").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = load(BASE).unwrap();
        assert!(!format!("{:?}", config.jwt).contains("hs256-shared-key"));
    }
}
