use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::{
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower_http::services::{ServeDir, ServeFile};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

#[derive(Clone)]
struct HostConfig {
    port: u16,
    dist_dir: PathBuf,
    log_level: LogLevel,
}

impl HostConfig {
    fn from_env() -> Self {
        Self {
            port: resolve_port(std::env::var("PORT").ok()),
            dist_dir: resolve_dist_dir(std::env::var("DIST_DIR").ok()),
            log_level: resolve_log_level(std::env::var("LOG_LEVEL").ok()),
        }
    }
}

fn resolve_port(raw: Option<String>) -> u16 {
    raw.and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(DEFAULT_PORT)
}

fn resolve_dist_dir(raw: Option<String>) -> PathBuf {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR))
}

fn resolve_log_level(raw: Option<String>) -> LogLevel {
    raw.as_deref()
        .and_then(LogLevel::parse)
        .unwrap_or(DEFAULT_LOG_LEVEL)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthPayload {
    ok: bool,
    version: &'static str,
}

async fn healthz(State(config): State<HostConfig>) -> Json<HealthPayload> {
    log_event(
        config.log_level,
        LogLevel::Debug,
        "health_probe",
        serde_json::json!({}),
    );

    Json(HealthPayload {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = HostConfig::from_env();
    let bind_address = format!("0.0.0.0:{}", config.port);

    let index_path = config.dist_dir.join("index.html");
    let static_service =
        ServeDir::new(&config.dist_dir).not_found_service(ServeFile::new(index_path));

    let app = Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(static_service)
        .with_state(config.clone());

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log_event(
        config.log_level,
        LogLevel::Info,
        "server_start",
        serde_json::json!({
            "port": config.port,
            "dist_dir": config.dist_dir.display().to_string(),
        }),
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn log_event(min_level: LogLevel, level: LogLevel, event: &str, fields: serde_json::Value) {
    if level < min_level {
        return;
    }

    let mut payload = serde_json::Map::new();
    payload.insert(
        "ts".to_string(),
        serde_json::Value::Number(serde_json::Number::from(now_unix_seconds())),
    );
    payload.insert(
        "level".to_string(),
        serde_json::Value::String(level.as_str().to_string()),
    );
    payload.insert(
        "event".to_string(),
        serde_json::Value::String(event.to_string()),
    );

    if let serde_json::Value::Object(extra) = fields {
        for (key, value) in extra {
            payload.insert(key, value);
        }
    }

    println!("{}", serde_json::Value::Object(payload));
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_falls_back_on_missing_invalid_or_zero() {
        assert_eq!(resolve_port(None), DEFAULT_PORT);
        assert_eq!(resolve_port(Some("not-a-port".to_string())), DEFAULT_PORT);
        assert_eq!(resolve_port(Some("0".to_string())), DEFAULT_PORT);
        assert_eq!(resolve_port(Some(" 3000 ".to_string())), 3000);
    }

    #[test]
    fn dist_dir_ignores_blank_values() {
        assert_eq!(resolve_dist_dir(None), PathBuf::from(DEFAULT_DIST_DIR));
        assert_eq!(
            resolve_dist_dir(Some("   ".to_string())),
            PathBuf::from(DEFAULT_DIST_DIR)
        );
        assert_eq!(
            resolve_dist_dir(Some("public".to_string())),
            PathBuf::from("public")
        );
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse(" info "), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("trace"), None);
        assert_eq!(resolve_log_level(None), DEFAULT_LOG_LEVEL);
        assert_eq!(
            resolve_log_level(Some("debug".to_string())),
            LogLevel::Debug
        );
    }

    #[test]
    fn debug_ranks_below_info() {
        assert!(LogLevel::Debug < LogLevel::Info);
    }

    #[tokio::test]
    async fn health_payload_reports_ok() {
        let config = HostConfig {
            port: DEFAULT_PORT,
            dist_dir: PathBuf::from(DEFAULT_DIST_DIR),
            log_level: LogLevel::Info,
        };

        let Json(payload) = healthz(State(config)).await;
        assert!(payload.ok);
        assert_eq!(payload.version, env!("CARGO_PKG_VERSION"));
    }
}
