use std::env;
use std::path::PathBuf;
use std::time::Duration;

use sheet_core::{FontSizes, OutputNaming};

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| *v > 0.0)
        .unwrap_or(default)
}

// zero would make timers panic or spin, so it falls back to the default
fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    duration_ms(env::var(name).ok().as_deref(), default_ms)
}

fn duration_ms(raw: Option<&str>, default_ms: u64) -> Duration {
    let ms = raw
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(default_ms);
    Duration::from_millis(ms)
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeskConfig {
    pub server_url: String,
    pub refresh_interval: Duration,
    pub http_timeout: Duration,
    pub output_dir: PathBuf,
    pub naming: OutputNaming,
    pub font_sizes: FontSizes,
    pub log_json: bool,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            refresh_interval: Duration::from_millis(1000),
            http_timeout: Duration::from_millis(3000),
            output_dir: PathBuf::from("."),
            naming: OutputNaming::default(),
            font_sizes: FontSizes::default(),
            log_json: false,
        }
    }
}

impl DeskConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            server_url: env::var("LABELS_SERVER_URL").unwrap_or(d.server_url),
            refresh_interval: env_duration_ms("LABELS_REFRESH_MS", 1000),
            http_timeout: env_duration_ms("LABELS_HTTP_TIMEOUT_MS", 3000),
            output_dir: env::var_os("LABELS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(d.output_dir),
            naming: OutputNaming::new(
                env::var("LABELS_FILE_PREFIX").unwrap_or(d.naming.base),
                d.naming.ext,
            ),
            font_sizes: FontSizes {
                room: env_f64("LABELS_FONT_ROOM", d.font_sizes.room),
                part: env_f64("LABELS_FONT_PART", d.font_sizes.part),
                dims: env_f64("LABELS_FONT_DIMS", d.font_sizes.dims),
            },
            log_json: env_bool("LABELS_LOG_JSON", d.log_json),
        }
    }
}
