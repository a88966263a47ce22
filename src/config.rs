use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_course() -> String {
    "CS101".to_string()
}
fn default_pseudonym() -> String {
    "student_001".to_string()
}
fn default_true() -> bool {
    true
}

/// Console configuration. Read once at startup from
/// `$XDG_CONFIG_HOME/evgg/console.json` (when present) with the
/// `EVGG_API_BASE` environment variable taking precedence for the base
/// URL. Passed by value to the API client; never reloaded at runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_course")]
    pub default_course: String,
    #[serde(default = "default_pseudonym")]
    pub default_pseudonym: String,
    /// Feature flag: expose the endpoint self-test screen.
    #[serde(default = "default_true")]
    pub self_test_enabled: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_course: default_course(),
            default_pseudonym: default_pseudonym(),
            self_test_enabled: true,
        }
    }
}

impl ConsoleConfig {
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)?;
                serde_json::from_str::<ConsoleConfig>(&content).unwrap_or_default()
            }
            _ => ConsoleConfig::default(),
        };

        if let Ok(base) = std::env::var("EVGG_API_BASE") {
            if !base.trim().is_empty() {
                config.base_url = base;
            }
        }

        // A trailing slash would double up when joining endpoint paths.
        while config.base_url.ends_with('/') {
            config.base_url.pop();
        }

        Ok(config)
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("evgg").join("console.json"))
}

/// Route tracing output to a log file; stdout belongs to the alternate
/// screen. Logging failures are not fatal to the console.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let dir = dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("evgg");
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(dir.join("console.log")) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::ConsoleConfig;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ConsoleConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.default_course, "CS101");
        assert_eq!(config.default_pseudonym, "student_001");
        assert!(config.self_test_enabled);
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let raw = r#"{"base_url": "http://evgg.internal:9000", "default_course": "BIO110", "self_test_enabled": false}"#;
        let config: ConsoleConfig = serde_json::from_str(raw).expect("parse");
        assert_eq!(config.base_url, "http://evgg.internal:9000");
        assert_eq!(config.default_course, "BIO110");
        assert!(!config.self_test_enabled);
    }
}
