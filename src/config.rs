use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub sampling: SamplingConfig,
    pub gpu: GpuConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: "0.0.0.0:5000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Seconds between background sampling passes.
    pub interval_secs: u64,
    /// Retention filter: keep a process when cpu_percent exceeds this...
    pub min_cpu_percent: f32,
    /// ...or resident memory exceeds this many MiB.
    pub min_memory_mb: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            interval_secs: 3,
            min_cpu_percent: 1.0,
            min_memory_mb: 50.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GpuConfig {
    pub enabled: bool,
    pub query_timeout_secs: u64,
}

impl Default for GpuConfig {
    fn default() -> Self {
        GpuConfig {
            enabled: true,
            query_timeout_secs: 5,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("usermon").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.server.listen, "0.0.0.0:5000");
        assert_eq!(config.sampling.interval_secs, 3);
        assert!((config.sampling.min_cpu_percent - 1.0).abs() < f32::EPSILON);
        assert!(config.gpu.enabled);
        assert_eq!(config.gpu.query_timeout_secs, 5);
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[sampling]
interval_secs = 10
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sampling.interval_secs, 10);
        // Other fields should be defaults
        assert_eq!(config.server.listen, "0.0.0.0:5000");
        assert!(config.gpu.enabled);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:8080"

[sampling]
interval_secs = 5
min_cpu_percent = 2.5
min_memory_mb = 100.0

[gpu]
enabled = false
query_timeout_secs = 2
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen, "127.0.0.1:8080");
        assert_eq!(config.sampling.interval_secs, 5);
        assert!((config.sampling.min_cpu_percent - 2.5).abs() < f32::EPSILON);
        assert!((config.sampling.min_memory_mb - 100.0).abs() < f64::EPSILON);
        assert!(!config.gpu.enabled);
        assert_eq!(config.gpu.query_timeout_secs, 2);
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.sampling.interval_secs, 3);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("usermon_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.sampling.interval_secs, 3);
        let _ = std::fs::remove_file(&temp);
    }
}
