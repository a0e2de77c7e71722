use figment::{Figment, providers::{Env, Format, Yaml}};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub access_log: AccessLogConfig,
}

/// Access log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLogConfig {
    /// Destination: `-` for stdout, anything else is a file path.
    #[serde(default = "default_output")]
    pub output: String,
    /// Time zone used to render the record timestamp.
    #[serde(default)]
    pub time_zone: LogTimeZone,
    /// Stamp every record with the writer's process id.
    #[serde(default = "default_true")]
    pub include_process_id: bool,
}

/// Time zone for the `YYYY-MM-DD HH:MM:SS` timestamp. Sub-second precision
/// is always discarded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogTimeZone {
    #[default]
    Local,
    Utc,
}

impl std::str::FromStr for LogTimeZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(LogTimeZone::Local),
            "utc" => Ok(LogTimeZone::Utc),
            other => Err(format!("unknown time zone '{other}' (expected 'local' or 'utc')")),
        }
    }
}

// ── Defaults ──────────────────────────────────────────────────

fn default_output() -> String { "-".into() }
fn default_true() -> bool { true }

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            time_zone: LogTimeZone::Local,
            include_process_id: true,
        }
    }
}

impl Config {
    /// Load configuration from YAML file + env overrides.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("ACCESSLOG_").split("__"))
            .extract()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_access_log_config_writes_to_stdout() {
        let cfg = AccessLogConfig::default();
        assert_eq!(cfg.output, "-");
        assert_eq!(cfg.time_zone, LogTimeZone::Local);
        assert!(cfg.include_process_id);
    }

    #[test]
    fn time_zone_serializes_to_lowercase() {
        assert_eq!(serde_json::to_string(&LogTimeZone::Utc).unwrap(), "\"utc\"");
        assert_eq!(serde_json::to_string(&LogTimeZone::Local).unwrap(), "\"local\"");
    }

    #[test]
    fn time_zone_parses_case_insensitively() {
        assert_eq!("UTC".parse::<LogTimeZone>().unwrap(), LogTimeZone::Utc);
        assert_eq!("local".parse::<LogTimeZone>().unwrap(), LogTimeZone::Local);
        assert!("mars".parse::<LogTimeZone>().is_err());
    }

    // Every load runs inside a figment Jail: it serializes tests that touch
    // ACCESSLOG_ env vars and gives each one a scratch working directory.

    #[test]
    fn load_from_valid_yaml_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "accesslog.yaml",
                "access_log:\n  output: \"/var/log/app/access.log\"\n  time_zone: utc\n",
            )?;
            let cfg = Config::load(Path::new("accesslog.yaml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.access_log.output, "/var/log/app/access.log");
            assert_eq!(cfg.access_log.time_zone, LogTimeZone::Utc);
            // Defaults still apply for unspecified fields
            assert!(cfg.access_log.include_process_id);
            Ok(())
        });
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        figment::Jail::expect_with(|_jail| {
            // Figment treats a missing file as an empty source.
            let cfg = Config::load(Path::new("missing.yaml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.access_log.output, "-");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_apply_without_config_file() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ACCESSLOG_ACCESS_LOG__OUTPUT", "/tmp/accesslog/out.log");
            jail.set_env("ACCESSLOG_ACCESS_LOG__TIME_ZONE", "utc");
            let cfg = Config::load(Path::new("missing.yaml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.access_log.output, "/tmp/accesslog/out.log");
            assert_eq!(cfg.access_log.time_zone, LogTimeZone::Utc);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_take_precedence_over_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("accesslog.yaml", "access_log:\n  output: from-file.log\n")?;
            jail.set_env("ACCESSLOG_ACCESS_LOG__OUTPUT", "from-env.log");
            let cfg = Config::load(Path::new("accesslog.yaml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.access_log.output, "from-env.log");
            Ok(())
        });
    }

    #[test]
    fn load_rejects_unknown_time_zone() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("accesslog.yaml", "access_log:\n  time_zone: moon\n")?;
            assert!(Config::load(Path::new("accesslog.yaml")).is_err());
            Ok(())
        });
    }
}
