// CLASSIFICATION: COMMUNITY
// Filename: config.rs v0.4
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Launcher command line flags and the optional TOML configuration file.
//!
//! Precedence is command line, then config file, then `WHITEBOX_*`
//! environment variables, then built-in defaults.

use clap::Parser;
use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Flag that disables signed module target enforcement.
pub const INSECURE_ALLOW_UNSIGNED_MODULE_TARGET: &str = "--insecure-allow-unsigned-module-target";

/// Command line accepted by the launcher.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "whitebox", about = "WhiteBox app launcher", version)]
pub struct LauncherFlags {
    /// Insecure. Allow to load NOT SIGNED module targets. There is no
    /// guarantee unsigned module doing nothing harmful. Use at your own
    /// risk, ex. for debugging or mods.
    #[arg(long = "insecure-allow-unsigned-module-target")]
    pub insecure_allow_unsigned_module_target: bool,
    /// Log filter, e.g. `info` or `whitebox=debug`.
    #[arg(long)]
    pub log_level: Option<String>,
    /// Append logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// UI locale, e.g. `ru_RU`.
    #[arg(long)]
    pub locale: Option<String>,
    /// TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Flags forwarded untouched to the boot manager and kernel.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub positional_flags: Vec<String>,
}

impl LauncherFlags {
    /// Parse `args` (including argv[0]), after debug build overrides.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args = with_debug_overrides(args.into_iter().map(Into::into).collect());
        Self::try_parse_from(args)
    }
}

/// Debug builds never require signed targets, so local builds just run.
pub fn with_debug_overrides(mut args: Vec<OsString>) -> Vec<OsString> {
    if cfg!(debug_assertions) && !args.iter().any(|a| a == INSECURE_ALLOW_UNSIGNED_MODULE_TARGET) {
        // Must precede any trailing positional flags to be parsed as ours.
        let at = args.len().min(1);
        args.insert(at, INSECURE_ALLOW_UNSIGNED_MODULE_TARGET.into());
    }
    args
}

/// Errors produced while assembling the launcher configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("can't parse command line flags")]
    Flags(#[source] clap::Error),
    #[error("can't read config '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("WHITEBOX_LOG").unwrap_or_else(|_| "info".into()),
            file: std::env::var("WHITEBOX_LOG_FILE").ok().map(PathBuf::from),
        }
    }
}

/// Localization settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IntlConfig {
    pub locale: Option<String>,
    pub catalog_dir: Option<PathBuf>,
}

impl Default for IntlConfig {
    fn default() -> Self {
        Self {
            locale: std::env::var("WHITEBOX_LOCALE").ok(),
            catalog_dir: None,
        }
    }
}

/// Full launcher configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    pub log: LogConfig,
    pub intl: IntlConfig,
}

impl BootConfig {
    /// Read a TOML config file; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config file named by `flags` (if any) with flag overrides applied.
    pub fn resolve(flags: &LauncherFlags) -> Result<Self, ConfigError> {
        let mut config = match &flags.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_flags(flags);
        Ok(config)
    }

    pub fn apply_flags(&mut self, flags: &LauncherFlags) {
        if let Some(level) = &flags.log_level {
            self.log.level = level.clone();
        }
        if let Some(file) = &flags.log_file {
            self.log.file = Some(file.clone());
        }
        if let Some(locale) = &flags.locale {
            self.intl.locale = Some(locale.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn positional_flags_are_forwarded() {
        let flags =
            LauncherFlags::try_parse_args(["whitebox", "--locale", "ru", "--", "-novid", "+map", "d1"])
                .unwrap();
        assert_eq!(flags.locale.as_deref(), Some("ru"));
        assert_eq!(flags.positional_flags, vec!["-novid", "+map", "d1"]);
    }

    #[test]
    fn insecure_flag_is_parsed() {
        let flags =
            LauncherFlags::try_parse_args(["whitebox", INSECURE_ALLOW_UNSIGNED_MODULE_TARGET]).unwrap();
        assert!(flags.insecure_allow_unsigned_module_target);
    }

    #[test]
    fn debug_override_is_not_duplicated() {
        let args: Vec<OsString> = vec!["whitebox".into(), INSECURE_ALLOW_UNSIGNED_MODULE_TARGET.into()];
        let out = with_debug_overrides(args.clone());
        assert_eq!(out, args);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn debug_builds_append_insecure_flag() {
        let flags = LauncherFlags::try_parse_args(["whitebox"]).unwrap();
        assert!(flags.insecure_allow_unsigned_module_target);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn release_builds_require_signed_targets() {
        let flags = LauncherFlags::try_parse_args(["whitebox"]).unwrap();
        assert!(!flags.insecure_allow_unsigned_module_target);
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(LauncherFlags::try_parse_args(["whitebox", "--no-such-flag"]).is_err());
    }

    #[test]
    #[serial]
    fn file_overrides_env_and_flags_override_file() {
        std::env::set_var("WHITEBOX_LOG", "warn");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whitebox.toml");
        fs::write(&path, "[log]\nlevel = \"debug\"\n[intl]\nlocale = \"de\"\n").unwrap();

        let flags = LauncherFlags {
            config: Some(path),
            locale: Some("fr".into()),
            ..Default::default()
        };
        let config = BootConfig::resolve(&flags).unwrap();
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.intl.locale.as_deref(), Some("fr"));

        let defaults = BootConfig::resolve(&LauncherFlags::default()).unwrap();
        assert_eq!(defaults.log.level, "warn");
        std::env::remove_var("WHITEBOX_LOG");
    }

    #[test]
    #[serial]
    fn partial_file_tables_keep_env_values() {
        std::env::set_var("WHITEBOX_LOCALE", "de_DE");
        std::env::set_var("WHITEBOX_LOG", "warn");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whitebox.toml");
        fs::write(&path, "[log]\nfile = \"whitebox.log\"\n[intl]\ncatalog_dir = \"locales\"\n").unwrap();

        let config = BootConfig::load(&path).unwrap();
        assert_eq!(config.intl.locale.as_deref(), Some("de_DE"));
        assert_eq!(config.intl.catalog_dir, Some(PathBuf::from("locales")));
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.file, Some(PathBuf::from("whitebox.log")));
        std::env::remove_var("WHITEBOX_LOCALE");
        std::env::remove_var("WHITEBOX_LOG");
    }

    #[test]
    fn malformed_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[log\nlevel=").unwrap();
        assert!(matches!(BootConfig::load(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            BootConfig::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
