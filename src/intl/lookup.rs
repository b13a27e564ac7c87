// CLASSIFICATION: COMMUNITY
// Filename: lookup.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Localized string lookup with a built-in English fallback.

use crate::intl::message_ids::MessageId;
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Locale used when nothing else is configured.
pub const FALLBACK_LOCALE: &str = "en";

/// Text direction of the active locale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Ltr,
    Rtl,
}

/// Localization service borrowed by every stage.
pub trait Lookup {
    fn locale(&self) -> &str;
    fn layout(&self) -> Layout;
    /// Text for `id`. Never fails; untranslated ids yield English.
    fn string(&self, id: MessageId) -> &str;
}

/// Localized text for `id`.
pub fn l18n(lookup: &dyn Lookup, id: MessageId) -> String {
    lookup.string(id).to_string()
}

/// Localized text for `id` with `{N}` replaced by `args[N]`.
pub fn l18n_fmt(lookup: &dyn Lookup, id: MessageId, args: &[&str]) -> String {
    format_positional(lookup.string(id), args)
}

/// Substitute `{N}` placeholders. Unknown indices are left verbatim.
pub fn format_positional(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let replaced = tail.find('}').and_then(|close| {
            let index: usize = tail[1..close].parse().ok()?;
            args.get(index).map(|arg| (*arg, close))
        });
        match replaced {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Errors reading a message catalog.
#[derive(Debug, Error)]
pub enum IntlError {
    #[error("can't read message catalog '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed message catalog '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown message '{key}' in catalog '{}'", path.display())]
    UnknownMessage { key: String, path: PathBuf },
}

#[derive(Deserialize)]
struct Catalog {
    #[serde(default)]
    layout: Layout,
    #[serde(default)]
    messages: HashMap<String, String>,
}

/// Lookup for one locale, English for anything the catalog lacks.
#[derive(Clone, Debug)]
pub struct LookupWithFallback {
    locale: String,
    layout: Layout,
    messages: HashMap<MessageId, String>,
}

impl LookupWithFallback {
    /// Lookup with built-in strings only.
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            layout: Layout::Ltr,
            messages: HashMap::new(),
        }
    }

    /// Overlay the best matching catalog from `dir` for `locale`.
    ///
    /// `ru_RU` tries `ru_RU.toml` then `ru.toml`. A missing catalog is not
    /// an error; a broken one is.
    pub fn from_catalog_dir(dir: &Path, locale: &str) -> Result<Self, IntlError> {
        for candidate in locale_candidates(locale) {
            let path = dir.join(format!("{candidate}.toml"));
            if !path.is_file() {
                continue;
            }
            let lookup = Self::from_catalog_file(&path, locale)?;
            info!("using message catalog '{}' for locale {locale}", path.display());
            return Ok(lookup);
        }
        debug!("no message catalog for {locale} in '{}'", dir.display());
        Ok(Self::new(locale))
    }

    fn from_catalog_file(path: &Path, locale: &str) -> Result<Self, IntlError> {
        let text = fs::read_to_string(path).map_err(|source| IntlError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: Catalog = toml::from_str(&text).map_err(|source| IntlError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let mut messages = HashMap::with_capacity(catalog.messages.len());
        for (key, text) in catalog.messages {
            let id = MessageId::from_key(&key).ok_or_else(|| IntlError::UnknownMessage {
                key: key.clone(),
                path: path.to_path_buf(),
            })?;
            messages.insert(id, text);
        }
        Ok(Self {
            locale: locale.to_string(),
            layout: catalog.layout,
            messages,
        })
    }
}

impl Lookup for LookupWithFallback {
    fn locale(&self) -> &str {
        &self.locale
    }

    fn layout(&self) -> Layout {
        self.layout
    }

    fn string(&self, id: MessageId) -> &str {
        self.messages
            .get(&id)
            .map(String::as_str)
            .unwrap_or_else(|| id.fallback())
    }
}

/// `ru_RU.UTF-8@latin` becomes `ru_RU`; `C` and `POSIX` become `en`.
pub fn normalize_locale(raw: &str) -> String {
    let base = raw.split(['.', '@']).next().unwrap_or_default().trim();
    match base {
        "" | "C" | "POSIX" => FALLBACK_LOCALE.to_string(),
        other => other.replace('-', "_"),
    }
}

/// Locale from `LC_ALL`, `LC_MESSAGES` or `LANG`, in that order.
pub fn detect_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .map(|value| normalize_locale(&value))
        .unwrap_or_else(|| FALLBACK_LOCALE.to_string())
}

fn locale_candidates(locale: &str) -> Vec<String> {
    let mut candidates = vec![locale.to_string()];
    if let Some((language, _)) = locale.split_once('_') {
        candidates.push(language.to_string());
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn positional_substitution() {
        assert_eq!(
            format_positional("Can't get '{0}' entry point from '{1}'.", &["KernelMain", "/a/b.so"]),
            "Can't get 'KernelMain' entry point from '/a/b.so'."
        );
        assert_eq!(format_positional("{1}{0}{1}", &["a", "b"]), "bab");
        assert_eq!(format_positional("{2} {x} {", &["a"]), "{2} {x} {");
    }

    #[test]
    fn fallback_is_english() {
        let lookup = LookupWithFallback::new("de");
        assert_eq!(
            l18n_fmt(&lookup, MessageId::AppErrorDialogTitle, &["Half-Life 2"]),
            "Half-Life 2 - Error"
        );
        assert_eq!(lookup.layout(), Layout::Ltr);
    }

    #[test]
    fn catalog_overrides_and_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("he.toml"),
            "layout = \"rtl\"\n[messages]\napp_error_dialog_title = \"{0} - שגיאה\"\n",
        )
        .unwrap();
        let lookup = LookupWithFallback::from_catalog_dir(dir.path(), "he_IL").unwrap();
        assert_eq!(lookup.locale(), "he_IL");
        assert_eq!(lookup.layout(), Layout::Rtl);
        assert_eq!(l18n_fmt(&lookup, MessageId::AppErrorDialogTitle, &["X"]), "X - שגיאה");
        assert_eq!(
            l18n(&lookup, MessageId::CantLoadBootManager),
            MessageId::CantLoadBootManager.fallback()
        );
    }

    #[test]
    fn missing_catalog_is_english_only() {
        let dir = tempfile::tempdir().unwrap();
        let lookup = LookupWithFallback::from_catalog_dir(dir.path(), "fr_FR").unwrap();
        assert_eq!(lookup.string(MessageId::BootmgrErrorDialogTitle), "Boot Manager - Error");
    }

    #[test]
    fn unknown_catalog_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en.toml"), "[messages]\nbogus = \"x\"\n").unwrap();
        let err = LookupWithFallback::from_catalog_dir(dir.path(), "en").unwrap_err();
        assert!(matches!(err, IntlError::UnknownMessage { ref key, .. } if key == "bogus"));
    }

    #[test]
    fn locale_normalization() {
        assert_eq!(normalize_locale("ru_RU.UTF-8"), "ru_RU");
        assert_eq!(normalize_locale("sr_RS@latin"), "sr_RS");
        assert_eq!(normalize_locale("en-US"), "en_US");
        assert_eq!(normalize_locale("C"), "en");
        assert_eq!(normalize_locale("POSIX"), "en");
    }

    #[test]
    #[serial]
    fn detect_prefers_lc_all() {
        let saved: Vec<_> = ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .map(|v| (*v, std::env::var(v).ok()))
            .collect();
        std::env::set_var("LC_ALL", "pt_BR.UTF-8");
        std::env::set_var("LANG", "de_DE.UTF-8");
        assert_eq!(detect_locale(), "pt_BR");
        std::env::remove_var("LC_ALL");
        std::env::remove_var("LC_MESSAGES");
        assert_eq!(detect_locale(), "de_DE");
        for (var, value) in saved {
            match value {
                Some(v) => std::env::set_var(var, v),
                None => std::env::remove_var(var),
            }
        }
    }
}
