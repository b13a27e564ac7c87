// CLASSIFICATION: COMMUNITY
// Filename: context.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Process-wide state established once at the start of the launcher.

use crate::boot::hardening::harden_process;
use crate::config::BootConfig;
use crate::intl::lookup::{detect_locale, normalize_locale, FALLBACK_LOCALE};
use crate::intl::LookupWithFallback;
use crate::telemetry::{init_logging, init_panic_hook};
use log::{info, warn};

/// Logging, hardening and localization for the life of the process.
///
/// Created first thing in `main` and dropped last; nothing here changes
/// after [`ProcessContext::init`] returns.
pub struct ProcessContext {
    config: BootConfig,
    lookup: LookupWithFallback,
}

impl ProcessContext {
    pub fn init(config: BootConfig) -> Self {
        init_logging(&config.log);
        init_panic_hook();
        info!(
            "{} {} starting",
            crate::boot::path::PRODUCT_NAME,
            crate::boot::path::PRODUCT_VERSION
        );

        harden_process();
        let lookup = create_intl(&config);
        Self { config, lookup }
    }

    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    pub fn lookup(&self) -> &LookupWithFallback {
        &self.lookup
    }
}

impl Drop for ProcessContext {
    fn drop(&mut self) {
        info!("process context shutting down");
        log::logger().flush();
    }
}

fn create_intl(config: &BootConfig) -> LookupWithFallback {
    let locale = config
        .intl
        .locale
        .as_deref()
        .map(normalize_locale)
        .unwrap_or_else(detect_locale);
    let Some(dir) = &config.intl.catalog_dir else {
        info!("using {locale} locale for UI");
        return LookupWithFallback::new(&locale);
    };
    match LookupWithFallback::from_catalog_dir(dir, &locale) {
        Ok(lookup) => {
            info!("using {locale} locale for UI");
            lookup
        }
        Err(e) => {
            warn!("unable to use {locale} locale for UI, fallback to '{FALLBACK_LOCALE}': {e}");
            LookupWithFallback::new(FALLBACK_LOCALE)
        }
    }
}
