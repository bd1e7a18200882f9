//! Factory configuration and the shared default locale

use std::env;
use std::sync::{Arc, LockResult, RwLock};

use itemkit_model::{Locale, ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Environment variable naming the initial default locale
pub const DEFAULT_LOCALE_ENV: &str = "ITEMKIT_DEFAULT_LOCALE";

/// Environment variable toggling purge of plain values shadowed by handlers
pub const PURGE_SHADOWED_ENV: &str = "ITEMKIT_PURGE_SHADOWED_ATTRIBUTES";

/// Configuration for factory behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryConfig {
    /// Locale used when a localized access omits one
    pub default_locale: Locale,
    /// Whether registering a dynamic handler drops a plain attribute stored
    /// under the same key
    pub purge_shadowed_attributes: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::english(),
            purge_shadowed_attributes: true,
        }
    }
}

impl FactoryConfig {
    /// Create configuration for unit tests
    ///
    /// Pinned to English with shadowed values purged, whatever the
    /// environment says, so fixtures behave the same on every machine.
    pub fn testing() -> Self {
        Self {
            default_locale: Locale::english(),
            purge_shadowed_attributes: true,
        }
    }

    /// Create configuration for tests that need a specific default locale
    pub fn with_default_locale(locale: Locale) -> Self {
        Self {
            default_locale: locale,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> ModelResult<Self> {
        let mut config = Self::default();

        if let Ok(code) = env::var(DEFAULT_LOCALE_ENV) {
            config.default_locale = Locale::parse(&code).map_err(|_| ModelError::Configuration {
                message: format!("{} is not a valid locale: '{}'", DEFAULT_LOCALE_ENV, code),
            })?;
        }

        if let Ok(flag) = env::var(PURGE_SHADOWED_ENV) {
            config.purge_shadowed_attributes =
                parse_bool(&flag).ok_or_else(|| ModelError::Configuration {
                    message: format!(
                        "{} must be true or false, got '{}'",
                        PURGE_SHADOWED_ENV, flag
                    ),
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ModelResult<()> {
        if self.default_locale.language().is_empty() {
            return Err(ModelError::Configuration {
                message: format!(
                    "default locale '{}' must name a language",
                    self.default_locale
                ),
            });
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Default locale shared by a factory and every context it creates
///
/// Cloning the handle shares the value; a change made through the factory is
/// seen by the instances it already built.
#[derive(Debug, Clone)]
pub struct DefaultLocale {
    current: Arc<RwLock<Locale>>,
    initial: Locale,
}

impl DefaultLocale {
    pub fn new(initial: Locale) -> Self {
        Self {
            current: Arc::new(RwLock::new(initial.clone())),
            initial,
        }
    }

    pub fn get(&self) -> Locale {
        recover(self.current.read()).clone()
    }

    pub fn set(&self, locale: Locale) {
        *recover(self.current.write()) = locale;
    }

    /// Restore the locale this handle was created with
    pub fn reset(&self) {
        self.set(self.initial.clone());
    }
}

impl Default for DefaultLocale {
    fn default() -> Self {
        Self::new(Locale::english())
    }
}

/// Take the guard out of a poisoned lock
///
/// Guarded values here are plain data that a panicking writer cannot leave
/// half-updated.
pub(crate) fn recover<G>(result: LockResult<G>) -> G {
    result.unwrap_or_else(|poisoned| {
        tracing::warn!("Recovered poisoned lock in item model factory");
        poisoned.into_inner()
    })
}
