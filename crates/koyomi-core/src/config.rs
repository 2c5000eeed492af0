use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::error::CoreResult;
use crate::registry;
use crate::settings::{self, LocalizationOverride};

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizationConfig {
    pub locale: String,
    pub timezone: String,
}

/// Startup configuration for the date-creation defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct KoyomiConfig {
    pub localization: LocalizationConfig,
    pub system_timezone: String,
    pub use_service_timezone_by_default: bool,
}

impl KoyomiConfig {
    /// ## Summary
    /// Loads configuration from `koyomi.toml` and environment variables
    /// (prefix `KOYOMI`, `__` separator) into a `KoyomiConfig`. File values
    /// take precedence over environment variables; both are optional and
    /// fall back to the built-in defaults (`en` / `GMT`, flag off).
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it
    /// fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("localization.locale", "en")?
            .set_default("localization.timezone", "GMT")?
            .set_default("system_timezone", "GMT")?
            .set_default("use_service_timezone_by_default", false)?
            // Environment
            .add_source(
                config::Environment::with_prefix("KOYOMI")
                    .convert_case(config::Case::Snake)
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("koyomi.toml").required(false))
            .build()?
            .try_deserialize::<Self>()?)
    }

    /// ## Summary
    /// Installs this configuration into the process-wide settings. Timezone
    /// identifiers are validated (and their bindings cached) before any
    /// setting changes.
    ///
    /// ## Errors
    /// Returns `CoreError::UnknownZone` if either configured timezone is
    /// absent from the offset database; settings are left untouched.
    pub fn apply(&self) -> CoreResult<()> {
        registry::bind(&self.localization.timezone)?;
        settings::set_system_timezone(&self.system_timezone)?;
        settings::set_default_localization(
            &LocalizationOverride::default()
                .locale(&self.localization.locale)
                .timezone(&self.localization.timezone),
        );
        settings::set_use_service_timezone_by_default(self.use_service_timezone_by_default);
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables, `.env` file, and
/// `koyomi.toml`.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<KoyomiConfig> {
    dotenvy::dotenv().ok();

    KoyomiConfig::load()
}
