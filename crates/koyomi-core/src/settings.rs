//! Service settings: default localization, system timezone, and the
//! service-timezone-by-default flag.
//!
//! Defaults exist from process start (`en` / `GMT`, system timezone `GMT`,
//! flag off) and change only through the explicit setters here or through
//! [`crate::config`] at startup. Per-call overrides are merged over the
//! defaults by [`resolve`], per-call values always winning.

use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono_tz::Tz;

use crate::error::CoreResult;
use crate::registry;

/// A complete locale + timezone pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localization {
    pub locale: String,
    pub timezone: String,
}

/// Partial localization used for defaults updates and per-call overrides.
/// Absent fields leave the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizationOverride {
    pub locale: Option<String>,
    pub timezone: Option<String>,
}

impl LocalizationOverride {
    #[must_use]
    pub fn locale(mut self, locale: &str) -> Self {
        self.locale = Some(locale.to_owned());
        self
    }

    #[must_use]
    pub fn timezone(mut self, timezone: &str) -> Self {
        self.timezone = Some(timezone.to_owned());
        self
    }
}

/// Outcome of merging per-call values over the current defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocalization {
    pub locale: String,
    pub timezone: String,
    pub use_service: bool,
}

/// Process-wide defaults. A global instance backs the module-level
/// functions; the type itself is pure state so the merge logic can be
/// exercised without touching the global.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    default_localization: Localization,
    system_timezone: String,
    system_tz: Tz,
    use_service_timezone_by_default: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            default_localization: Localization {
                locale: "en".to_owned(),
                timezone: "GMT".to_owned(),
            },
            system_timezone: "GMT".to_owned(),
            system_tz: Tz::GMT,
            use_service_timezone_by_default: false,
        }
    }
}

impl ServiceSettings {
    /// Overwrites only the supplied fields of the default localization.
    pub fn apply_localization(&mut self, update: &LocalizationOverride) {
        if let Some(locale) = &update.locale {
            self.default_localization.locale.clone_from(locale);
        }
        if let Some(timezone) = &update.timezone {
            self.default_localization.timezone.clone_from(timezone);
        }
    }

    pub fn set_system(&mut self, zone: String, tz: Tz) {
        self.system_timezone = zone;
        self.system_tz = tz;
    }

    pub fn set_use_service_default(&mut self, flag: bool) {
        self.use_service_timezone_by_default = flag;
    }

    #[must_use]
    pub fn default_localization(&self) -> &Localization {
        &self.default_localization
    }

    #[must_use]
    pub fn system_timezone(&self) -> &str {
        &self.system_timezone
    }

    #[must_use]
    pub fn system_tz(&self) -> Tz {
        self.system_tz
    }

    #[must_use]
    pub fn use_service_timezone_by_default(&self) -> bool {
        self.use_service_timezone_by_default
    }

    /// Merges per-call values over the defaults.
    #[must_use]
    pub fn resolve(
        &self,
        overrides: &LocalizationOverride,
        use_service: Option<bool>,
    ) -> ResolvedLocalization {
        ResolvedLocalization {
            locale: overrides
                .locale
                .clone()
                .unwrap_or_else(|| self.default_localization.locale.clone()),
            timezone: overrides
                .timezone
                .clone()
                .unwrap_or_else(|| self.default_localization.timezone.clone()),
            use_service: use_service.unwrap_or(self.use_service_timezone_by_default),
        }
    }
}

static SETTINGS: LazyLock<RwLock<ServiceSettings>> =
    LazyLock::new(|| RwLock::new(ServiceSettings::default()));

fn read() -> RwLockReadGuard<'static, ServiceSettings> {
    SETTINGS.read().unwrap_or_else(PoisonError::into_inner)
}

fn write() -> RwLockWriteGuard<'static, ServiceSettings> {
    SETTINGS.write().unwrap_or_else(PoisonError::into_inner)
}

/// Overwrites only the supplied fields of the process-wide default
/// localization.
pub fn set_default_localization(update: &LocalizationOverride) {
    tracing::debug!(?update, "updating default localization");
    write().apply_localization(update);
}

/// ## Summary
/// Changes the zone used when no service-timezone interpretation is
/// requested. The identifier is validated (and its binding cached) through
/// the registry before the setting changes.
///
/// ## Errors
/// Returns `CoreError::UnknownZone` for an identifier absent from the
/// offset database; the previous system timezone is left in place.
pub fn set_system_timezone(zone: &str) -> CoreResult<()> {
    let binding = registry::bind(zone)?;
    tracing::debug!(zone, "updating system timezone");
    write().set_system(zone.to_owned(), binding.tz());
    Ok(())
}

/// Selects whether calls that omit an explicit choice parse under the
/// service timezone (true) or the system timezone (false).
pub fn set_use_service_timezone_by_default(flag: bool) {
    write().set_use_service_default(flag);
}

#[must_use]
pub fn system_timezone() -> String {
    read().system_timezone().to_owned()
}

#[must_use]
pub fn system_tz() -> Tz {
    read().system_tz()
}

#[must_use]
pub fn use_service_timezone_by_default() -> bool {
    read().use_service_timezone_by_default()
}

/// Merges per-call values over the current process-wide defaults.
#[must_use]
pub fn resolve(
    overrides: &LocalizationOverride,
    use_service: Option<bool>,
) -> ResolvedLocalization {
    read().resolve(overrides, use_service)
}
