//! Process-wide cache of timezone binding descriptors.
//!
//! Every distinct timezone identifier gets exactly one [`ZoneBinding`],
//! constructed on first use and kept for the life of the process. The set of
//! identifiers an application touches is small and bounded, so there is no
//! eviction.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{CoreError, CoreResult};

/// A timezone identifier resolved against the offset database.
///
/// Answers offset-at-instant queries for its zone. Obtained from
/// [`ZoneRegistry::bind`] (or the process-wide [`bind`]) and shared via
/// `Arc`, so two lookups of the same identifier hand back the same
/// descriptor.
#[derive(Debug)]
pub struct ZoneBinding {
    id: String,
    tz: Tz,
}

impl ZoneBinding {
    fn new(id: impl Into<String>, tz: Tz) -> Self {
        Self { id: id.into(), tz }
    }

    /// The identifier this binding was created from.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// ## Summary
    /// Returns the zone's offset from UTC at the given instant, in minutes,
    /// using the convention of the original interface: UTC minus local wall
    /// clock (Asia/Tokyo is `-540`, Pacific/Niue is `660`).
    ///
    /// The offset is a function of the instant, so historical rule changes
    /// and daylight saving transitions are reflected.
    #[must_use]
    pub fn offset_minutes_at(&self, epoch_ms: i64) -> i32 {
        let utc = DateTime::from_timestamp_millis(epoch_ms).unwrap_or(if epoch_ms < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });
        let seconds_east = self
            .tz
            .offset_from_utc_datetime(&utc.naive_utc())
            .fix()
            .local_minus_utc();
        -(seconds_east / 60)
    }
}

/// Cache of zone bindings keyed by timezone identifier.
///
/// Writes happen once per key; reads are concurrent. A process-wide instance
/// backs [`bind`], but the type can be constructed standalone (tests do).
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    bindings: RwLock<HashMap<String, Arc<ZoneBinding>>>,
}

impl ZoneRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Returns the cached binding for `zone`, constructing and caching it on
    /// first use.
    ///
    /// ## Errors
    /// Returns `CoreError::UnknownZone` if the identifier is not present in
    /// the offset database.
    pub fn bind(&self, zone: &str) -> CoreResult<Arc<ZoneBinding>> {
        if let Some(binding) = self.read().get(zone) {
            return Ok(Arc::clone(binding));
        }

        let tz = Tz::from_str(zone).map_err(|_e| CoreError::UnknownZone(zone.to_owned()))?;

        // Two threads may race to this point; the entry API keeps the first
        // descriptor and discards the loser's construction.
        let mut bindings = self.write();
        let binding = bindings.entry(zone.to_owned()).or_insert_with(|| {
            tracing::debug!(zone, "registered timezone binding");
            Arc::new(ZoneBinding::new(zone, tz))
        });
        Ok(Arc::clone(binding))
    }

    /// Whether a binding for `zone` has already been constructed.
    #[must_use]
    pub fn is_cached(&self, zone: &str) -> bool {
        self.read().contains_key(zone)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<ZoneBinding>>> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<ZoneBinding>>> {
        self.bindings.write().unwrap_or_else(PoisonError::into_inner)
    }
}

static GLOBAL: LazyLock<ZoneRegistry> = LazyLock::new(|| {
    let registry = ZoneRegistry::new();
    // GMT is the initial system timezone and must always resolve.
    registry.bind("GMT").ok();
    registry
});

/// The process-wide registry.
#[must_use]
pub fn global() -> &'static ZoneRegistry {
    &GLOBAL
}

/// ## Summary
/// Binds `zone` through the process-wide registry.
///
/// ## Errors
/// Returns `CoreError::UnknownZone` if the identifier is not present in the
/// offset database.
pub fn bind(zone: &str) -> CoreResult<Arc<ZoneBinding>> {
    GLOBAL.bind(zone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_caches_one_descriptor_per_zone() {
        let registry = ZoneRegistry::new();
        assert!(!registry.is_cached("Asia/Tokyo"));

        let first = registry.bind("Asia/Tokyo").expect("should resolve");
        let second = registry.bind("Asia/Tokyo").expect("should resolve from cache");

        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.is_cached("Asia/Tokyo"));
    }

    #[test]
    fn bind_rejects_unknown_zone() {
        let registry = ZoneRegistry::new();
        let err = registry.bind("Not/AZone").unwrap_err();
        assert!(matches!(err, CoreError::UnknownZone(zone) if zone == "Not/AZone"));
        assert!(!registry.is_cached("Not/AZone"));
    }

    #[test]
    fn offset_follows_source_sign_convention() {
        let registry = ZoneRegistry::new();
        let tokyo = registry.bind("Asia/Tokyo").expect("should resolve");
        let niue = registry.bind("Pacific/Niue").expect("should resolve");

        // 2024-06-15T00:00:00Z
        let epoch_ms = 1_718_409_600_000;
        assert_eq!(tokyo.offset_minutes_at(epoch_ms), -540);
        assert_eq!(niue.offset_minutes_at(epoch_ms), 660);
    }

    #[test]
    fn offset_varies_with_instant_across_dst() {
        let registry = ZoneRegistry::new();
        let new_york = registry.bind("America/New_York").expect("should resolve");

        // 2024-01-15T12:00:00Z, EST (UTC-5)
        assert_eq!(new_york.offset_minutes_at(1_705_320_000_000), 300);
        // 2024-07-15T12:00:00Z, EDT (UTC-4)
        assert_eq!(new_york.offset_minutes_at(1_721_044_800_000), 240);
    }

    #[test]
    fn global_registry_preseeds_gmt() {
        assert!(global().is_cached("GMT"));
        let gmt = bind("GMT").expect("GMT should always resolve");
        assert_eq!(gmt.offset_minutes_at(0), 0);
    }

    #[test]
    fn offset_saturates_outside_representable_range() {
        let registry = ZoneRegistry::new();
        let gmt = registry.bind("GMT").expect("should resolve");
        assert_eq!(gmt.offset_minutes_at(i64::MIN), 0);
        assert_eq!(gmt.offset_minutes_at(i64::MAX), 0);
    }
}
