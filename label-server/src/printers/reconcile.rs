//! Startup reconciliation of the three printer-identity tiers
//!
//! Precedence is fixed: backend beats cache beats first-discovered.
//! The function is pure; the identity store applies the heal writes
//! it asks for.

use shared::PrinterIdentity;

/// Which tier supplied the session identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileSource {
    Backend,
    Cache,
    Discovered,
    Unset,
}

/// Result of reconciling the tiers, including the heal writes the
/// caller must perform to bring the losing tiers back in line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    pub identity: Option<PrinterIdentity>,
    pub source: ReconcileSource,
    /// Overwrite the cache tier with the resolved identity.
    pub heal_cache: bool,
    /// Persist the resolved identity to the backend tier.
    pub heal_backend: bool,
}

/// Resolve the session identity from the tier snapshots.
///
/// A discovery default is adopted but never persisted here; it only
/// reaches the durable tiers once the user confirms a selection.
pub fn reconcile(
    backend: Option<PrinterIdentity>,
    cache: Option<PrinterIdentity>,
    discovered: &[String],
) -> ReconcileOutcome {
    if let Some(identity) = backend {
        let heal_cache = cache.as_ref() != Some(&identity);
        return ReconcileOutcome {
            identity: Some(identity),
            source: ReconcileSource::Backend,
            heal_cache,
            heal_backend: false,
        };
    }

    if let Some(identity) = cache {
        return ReconcileOutcome {
            identity: Some(identity),
            source: ReconcileSource::Cache,
            heal_cache: false,
            heal_backend: true,
        };
    }

    if let Some(first) = discovered.first() {
        return ReconcileOutcome {
            identity: Some(PrinterIdentity::new(first)),
            source: ReconcileSource::Discovered,
            heal_cache: false,
            heal_backend: false,
        };
    }

    ReconcileOutcome {
        identity: None,
        source: ReconcileSource::Unset,
        heal_cache: false,
        heal_backend: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_beats_stale_cache() {
        let backend = PrinterIdentity::new("HP-Thermal");
        let cache = PrinterIdentity::new("Argox-OS2140");

        let outcome = reconcile(Some(backend.clone()), Some(cache), &[]);

        assert_eq!(outcome.identity, Some(backend));
        assert_eq!(outcome.source, ReconcileSource::Backend);
        assert!(outcome.heal_cache);
        assert!(!outcome.heal_backend);
    }

    #[test]
    fn test_matching_cache_needs_no_heal() {
        let identity = PrinterIdentity::new("HP-Thermal");

        let outcome = reconcile(Some(identity.clone()), Some(identity), &[]);

        assert!(!outcome.heal_cache);
    }

    #[test]
    fn test_cache_heals_backend() {
        let cache = PrinterIdentity::new("Argox-OS2140");

        let outcome = reconcile(None, Some(cache.clone()), &["HP-Thermal".to_string()]);

        assert_eq!(outcome.identity, Some(cache));
        assert_eq!(outcome.source, ReconcileSource::Cache);
        assert!(outcome.heal_backend);
        assert!(!outcome.heal_cache);
    }

    #[test]
    fn test_discovery_default_not_persisted() {
        let outcome = reconcile(None, None, &["HP-Thermal".to_string(), "Other".to_string()]);

        assert_eq!(outcome.identity, Some(PrinterIdentity::new("HP-Thermal")));
        assert_eq!(outcome.source, ReconcileSource::Discovered);
        assert!(!outcome.heal_cache);
        assert!(!outcome.heal_backend);
    }

    #[test]
    fn test_all_tiers_empty_is_unset() {
        let outcome = reconcile(None, None, &[]);

        assert_eq!(outcome.identity, None);
        assert_eq!(outcome.source, ReconcileSource::Unset);
    }
}
