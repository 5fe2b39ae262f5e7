//! Classifier for server-managed property and option keys.
//!
//! The remote catalog attaches metadata keys to tables and views on its own
//! (delta format bookkeeping, view compilation context, clustering state).
//! Treating those keys as user-controlled would make every diff try to remove
//! them, so the statement builder and the diff engine both consult this
//! classifier: managed keys are never rendered into `TBLPROPERTIES`/`OPTIONS`
//! clauses and never counted as removed drift.

use std::collections::HashSet;

/// Keys the server sets automatically on delta tables and views.
const DEFAULT_MANAGED_KEYS: &[&str] = &[
    // Set when the table uses cluster keys.
    "clusteringColumns",
    "delta.lastCommitTimestamp",
    "delta.lastUpdateVersion",
    "delta.minReaderVersion",
    "delta.minWriterVersion",
    "delta.columnMapping.maxColumnId",
    "delta.enableDeletionVectors",
    "delta.enableRowTracking",
    "delta.feature.clustering",
    "delta.feature.changeDataFeed",
    "delta.feature.deletionVectors",
    "delta.feature.domainMetadata",
    "delta.feature.liquid",
    "delta.feature.rowTracking",
    "delta.feature.v2Checkpoint",
    "delta.feature.timestampNtz",
    "delta.liquid.clusteringColumns",
    "delta.rowTracking.materializedRowCommitVersionColumnName",
    "delta.rowTracking.materializedRowIdColumnName",
    "delta.checkpoint.writeStatsAsJson",
    "delta.checkpoint.writeStatsAsStruct",
    "delta.checkpointPolicy",
    "view.catalogAndNamespace.numParts",
    "view.catalogAndNamespace.part.0",
    "view.catalogAndNamespace.part.1",
    "view.query.out.col.0",
    "view.query.out.numCols",
    "view.referredTempFunctionsNames",
    "view.referredTempViewNames",
    "view.sqlConfig.spark.sql.hive.convertCTAS",
    "view.sqlConfig.spark.sql.legacy.createHiveTableByDefault",
    "view.sqlConfig.spark.sql.parquet.compression.codec",
    "view.sqlConfig.spark.sql.session.timeZone",
    "view.sqlConfig.spark.sql.sources.commitProtocolClass",
    "view.sqlConfig.spark.sql.sources.default",
    "view.sqlConfig.spark.sql.streaming.stopTimeout",
];

/// Set-membership classifier over property/option keys.
///
/// The default value carries the known server-managed keys; callers can extend
/// the set without touching diff logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedProperties {
    keys: HashSet<String>,
}

impl Default for ManagedProperties {
    fn default() -> Self {
        Self {
            keys: DEFAULT_MANAGED_KEYS.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

impl ManagedProperties {
    /// Creates a classifier with the default managed-key set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty classifier (no key is considered managed).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    /// Adds a key to the managed set.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.keys.insert(key.into());
        self
    }

    /// Returns true if the key is server-managed.
    #[must_use]
    pub fn is_managed(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys_are_managed() {
        let managed = ManagedProperties::new();
        assert!(managed.is_managed("delta.minReaderVersion"));
        assert!(managed.is_managed("clusteringColumns"));
        assert!(managed.is_managed("view.query.out.numCols"));
    }

    #[test]
    fn test_user_keys_are_not_managed() {
        let managed = ManagedProperties::new();
        assert!(!managed.is_managed("delta.appendOnly"));
        assert!(!managed.is_managed("owner.team"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let managed = ManagedProperties::new();
        assert!(!managed.is_managed("Delta.minReaderVersion"));
    }

    #[test]
    fn test_with_key_extends_the_set() {
        let managed = ManagedProperties::new().with_key("x.internal");
        assert!(managed.is_managed("x.internal"));
    }

    #[test]
    fn test_empty_classifier() {
        let managed = ManagedProperties::empty();
        assert!(!managed.is_managed("delta.minReaderVersion"));
    }
}
