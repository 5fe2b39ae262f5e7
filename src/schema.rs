//! Entity model for catalog objects.
//!
//! These types describe the desired or observed state of one table or view.
//! They are pure value objects: constructed fresh from configuration on every
//! create/update/delete, fetched read-only from the remote catalog before an
//! update diff, and never holding any execution handle themselves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format::quote_ident;

/// Kind of catalog object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableKind {
    /// Managed table; the catalog owns the storage.
    #[default]
    Managed,
    /// External table backed by a caller-provided location.
    External,
    /// View defined by a query.
    View,
}

impl TableKind {
    /// Returns the keyword used in ALTER/COMMENT/DROP statements.
    #[must_use]
    pub fn ddl_keyword(&self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::Managed | Self::External => "TABLE",
        }
    }

    /// Returns true for views.
    #[must_use]
    pub fn is_view(&self) -> bool {
        matches!(self, Self::View)
    }
}

fn default_true() -> bool {
    true
}

/// One column of a [`TableDescription`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescription {
    /// Column name, unique within the owning table (case-sensitive).
    pub name: String,
    /// SQL type token (free-form; compared normalized, see `validate`).
    #[serde(alias = "type")]
    pub type_text: String,
    /// Whether the column allows NULL values.
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Free-text comment.
    #[serde(default)]
    pub comment: String,
}

impl ColumnDescription {
    /// Creates a nullable column with no comment.
    #[must_use]
    pub fn new(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
            nullable: true,
            comment: String::new(),
        }
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the column comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Returns the backtick-quoted column name.
    #[must_use]
    pub fn quoted_name(&self) -> String {
        quote_ident(&self.name)
    }
}

/// Desired or observed state of one catalog table or view.
///
/// Invariants: `partitions` and `cluster_keys` are never both non-empty;
/// tables use `storage_location`, views use `view_definition`; column order is
/// significant and defines physical column order; property and option keys
/// are case-sensitive and unique (`options` are write-once at creation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescription {
    /// Catalog segment of the fully-qualified name.
    pub catalog_name: String,
    /// Schema segment of the fully-qualified name.
    pub schema_name: String,
    /// Object name.
    pub name: String,
    /// Object kind.
    #[serde(default)]
    pub kind: TableKind,
    /// Storage format identifier (e.g. `DELTA`, `CSV`); empty for views.
    #[serde(default)]
    pub data_source_format: String,
    /// Ordered column definitions.
    #[serde(default)]
    pub columns: Vec<ColumnDescription>,
    /// Partition column names (mutually exclusive with `cluster_keys`).
    #[serde(default)]
    pub partitions: Vec<String>,
    /// Clustering column names (mutually exclusive with `partitions`).
    #[serde(default)]
    pub cluster_keys: Vec<String>,
    /// Storage location URI (tables only).
    #[serde(default)]
    pub storage_location: String,
    /// Storage credential name for the location.
    #[serde(default)]
    pub storage_credential_name: String,
    /// View query text (views only).
    #[serde(default)]
    pub view_definition: String,
    /// Free-text comment.
    #[serde(default)]
    pub comment: String,
    /// User-visible key/value properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Key/value options, write-once at creation.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    /// Owner principal, pushed to the catalog after create/update; never
    /// rendered into DDL.
    #[serde(default)]
    pub owner: String,
}

impl TableDescription {
    /// Creates a description with the given qualified name and kind.
    #[must_use]
    pub fn new(
        catalog_name: impl Into<String>,
        schema_name: impl Into<String>,
        name: impl Into<String>,
        kind: TableKind,
    ) -> Self {
        Self {
            catalog_name: catalog_name.into(),
            schema_name: schema_name.into(),
            name: name.into(),
            kind,
            data_source_format: String::new(),
            columns: Vec::new(),
            partitions: Vec::new(),
            cluster_keys: Vec::new(),
            storage_location: String::new(),
            storage_credential_name: String::new(),
            view_definition: String::new(),
            comment: String::new(),
            properties: BTreeMap::new(),
            options: BTreeMap::new(),
            owner: String::new(),
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDescription) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets the storage format.
    #[must_use]
    pub fn data_source_format(mut self, format: impl Into<String>) -> Self {
        self.data_source_format = format.into();
        self
    }

    /// Sets the partition column names.
    #[must_use]
    pub fn partitions(mut self, partitions: Vec<String>) -> Self {
        self.partitions = partitions;
        self
    }

    /// Sets the clustering column names.
    #[must_use]
    pub fn cluster_keys(mut self, cluster_keys: Vec<String>) -> Self {
        self.cluster_keys = cluster_keys;
        self
    }

    /// Sets the storage location URI.
    #[must_use]
    pub fn storage_location(mut self, uri: impl Into<String>) -> Self {
        self.storage_location = uri.into();
        self
    }

    /// Sets the storage credential name.
    #[must_use]
    pub fn storage_credential(mut self, name: impl Into<String>) -> Self {
        self.storage_credential_name = name.into();
        self
    }

    /// Sets the view query text.
    #[must_use]
    pub fn view_definition(mut self, query: impl Into<String>) -> Self {
        self.view_definition = query.into();
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Sets one property.
    #[must_use]
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Sets one option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Sets the owner principal.
    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Dot-joined unquoted name, used as the object's canonical identity.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}.{}", self.catalog_name, self.schema_name, self.name)
    }

    /// Fully-qualified name with each segment backtick-quoted, for SQL text.
    #[must_use]
    pub fn sql_full_name(&self) -> String {
        format!(
            "{}.{}.{}",
            quote_ident(&self.catalog_name),
            quote_ident(&self.schema_name),
            quote_ident(&self.name)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_builder() {
        let col = ColumnDescription::new("id", "bigint").not_null().comment("pk");
        assert_eq!(col.name, "id");
        assert_eq!(col.type_text, "bigint");
        assert!(!col.nullable);
        assert_eq!(col.comment, "pk");
    }

    #[test]
    fn test_columns_are_nullable_by_default() {
        assert!(ColumnDescription::new("age", "int").nullable);
    }

    #[test]
    fn test_full_names() {
        let table = TableDescription::new("main", "sales", "orders", TableKind::Managed);
        assert_eq!(table.full_name(), "main.sales.orders");
        assert_eq!(table.sql_full_name(), "`main`.`sales`.`orders`");
    }

    #[test]
    fn test_kind_keywords() {
        assert_eq!(TableKind::Managed.ddl_keyword(), "TABLE");
        assert_eq!(TableKind::External.ddl_keyword(), "TABLE");
        assert_eq!(TableKind::View.ddl_keyword(), "VIEW");
    }

    #[test]
    fn test_deserialize_sparse_json() {
        let table: TableDescription = serde_json::from_str(
            r#"{
                "catalog_name": "main",
                "schema_name": "sales",
                "name": "orders",
                "kind": "EXTERNAL",
                "columns": [{"name": "id", "type": "bigint", "nullable": false}]
            }"#,
        )
        .unwrap();

        assert_eq!(table.kind, TableKind::External);
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].type_text, "bigint");
        assert!(!table.columns[0].nullable);
        assert!(table.properties.is_empty());
        assert!(table.owner.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let table = TableDescription::new("main", "sales", "orders", TableKind::Managed)
            .column(ColumnDescription::new("id", "bigint").not_null())
            .data_source_format("DELTA")
            .property("delta.appendOnly", "true")
            .owner("data-eng");

        let json = serde_json::to_string(&table).unwrap();
        let back: TableDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
