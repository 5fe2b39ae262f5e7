//! Statement builder.
//!
//! Pure functions from a [`TableDescription`] to full DDL statement text.
//! Clause order is fixed; each present clause starts on its own line except
//! the column list, which is concatenated directly after the CREATE clause.

use std::collections::BTreeMap;

use crate::format::escape_literal;
use crate::managed::ManagedProperties;
use crate::schema::{ColumnDescription, TableDescription, TableKind};

/// Serializes one column definition fragment.
///
/// Renders `` `name` type[ NOT NULL][ COMMENT '...'] ``.
pub(crate) fn serialize_column(col: &ColumnDescription) -> String {
    let not_null = if col.nullable { "" } else { " NOT NULL" };
    let comment = if col.comment.is_empty() {
        String::new()
    } else {
        format!(" COMMENT '{}'", escape_literal(&col.comment))
    };
    format!("{} {}{}{}", col.quoted_name(), col.type_text, not_null, comment)
}

fn serialize_columns(columns: &[ColumnDescription]) -> String {
    columns
        .iter()
        .map(serialize_column)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Serializes non-managed key/value pairs as `'k'='v', ...`.
///
/// Managed keys are excluded; the server re-asserts those on its own.
pub(crate) fn serialize_pairs(map: &BTreeMap<String, String>, managed: &ManagedProperties) -> String {
    map.iter()
        .filter(|(key, _)| !managed.is_managed(key))
        .map(|(key, value)| format!("'{}'='{}'", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the `LOCATION '...'[ WITH (CREDENTIAL `...`)]` clause.
///
/// Shared between table creation and the diff engine's `SET LOCATION`.
#[must_use]
pub fn location_clause(table: &TableDescription) -> String {
    let mut clause = format!("LOCATION '{}'", table.storage_location);
    if !table.storage_credential_name.is_empty() {
        clause.push_str(&format!(
            " WITH (CREDENTIAL `{}`)",
            table.storage_credential_name
        ));
    }
    clause
}

/// Builds the full `CREATE` statement for the desired description.
///
/// Pure and total over well-formed input; never fails.
#[must_use]
pub fn build_create_statement(table: &TableDescription, managed: &ManagedProperties) -> String {
    let mut fragments: Vec<String> = Vec::with_capacity(10);
    let is_view = table.kind.is_view();

    let external = if table.kind == TableKind::External {
        "EXTERNAL "
    } else {
        ""
    };
    fragments.push(format!(
        "CREATE {}{} {}",
        external,
        table.kind.ddl_keyword(),
        table.sql_full_name()
    ));

    if !table.columns.is_empty() {
        fragments.push(format!(" ({})", serialize_columns(&table.columns)));
    }

    if !is_view && !table.data_source_format.is_empty() {
        fragments.push(format!("\nUSING {}", table.data_source_format));
    }

    if !table.partitions.is_empty() {
        fragments.push(format!("\nPARTITIONED BY ({})", table.partitions.join(", ")));
    }

    if !table.cluster_keys.is_empty() {
        fragments.push(format!("\nCLUSTER BY ({})", table.cluster_keys.join(", ")));
    }

    if !table.comment.is_empty() {
        fragments.push(format!("\nCOMMENT '{}'", escape_literal(&table.comment)));
    }

    let properties = serialize_pairs(&table.properties, managed);
    if !properties.is_empty() {
        fragments.push(format!("\nTBLPROPERTIES ({})", properties));
    }

    let options = serialize_pairs(&table.options, managed);
    if !options.is_empty() {
        fragments.push(format!("\nOPTIONS ({})", options));
    }

    if is_view {
        fragments.push(format!("\nAS {}", table.view_definition));
    } else if !table.storage_location.is_empty() {
        fragments.push(format!("\n{}", location_clause(table)));
    }

    fragments.push(";".to_string());
    fragments.concat()
}

/// Builds the `DROP {TABLE|VIEW}` statement.
#[must_use]
pub fn build_drop_statement(table: &TableDescription) -> String {
    format!("DROP {} {}", table.kind.ddl_keyword(), table.sql_full_name())
}
