//! Diff engine.
//!
//! Compares a desired [`TableDescription`] against the previously recorded
//! one and produces the ordered list of DDL statements expressing only the
//! necessary changes. Statement order is fixed: kind-specific attribute
//! changes, then common attributes, then column changes. The pre-flight
//! validators run first so no statement is ever produced for an unsupported
//! change.
//!
//! Column reconciliation dispatches on column count, not identity: equal
//! counts are compared positionally (rename/comment/nullability), unequal
//! counts by name-set membership (add/remove). A known limitation of this
//! policy is that simultaneous reordering and renaming in one apply is
//! indistinguishable from type-preserving content churn.

use std::collections::HashMap;

use crate::error::Result;
use crate::format::escape_literal;
use crate::managed::ManagedProperties;
use crate::schema::{ColumnDescription, TableDescription};
use crate::statement::{location_clause, serialize_column, serialize_pairs};
use crate::validate::{validate_no_mixed_membership_change, validate_no_type_change};

/// Computes the DDL statements that transform `previous` into `desired`.
///
/// Returns an empty list when the descriptions are equal. Options are
/// write-once at creation and are never diffed.
pub fn diff(
    desired: &TableDescription,
    previous: &TableDescription,
    managed: &ManagedProperties,
) -> Result<Vec<String>> {
    if desired.columns.len() == previous.columns.len() {
        validate_no_type_change(&desired.columns, &previous.columns)?;
    } else {
        validate_no_mixed_membership_change(&desired.columns, &previous.columns)?;
    }

    let mut statements: Vec<String> = Vec::new();
    let keyword = desired.kind.ddl_keyword();
    let name = desired.sql_full_name();

    if desired.kind.is_view() {
        if desired.view_definition != previous.view_definition {
            statements.push(format!(
                "ALTER VIEW {} AS {}",
                name, desired.view_definition
            ));
        }
    } else {
        if desired.storage_location != previous.storage_location {
            statements.push(format!(
                "ALTER TABLE {} SET {}",
                name,
                location_clause(desired)
            ));
        }
        if desired.cluster_keys != previous.cluster_keys {
            statements.push(format!(
                "ALTER TABLE {} CLUSTER BY ({})",
                name,
                desired.cluster_keys.join(", ")
            ));
        }
    }

    if desired.comment != previous.comment {
        statements.push(format!(
            "COMMENT ON {} {} IS '{}'",
            keyword,
            name,
            escape_literal(&desired.comment)
        ));
    }

    if desired.properties != previous.properties {
        // Managed keys the server attached remotely are not user-removable
        // drift; they never make it into the UNSET list.
        let removed: Vec<&str> = previous
            .properties
            .keys()
            .filter(|key| !desired.properties.contains_key(*key) && !managed.is_managed(key))
            .map(String::as_str)
            .collect();
        if !removed.is_empty() {
            statements.push(format!(
                "ALTER {} {} UNSET TBLPROPERTIES IF EXISTS ({})",
                keyword,
                name,
                removed.join(",")
            ));
        }
        // Re-assert the remaining desired properties even when the only
        // change was a removal.
        statements.push(format!(
            "ALTER {} {} SET TBLPROPERTIES ({})",
            keyword,
            name,
            serialize_pairs(&desired.properties, managed)
        ));
    }

    statements.extend(column_statements(desired, previous));

    Ok(statements)
}

fn column_statements(desired: &TableDescription, previous: &TableDescription) -> Vec<String> {
    if desired.columns.len() == previous.columns.len() {
        alter_existing_column_statements(desired, previous)
    } else {
        add_or_remove_column_statements(desired, previous)
    }
}

/// Add/remove path: name-set membership diff between the two column lists.
fn add_or_remove_column_statements(
    desired: &TableDescription,
    previous: &TableDescription,
) -> Vec<String> {
    let mut statements = Vec::new();
    let keyword = desired.kind.ddl_keyword();
    let name = desired.sql_full_name();

    let desired_names: HashMap<&str, &ColumnDescription> =
        desired.columns.iter().map(|c| (c.name.as_str(), c)).collect();
    let previous_names: HashMap<&str, &ColumnDescription> =
        previous.columns.iter().map(|c| (c.name.as_str(), c)).collect();

    let removed: Vec<String> = previous
        .columns
        .iter()
        .filter(|col| !desired_names.contains_key(col.name.as_str()))
        .map(ColumnDescription::quoted_name)
        .collect();
    if !removed.is_empty() {
        statements.push(format!(
            "ALTER {} {} DROP COLUMN IF EXISTS ({})",
            keyword,
            name,
            removed.join(", ")
        ));
    }

    for (i, col) in desired.columns.iter().enumerate() {
        if previous_names.contains_key(col.name.as_str()) {
            continue;
        }
        let definition = serialize_column(col);
        if i == 0 {
            statements.push(format!(
                "ALTER {} {} ADD COLUMN {} FIRST",
                keyword, name, definition
            ));
        } else {
            // Positioned after whichever column precedes it in the desired
            // list, whether or not that column is itself new.
            statements.push(format!(
                "ALTER {} {} ADD COLUMN {} AFTER {}",
                keyword,
                name,
                definition,
                desired.columns[i - 1].name
            ));
        }
    }

    statements
}

/// Attribute-update path: equal counts, compared positionally by index.
///
/// Type changes never reach this path; the validator rejects them first.
fn alter_existing_column_statements(
    desired: &TableDescription,
    previous: &TableDescription,
) -> Vec<String> {
    let mut statements = Vec::new();
    let keyword = desired.kind.ddl_keyword();
    let name = desired.sql_full_name();

    for (col, old_col) in desired.columns.iter().zip(previous.columns.iter()) {
        if col.name != old_col.name {
            statements.push(format!(
                "ALTER {} {} RENAME COLUMN {} TO {}",
                keyword,
                name,
                old_col.quoted_name(),
                col.quoted_name()
            ));
        }
        if col.comment != old_col.comment {
            statements.push(format!(
                "ALTER {} {} ALTER COLUMN {} COMMENT '{}'",
                keyword,
                name,
                col.quoted_name(),
                escape_literal(&col.comment)
            ));
        }
        if col.nullable != old_col.nullable {
            let action = if col.nullable { "DROP" } else { "SET" };
            statements.push(format!(
                "ALTER {} {} ALTER COLUMN {} {} NOT NULL",
                keyword,
                name,
                col.quoted_name(),
                action
            ));
        }
    }

    statements
}
