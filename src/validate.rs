//! Pre-flight validators.
//!
//! These run before any remote mutation and reject column changes the diff
//! engine cannot express: in-place type changes, and updates that mix
//! add/remove of columns with attribute edits on surviving columns. Each
//! produces a [`DdlError`] instead of letting an unsupported statement shape
//! be generated.

use std::collections::HashMap;

use crate::error::{DdlError, Result};
use crate::schema::ColumnDescription;

/// Normalizes a SQL type token for comparison.
///
/// Comparison is case-insensitive and folds the engine's type aliases onto
/// their canonical spelling, so `Integer` and `int` never register as drift.
#[must_use]
pub fn normalize_column_type(type_text: &str) -> String {
    let lowered = type_text.to_lowercase();
    match lowered.as_str() {
        "integer" => "int".to_string(),
        "long" => "bigint".to_string(),
        "real" => "float".to_string(),
        "short" => "smallint".to_string(),
        "byte" => "tinyint".to_string(),
        "decimal" | "dec" | "numeric" => "decimal(10,0)".to_string(),
        _ => lowered,
    }
}

/// Rejects in-place column type changes.
///
/// Applies when the column counts match; columns are compared positionally.
pub fn validate_no_type_change(
    desired: &[ColumnDescription],
    previous: &[ColumnDescription],
) -> Result<()> {
    for (new_col, old_col) in desired.iter().zip(previous.iter()) {
        let from = normalize_column_type(&old_col.type_text);
        let to = normalize_column_type(&new_col.type_text);
        if from != to {
            return Err(DdlError::TypeChange {
                column: old_col.name.clone(),
                from,
                to,
            });
        }
    }
    Ok(())
}

/// Rejects updates that add or remove columns while also editing attributes
/// of a column present on both sides.
///
/// Applies when the column counts differ. Add/remove and attribute-edit are
/// separate generated-statement shapes; mixing them in one apply would be
/// silently under- or over-applied, so it is rejected outright.
pub fn validate_no_mixed_membership_change(
    desired: &[ColumnDescription],
    previous: &[ColumnDescription],
) -> Result<()> {
    let desired_by_name: HashMap<&str, &ColumnDescription> =
        desired.iter().map(|c| (c.name.as_str(), c)).collect();

    for old_col in previous {
        if let Some(new_col) = desired_by_name.get(old_col.name.as_str()) {
            let type_changed = normalize_column_type(&old_col.type_text)
                != normalize_column_type(&new_col.type_text);
            if type_changed
                || old_col.nullable != new_col.nullable
                || old_col.comment != new_col.comment
            {
                return Err(DdlError::MixedColumnChange {
                    column: old_col.name.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize_column_type("integer"), "int");
        assert_eq!(normalize_column_type("Long"), "bigint");
        assert_eq!(normalize_column_type("REAL"), "float");
        assert_eq!(normalize_column_type("short"), "smallint");
        assert_eq!(normalize_column_type("byte"), "tinyint");
        assert_eq!(normalize_column_type("decimal"), "decimal(10,0)");
        assert_eq!(normalize_column_type("dec"), "decimal(10,0)");
        assert_eq!(normalize_column_type("NUMERIC"), "decimal(10,0)");
    }

    #[test]
    fn test_normalize_passthrough() {
        assert_eq!(normalize_column_type("STRING"), "string");
        assert_eq!(normalize_column_type("decimal(12,2)"), "decimal(12,2)");
    }

    #[test]
    fn test_type_change_rejected() {
        let previous = vec![ColumnDescription::new("a", "int")];
        let desired = vec![ColumnDescription::new("a", "string")];

        let err = validate_no_type_change(&desired, &previous).unwrap_err();
        assert!(matches!(err, DdlError::TypeChange { .. }));
    }

    #[test]
    fn test_aliased_type_is_not_a_change() {
        let previous = vec![ColumnDescription::new("a", "integer")];
        let desired = vec![ColumnDescription::new("a", "INT")];

        validate_no_type_change(&desired, &previous).unwrap();
    }

    #[test]
    fn test_nullability_change_passes_type_validator() {
        let previous = vec![ColumnDescription::new("a", "int")];
        let desired = vec![ColumnDescription::new("a", "int").not_null()];

        validate_no_type_change(&desired, &previous).unwrap();
    }

    #[test]
    fn test_mixed_change_rejected() {
        // Count differs and shared column `a` changes type at the same time.
        let previous = vec![ColumnDescription::new("a", "int").not_null()];
        let desired = vec![
            ColumnDescription::new("a", "bigint").not_null(),
            ColumnDescription::new("b", "string"),
        ];

        let err = validate_no_mixed_membership_change(&desired, &previous).unwrap_err();
        match err {
            DdlError::MixedColumnChange { column } => assert_eq!(column, "a"),
            other => panic!("expected MixedColumnChange, got {other:?}"),
        }
    }

    #[test]
    fn test_pure_addition_is_allowed() {
        let previous = vec![ColumnDescription::new("a", "int").not_null()];
        let desired = vec![
            ColumnDescription::new("a", "int").not_null(),
            ColumnDescription::new("b", "string"),
        ];

        validate_no_mixed_membership_change(&desired, &previous).unwrap();
    }

    #[test]
    fn test_mixed_comment_change_rejected() {
        let previous = vec![
            ColumnDescription::new("a", "int"),
            ColumnDescription::new("b", "string"),
        ];
        let desired = vec![ColumnDescription::new("a", "int").comment("changed")];

        let err = validate_no_mixed_membership_change(&desired, &previous).unwrap_err();
        assert!(matches!(err, DdlError::MixedColumnChange { .. }));
    }
}
