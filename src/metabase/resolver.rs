//! The relational query algorithm over the metabase table.
//!
//! A single operation answers every public catalog query: project one
//! column while filtering the others by exact value. Listing all datasets,
//! listing the dimensions of a dataset, reverse-looking-up the datasets
//! using a dimension and checking membership are all calls to [`resolve`]
//! with different targets and constraints.

use crate::error::{Error, Result};
use crate::metabase::{Column, MetabaseTable};

/// Resolve the distinct values of `target` among rows satisfying every
/// constraint.
///
/// Constraints are conjunctive equality filters on columns other than the
/// target; a row matches only when the full constraint tuple matches, so a
/// query over a column combination absent from the table yields an empty
/// set rather than widening to a single-column filter. Passing the target
/// itself as a constraint fails with [`Error::InvalidQuery`].
///
/// The result keeps first-appearance order and contains no duplicates. An
/// empty constraint list lists the whole distinct universe of the target
/// column; an empty table resolves to an empty set without error.
pub fn resolve(
    table: &MetabaseTable,
    target: Column,
    constraints: &[(Column, String)],
) -> Result<Vec<String>> {
    if constraints.iter().any(|(column, _)| *column == target) {
        return Err(Error::InvalidQuery(format!(
            "target column '{}' must not appear as a constraint",
            target
        )));
    }

    let mut values: Vec<String> = Vec::new();
    for row in table.rows() {
        if constraints.iter().all(|(column, value)| row.get(*column) == value) {
            let candidate = row.get(target);
            if !values.iter().any(|v| v == candidate) {
                values.push(candidate.to_string());
            }
        }
    }
    Ok(values)
}

/// Whether `value` appears in the distinct universe of `column`.
///
/// Fails with [`Error::EmptyUniverse`] when the table holds no values for
/// that column at all, so "member of nothing" stays distinguishable from an
/// ordinary miss.
pub fn check_membership(table: &MetabaseTable, column: Column, value: &str) -> Result<bool> {
    let universe = resolve(table, column, &[])?;
    if universe.is_empty() {
        return Err(Error::EmptyUniverse(column.as_str().to_string()));
    }
    Ok(universe.iter().any(|v| v == value))
}
