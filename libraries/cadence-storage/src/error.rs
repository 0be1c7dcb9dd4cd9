//! Constraint violation mapping

use cadence_core::CadenceError;

/// Map schema constraint violations onto business errors.
///
/// Unique violations become `Conflict(conflict)`, foreign key violations
/// become `NotFound(missing)`, everything else is a storage failure.
pub(crate) fn map_constraint(err: sqlx::Error, conflict: &str, missing: &str) -> CadenceError {
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() {
            return CadenceError::conflict(conflict);
        }
        if db.is_foreign_key_violation() {
            return CadenceError::not_found(missing);
        }
    }
    err.into()
}
