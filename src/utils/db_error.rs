/// Name of the unique constraint guarding `mappings.code`.
pub const MAPPINGS_CODE_CONSTRAINT: &str = "mappings_code_key";

pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(MAPPINGS_CODE_CONSTRAINT))
}
