use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ModelError {
    /// True when the underlying driver rejected an insert or update on a
    /// unique index. Callers map this to their conflict variant.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, ModelError::Db(msg) if msg.contains("duplicate key value violates unique constraint"))
    }
}

#[cfg(test)]
mod tests {
    use super::ModelError;

    #[test]
    fn unique_violation_detected_from_driver_message() {
        let e = ModelError::Db(
            "error returned from database: duplicate key value violates unique constraint \"user_username_key\"".into(),
        );
        assert!(e.is_unique_violation());
        assert!(!ModelError::Db("connection refused".into()).is_unique_violation());
        assert!(!ModelError::Validation("empty".into()).is_unique_violation());
    }
}
