use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("unknown permission: {0}")]
    UnknownPermission(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

pub type AuthzResult<T> = Result<T, AuthzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_variants() {
        let errors = vec![
            AuthzError::UnknownPermission("residents.anything".to_string()),
            AuthzError::UnknownRole("owner".to_string()),
        ];

        for error in errors {
            let rendered = error.to_string();
            assert!(!rendered.is_empty());
        }
    }
}
