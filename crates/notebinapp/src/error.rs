use thiserror::Error;

/// Errors surfaced by notebin operations.
///
/// Missing records, records owned by someone else and records in the wrong
/// trash state all collapse into [`NotebinError::NotFoundOrUnauthorized`], so a
/// caller cannot probe for the existence of another owner's data.
#[derive(Error, Debug)]
pub enum NotebinError {
    #[error("Unauthorized: no active session")]
    Unauthorized,

    #[error("Not found or unauthorized")]
    NotFoundOrUnauthorized,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl NotebinError {
    /// True for errors caused by the caller (bad session, bad input, unknown id).
    /// Everything else is an infrastructure failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            NotebinError::Unauthorized
                | NotebinError::NotFoundOrUnauthorized
                | NotebinError::Validation(_)
        )
    }
}

impl From<rusqlite::Error> for NotebinError {
    fn from(err: rusqlite::Error) -> Self {
        NotebinError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NotebinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_classified() {
        assert!(NotebinError::Unauthorized.is_client_error());
        assert!(NotebinError::NotFoundOrUnauthorized.is_client_error());
        assert!(NotebinError::Validation("x".into()).is_client_error());
        assert!(!NotebinError::Storage("disk".into()).is_client_error());
    }

    #[test]
    fn sqlite_errors_become_storage_errors() {
        let err: NotebinError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, NotebinError::Storage(_)));
    }
}
