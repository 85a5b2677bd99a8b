use thiserror::Error;

#[derive(Debug, Error)]
pub enum FimtDdError {
    #[error("invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unsupported stream schema: {0}")]
    Schema(String),

    #[error("cannot snapshot tree: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FimtDdError {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        FimtDdError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn invalid_parameter_message_names_the_parameter() {
        let err = FimtDdError::invalid_parameter("tie_threshold", "must be in [0, 1]");
        assert_eq!(
            err.to_string(),
            "invalid value for parameter 'tie_threshold': must be in [0, 1]"
        );
    }

    #[test]
    fn io_errors_convert_transparently() {
        let err: FimtDdError = Error::new(ErrorKind::NotFound, "missing file").into();
        assert!(matches!(err, FimtDdError::Io(_)));
        assert_eq!(err.to_string(), "missing file");
    }
}
