//! Domain error types.

/// Top-level error type for tradejournal.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error("storage query error: {reason}")]
    StorageQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid trade field {field}: {reason}")]
    InvalidTrade { field: String, reason: String },

    #[error("unknown category '{value}' (expected all, winning, losing, long or short)")]
    InvalidCategory { value: String },

    #[error("invalid direction '{value}' (expected Long or Short)")]
    InvalidDirection { value: String },

    #[error("invalid date '{value}'")]
    InvalidDate { value: String },

    #[error("no trade with id {id}")]
    TradeNotFound { id: String },

    #[error("csv error: {reason}")]
    Csv { reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl JournalError {
    pub(crate) fn invalid_trade(field: &str, reason: impl Into<String>) -> Self {
        JournalError::InvalidTrade {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&JournalError> for std::process::ExitCode {
    fn from(err: &JournalError) -> Self {
        let code: u8 = match err {
            JournalError::Io(_) | JournalError::Csv { .. } => 1,
            JournalError::ConfigParse { .. }
            | JournalError::ConfigMissing { .. }
            | JournalError::ConfigInvalid { .. } => 2,
            JournalError::Storage { .. }
            | JournalError::StorageQuery { .. }
            | JournalError::Json(_) => 3,
            JournalError::InvalidTrade { .. }
            | JournalError::InvalidCategory { .. }
            | JournalError::InvalidDirection { .. }
            | JournalError::InvalidDate { .. } => 4,
            JournalError::TradeNotFound { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_trade_message_names_field() {
        let err = JournalError::invalid_trade("size", "must be positive");
        assert_eq!(err.to_string(), "invalid trade field size: must be positive");
    }

    #[test]
    fn category_error_lists_choices() {
        let err = JournalError::InvalidCategory {
            value: "big".into(),
        };
        assert!(err.to_string().contains("winning"));
    }
}
