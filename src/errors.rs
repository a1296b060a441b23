use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the token resource and the settings projector.
#[derive(Debug, Error)]
pub enum Error {
    /// PayPal rejected the credentials, or the token exchange failed on the wire.
    #[error("PayPal authentication failed: {reason}")]
    Authentication {
        status: Option<StatusCode>,
        reason: String,
    },

    /// No recognized settings key exists under the namespace.
    #[error("PayPal settings not found under namespace '{namespace}'")]
    SettingsNotFound { namespace: String },

    #[error("unknown settings field '{0}'")]
    UnknownSettingField(String),

    #[error("invalid value for settings field '{field}': {reason}")]
    InvalidSettingValue { field: &'static str, reason: String },

    #[error("settings store failure: {0}")]
    Store(String),
}

impl Error {
    pub fn authentication(status: Option<StatusCode>, reason: impl Into<String>) -> Self {
        Error::Authentication {
            status,
            reason: reason.into(),
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    pub fn is_settings_not_found(&self) -> bool {
        matches!(self, Error::SettingsNotFound { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::authentication(err.status(), err.to_string())
    }
}
