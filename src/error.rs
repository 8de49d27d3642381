//! Error types for the Tuya characteristic bridge
//!
//! Every fallible operation in the crate returns [`BridgeError`]. Errors carry a
//! structured [`ErrorCode`] so hosts can decide how to surface them without
//! string matching.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Error types for bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Capability data lacks the fields a characteristic requires
    #[error("Unsupported characteristic {characteristic} on device {device_id}: missing {missing:?}")]
    UnsupportedCharacteristic {
        characteristic: String,
        device_id: String,
        missing: Vec<String>,
    },

    /// Capability data passed the support check but cannot produce bounds
    #[error("Invalid capability data: {0}")]
    InvalidCapabilities(String),

    /// Remote state query was rejected
    #[error("Remote fetch failed: {0}")]
    RemoteFetch(String),

    /// Remote state change was rejected
    #[error("Remote write failed: {0}")]
    RemoteWrite(String),

    /// A value could not be coerced to the type the other side expects
    #[error("Malformed data: {0}")]
    MalformedRemoteData(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structured error code for machine-readable error handling
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Connection errors (1000-1099)
    ConnectionTimeout,
    ConnectionLost,

    // Configuration errors (1200-1299)
    ConfigurationInvalid,

    // Device errors (1300-1399)
    DeviceStateUnavailable,
    DeviceControlFailed,
    CharacteristicUnsupported,
    CapabilitiesInvalid,

    // Data errors (1400-1499)
    ParsingFailed,
    ValueMalformed,

    // Internal errors (1900-1999)
    InternalError,
}

impl ErrorCode {
    /// Get numeric error code
    pub fn as_number(&self) -> u32 {
        match self {
            ErrorCode::ConnectionTimeout => 1001,
            ErrorCode::ConnectionLost => 1003,

            ErrorCode::ConfigurationInvalid => 1202,

            ErrorCode::DeviceStateUnavailable => 1302,
            ErrorCode::DeviceControlFailed => 1303,
            ErrorCode::CharacteristicUnsupported => 1304,
            ErrorCode::CapabilitiesInvalid => 1305,

            ErrorCode::ParsingFailed => 1401,
            ErrorCode::ValueMalformed => 1404,

            ErrorCode::InternalError => 1901,
        }
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        match self.as_number() {
            1000..=1099 => "connection",
            1200..=1299 => "configuration",
            1300..=1399 => "device",
            1400..=1499 => "data",
            1900..=1999 => "internal",
            _ => "unknown",
        }
    }
}

impl BridgeError {
    /// Create a remote fetch error
    pub fn remote_fetch<S: Into<String>>(msg: S) -> Self {
        Self::RemoteFetch(msg.into())
    }

    /// Create a remote write error
    pub fn remote_write<S: Into<String>>(msg: S) -> Self {
        Self::RemoteWrite(msg.into())
    }

    /// Create a malformed data error
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MalformedRemoteData(msg.into())
    }

    /// Create an invalid capabilities error
    pub fn invalid_capabilities<S: Into<String>>(msg: S) -> Self {
        Self::InvalidCapabilities(msg.into())
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Map BridgeError to structured error code
    pub fn to_error_code(&self) -> ErrorCode {
        match self {
            BridgeError::UnsupportedCharacteristic { .. } => ErrorCode::CharacteristicUnsupported,
            BridgeError::InvalidCapabilities(_) => ErrorCode::CapabilitiesInvalid,
            BridgeError::RemoteFetch(_) => ErrorCode::DeviceStateUnavailable,
            BridgeError::RemoteWrite(_) => ErrorCode::DeviceControlFailed,
            BridgeError::MalformedRemoteData(_) => ErrorCode::ValueMalformed,
            BridgeError::Timeout(_) => ErrorCode::ConnectionTimeout,
            BridgeError::Http(_) => ErrorCode::ConnectionLost,
            BridgeError::Json(_) => ErrorCode::ParsingFailed,
            BridgeError::Config(_) => ErrorCode::ConfigurationInvalid,
            BridgeError::Io(_) => ErrorCode::InternalError,
        }
    }

    /// Whether the host may reasonably try the same call again later.
    ///
    /// The bridge never retries on its own; this is a hint for whatever polls it.
    pub fn is_retryable(&self) -> bool {
        match self {
            BridgeError::RemoteFetch(_)
            | BridgeError::RemoteWrite(_)
            | BridgeError::Timeout(_) => true,
            BridgeError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Whether this error came from the remote side of the bridge
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            BridgeError::RemoteFetch(_)
                | BridgeError::RemoteWrite(_)
                | BridgeError::Timeout(_)
                | BridgeError::Http(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_categories() {
        let error = BridgeError::remote_fetch("device offline");
        assert_eq!(error.to_error_code(), ErrorCode::DeviceStateUnavailable);
        assert_eq!(error.to_error_code().as_number(), 1302);
        assert_eq!(error.to_error_code().category(), "device");

        let error = BridgeError::timeout("fetch_state after 10s");
        assert_eq!(error.to_error_code().category(), "connection");

        let error = BridgeError::config("missing access token");
        assert_eq!(error.to_error_code().category(), "configuration");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(BridgeError::remote_write("FrequentlyInvoke").is_retryable());
        assert!(BridgeError::timeout("apply_state").is_retryable());
        assert!(!BridgeError::malformed("not a number").is_retryable());
        assert!(!BridgeError::invalid_capabilities("speed_level").is_retryable());
    }

    #[test]
    fn test_remote_message_preserved() {
        let error = BridgeError::remote_fetch("get devices failed: token expired");
        assert_eq!(
            error.to_string(),
            "Remote fetch failed: get devices failed: token expired"
        );
        assert!(error.is_remote_failure());
        assert!(!BridgeError::malformed("x").is_remote_failure());
    }
}
