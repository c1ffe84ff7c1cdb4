use serde::{Deserialize, Serialize};

/// Structured error information extracted from MongoDB errors.
///
/// Serialized into diagnostics and into the run report's abort message so
/// that CloudWatch lines stay machine-readable.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
}

impl ErrorInfo {
    /// Convert error info to compact JSON string (single line).
    pub fn to_json_compact(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Extract structured information from a MongoDB error using the driver API.
pub fn extract_error_info(error: &mongodb::error::Error) -> ErrorInfo {
    use mongodb::error::ErrorKind;

    let mut info = ErrorInfo::default();

    match error.kind.as_ref() {
        ErrorKind::Command(command_error) => {
            info.error_type = Some("mongo.command_error".to_string());
            info.code = Some(command_error.code);
            info.message = Some(command_error.message.clone());
            info.name = get_error_name(command_error.code)
                .or_else(|| Some(command_error.code_name.clone()).filter(|n| !n.is_empty()));
        }
        ErrorKind::Authentication { message, .. } => {
            info.error_type = Some("mongo.authentication_error".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::InvalidArgument { message, .. } => {
            info.error_type = Some("mongo.invalid_argument".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::ServerSelection { message, .. } => {
            info.error_type = Some("mongo.server_selection_error".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::DnsResolve { message, .. } => {
            info.error_type = Some("mongo.dns_resolve_error".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::Io(io_error) => {
            info.error_type = Some("mongo.io_error".to_string());
            info.message = Some(io_error.to_string());
        }
        _ => {
            info.message = Some(error.to_string());
        }
    }

    info
}

/// Get a human-readable error name from a MongoDB error code.
fn get_error_name(code: i32) -> Option<String> {
    let name = match code {
        13 => "Unauthorized",
        18 => "AuthenticationFailed",
        26 => "NamespaceNotFound",
        50 => "MaxTimeMSExpired",
        _ => return None,
    };

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_name_lookup() {
        assert_eq!(get_error_name(13).as_deref(), Some("Unauthorized"));
        assert_eq!(get_error_name(26).as_deref(), Some("NamespaceNotFound"));
        assert_eq!(get_error_name(99999), None);
    }

    #[test]
    fn test_error_info_skips_empty_fields() {
        let info = ErrorInfo {
            error_type: Some("mongo.io_error".to_string()),
            message: Some("connection reset".to_string()),
            ..Default::default()
        };
        let json = info.to_json_compact().unwrap();
        assert_eq!(json, r#"{"type":"mongo.io_error","message":"connection reset"}"#);
    }

    #[test]
    fn test_extract_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer went away");
        let err = mongodb::error::Error::from(io);
        let info = extract_error_info(&err);
        assert_eq!(info.error_type.as_deref(), Some("mongo.io_error"));
        assert!(info.message.unwrap().contains("peer went away"));
    }
}
