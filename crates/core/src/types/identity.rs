//! Signed-in identity.

use serde::{Deserialize, Serialize};

use super::email::Email;

/// The authenticated visitor.
///
/// Persisted under the `user` storage key as
/// `{"id":"1","name":"Demo User","email":"demo@example.com","token":"mock-jwt-token"}`.
/// The token is omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque identifier assigned by the credential collaborator.
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub email: Email,
    #[serde(rename = "token", default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_without_token() {
        let identity = Identity {
            id: "1".to_string(),
            display_name: "Demo User".to_string(),
            email: Email::parse("demo@example.com").unwrap(),
            session_token: None,
        };
        assert_eq!(
            serde_json::to_string(&identity).unwrap(),
            r#"{"id":"1","name":"Demo User","email":"demo@example.com"}"#
        );
    }

    #[test]
    fn test_reads_token_field() {
        let json = r#"{"id":"1","name":"Demo User","email":"demo@example.com","token":"mock-jwt-token"}"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.session_token.as_deref(), Some("mock-jwt-token"));
        assert_eq!(identity.display_name, "Demo User");
    }
}
