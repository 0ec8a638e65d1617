//! Request and response types for auth-related API calls. These payloads carry
//! verification codes and passwords, so they must never be logged.

use serde::{Deserialize, Serialize};

/// Terms version accepted at registration.
pub const TERMS_VERSION: &str = "2.0";
/// Privacy policy version accepted at registration.
pub const PRIVACY_POLICY_VERSION: &str = "1.0";

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<&'a str>,
    pub accept_terms: bool,
    pub terms_version: &'a str,
    pub accept_privacy_policy: bool,
    pub privacy_policy_version: &'a str,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<RegisteredUser>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Serialize)]
pub struct VerifyEmailRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResendCodeRequest<'a> {
    pub email: &'a str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailChangeRequest<'a> {
    pub new_email: &'a str,
}

#[derive(Clone, Serialize)]
pub struct VerifyEmailChangeRequest<'a> {
    pub code: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_request_uses_camel_case() {
        let request = RegisterRequest {
            email: "user@example.com",
            password: "hunter22",
            display_name: None,
            accept_terms: true,
            terms_version: TERMS_VERSION,
            accept_privacy_policy: true,
            privacy_policy_version: PRIVACY_POLICY_VERSION,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "email": "user@example.com",
                "password": "hunter22",
                "acceptTerms": true,
                "termsVersion": "2.0",
                "acceptPrivacyPolicy": true,
                "privacyPolicyVersion": "1.0",
            })
        );
    }

    #[test]
    fn email_change_request_uses_new_email_key() {
        let value = serde_json::to_value(EmailChangeRequest {
            new_email: "new@example.com",
        })
        .unwrap();
        assert_eq!(value, json!({ "newEmail": "new@example.com" }));
    }

    #[test]
    fn auth_response_tolerates_sparse_bodies() {
        let response: AuthResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, AuthResponse::default());

        let response: AuthResponse = serde_json::from_value(json!({
            "success": true,
            "user": { "id": 7, "email": "user@example.com", "displayName": "Aisha" },
            "message": "Registered"
        }))
        .unwrap();
        assert!(response.success);
        assert_eq!(
            response.user.and_then(|user| user.display_name),
            Some("Aisha".to_string())
        );
    }
}
