//! User-related models

use serde::{Deserialize, Serialize};

/// Role assigned to a member account, gating navigation and admin views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Member,
    Pastor,
    Elder,
    Deacon,
    Secretary,
    Media,
    Finance,
    Choir,
    DepartmentHead,
    Admin,
    ChurchAdmin,
    MediaHead,
    SuperAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Member => "member",
            UserRole::Pastor => "pastor",
            UserRole::Elder => "elder",
            UserRole::Deacon => "deacon",
            UserRole::Secretary => "secretary",
            UserRole::Media => "media",
            UserRole::Finance => "finance",
            UserRole::Choir => "choir",
            UserRole::DepartmentHead => "department_head",
            UserRole::Admin => "admin",
            UserRole::ChurchAdmin => "church_admin",
            UserRole::MediaHead => "media_head",
            UserRole::SuperAdmin => "super_admin",
        }
    }
}

/// Member profile as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    pub full_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
    #[serde(default)]
    pub departments: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<String>,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Numeric identifier passed to the RTC engine as the local uid.
    /// 0 tells the engine to assign one itself.
    pub fn rtc_uid(user: Option<&User>) -> u32 {
        user.map(|u| u.id as u32).unwrap_or(0)
    }
}

/// Successful login/register/google-exchange response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Credentials for password login.
#[derive(Debug, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Payload for account registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub departments: Vec<String>,
}

/// Profile fields sent with a Google identity exchange.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleProfile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: Option<String>,
    pub google_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_snake_case_roundtrip() {
        for role in [
            UserRole::Member,
            UserRole::DepartmentHead,
            UserRole::SuperAdmin,
        ] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            let back: UserRole = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn test_user_minimal_fields() {
        let json = r#"{
            "id": 42,
            "email": "jo@example.com",
            "fullName": "Jo Member",
            "role": "member"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 42);
        assert!(user.is_active);
        assert!(user.departments.is_empty());
    }

    #[test]
    fn test_rtc_uid_fallback_is_zero() {
        assert_eq!(User::rtc_uid(None), 0);

        let user: User = serde_json::from_str(
            r#"{"id": 7, "email": "a@b.c", "fullName": "A", "role": "member"}"#,
        )
        .unwrap();
        assert_eq!(User::rtc_uid(Some(&user)), 7);
    }
}
