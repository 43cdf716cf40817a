//! Group-related models

use serde::{Deserialize, Serialize};

/// Kind of chat group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupType {
    General,
    Department,
    Ministry,
}

/// Chat group entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub group_type: Option<GroupType>,
    pub department: Option<String>,
    pub member_count: Option<u32>,
    pub created_at: Option<String>,
}

/// Member entry in a group roster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub user_id: u64,
    pub full_name: String,
    pub role: Option<String>,
    pub profile_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_with_type_field() {
        let json = r#"{
            "id": 3,
            "name": "Choir",
            "type": "ministry",
            "memberCount": 24
        }"#;
        let group: Group = serde_json::from_str(json).unwrap();
        assert_eq!(group.id, 3);
        assert!(matches!(group.group_type, Some(GroupType::Ministry)));
        assert_eq!(group.member_count, Some(24));
    }
}
