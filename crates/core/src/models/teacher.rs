use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Staff role attached to console accounts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    SubAdmin,
    #[default]
    Teacher,
}

/// Teacher account belonging to a school.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    pub school_id: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /teacher`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTeacher {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    pub school_id: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl NewTeacher {
    pub fn new(name: &str, email: &str, password: &str, school_id: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: UserRole::Teacher,
            school_id: school_id.to_string(),
            is_active: true,
        }
    }
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serialization() {
        assert_eq!(
            serde_json::to_string(&UserRole::SubAdmin).unwrap(),
            "\"sub_admin\""
        );
        assert_eq!(
            serde_json::to_string(&UserRole::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
    }

    #[test]
    fn teacher_defaults_when_fields_missing() {
        let teacher: Teacher = serde_json::from_str(
            r#"{"_id": "t1", "name": "Asha Rao", "schoolId": "school-1"}"#,
        )
        .unwrap();
        assert_eq!(teacher.role, UserRole::Teacher);
        assert!(teacher.is_active);
        assert!(teacher.email.is_empty());
    }

    #[test]
    fn new_teacher_defaults() {
        let t = NewTeacher::new("Asha", "asha@school.edu", "secret1", "school-1");
        assert_eq!(t.role, UserRole::Teacher);
        assert!(t.is_active);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["schoolId"], "school-1");
        assert_eq!(json["isActive"], true);
    }
}
