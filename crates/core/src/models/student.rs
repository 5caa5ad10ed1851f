use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use super::common::{CustomField, Division, Gender, Grade};

/// Student record as served by `/student` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub register_number: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub birth_place: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(deserialize_with = "positive_roll_number")]
    pub roll_number: u32,
    #[serde(default)]
    pub father_name: String,
    #[serde(default)]
    pub mother_name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub adhaar: String,
    #[serde(default)]
    pub cast: String,
    #[serde(default)]
    pub religion: String,
    #[serde(default)]
    pub nationality: String,
    pub grade: Grade,
    pub division: Division,
    #[serde(default, deserialize_with = "string_or_number")]
    pub contact_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_school_name: Option<String>,
    #[serde(default)]
    pub admission_date: String,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    #[serde(deserialize_with = "non_blank")]
    pub school_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Student {
    pub fn full_name(&self) -> String {
        match self.middle_name.as_deref().filter(|m| !m.is_empty()) {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// Payload for `POST /student`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub student_id: String,
    pub register_number: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub date_of_birth: String,
    pub birth_place: String,
    pub gender: Gender,
    pub roll_number: u32,
    pub father_name: String,
    pub mother_name: String,
    pub adhaar: String,
    pub cast: String,
    pub religion: String,
    pub nationality: String,
    pub grade: u8,
    pub division: Division,
    pub contact_number: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_school_name: Option<String>,
    pub admission_date: String,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    pub school_id: String,
}

/// Payload for `PATCH /student/{id}`.
///
/// Has no `school_id`: a student's school is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<Division>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_school_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomField>>,
}

/// Outcome of a CSV bulk import. Partial success is still a success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub saved: u32,
    pub failed: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub fn is_partial(&self) -> bool {
        self.saved > 0 && self.failed > 0
    }
}

/// Some backend revisions send numeric-looking fields as JSON numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}

fn positive_roll_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match u32::deserialize(deserializer)? {
        0 => Err(de::Error::custom("rollNumber must be a positive integer")),
        n => Ok(n),
    }
}

fn non_blank<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if value.trim().is_empty() {
        return Err(de::Error::custom("schoolId must not be empty"));
    }
    Ok(value)
}
