//! Contact request model and the create-request body.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A posted request seeking contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub id: String,
    pub user_id: String,
    pub text: String,
    /// UTC creation date, `YYYY-MM-DD`
    pub date: String,
}

/// Request body for `POST /api/requests`.
///
/// Every field is optional here so that missing ones can be reported together.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_max_link: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_institute: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_course: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: Option<String>,
}

/// A create-request body that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub user_id: String,
    pub user_name: Option<String>,
    pub user_max_link: String,
    pub user_institute: String,
    pub user_course: String,
    pub text: String,
}

/// Whether a required field was supplied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldPresence {
    Provided,
    Missing,
}

impl FieldPresence {
    fn of(value: &Option<String>) -> Self {
        if present(value).is_some() {
            FieldPresence::Provided
        } else {
            FieldPresence::Missing
        }
    }
}

/// Per-field presence report returned with validation errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    pub user_id: FieldPresence,
    pub user_max_link: FieldPresence,
    pub user_institute: FieldPresence,
    pub user_course: FieldPresence,
    pub text: FieldPresence,
}

impl FieldReport {
    /// Names of the missing fields, in wire spelling.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("userId", self.user_id),
            ("userMaxLink", self.user_max_link),
            ("userInstitute", self.user_institute),
            ("userCourse", self.user_course),
            ("text", self.text),
        ]
        .into_iter()
        .filter(|(_, presence)| *presence == FieldPresence::Missing)
        .map(|(name, _)| name)
        .collect()
    }
}

impl CreateRequestBody {
    /// Check required fields. Empty strings count as missing.
    pub fn validate(self) -> Result<NewRequest, FieldReport> {
        match (
            present(&self.user_id),
            present(&self.user_max_link),
            present(&self.user_institute),
            present(&self.user_course),
            present(&self.text),
        ) {
            (Some(user_id), Some(max_link), Some(institute), Some(course), Some(text)) => {
                Ok(NewRequest {
                    user_id: user_id.to_string(),
                    user_name: self.user_name.clone(),
                    user_max_link: max_link.to_string(),
                    user_institute: institute.to_string(),
                    user_course: course.to_string(),
                    text: text.to_string(),
                })
            }
            _ => Err(FieldReport {
                user_id: FieldPresence::of(&self.user_id),
                user_max_link: FieldPresence::of(&self.user_max_link),
                user_institute: FieldPresence::of(&self.user_institute),
                user_course: FieldPresence::of(&self.user_course),
                text: FieldPresence::of(&self.text),
            }),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Accept strings, numbers and booleans as text; `false` and `0` count as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Bool(true)) => Ok(Some("true".to_string())),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(<D::Error as de::Error>::invalid_type(
            de::Unexpected::Other(value_kind(&other)),
            &"a string or number",
        )),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        _ => "value",
    }
}
