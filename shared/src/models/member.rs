//! Member Model

use serde::{Deserialize, Serialize};

use super::club::{Classification, Club, RelationshipStatus};
use super::{deserialize_present, null_as_default};

/// Phone number stored when registration leaves it empty
pub const DEFAULT_PHONE: &str = "111-111-1111";

/// Profile image for members that never uploaded one
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://www.nomadfoods.com/wp-content/uploads/2018/08/placeholder-1-e1533569576673-1200x1200.png";

/// Member row (one per club member)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Backend row id, used for updates
    #[serde(rename = "$id")]
    pub row_id: String,
    /// Numeric member number
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    pub relationship_status: RelationshipStatus,
    pub classification: Classification,
    pub club: Club,
    /// Linked identity id
    #[serde(rename = "userID", default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    pub show_email: bool,
    pub show_phone: bool,
    #[serde(default)]
    pub officer: Option<String>,
    #[serde(rename = "imageURL", default, deserialize_with = "null_as_default")]
    pub image_url: String,
}

impl Member {
    /// "First Last", trimmed when either part is empty
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Whether this row belongs to the given identity
    pub fn is_linked_to(&self, identity_id: &str) -> bool {
        self.user_id.as_deref() == Some(identity_id)
    }
}

/// Create member payload (the `data` of a create-row call)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCreate {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub relationship_status: RelationshipStatus,
    pub classification: Classification,
    pub club: Club,
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    pub phone: String,
    pub email: String,
    pub show_email: bool,
    pub show_phone: bool,
    /// Sent as an explicit `null` so the column is populated
    pub officer: Option<String>,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

impl MemberCreate {
    /// Attaches the backend row id once the row exists
    pub fn into_member(self, row_id: impl Into<String>) -> Member {
        Member {
            row_id: row_id.into(),
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            relationship_status: self.relationship_status,
            classification: self.classification,
            club: self.club,
            user_id: self.user_id,
            phone: self.phone,
            email: self.email,
            show_email: self.show_email,
            show_phone: self.show_phone,
            officer: self.officer,
            image_url: self.image_url,
        }
    }
}

/// Caller-supplied values that take precedence over derived defaults when a
/// member row is created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberOverrides {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub club: Option<Club>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Update member payload
///
/// Absent fields are left out of the request body so the backend keeps their
/// current values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_status: Option<RelationshipStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club: Option<Club>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_phone: Option<bool>,
    /// `Some(None)` clears the title, sent as an explicit `null`
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub officer: Option<Option<String>>,
    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl MemberUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
