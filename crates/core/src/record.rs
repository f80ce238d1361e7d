//! Remote account records
//!
//! One document per user identity, in the account collection:
//!
//! ```text
//! userAccountInfo[userId] = {
//!   role: "patient" | "expert",
//!   settingsData: <untagged preference tree>,
//!   email: string,
//!   name: string,
//!   createdAt: ISO-8601 timestamp
//! }
//! ```
//!
//! Documents are read as loose JSON maps ([`Document`]) because stored
//! records may lack fields. [`UserAccountRecord`] is the typed form used
//! when writing a fresh record.

use crate::error::{Error, Result};
use crate::tree::PreferenceTree;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stored record: a JSON object
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Default collection holding account records
pub const ACCOUNT_COLLECTION: &str = "userAccountInfo";

/// Default field holding the serialized preference tree
pub const TREE_FIELD: &str = "settingsData";

/// Field holding the account role
pub const ROLE_FIELD: &str = "role";

/// Identity of a signed-in user, as issued by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a provider-issued identifier
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] for an empty identifier.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::malformed("user id must not be empty"));
        }
        Ok(UserId(id))
    }

    /// The raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        UserId::new(s)
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Owns and edits a preference tree
    #[default]
    Patient,
    /// Reads patients' trees
    Expert,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Expert => "expert",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "patient" => Ok(Role::Patient),
            "expert" => Ok(Role::Expert),
            other => Err(Error::malformed(format!("unknown role '{}'", other))),
        }
    }
}

/// A complete account record, as written on account creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccountRecord {
    /// Account role
    pub role: Role,
    /// The user's preference tree
    pub settings_data: PreferenceTree,
    /// Contact address, empty if unknown
    pub email: String,
    /// Display name
    pub name: String,
    /// Creation time, RFC 3339
    pub created_at: DateTime<Utc>,
}

impl UserAccountRecord {
    /// Fresh record holding the default tree
    pub fn new(role: Role, email: impl Into<String>, name: impl Into<String>) -> Self {
        UserAccountRecord {
            role,
            settings_data: PreferenceTree::default_tree(),
            email: email.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// Convert to a stored document, putting the tree under `tree_field`
    pub fn into_document(self, tree_field: &str) -> Result<Document> {
        let mut doc = match serde_json::to_value(&self)? {
            serde_json::Value::Object(map) => map,
            _ => return Err(Error::Serialization("account record is not an object".into())),
        };
        if tree_field != TREE_FIELD {
            if let Some(tree) = doc.remove(TREE_FIELD) {
                doc.insert(tree_field.to_string(), tree);
            }
        }
        Ok(doc)
    }
}

/// A patient as listed for an expert
#[derive(Debug, Clone, PartialEq)]
pub struct PatientSummary {
    /// Record identifier
    pub id: String,
    /// Display name, `"Patient"` if unset
    pub name: String,
    /// Contact address, the record id if unset
    pub email: String,
    /// The patient's tree, or the default tree if missing or unreadable
    pub settings: PreferenceTree,
    /// Creation time as stored, if any
    pub created_at: Option<String>,
}
