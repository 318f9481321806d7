//! Backend boundary: payloads, error taxonomy, and the request contract.
//!
//! # Responsibility
//! - Define the wire shapes of every persistence call the core issues.
//! - Split failures into transport errors and backend rejections so callers
//!   can surface them differently.
//!
//! # Invariants
//! - The client never retries; ordering conflicts resolve last-write-wins at
//!   the backend.
//! - Identifiers are passed through opaquely, whether the backend serializes
//!   them as strings or numbers.

pub mod http;

use crate::model::board::{Link, LinkId, Section, SectionId};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Envelope status value signalling an accepted mutation.
pub const STATUS_SUCCESS: &str = "success";

/// Result type for all backend calls.
pub type SyncResult<T> = Result<T, SyncError>;

/// Failure taxonomy for backend calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The request never completed (DNS, refused, timeout, TLS).
    Network(String),
    /// The backend answered and said no; `message` is server-supplied.
    Rejected { message: Option<String> },
    /// The response body could not be decoded into the documented shape.
    InvalidResponse(String),
}

impl SyncError {
    /// Returns the user-facing text for this failure, preferring the
    /// server-supplied message and falling back to `generic`.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
            } => message.clone(),
            Self::Rejected { message: None } => generic.to_string(),
            Self::Network(_) | Self::InvalidResponse(_) => "Network error".to_string(),
        }
    }
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(details) => write!(f, "network failure: {details}"),
            Self::Rejected { message: Some(m) } => write!(f, "backend rejected request: {m}"),
            Self::Rejected { message: None } => write!(f, "backend rejected request"),
            Self::InvalidResponse(details) => write!(f, "invalid response body: {details}"),
        }
    }
}

impl Error for SyncError {}

/// Item discriminator shared by detail/save/delete calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Section,
    Link,
}

impl ItemKind {
    /// Wire value used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Link => "link",
        }
    }
}

/// Accepts identifiers serialized as JSON strings or numbers.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(value) => value,
        Raw::Number(value) => value.to_string(),
    })
}

/// Body of the section order call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderSectionsRequest {
    pub ids: Vec<SectionId>,
}

/// Body of the link order call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderLinksRequest {
    pub section_id: SectionId,
    pub link_ids: Vec<LinkId>,
}

/// Body of the save-item call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveItemRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Body of the add-link call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddLinkRequest {
    pub section_id: SectionId,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Body of the delete-item call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteItemRequest {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub id: String,
}

/// Item detail returned by the get-item call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemDetail {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Status envelope shared by mutating responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusEnvelope {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusEnvelope {
    /// Converts the envelope into a result, carrying the server message on
    /// rejection.
    pub fn accept(self) -> SyncResult<()> {
        if self.status == STATUS_SUCCESS {
            Ok(())
        } else {
            Err(SyncError::Rejected {
                message: self.message,
            })
        }
    }
}

/// Created-link payload inside the add-link response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkPayload {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl From<LinkPayload> for Link {
    fn from(value: LinkPayload) -> Self {
        Self {
            id: value.id,
            name: value.name,
            url: value.url,
            color: value.color,
        }
    }
}

/// Created-section payload inside the add-section response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionPayload {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub name: String,
}

impl From<SectionPayload> for Section {
    fn from(value: SectionPayload) -> Self {
        Section::new(value.id, value.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddLinkResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub link: Option<LinkPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddSectionResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub section: Option<SectionPayload>,
}

/// Request contract every persistence caller goes through.
///
/// Implementations are stateless beyond connection/authentication data; the
/// caller owns all optimistic state.
pub trait SyncBackend {
    /// Persists the full section rail order.
    fn reorder_sections(&self, ids: &[SectionId]) -> SyncResult<()>;
    /// Persists one container's full link order (reassigning crossed links).
    fn reorder_links(&self, section_id: &str, link_ids: &[LinkId]) -> SyncResult<()>;
    /// Loads one item's editable fields.
    fn get_item(&self, kind: ItemKind, id: &str) -> SyncResult<ItemDetail>;
    /// Saves edited fields of an existing item.
    fn save_item(&self, request: &SaveItemRequest) -> SyncResult<()>;
    /// Creates one link and returns the stored record.
    fn add_link(&self, request: &AddLinkRequest) -> SyncResult<Link>;
    /// Creates one empty section and returns the stored record.
    fn add_section(&self, name: &str) -> SyncResult<Section>;
    /// Deletes one item.
    fn delete_item(&self, kind: ItemKind, id: &str) -> SyncResult<()>;
    /// Persists the selected theme.
    fn update_theme(&self, theme_id: &str) -> SyncResult<()>;
}
