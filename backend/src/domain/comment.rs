//! Comment documents and the paths that address them.
//!
//! Comments live under a parent document in one of two collections:
//! `pois/{poiId}/comments/{commentId}` (legacy) and
//! `categories/{categoryId}/comments/{commentId}` (current). The
//! [`ParentCollection`] discriminator resolves everything that differs
//! between the two paths so moderation code stays collection agnostic.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Rating;

const COMMENTS_SEGMENT: &str = "comments";

/// Moderation state of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    /// Awaiting moderation; every new comment starts here.
    Pending,
    /// Visible and counted in the parent's rating aggregate.
    Approved,
    /// Hidden by a moderator.
    Rejected,
}

impl CommentStatus {
    /// Stored string form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether a stored status string is exactly this status.
    pub fn matches(self, stored: Option<&str>) -> bool {
        stored == Some(self.as_str())
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for document ids and paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentPathError {
    /// An id was empty.
    EmptyId,
    /// An id contained a `/`.
    SlashInId { id: String },
    /// The path does not have the `{collection}/{id}/comments/{id}` shape.
    Malformed { path: String },
    /// The top-level collection is not one that owns comments.
    UnknownCollection { collection: String },
}

impl fmt::Display for DocumentPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "document id must not be empty"),
            Self::SlashInId { id } => write!(f, "document id must not contain '/': {id}"),
            Self::Malformed { path } => write!(
                f,
                "expected a path like pois/{{poiId}}/comments/{{commentId}}, got {path}"
            ),
            Self::UnknownCollection { collection } => {
                write!(f, "unknown parent collection: {collection}")
            }
        }
    }
}

impl std::error::Error for DocumentPathError {}

/// Opaque document id within a collection.
///
/// ## Invariants
/// - Non-empty and free of `/`, so it is always a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Validate and wrap an id.
    pub fn new(raw: impl Into<String>) -> Result<Self, DocumentPathError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(DocumentPathError::EmptyId);
        }
        if raw.contains('/') {
            return Err(DocumentPathError::SlashInId { id: raw });
        }
        Ok(Self(raw))
    }

    /// Borrow the id.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DocumentPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}

/// Top-level collection owning a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentCollection {
    /// `pois/{poiId}`: legacy comment path, with rating aggregation.
    Pois,
    /// `categories/{categoryId}`: current comment path.
    Categories,
}

impl ParentCollection {
    /// Collection segment used in document paths.
    pub const fn collection_name(self) -> &'static str {
        match self {
            Self::Pois => "pois",
            Self::Categories => "categories",
        }
    }

    /// Payload field that carries the parent id in callable requests.
    pub const fn id_field(self) -> &'static str {
        match self {
            Self::Pois => "poiId",
            Self::Categories => "categoryId",
        }
    }
}

impl FromStr for ParentCollection {
    type Err = DocumentPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pois" => Ok(Self::Pois),
            "categories" => Ok(Self::Categories),
            other => Err(DocumentPathError::UnknownCollection {
                collection: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ParentCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_name())
    }
}

/// Fully qualified address of one comment document.
///
/// # Examples
/// ```
/// use torotoro_backend::domain::{CommentRef, ParentCollection};
///
/// let target: CommentRef = "pois/p1/comments/c9".parse().expect("valid path");
/// assert_eq!(target.parent(), ParentCollection::Pois);
/// assert_eq!(target.parent_id().as_str(), "p1");
/// assert_eq!(target.to_string(), "pois/p1/comments/c9");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentRef {
    parent: ParentCollection,
    parent_id: DocumentId,
    comment_id: DocumentId,
}

impl CommentRef {
    /// Address a comment under the given parent.
    pub fn new(parent: ParentCollection, parent_id: DocumentId, comment_id: DocumentId) -> Self {
        Self {
            parent,
            parent_id,
            comment_id,
        }
    }

    /// Parent collection.
    pub fn parent(&self) -> ParentCollection {
        self.parent
    }

    /// Parent document id.
    pub fn parent_id(&self) -> &DocumentId {
        &self.parent_id
    }

    /// Comment document id.
    pub fn comment_id(&self) -> &DocumentId {
        &self.comment_id
    }

    /// Path of the parent document, e.g. `pois/p1`.
    pub fn parent_path(&self) -> String {
        format!("{}/{}", self.parent.collection_name(), self.parent_id)
    }
}

impl fmt::Display for CommentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{COMMENTS_SEGMENT}/{}",
            self.parent.collection_name(),
            self.parent_id,
            self.comment_id
        )
    }
}

impl FromStr for CommentRef {
    type Err = DocumentPathError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let malformed = || DocumentPathError::Malformed {
            path: path.to_owned(),
        };
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let [collection, parent_id, comments, comment_id] = segments.as_slice() else {
            return Err(malformed());
        };
        if *comments != COMMENTS_SEGMENT {
            return Err(malformed());
        }

        Ok(Self::new(
            collection.parse()?,
            DocumentId::new(*parent_id)?,
            DocumentId::new(*comment_id)?,
        ))
    }
}

/// Field values of a comment document as seen in a change event.
///
/// Every field is optional because clients write comments directly and the
/// store does not enforce a schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentFields {
    /// Raw status string, kept verbatim so unknown values can be detected.
    pub status: Option<String>,
    /// Server-assigned creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Numeric rating; `None` when absent or not a number.
    pub rating: Option<f64>,
    /// Author uid.
    pub user_id: Option<String>,
}

impl CommentFields {
    /// Whether the stored status is exactly `status`.
    pub fn has_status(&self, status: CommentStatus) -> bool {
        status.matches(self.status.as_deref())
    }

    /// Whether the stored rating already equals `rating`.
    pub fn has_rating(&self, rating: Rating) -> bool {
        self.rating == Some(f64::from(rating.value()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("pois/p1/comments/c1", ParentCollection::Pois, "p1", "c1")]
    #[case("categories/food/comments/x", ParentCollection::Categories, "food", "x")]
    #[case("/pois/p1/comments/c1/", ParentCollection::Pois, "p1", "c1")]
    fn parses_comment_paths(
        #[case] path: &str,
        #[case] parent: ParentCollection,
        #[case] parent_id: &str,
        #[case] comment_id: &str,
    ) {
        let target: CommentRef = path.parse().expect("valid path");
        assert_eq!(target.parent(), parent);
        assert_eq!(target.parent_id().as_str(), parent_id);
        assert_eq!(target.comment_id().as_str(), comment_id);
    }

    #[rstest]
    #[case("pois/p1")]
    #[case("pois/p1/replies/c1")]
    #[case("pois/p1/comments/c1/extra/x")]
    #[case("pois//comments/c1")]
    #[case("users/u1/comments/c1")]
    fn rejects_other_paths(#[case] path: &str) {
        assert!(path.parse::<CommentRef>().is_err(), "{path} should not parse");
    }

    #[test]
    fn renders_parent_path() {
        let target = CommentRef::new(
            ParentCollection::Categories,
            DocumentId::new("cat").expect("id"),
            DocumentId::new("c").expect("id"),
        );
        assert_eq!(target.parent_path(), "categories/cat");
    }

    #[rstest]
    #[case(Some("approved"), true)]
    #[case(Some("APPROVED"), false)]
    #[case(None, false)]
    fn status_match_is_exact(#[case] stored: Option<&str>, #[case] expected: bool) {
        let fields = CommentFields {
            status: stored.map(str::to_owned),
            ..CommentFields::default()
        };
        assert_eq!(fields.has_status(CommentStatus::Approved), expected);
    }

    #[test]
    fn document_id_rejects_slashes() {
        assert_eq!(
            DocumentId::new("a/b"),
            Err(DocumentPathError::SlashInId {
                id: "a/b".to_owned()
            })
        );
    }
}
