//! Blog post and project collections consumed by the terminal.
//!
//! The terminal only needs the id set of each collection (plus enough of a project record to
//! decide that it exists). Rendering, markdown and network transport stay with the host.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod directory;

pub use directory::DirectoryContentSource;

/// Blog collection keyed by post id.
pub type BlogCollection = BTreeMap<String, BlogRecord>;

/// Project collection keyed by project id.
pub type ProjectCollection = BTreeMap<String, ProjectRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl BlogRecord {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date: None,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
}

impl ProjectRecord {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            demo_url: None,
            repository: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse project record {path}: {source}")]
    ProjectParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("content source unavailable: {0}")]
    Unavailable(String),
}

impl ContentError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Loader contract for the two collections. Either load may fail; callers decide the fallback.
pub trait ContentSource {
    fn load_blog_collection(
        &self,
    ) -> impl Future<Output = Result<BlogCollection, ContentError>> + Send;

    fn load_project_collection(
        &self,
    ) -> impl Future<Output = Result<ProjectCollection, ContentError>> + Send;
}

/// In-memory collections, handed over as-is.
#[derive(Debug, Clone, Default)]
pub struct StaticContentSource {
    blogs: BlogCollection,
    projects: ProjectCollection,
}

impl StaticContentSource {
    pub fn new(
        blogs: impl IntoIterator<Item = BlogRecord>,
        projects: impl IntoIterator<Item = ProjectRecord>,
    ) -> Self {
        Self {
            blogs: blogs
                .into_iter()
                .map(|record| (record.id.clone(), record))
                .collect(),
            projects: projects
                .into_iter()
                .map(|record| (record.id.clone(), record))
                .collect(),
        }
    }

    /// Builds a source from bare ids, titling each record after its id.
    pub fn from_ids<'a>(
        blog_ids: impl IntoIterator<Item = &'a str>,
        project_ids: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::new(
            blog_ids.into_iter().map(|id| BlogRecord::new(id, id)),
            project_ids.into_iter().map(|id| ProjectRecord::new(id, id)),
        )
    }
}

impl ContentSource for StaticContentSource {
    async fn load_blog_collection(&self) -> Result<BlogCollection, ContentError> {
        Ok(self.blogs.clone())
    }

    async fn load_project_collection(&self) -> Result<ProjectCollection, ContentError> {
        Ok(self.projects.clone())
    }
}

/// A source whose loads always fail, for exercising host fallbacks.
#[derive(Debug, Clone)]
pub struct UnavailableContentSource {
    reason: String,
}

impl UnavailableContentSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ContentSource for UnavailableContentSource {
    async fn load_blog_collection(&self) -> Result<BlogCollection, ContentError> {
        Err(ContentError::Unavailable(self.reason.clone()))
    }

    async fn load_project_collection(&self) -> Result<ProjectCollection, ContentError> {
        Err(ContentError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_source_keys_records_by_id() {
        let source = StaticContentSource::from_ids(["neon-nights", "ghost-protocol"], ["deck"]);

        let blogs = source.load_blog_collection().await.expect("blogs");
        let projects = source.load_project_collection().await.expect("projects");

        assert_eq!(
            blogs.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["ghost-protocol", "neon-nights"]
        );
        assert_eq!(projects["deck"].title, "deck");
    }

    #[tokio::test]
    async fn unavailable_source_fails_both_loads() {
        let source = UnavailableContentSource::new("offline");
        let error = source.load_blog_collection().await.unwrap_err();
        assert_eq!(error.to_string(), "content source unavailable: offline");
        assert!(source.load_project_collection().await.is_err());
    }
}
