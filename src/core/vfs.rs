//! Virtual file system built from the blog and project collections.
//!
//! Invariant: traversal stops at a [`FileSystemNode::File`]; descending through one is
//! [`LookupError::NotADirectory`]. The tree is immutable once built.

use std::collections::BTreeMap;

use content_source::{ContentError, ContentSource};
use thiserror::Error;

pub const BLOG_DIR: &str = "blog";
pub const PROJECTS_DIR: &str = "projects";

/// Fixed top-level entries. `about`, `contact`, `home` and `terminal` are opaque navigation
/// targets with no children.
pub const TOP_LEVEL_DIRS: [&str; 6] = [BLOG_DIR, PROJECTS_DIR, "about", "contact", "home", "terminal"];

/// Which collection backs a file; the id is the record key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Blog(String),
    Project(String),
}

impl FileContent {
    pub fn id(&self) -> &str {
        match self {
            Self::Blog(id) | Self::Project(id) => id,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Blog(_) => "blog",
            Self::Project(_) => "project",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSystemNode {
    Directory {
        name: String,
        children: BTreeMap<String, FileSystemNode>,
    },
    File {
        name: String,
        content: Option<FileContent>,
    },
}

impl FileSystemNode {
    pub fn directory(name: impl Into<String>) -> Self {
        Self::Directory {
            name: name.into(),
            children: BTreeMap::new(),
        }
    }

    pub fn file(name: impl Into<String>, content: FileContent) -> Self {
        Self::File {
            name: name.into(),
            content: Some(content),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name, .. } | Self::File { name, .. } => name,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    pub fn content(&self) -> Option<&FileContent> {
        match self {
            Self::File { content, .. } => content.as_ref(),
            Self::Directory { .. } => None,
        }
    }

    /// Children of a directory; files have none.
    pub fn children(&self) -> impl Iterator<Item = &FileSystemNode> {
        let children = match self {
            Self::Directory { children, .. } => Some(children.values()),
            Self::File { .. } => None,
        };
        children.into_iter().flatten()
    }

    pub fn child(&self, name: &str) -> Option<&FileSystemNode> {
        match self {
            Self::Directory { children, .. } => children.get(name),
            Self::File { .. } => None,
        }
    }

    fn insert(&mut self, node: FileSystemNode) {
        if let Self::Directory { children, .. } = self {
            children.insert(node.name().to_string(), node);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("No such file or directory")]
    NotFound,
    #[error("Not a directory")]
    NotADirectory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vfs {
    root: FileSystemNode,
}

impl Default for Vfs {
    fn default() -> Self {
        Self::build(std::iter::empty::<String>(), std::iter::empty::<String>())
    }
}

impl Vfs {
    /// Builds the fixed structure with one file per blog id under `blog/` and per project id
    /// under `projects/`.
    pub fn build<B, P>(blog_ids: B, project_ids: P) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let mut blog = FileSystemNode::directory(BLOG_DIR);
        for id in blog_ids {
            let id = id.into();
            blog.insert(FileSystemNode::file(id.clone(), FileContent::Blog(id)));
        }

        let mut projects = FileSystemNode::directory(PROJECTS_DIR);
        for id in project_ids {
            let id = id.into();
            projects.insert(FileSystemNode::file(id.clone(), FileContent::Project(id)));
        }

        let mut root = FileSystemNode::directory("");
        root.insert(blog);
        root.insert(projects);
        for name in &TOP_LEVEL_DIRS[2..] {
            root.insert(FileSystemNode::directory(*name));
        }

        Self { root }
    }

    /// The implicit root directory view.
    pub fn root(&self) -> &FileSystemNode {
        &self.root
    }

    pub fn lookup<S: AsRef<str>>(&self, segments: &[S]) -> Result<&FileSystemNode, LookupError> {
        let mut node = &self.root;
        for segment in segments {
            match node {
                FileSystemNode::Directory { children, .. } => {
                    node = children.get(segment.as_ref()).ok_or(LookupError::NotFound)?;
                }
                FileSystemNode::File { .. } => return Err(LookupError::NotADirectory),
            }
        }
        Ok(node)
    }

    pub fn blog_count(&self) -> usize {
        self.root.child(BLOG_DIR).map_or(0, |dir| dir.children().count())
    }

    pub fn project_count(&self) -> usize {
        self.root.child(PROJECTS_DIR).map_or(0, |dir| dir.children().count())
    }
}

/// Loads both collections and builds the VFS from their id sets.
pub async fn initialize_file_system<C>(source: &C) -> Result<Vfs, ContentError>
where
    C: ContentSource,
{
    let blogs = source.load_blog_collection().await?;
    let projects = source.load_project_collection().await?;
    let vfs = Vfs::build(blogs.into_keys(), projects.into_keys());
    tracing::info!(
        blogs = vfs.blog_count(),
        projects = vfs.project_count(),
        "virtual file system built"
    );
    Ok(vfs)
}
