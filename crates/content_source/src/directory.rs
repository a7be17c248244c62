use std::path::{Path, PathBuf};

use crate::{
    BlogCollection, BlogRecord, ContentError, ContentSource, ProjectCollection, ProjectRecord,
};

const BLOG_DIR: &str = "blog";
const PROJECTS_DIR: &str = "projects";
const BLOG_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Reads collections from a content root laid out as `blog/<id>.md[x]` and
/// `projects/<id>.json`. A missing subdirectory is an empty collection.
#[derive(Debug, Clone)]
pub struct DirectoryContentSource {
    root: PathBuf,
}

impl DirectoryContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentSource for DirectoryContentSource {
    async fn load_blog_collection(&self) -> Result<BlogCollection, ContentError> {
        let mut collection = BlogCollection::new();
        for (id, path) in list_files(&self.root.join(BLOG_DIR), &BLOG_EXTENSIONS).await? {
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| ContentError::io("reading blog post", &path, source))?;
            let record = parse_blog_header(&id, &text);
            collection.insert(id, record);
        }

        tracing::debug!(count = collection.len(), root = %self.root.display(), "loaded blog collection");
        Ok(collection)
    }

    async fn load_project_collection(&self) -> Result<ProjectCollection, ContentError> {
        let mut collection = ProjectCollection::new();
        for (id, path) in list_files(&self.root.join(PROJECTS_DIR), &["json"]).await? {
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| ContentError::io("reading project record", &path, source))?;
            let mut record: ProjectRecord = serde_json::from_str(&text)
                .map_err(|source| ContentError::ProjectParse {
                    path: path.clone(),
                    source,
                })?;
            if record.id.is_empty() {
                record.id = id.clone();
            }
            collection.insert(record.id.clone(), record);
        }

        tracing::debug!(count = collection.len(), root = %self.root.display(), "loaded project collection");
        Ok(collection)
    }
}

async fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<(String, PathBuf)>, ContentError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(ContentError::io("listing directory", dir, source)),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|source| ContentError::io("listing directory", dir, source))?
    {
        let path = entry.path();
        let matches_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext));
        if !matches_extension {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        files.push((stem.to_string(), path.clone()));
    }

    files.sort();
    Ok(files)
}

/// Pulls `title:`/`date:` out of a `---` front matter block, falling back to the first
/// `# ` heading and then to the id.
fn parse_blog_header(id: &str, text: &str) -> BlogRecord {
    let mut record = BlogRecord::new(id, id);
    let mut lines = text.lines();
    let mut title = None;

    if text.starts_with("---") {
        lines.next();
        for line in lines.by_ref() {
            let line = line.trim();
            if line == "---" {
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                let value = value.trim().trim_matches('"').to_string();
                match key.trim() {
                    "title" if !value.is_empty() => title = Some(value),
                    "date" if !value.is_empty() => record.date = Some(value),
                    _ => {}
                }
            }
        }
    }

    if title.is_none() {
        title = lines
            .map(str::trim)
            .find_map(|line| line.strip_prefix("# "))
            .map(|heading| heading.trim().to_string());
    }

    if let Some(title) = title {
        record.title = title;
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn front_matter_title_wins_over_heading() {
        let record = parse_blog_header(
            "neon",
            "---\ntitle: \"Neon Nights\"\ndate: 2077-11-17\n---\n# Other\nbody",
        );
        assert_eq!(record.title, "Neon Nights");
        assert_eq!(record.date.as_deref(), Some("2077-11-17"));
    }

    #[test]
    fn heading_then_id_fallbacks() {
        assert_eq!(parse_blog_header("a", "intro\n# Jacking In\n").title, "Jacking In");
        assert_eq!(parse_blog_header("plain-id", "no heading").title, "plain-id");
    }

    #[tokio::test]
    async fn loads_collections_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("blog")).expect("blog dir");
        fs::create_dir_all(dir.path().join("projects")).expect("projects dir");
        fs::write(dir.path().join("blog/ghost-protocol.mdx"), "# Ghost Protocol\n").expect("post");
        fs::write(dir.path().join("blog/notes.txt"), "ignored").expect("txt");
        fs::write(
            dir.path().join("projects/deck.json"),
            r#"{"title":"Cyberdeck","demo_url":"https://example.test/deck"}"#,
        )
        .expect("project");

        let source = DirectoryContentSource::new(dir.path());
        let blogs = source.load_blog_collection().await.expect("blogs");
        let projects = source.load_project_collection().await.expect("projects");

        assert_eq!(blogs.keys().collect::<Vec<_>>(), vec!["ghost-protocol"]);
        assert_eq!(blogs["ghost-protocol"].title, "Ghost Protocol");
        assert_eq!(projects["deck"].id, "deck");
        assert_eq!(
            projects["deck"].demo_url.as_deref(),
            Some("https://example.test/deck")
        );
    }

    #[tokio::test]
    async fn missing_directories_are_empty_collections() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = DirectoryContentSource::new(dir.path().join("nope"));
        assert!(source.load_blog_collection().await.expect("blogs").is_empty());
        assert!(source.load_project_collection().await.expect("projects").is_empty());
    }

    #[tokio::test]
    async fn malformed_project_json_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("projects")).expect("projects dir");
        fs::write(dir.path().join("projects/bad.json"), "{").expect("project");

        let error = DirectoryContentSource::new(dir.path())
            .load_project_collection()
            .await
            .unwrap_err();
        assert!(matches!(error, ContentError::ProjectParse { .. }));
    }
}
