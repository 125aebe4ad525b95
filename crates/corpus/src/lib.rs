use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;

/// One source document, read as plain text and tagged with its class.
#[derive(Debug, Clone)]
pub struct Document {
    /// Document class, i.e. the name of the folder it came from.
    pub class: String,
    pub source: PathBuf,
    /// File name without extension; artifact files are named after this.
    pub stem: String,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("corpus class directory {0:?} is not readable: {1}")]
    ClassDir(PathBuf, #[source] std::io::Error),
}

/// Read every plain-text file in `<root>/<class>/`, sorted by file name so
/// batch order is deterministic across runs.
///
/// A file that cannot be read as UTF-8 text is skipped with a warning; the
/// rest of the class is still returned.
pub async fn read_class_dir(root: &Path, class: &str) -> Result<Vec<Document>, CorpusError> {
    let dir = root.join(class);
    let mut entries = fs::read_dir(&dir)
        .await
        .map_err(|e| CorpusError::ClassDir(dir.clone(), e))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CorpusError::ClassDir(dir.clone(), e))?
    {
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        match fs::read_to_string(&path).await {
            Ok(text) => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                documents.push(Document {
                    class: class.to_string(),
                    source: path,
                    stem,
                    text: text.trim_end().to_string(),
                });
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable document");
            }
        }
    }

    Ok(documents)
}

/// Read all documents for the given classes, concatenated in class order.
/// Within a class, documents keep the name order of [`read_class_dir`].
pub async fn read_corpus(root: &Path, classes: &[String]) -> Result<Vec<Document>, CorpusError> {
    let mut documents = Vec::new();
    for class in classes {
        documents.extend(read_class_dir(root, class).await?);
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn reads_class_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let class_dir = dir.path().join("project_briefs");
        fs::create_dir(&class_dir).unwrap();
        fs::write(class_dir.join("b.txt"), "second\n").unwrap();
        fs::write(class_dir.join("a.txt"), "first\n").unwrap();

        let docs = read_class_dir(dir.path(), "project_briefs").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].stem, "a");
        assert_eq!(docs[0].text, "first");
        assert_eq!(docs[1].stem, "b");
        assert_eq!(docs[1].class, "project_briefs");
    }

    #[tokio::test]
    async fn corpus_concatenates_classes_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for (class, file) in [("project_briefs", "p.txt"), ("slack_messages", "s.txt")] {
            let class_dir = dir.path().join(class);
            fs::create_dir(&class_dir).unwrap();
            fs::write(class_dir.join(file), "text").unwrap();
        }

        let classes = vec!["project_briefs".to_string(), "slack_messages".to_string()];
        let docs = read_corpus(dir.path(), &classes).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].class, "project_briefs");
        assert_eq!(docs[1].class, "slack_messages");
    }

    #[tokio::test]
    async fn missing_class_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_class_dir(dir.path(), "nope").await;
        assert!(matches!(result, Err(CorpusError::ClassDir(_, _))));
    }

    #[tokio::test]
    async fn skips_non_utf8_files() {
        let dir = tempfile::tempdir().unwrap();
        let class_dir = dir.path().join("slack_messages");
        fs::create_dir(&class_dir).unwrap();
        fs::write(class_dir.join("good.txt"), "hello").unwrap();
        fs::write(class_dir.join("bad.txt"), [0xff, 0xfe, 0x00]).unwrap();

        let docs = read_class_dir(dir.path(), "slack_messages").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].stem, "good");
    }
}
