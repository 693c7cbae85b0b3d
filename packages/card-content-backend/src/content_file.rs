/// File-backed card document.
///
/// Keeps the parsed document in memory and persists it with:
/// - Atomic writes (write to .tmp, rename)
/// - A write mutex so concurrent PUTs never interleave
/// - A content-hash ETag, stable across restarts
/// - A per-process version counter for logs and /status
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use card_content_core::error::ValidationError;
use card_content_core::types::CardContent;
use sha2::{Digest, Sha256};

#[derive(Debug, thiserror::Error)]
pub enum ContentFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed card content in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid card content: {0}")]
    Invalid(#[from] ValidationError),
}

struct Current {
    content: CardContent,
    content_hash: String,
}

pub struct ContentFile {
    path: PathBuf,
    current: RwLock<Current>,
    write_lock: Mutex<()>,
    version: AtomicU64,
}

impl ContentFile {
    /// Open the document at `path`. A missing file starts as an empty catalog
    /// and is created on the first write.
    pub fn open(path: &Path) -> Result<Self, ContentFileError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| ContentFileError::Parse {
                path: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    target: "card_content.storage",
                    "No card content at {}, starting empty",
                    path.display()
                );
                CardContent::default()
            }
            Err(e) => return Err(e.into()),
        };
        let content_hash = Self::content_hash(&content);
        Ok(Self {
            path: path.to_path_buf(),
            current: RwLock::new(Current {
                content,
                content_hash,
            }),
            write_lock: Mutex::new(()),
            version: AtomicU64::new(1),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// SHA-256 over the canonical JSON encoding.
    fn content_hash(content: &CardContent) -> String {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(content).unwrap_or_default());
        hex::encode(hasher.finalize())
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Current document and its ETag.
    pub fn read(&self) -> (CardContent, String) {
        let current = self.current.read().unwrap_or_else(|e| e.into_inner());
        (current.content.clone(), Self::etag_for(&current.content_hash))
    }

    /// Quoted ETag derived from the document's content hash.
    pub fn etag(&self) -> String {
        let current = self.current.read().unwrap_or_else(|e| e.into_inner());
        Self::etag_for(&current.content_hash)
    }

    fn etag_for(content_hash: &str) -> String {
        format!("\"{}\"", &content_hash[..16])
    }

    /// Replace the whole document. Returns the new version; writing an
    /// identical document keeps the version unchanged.
    pub fn replace(&self, content: CardContent) -> Result<u64, ContentFileError> {
        content.card_content.validate()?;

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let content_hash = Self::content_hash(&content);
        {
            let current = self.current.read().unwrap_or_else(|e| e.into_inner());
            if current.content_hash == content_hash && self.path.exists() {
                return Ok(self.version());
            }
        }

        let json = serde_json::to_string_pretty(&content).map_err(|source| {
            ContentFileError::Parse {
                path: self.path.display().to_string(),
                source,
            }
        })?;
        Self::atomic_write(&self.path, &json)?;

        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Current {
            content,
            content_hash,
        };
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!(
            target: "card_content.storage",
            "Wrote card content to {} (version {})",
            self.path.display(),
            version
        );
        Ok(version)
    }

    /// Write via temp file + rename so readers never see a partial document.
    fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_content_core::types::{NamedCardSection, ProfileCard, ProfileTypeSection};

    fn crew_mate() -> CardContent {
        let mut content = CardContent::default();
        content.card_content.profile_types.push(ProfileTypeSection {
            section_type: "CrewMate".to_string(),
            cards: vec![ProfileCard {
                id: "dev001".to_string(),
                description: "Review my PR".to_string(),
                source: "github".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        });
        content
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = ContentFile::open(&dir.path().join("cards.json")).unwrap();
        let (content, etag) = file.read();
        assert_eq!(content, CardContent::default());
        assert_eq!(file.version(), 1);
        assert_eq!(etag.len(), 18);
    }

    #[test]
    fn test_replace_persists_and_bumps_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");
        let file = ContentFile::open(&path).unwrap();

        let version = file.replace(crew_mate()).unwrap();
        assert_eq!(version, 2);
        assert!(!path.with_extension("json.tmp").exists());

        let reopened = ContentFile::open(&path).unwrap();
        assert_eq!(reopened.read().0, crew_mate());
    }

    #[test]
    fn test_etag_follows_content_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");
        let file = ContentFile::open(&path).unwrap();
        let empty_etag = file.etag();
        file.replace(crew_mate()).unwrap();
        let saved_etag = file.etag();
        assert_ne!(empty_etag, saved_etag);

        let reopened = ContentFile::open(&path).unwrap();
        assert_eq!(reopened.version(), 1);
        assert_eq!(reopened.etag(), saved_etag);
        assert_ne!(reopened.etag(), empty_etag);
    }

    #[test]
    fn test_identical_replace_keeps_version() {
        let dir = tempfile::tempdir().unwrap();
        let file = ContentFile::open(&dir.path().join("cards.json")).unwrap();
        let first = file.replace(crew_mate()).unwrap();
        let second = file.replace(crew_mate()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_replace_rejects_duplicate_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");
        let file = ContentFile::open(&path).unwrap();
        let mut content = crew_mate();
        for _ in 0..2 {
            content.card_content.home_cards.push(NamedCardSection {
                section_type: "welcome".to_string(),
                ..Default::default()
            });
        }
        assert!(matches!(
            file.replace(content),
            Err(ContentFileError::Invalid(_))
        ));
        assert!(!path.exists());
        assert_eq!(file.version(), 1);
    }

    #[test]
    fn test_open_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ContentFile::open(&path),
            Err(ContentFileError::Parse { .. })
        ));
    }
}
