//! Discovery and chunking of a directory tree of JSON documents.
//!
//! Every `*.json` file under the root is parsed, flattened into its string
//! leaves, and each leaf longer than the minimum (after trimming) becomes a
//! [`Chunk`](crate::types::Chunk). Files that cannot be read or parsed are
//! skipped without affecting the rest of the load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::config::CorpusSettings;
use crate::extract::extract_strings;
use crate::types::Corpus;

pub const DEFAULT_MIN_CHARS: usize = 20;
pub const DEFAULT_EXTENSION: &str = "json";

/// Why a discovered file contributed nothing to the corpus.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("read failed: {0}")]
    Read(#[from] io::Error),
    #[error("not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result of loading a single file.
#[derive(Debug)]
pub enum FileOutcome {
    Loaded { path: PathBuf, texts: Vec<String> },
    Skipped { path: PathBuf, reason: SkipReason },
}

/// Counters for one corpus load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub files_scanned: usize,
    pub files_loaded: usize,
    pub files_skipped: usize,
    pub chunks: usize,
}

#[derive(Debug, Clone)]
pub struct CorpusLoader {
    min_chars: usize,
    extension: String,
}

impl Default for CorpusLoader {
    fn default() -> Self {
        Self { min_chars: DEFAULT_MIN_CHARS, extension: DEFAULT_EXTENSION.to_string() }
    }
}

impl CorpusLoader {
    pub fn new() -> Self { Self::default() }

    pub fn from_settings(settings: &CorpusSettings) -> Self {
        Self { min_chars: settings.min_chars, extension: settings.extension.clone() }
    }

    /// Fragments are kept only when their trimmed length exceeds `min_chars`.
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn load(&self, root: &Path) -> Corpus {
        self.load_with_report(root).0
    }

    pub fn load_with_report(&self, root: &Path) -> (Corpus, LoadReport) {
        let files = self.list_files(root);
        let mut corpus = Corpus::new(root);
        let mut report = LoadReport { files_scanned: files.len(), ..LoadReport::default() };

        for file_path in files {
            match self.read_file(file_path) {
                FileOutcome::Loaded { path, texts } => {
                    report.files_loaded += 1;
                    let source = path.display().to_string();
                    for text in texts {
                        corpus.push(source.as_str(), text);
                    }
                }
                FileOutcome::Skipped { path, reason } => {
                    report.files_skipped += 1;
                    debug!(path = %path.display(), %reason, "skipping file");
                }
            }
        }
        report.chunks = corpus.len();
        info!(
            root = %root.display(),
            files = report.files_scanned,
            skipped = report.files_skipped,
            chunks = report.chunks,
            "corpus loaded"
        );
        (corpus, report)
    }

    /// Parses one file and returns its surviving, trimmed fragments in document order.
    pub fn read_file(&self, path: PathBuf) -> FileOutcome {
        let parsed = fs::read(&path)
            .map_err(SkipReason::from)
            .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).map_err(SkipReason::from));
        match parsed {
            Ok(value) => {
                let texts = extract_strings(&value)
                    .into_iter()
                    .map(str::trim)
                    .filter(|t| self.keeps(t))
                    .map(str::to_string)
                    .collect();
                FileOutcome::Loaded { path, texts }
            }
            Err(reason) => FileOutcome::Skipped { path, reason },
        }
    }

    fn keeps(&self, trimmed: &str) -> bool {
        trimmed.chars().count() > self.min_chars
    }

    /// Files under `root` with the configured extension, sorted; hidden entries are not descended into.
    /// Symlinks are followed, so linked files and directories are included; link loops are dropped.
    pub fn list_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some(self.extension.as_str()))
            .map(DirEntry::into_path)
            .collect();
        files.sort();
        files
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|s| s.starts_with('.'))
}
