//! Document loading, chunking and an in-memory passage store.
//!
//! The store ranks chunks by how many query terms they share. It stands in
//! for an embedding index so the whole pipeline runs locally.

use crate::core::{Passage, Retriever};
use crate::error::RetrievalError;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// File extensions picked up when a directory is loaded.
pub const DOCUMENT_EXTENSIONS: [&str; 3] = ["txt", "md", "markdown"];

/// A loaded source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source: String,
    pub text: String,
}

/// Read every file in `paths`. Directories contribute their direct children
/// whose extension is in [`DOCUMENT_EXTENSIONS`]. Blank files are skipped.
#[instrument(target = "quizzify::retrieval", skip(paths))]
pub async fn load_documents(paths: &[PathBuf]) -> Result<Vec<Document>, RetrievalError> {
    let mut documents = Vec::new();
    for path in paths {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| io_error(path, e))?;
        if metadata.is_dir() {
            let mut entries = tokio::fs::read_dir(path).await.map_err(|e| io_error(path, e))?;
            let mut files = Vec::new();
            while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(path, e))? {
                let file = entry.path();
                if file.is_file() && has_document_extension(&file) {
                    files.push(file);
                }
            }
            files.sort();
            for file in files {
                push_document(&mut documents, &file).await?;
            }
        } else {
            push_document(&mut documents, path).await?;
        }
    }

    if documents.is_empty() {
        warn!(target: "quizzify::retrieval", "no documents found");
        return Err(RetrievalError::NoDocuments);
    }
    info!(target: "quizzify::retrieval", count = documents.len(), "loaded documents");
    Ok(documents)
}

async fn push_document(documents: &mut Vec<Document>, path: &Path) -> Result<(), RetrievalError> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| io_error(path, e))?;
    if text.trim().is_empty() {
        debug!(target: "quizzify::retrieval", path = %path.display(), "skipping blank document");
        return Ok(());
    }
    documents.push(Document {
        source: path.display().to_string(),
        text,
    });
    Ok(())
}

fn has_document_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| DOCUMENT_EXTENSIONS.iter().any(|known| e.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

fn io_error(path: &Path, source: std::io::Error) -> RetrievalError {
    RetrievalError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Splits text on a separator and packs the pieces into overlapping chunks.
///
/// Lengths are counted in characters. A piece longer than `chunk_size` is
/// emitted as its own oversized chunk.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    pub separator: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            separator: "\n".to_string(),
            chunk_size: 500,
            chunk_overlap: 100,
        }
    }
}

impl TextSplitter {
    pub fn new(separator: impl Into<String>, chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            separator: separator.into(),
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size),
        }
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let sep_len = self.separator.chars().count();
        let pieces: Vec<&str> = if self.separator.is_empty() {
            vec![text]
        } else {
            text.split(self.separator.as_str()).filter(|p| !p.is_empty()).collect()
        };

        let mut chunks = Vec::new();
        let mut window: Vec<&str> = Vec::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = piece.chars().count();
            let joined_len = |total: usize, window_empty: bool| {
                total + len + if window_empty { 0 } else { sep_len }
            };

            if joined_len(total, window.is_empty()) > self.chunk_size && !window.is_empty() {
                self.emit(&window, &mut chunks);
                // Drop from the front until what remains fits as overlap
                // and leaves room for `piece`.
                while total > self.chunk_overlap
                    || (joined_len(total, window.is_empty()) > self.chunk_size && total > 0)
                {
                    let removed = window.remove(0);
                    total -= removed.chars().count() + if window.is_empty() { 0 } else { sep_len };
                }
            }

            total = joined_len(total, window.is_empty());
            window.push(piece);
        }
        self.emit(&window, &mut chunks);
        chunks
    }

    fn emit(&self, window: &[&str], chunks: &mut Vec<String>) {
        let chunk = window.join(&self.separator);
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
    }
}

/// Lowercased alphanumeric terms of two or more characters.
fn terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

#[derive(Debug, Clone)]
struct Chunk {
    text: String,
    terms: Vec<String>,
}

/// In-memory chunk collection searchable by term overlap.
#[derive(Debug, Clone)]
pub struct PassageStore {
    chunks: Vec<Chunk>,
    k: usize,
}

impl Default for PassageStore {
    fn default() -> Self {
        Self { chunks: Vec::new(), k: 4 }
    }
}

impl PassageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of passages returned per search.
    #[must_use]
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Split every document with `splitter` and index the chunks.
    #[instrument(target = "quizzify::retrieval", skip_all, fields(documents = documents.len()))]
    pub fn from_documents(documents: &[Document], splitter: &TextSplitter) -> Self {
        let mut store = Self::new();
        for document in documents {
            for chunk in splitter.split_text(&document.text) {
                store.add(chunk);
            }
        }
        info!(target: "quizzify::retrieval", chunks = store.len(), "built passage store");
        store
    }

    pub fn add(&mut self, text: impl Into<String>) {
        let text = text.into();
        let terms = terms(&text);
        self.chunks.push(Chunk { text, terms });
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Best `k` chunks for `query`, best first.
    ///
    /// Ranked by distinct query terms matched, then by total occurrences.
    /// Ties keep insertion order. When nothing matches, the first `k` chunks
    /// are returned, so only an empty store yields no passages.
    pub fn rank(&self, query: &str) -> Vec<Passage> {
        let query_terms: HashSet<String> = terms(query).into_iter().collect();

        let mut scored: Vec<(usize, usize, usize)> = self
            .chunks
            .iter()
            .enumerate()
            .filter_map(|(idx, chunk)| {
                let occurrences = chunk
                    .terms
                    .iter()
                    .filter(|t| query_terms.contains(*t))
                    .count();
                if occurrences == 0 {
                    return None;
                }
                let distinct = query_terms
                    .iter()
                    .filter(|q| chunk.terms.contains(*q))
                    .count();
                Some((idx, distinct, occurrences))
            })
            .collect();

        if scored.is_empty() {
            debug!(target: "quizzify::retrieval", query, "no term overlap, using leading chunks");
            return self
                .chunks
                .iter()
                .take(self.k)
                .map(|chunk| Passage::new(chunk.text.clone()))
                .collect();
        }

        scored.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)).then(a.0.cmp(&b.0)));
        scored
            .into_iter()
            .take(self.k)
            .map(|(idx, _, _)| Passage::new(self.chunks[idx].text.clone()))
            .collect()
    }
}

#[async_trait]
impl Retriever for PassageStore {
    async fn search(&self, query: &str) -> Result<Vec<Passage>, RetrievalError> {
        let passages = self.rank(query);
        debug!(
            target: "quizzify::retrieval",
            query,
            hits = passages.len(),
            "searched passage store"
        );
        Ok(passages)
    }
}
