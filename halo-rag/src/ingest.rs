//! Upload-to-collection ingestion.

use crate::chunking::RecursiveChunker;
use crate::collection::VectorCollection;
use crate::document::{Chunk, Metadata};
use crate::error::{RagError, Result};
use crate::loader::{FileKind, derive_title, load_documents};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{Instrument, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub filename: String,
    pub saved_path: PathBuf,
    pub collection: String,
    pub title: String,
    pub documents: usize,
    pub chunk_ids: Vec<String>,
    /// Records removed by replace-by-title before inserting.
    pub replaced: usize,
}

/// Strip path components and traversal sequences from an uploaded name.
pub fn sanitize_filename(filename: &str) -> String {
    let base = Path::new(filename).file_name().and_then(|n| n.to_str()).unwrap_or(filename);
    let safe = base.replace("..", "").replace(['/', '\\'], "_");
    if safe.trim().is_empty() {
        format!("upload_{}", uuid::Uuid::new_v4().simple())
    } else {
        safe
    }
}

pub struct IngestPipeline {
    collection: VectorCollection,
    chunker: RecursiveChunker,
    uploads_dir: PathBuf,
}

impl IngestPipeline {
    pub fn new(collection: VectorCollection, uploads_dir: impl Into<PathBuf>) -> Self {
        Self { collection, chunker: RecursiveChunker::default(), uploads_dir: uploads_dir.into() }
    }

    pub fn with_chunker(mut self, chunker: RecursiveChunker) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Load and split a file without touching the store. `chunk_index` runs
    /// across every document of the file.
    pub fn prepare_chunks(&self, bytes: &[u8], filename: &str, knowledge_base: &str) -> Result<Vec<Chunk>> {
        if bytes.is_empty() {
            return Err(RagError::EmptyFile(filename.to_string()));
        }
        let kind = FileKind::from_filename(filename)?;
        let source = sanitize_filename(filename);
        let base = Metadata::from([
            ("title".to_string(), derive_title(&source)),
            ("category".to_string(), kind.category()),
            ("source".to_string(), source),
            ("filename".to_string(), filename.to_string()),
            ("knowledge_base".to_string(), knowledge_base.to_string()),
        ]);

        let mut chunks = Vec::new();
        for document in load_documents(bytes, filename, &base)? {
            for piece in self.chunker.split_text(&document.text) {
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_index".to_string(), chunks.len().to_string());
                let mut chunk = Chunk::new(piece, metadata);
                chunk.document_id = document.id.clone();
                chunks.push(chunk);
            }
        }
        Ok(chunks)
    }

    pub async fn save_upload(&self, bytes: &[u8], filename: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.uploads_dir).await?;
        let path = self.uploads_dir.join(sanitize_filename(filename));
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Save, load, chunk and embed one uploaded file into `collection` (or the
    /// default collection). Empty and unsupported files are rejected before
    /// anything is written or embedded.
    pub async fn ingest_bytes(
        &self,
        bytes: &[u8],
        filename: &str,
        collection: Option<&str>,
        update_existing: bool,
    ) -> Result<IngestReport> {
        let target = match collection {
            Some(name) if !name.trim().is_empty() => self.collection.with_name(name),
            _ => self.collection.clone(),
        };
        let span = halo_telemetry::ingest_span(filename, target.name());
        let record_span = span.clone();

        async move {
            let chunks = self.prepare_chunks(bytes, filename, target.name())?;
            let saved_path = self.save_upload(bytes, filename).await?;
            let title = derive_title(&sanitize_filename(filename));
            let documents = chunks
                .iter()
                .map(|c| c.document_id.as_str())
                .collect::<std::collections::HashSet<_>>()
                .len();
            record_span.record("chunks", chunks.len());

            if chunks.is_empty() {
                warn!(filename, "file has no extractable text");
            }

            let replaced = if update_existing && !chunks.is_empty() {
                target.delete_by_metadata_equals("title", &title).await?
            } else {
                0
            };
            let chunk_ids = target.add(chunks).await?;

            info!(
                filename,
                collection = target.name(),
                chunks = chunk_ids.len(),
                replaced,
                "ingested file"
            );
            Ok(IngestReport {
                filename: filename.to_string(),
                saved_path,
                collection: target.name().to_string(),
                title,
                documents,
                chunk_ids,
                replaced,
            })
        }
        .instrument(span)
        .await
    }

    pub async fn ingest_path(
        &self,
        path: &Path,
        collection: Option<&str>,
        update_existing: bool,
    ) -> Result<IngestReport> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| RagError::Validation(format!("invalid file path {}", path.display())))?;
        let bytes = tokio::fs::read(path).await?;
        self.ingest_bytes(&bytes, filename, collection, update_existing).await
    }

    /// Sorted names of saved uploads. A missing directory is an empty list.
    pub async fn list_uploaded_files(&self) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.uploads_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort();
        Ok(files)
    }

    pub async fn files_count(&self) -> usize {
        self.list_uploaded_files().await.map(|f| f.len()).unwrap_or(0)
    }
}
