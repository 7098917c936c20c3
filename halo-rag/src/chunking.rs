//! Recursive character splitting with overlap.
//!
//! Lengths are measured in characters, not bytes. The splitter tries each
//! separator in turn (paragraph, line, word) and only falls back to single
//! characters when a piece has no natural boundary left.

use crate::document::{Chunk, Document, Metadata};
use std::collections::VecDeque;

pub const CHUNK_SIZE: usize = 1000;
pub const CHUNK_OVERLAP: usize = 200;

pub trait Chunker: Send + Sync {
    /// Split a document. Every chunk carries the document metadata plus a
    /// sequential `chunk_index` starting at 0.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self::new(CHUNK_SIZE, CHUNK_OVERLAP)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl RecursiveChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            chunk_overlap: chunk_overlap.min(chunk_size.saturating_sub(1)),
            separators: vec!["\n\n".into(), "\n".into(), " ".into(), String::new()],
        }
    }

    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.split_recursive(text, &self.separators)
    }

    /// Split `text` and attach `base` metadata to every piece. `chunk_index`
    /// is written last, so a base key of the same name never wins.
    pub fn chunk_with_metadata(&self, text: &str, base: &Metadata) -> Vec<Chunk> {
        self.split_text(text)
            .into_iter()
            .enumerate()
            .map(|(index, piece)| {
                let mut metadata = base.clone();
                metadata.insert("chunk_index".to_string(), index.to_string());
                Chunk::new(piece, metadata)
            })
            .collect()
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().cloned().unwrap_or_default();
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = String::new();
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate.clone();
                remaining = &separators[i + 1..];
                break;
            }
        }

        let splits: Vec<&str> = if separator.is_empty() {
            text.char_indices().map(|(i, c)| &text[i..i + c.len_utf8()]).collect()
        } else {
            text.split(separator.as_str()).filter(|s| !s.is_empty()).collect()
        };

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        for split in splits {
            if char_len(split) < self.chunk_size {
                pending.push(split);
                continue;
            }
            if !pending.is_empty() {
                chunks.extend(self.merge_splits(&pending, &separator));
                pending.clear();
            }
            if remaining.is_empty() {
                chunks.push(split.to_string());
            } else {
                chunks.extend(self.split_recursive(split, remaining));
            }
        }
        if !pending.is_empty() {
            chunks.extend(self.merge_splits(&pending, &separator));
        }
        chunks
    }

    /// Greedily pack splits into windows of at most `chunk_size`, carrying up
    /// to `chunk_overlap` characters of trailing splits into the next window.
    fn merge_splits(&self, splits: &[&str], separator: &str) -> Vec<String> {
        let separator_len = char_len(separator);
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        let join = |parts: &VecDeque<&str>| -> Option<String> {
            let joined = parts.iter().copied().collect::<Vec<_>>().join(separator);
            let trimmed = joined.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        for split in splits {
            let len = char_len(split);
            let joiner = if current.is_empty() { 0 } else { separator_len };
            if total + len + joiner > self.chunk_size && !current.is_empty() {
                if let Some(doc) = join(&current) {
                    docs.push(doc);
                }
                while total > self.chunk_overlap
                    || (total > 0
                        && total + len + if current.is_empty() { 0 } else { separator_len }
                            > self.chunk_size)
                {
                    let Some(front) = current.front() else { break };
                    let drop = char_len(front) + if current.len() > 1 { separator_len } else { 0 };
                    total = total.saturating_sub(drop);
                    current.pop_front();
                }
            }
            current.push_back(split);
            total += len + if current.len() > 1 { separator_len } else { 0 };
        }
        if let Some(doc) = join(&current) {
            docs.push(doc);
        }
        docs
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        self.chunk_with_metadata(&document.text, &document.metadata)
            .into_iter()
            .map(|mut chunk| {
                chunk.document_id = document.id.clone();
                chunk
            })
            .collect()
    }
}

/// Split with the default 1000/200 window.
pub fn chunk_text(text: &str, metadata: &Metadata) -> Vec<Chunk> {
    RecursiveChunker::default().chunk_with_metadata(text, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn meta(pairs: &[(&str, &str)]) -> Metadata {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_blank_input_yields_nothing() {
        assert!(chunk_text("", &Metadata::new()).is_empty());
        assert!(chunk_text(" \n\t ", &Metadata::new()).is_empty());
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = chunk_text("Pengiriman memakan waktu 2-3 hari.", &meta(&[("filename", "faq.txt")]));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata["filename"], "faq.txt");
        assert_eq!(chunks[0].chunk_index(), Some(0));
    }

    #[test]
    fn test_chunk_index_not_overwritten_by_base() {
        let chunks = chunk_text("hello", &meta(&[("chunk_index", "99")]));
        assert_eq!(chunks[0].metadata["chunk_index"], "0");
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let chunker = RecursiveChunker::new(20, 5);
        let pieces = chunker.split_text("first paragraph\n\nsecond paragraph");
        assert_eq!(pieces, vec!["first paragraph", "second paragraph"]);
    }

    #[test]
    fn test_words_overlap_between_windows() {
        let chunker = RecursiveChunker::new(10, 4);
        let pieces = chunker.split_text("aa bb cc dd ee ff");
        assert_eq!(pieces, vec!["aa bb cc", "cc dd ee", "ee ff"]);
    }

    #[test]
    fn test_hard_cut_without_boundaries() {
        let chunker = RecursiveChunker::new(10, 2);
        let pieces = chunker.split_text(&"x".repeat(25));
        assert!(pieces.len() >= 3);
        assert!(pieces.iter().all(|p| p.chars().count() <= 10));
    }

    #[test]
    fn test_long_text_respects_window() {
        let text = "Kebijakan pengembalian barang berlaku 30 hari. ".repeat(100);
        let chunks = chunk_text(&text, &Metadata::new());
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= CHUNK_SIZE));
    }

    #[test]
    fn test_document_chunks_carry_document_id() {
        let doc = Document::new("a b c", meta(&[("title", "Faq")]));
        let chunks = RecursiveChunker::default().chunk(&doc);
        assert_eq!(chunks[0].document_id, doc.id);
        assert_eq!(chunks[0].metadata["title"], "Faq");
    }

    proptest! {
        #[test]
        fn chunk_indices_are_contiguous(text in "[a-z \n]{0,3000}") {
            let chunks = chunk_text(&text, &Metadata::new());
            let indices: Vec<usize> = chunks.iter().filter_map(Chunk::chunk_index).collect();
            prop_assert_eq!(indices, (0..chunks.len()).collect::<Vec<_>>());
        }

        #[test]
        fn chunking_is_deterministic(text in "[a-zA-Z .\n]{0,2500}") {
            let a = chunk_text(&text, &Metadata::new());
            let b = chunk_text(&text, &Metadata::new());
            prop_assert_eq!(a, b);
        }

        #[test]
        fn chunks_never_exceed_window(text in "[a-z \n]{0,3000}") {
            let chunker = RecursiveChunker::new(100, 20);
            for piece in chunker.split_text(&text) {
                prop_assert!(piece.chars().count() <= 100);
            }
        }
    }
}
