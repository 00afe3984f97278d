use anyhow::{Result, bail};

use crate::types::Document;

/// Splits a text into chunks
pub trait TextSplitter: Send + Sync {
    fn split_text(&self, text: &str) -> Result<Vec<String>>;
}

/// Split every document, copying its metadata onto each chunk
pub fn split_documents(
    splitter: &dyn TextSplitter,
    documents: Vec<Document>,
) -> Result<Vec<Document>> {
    let mut chunks = Vec::new();
    for document in documents {
        for chunk in splitter.split_text(&document.page_content)? {
            chunks.push(Document {
                page_content: chunk,
                metadata: document.metadata.clone(),
            });
        }
    }
    Ok(chunks)
}

/// Greedy splitter packing separator-delimited pieces into chunks of at most
/// `chunk_size` characters.
///
/// A single piece longer than `chunk_size` becomes a chunk on its own.
/// Consecutive chunks share up to `chunk_overlap` characters worth of trailing
/// pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterTextSplitter {
    separator: String,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for CharacterTextSplitter {
    fn default() -> Self {
        Self {
            separator: "\n\n".to_string(),
            chunk_size: 4000,
            chunk_overlap: 200,
        }
    }
}

impl CharacterTextSplitter {
    /// # Errors
    ///
    /// Returns an error if `chunk_size` is zero or `chunk_overlap` is not
    /// smaller than `chunk_size`.
    pub fn new<S: Into<String>>(separator: S, chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            bail!("chunk size must be greater than zero");
        }
        if chunk_overlap >= chunk_size {
            bail!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                chunk_overlap,
                chunk_size
            );
        }
        Ok(Self {
            separator: separator.into(),
            chunk_size,
            chunk_overlap,
        })
    }

    fn joined_len(&self, pieces: &[&str]) -> usize {
        let text: usize = pieces.iter().map(|p| p.chars().count()).sum();
        text + self.separator.chars().count() * pieces.len().saturating_sub(1)
    }
}

impl TextSplitter for CharacterTextSplitter {
    fn split_text(&self, text: &str) -> Result<Vec<String>> {
        let pieces: Vec<&str> = if self.separator.is_empty() {
            vec![text]
        } else {
            text.split(self.separator.as_str())
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect()
        };

        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for piece in pieces {
            let mut candidate = current.clone();
            candidate.push(piece);
            if !current.is_empty() && self.joined_len(&candidate) > self.chunk_size {
                chunks.push(current.join(&self.separator));

                // keep a tail of the previous chunk as overlap; the tail plus
                // its separator and the next piece must still fit
                let separator_len = self.separator.chars().count();
                while !current.is_empty()
                    && (self.joined_len(&current) > self.chunk_overlap
                        || self.joined_len(&current) + separator_len + piece.chars().count()
                            > self.chunk_size)
                {
                    current.remove(0);
                }
            }
            current.push(piece);
        }
        if !current.is_empty() {
            chunks.push(current.join(&self.separator));
        }
        Ok(chunks)
    }
}
