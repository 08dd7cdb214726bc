//! Recursive character text chunking with position tracking

use std::collections::VecDeque;

use crate::types::{Chunk, ChunkSource, Document};

/// Separators tried in order, from paragraph breaks down to single characters
const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// A trimmed span of the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    /// Span text
    pub text: String,
    /// Start position in characters
    pub char_start: usize,
    /// End position in characters (exclusive)
    pub char_end: usize,
}

/// Contiguous slice of the source text, located by byte offset
#[derive(Debug, Clone, Copy)]
struct Piece<'a> {
    start: usize,
    text: &'a str,
    chars: usize,
}

impl<'a> Piece<'a> {
    fn new(start: usize, text: &'a str) -> Self {
        Self {
            start,
            text,
            chars: text.chars().count(),
        }
    }

    fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Text chunker with configurable size and overlap
///
/// Splits on the coarsest separator present in the text, merges small pieces
/// back together up to `chunk_size`, and recurses into pieces that are still
/// too large with the finer separators. Separators stay attached to the start
/// of the piece that follows them. Sizes are counted in characters.
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Overlap carried into the next chunk
    overlap: usize,
    /// Separators, coarsest first
    separators: Vec<String>,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Chunk a loaded document
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        let source = ChunkSource::from_document(doc);

        self.split_text(&doc.content)
            .into_iter()
            .enumerate()
            .map(|(index, span)| {
                Chunk::new(
                    doc.id,
                    span.text,
                    source.clone(),
                    span.char_start,
                    span.char_end,
                    index as u32,
                )
            })
            .collect()
    }

    /// Split text into trimmed, non-empty spans
    pub fn split_text(&self, text: &str) -> Vec<TextSpan> {
        let separators: Vec<&str> = self.separators.iter().map(String::as_str).collect();
        let mut spans = Vec::new();
        self.split_recursive(text, Piece::new(0, text), &separators, &mut spans);
        spans
    }

    fn split_recursive<'a>(
        &self,
        source: &'a str,
        piece: Piece<'a>,
        separators: &[&str],
        out: &mut Vec<TextSpan>,
    ) {
        // First separator present in the text; "" always matches
        let mut separator = separators.last().copied().unwrap_or("");
        let mut finer: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                separator = sep;
                break;
            }
            if piece.text.contains(sep) {
                separator = sep;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut small: Vec<Piece<'a>> = Vec::new();
        for split in split_keeping_separator(piece, separator) {
            if split.chars < self.chunk_size {
                small.push(split);
                continue;
            }

            if !small.is_empty() {
                self.merge(source, &small, out);
                small.clear();
            }

            if finer.is_empty() {
                push_span(source, split.start, split.end(), out);
            } else {
                self.split_recursive(source, split, finer, out);
            }
        }

        if !small.is_empty() {
            self.merge(source, &small, out);
        }
    }

    /// Greedily merge adjacent pieces into chunks of at most `chunk_size`
    fn merge<'a>(&self, source: &'a str, pieces: &[Piece<'a>], out: &mut Vec<TextSpan>) {
        let mut current: VecDeque<Piece<'a>> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            if total + piece.chars > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total,
                        self.chunk_size
                    );
                }

                if let (Some(first), Some(last)) = (current.front(), current.back()) {
                    push_span(source, first.start, last.end(), out);

                    // Keep at most `overlap` characters of tail, and make room for the next piece
                    while total > self.overlap
                        || (total + piece.chars > self.chunk_size && total > 0)
                    {
                        match current.pop_front() {
                            Some(dropped) => total -= dropped.chars,
                            None => break,
                        }
                    }
                }
            }

            current.push_back(*piece);
            total += piece.chars;
        }

        if let (Some(first), Some(last)) = (current.front(), current.back()) {
            push_span(source, first.start, last.end(), out);
        }
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(500, 100)
    }
}

/// Split a piece on `separator`, keeping each separator at the start of the
/// piece that follows it. An empty separator splits into characters.
fn split_keeping_separator<'a>(piece: Piece<'a>, separator: &str) -> Vec<Piece<'a>> {
    if separator.is_empty() {
        return piece
            .text
            .char_indices()
            .map(|(i, c)| Piece::new(piece.start + i, &piece.text[i..i + c.len_utf8()]))
            .collect();
    }

    let mut splits = Vec::new();
    let mut last = 0usize;
    for (idx, _) in piece.text.match_indices(separator) {
        if idx > last {
            splits.push(Piece::new(piece.start + last, &piece.text[last..idx]));
        }
        last = idx;
    }
    if last < piece.text.len() {
        splits.push(Piece::new(piece.start + last, &piece.text[last..]));
    }

    splits
}

/// Trim `source[start..end]` and record it if anything is left
fn push_span(source: &str, start: usize, end: usize, out: &mut Vec<TextSpan>) {
    let raw = &source[start..end];
    let trimmed_front = raw.trim_start();
    let trimmed = trimmed_front.trim_end();
    if trimmed.is_empty() {
        return;
    }

    let byte_start = start + (raw.len() - trimmed_front.len());
    let char_start = source[..byte_start].chars().count();

    out.push(TextSpan {
        text: trimmed.to_string(),
        char_start,
        char_end: char_start + trimmed.chars().count(),
    });
}
