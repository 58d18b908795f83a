//! Recursive text chunking with exact overlap.
//!
//! [`RecursiveChunker`] splits text into bounded-length segments,
//! preferring semantic boundaries (paragraph breaks, line breaks,
//! sentence-ending punctuation, spaces) and falling back to hard
//! character cuts. Consecutive chunks always share exactly `overlap`
//! characters, so retrieval context survives chunk boundaries and the
//! original text can be reconstructed from the chunk sequence.

use crate::error::{RagError, Result};

/// Boundary candidates in priority order. A chunk ends immediately
/// after the separator, keeping it attached to the preceding text.
const SEPARATORS: [&str; 6] = ["\n\n", "\n", ". ", "! ", "? ", " "];

/// Splits text into overlapping chunks of at most `chunk_size` characters.
///
/// Lengths are counted in Unicode scalar values, so a chunk never cuts
/// through a multi-byte character. For a given input the output is
/// fully deterministic.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(700, 100)?;
/// let chunks = chunker.chunk(&combined_text);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] unless
    /// `0 < overlap < chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if overlap == 0 || overlap >= chunk_size {
            return Err(RagError::InvalidConfiguration(format!(
                "chunk overlap ({overlap}) must be greater than zero and less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    /// Split `text` into chunks.
    ///
    /// Empty input yields an empty vec; input of at most `chunk_size`
    /// characters yields exactly one chunk. Otherwise each chunk after
    /// the first starts exactly `overlap` characters before the end of
    /// its predecessor, so `chunks[0] + chunks[1..][overlap..]`
    /// reconstructs the input.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let window_end = (start + self.chunk_size).min(chars.len());
            if window_end == chars.len() {
                chunks.push(chars[start..].iter().collect());
                break;
            }
            let end = self.split_point(&chars, start, window_end);
            chunks.push(chars[start..end].iter().collect());
            start = end - self.overlap;
        }
        chunks
    }

    /// Choose where the chunk starting at `start` should end.
    ///
    /// Scans backwards from the window end for the highest-priority
    /// separator. A candidate must end strictly after `start + overlap`
    /// so the next chunk's start always advances; if no separator
    /// qualifies, the chunk is hard-cut at the window end.
    fn split_point(&self, chars: &[char], start: usize, window_end: usize) -> usize {
        let floor = start + self.overlap;
        for separator in SEPARATORS {
            let sep: Vec<char> = separator.chars().collect();
            let mut end = window_end;
            while end > floor {
                if end >= sep.len() && end - sep.len() >= start && chars[end - sep.len()..end] == sep[..] {
                    return end;
                }
                end -= 1;
            }
        }
        window_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    #[test]
    fn rejects_zero_overlap() {
        assert!(matches!(
            RecursiveChunker::new(100, 0),
            Err(RagError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_overlap_at_least_chunk_size() {
        assert!(RecursiveChunker::new(100, 100).is_err());
        assert!(RecursiveChunker::new(100, 150).is_err());
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let chunker = RecursiveChunker::new(100, 20).unwrap();
        assert!(chunker.chunk("").is_empty());
    }

    #[test]
    fn short_input_yields_one_chunk() {
        let chunker = RecursiveChunker::new(700, 100).unwrap();
        let chunks = chunker.chunk("A. B. C.");
        assert_eq!(chunks, vec!["A. B. C.".to_string()]);
    }

    #[test]
    fn chunks_respect_size_limit() {
        let chunker = RecursiveChunker::new(50, 10).unwrap();
        let text = "lorem ipsum dolor sit amet ".repeat(20);
        for chunk in chunker.chunk(&text) {
            assert!(char_len(&chunk) <= 50, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn adjacent_chunks_share_exact_overlap() {
        let chunker = RecursiveChunker::new(40, 8).unwrap();
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(10);
        let chunks = chunker.chunk(&text);
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().rev().take(8).collect::<Vec<_>>().into_iter().rev().collect();
            let head: String = pair[1].chars().take(8).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn reconstructs_original_text() {
        let chunker = RecursiveChunker::new(30, 7).unwrap();
        let text = "one two three four five six seven eight nine ten eleven twelve";
        let chunks = chunker.chunk(text);
        let mut rebuilt: String = chunks[0].clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.chars().skip(7));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn prefers_paragraph_breaks() {
        let chunker = RecursiveChunker::new(30, 5).unwrap();
        let text = "first paragraph here\n\nsecond paragraph follows along nicely";
        let chunks = chunker.chunk(text);
        assert!(chunks[0].ends_with("\n\n"), "expected paragraph break, got {:?}", chunks[0]);
    }

    #[test]
    fn hard_cuts_text_without_separators() {
        let chunker = RecursiveChunker::new(10, 3).unwrap();
        let text = "a".repeat(25);
        let chunks = chunker.chunk(&text);
        for chunk in &chunks {
            assert!(char_len(chunk) <= 10);
        }
        let mut rebuilt: String = chunks[0].clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.chars().skip(3));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn never_splits_multibyte_characters() {
        let chunker = RecursiveChunker::new(10, 2).unwrap();
        let text = "héllo wörld çafé ünïcodé tèxt hère ãgain";
        // Would panic on a byte-slicing implementation.
        let chunks = chunker.chunk(text);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(char_len(chunk) <= 10);
        }
    }

    #[test]
    fn is_deterministic() {
        let chunker = RecursiveChunker::new(35, 6).unwrap();
        let text = "Some text. With sentences! And questions? And\nlines.\n\nAnd paragraphs too.";
        assert_eq!(chunker.chunk(text), chunker.chunk(text));
    }
}
