//! Fixed-width character chunking of resume text

use crate::error::{Result, ResumeAnalyzerError};
use serde::{Deserialize, Serialize};

/// A contiguous slice of the source text. Offsets count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: usize,
    pub content: String,
    pub start_index: usize,
    pub end_index: usize,
}

impl Chunk {
    pub fn char_len(&self) -> usize {
        self.end_index - self.start_index
    }
}

/// Split `text` into consecutive chunks of at most `chunk_size` characters.
///
/// Splitting is by raw character offset with no regard for word or sentence
/// boundaries, so concatenating the chunks reproduces `text` exactly. Empty
/// text yields no chunks.
pub fn split_into_chunks(text: &str, chunk_size: usize) -> Result<Vec<Chunk>> {
    if chunk_size == 0 {
        return Err(ResumeAnalyzerError::InvalidInput(
            "Chunk size must be greater than zero".to_string(),
        ));
    }

    let mut chunks = Vec::new();
    let mut start_byte = 0;
    let mut start_index = 0;
    let mut count = 0;

    for (byte_idx, _) in text.char_indices() {
        if count == chunk_size {
            chunks.push(Chunk {
                chunk_id: chunks.len(),
                content: text[start_byte..byte_idx].to_string(),
                start_index,
                end_index: start_index + count,
            });
            start_byte = byte_idx;
            start_index += count;
            count = 0;
        }
        count += 1;
    }

    if count > 0 {
        chunks.push(Chunk {
            chunk_id: chunks.len(),
            content: text[start_byte..].to_string(),
            start_index,
            end_index: start_index + count,
        });
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(chunks: &[Chunk]) -> String {
        chunks.iter().map(|c| c.content.as_str()).collect()
    }

    #[test]
    fn test_chunk_count_is_ceiling() {
        for (len, size, expected) in [(1, 3000, 1), (2999, 3000, 1), (3000, 3000, 1), (3001, 3000, 2), (9000, 3000, 3), (10, 3, 4)] {
            let text = "x".repeat(len);
            let chunks = split_into_chunks(&text, size).unwrap();
            assert_eq!(chunks.len(), expected, "len={} size={}", len, size);
            assert!(chunks.iter().all(|c| c.char_len() <= size));
            assert_eq!(joined(&chunks), text);
        }
    }

    #[test]
    fn test_seven_thousand_chars() {
        let text: String = (0..7000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = split_into_chunks(&text, 3000).unwrap();

        let lengths: Vec<usize> = chunks.iter().map(|c| c.content.chars().count()).collect();
        assert_eq!(lengths, vec![3000, 3000, 1000]);
        assert_eq!(chunks[1].start_index, 3000);
        assert_eq!(chunks[2].end_index, 7000);
        assert_eq!(chunks.iter().map(|c| c.chunk_id).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(joined(&chunks), text);
    }

    #[test]
    fn test_ignores_word_boundaries() {
        let chunks = split_into_chunks("hello world", 4).unwrap();
        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["hell", "o wo", "rld"]);
    }

    #[test]
    fn test_multibyte_characters_not_split() {
        let text = "Zoë Müller, Ingénieure 数据";
        let chunks = split_into_chunks(text, 5).unwrap();
        assert!(chunks.iter().all(|c| c.content.chars().count() <= 5));
        assert_eq!(joined(&chunks), text);
        assert_eq!(chunks.len(), (text.chars().count() + 4) / 5);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(split_into_chunks("", 3000).unwrap().is_empty());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(split_into_chunks("abc", 0).is_err());
    }
}
