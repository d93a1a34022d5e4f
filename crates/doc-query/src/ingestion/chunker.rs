//! Sentence-bounded text chunking with overlap

use unicode_segmentation::UnicodeSegmentation;

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Target chunk size in bytes of UTF-8 text
    chunk_size: usize,
    /// Bytes of overlap carried into the next chunk
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap: overlap.min(chunk_size / 2),
        }
    }

    /// Split `text` into chunks, never breaking inside a sentence unless the
    /// sentence alone exceeds the chunk size
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for sentence in text.split_sentence_bounds() {
            if !current.is_empty() && current.len() + sentence.len() > self.chunk_size {
                push_trimmed(&mut chunks, &current);
                current = self.overlap_text(&current);
            }

            if sentence.len() > self.chunk_size {
                for piece in self.split_long(sentence) {
                    if !current.is_empty() && current.len() + piece.len() > self.chunk_size {
                        push_trimmed(&mut chunks, &current);
                        current = self.overlap_text(&current);
                    }
                    current.push_str(piece);
                }
                continue;
            }

            current.push_str(sentence);
        }

        push_trimmed(&mut chunks, &current);
        chunks
    }

    /// Break an oversized sentence on word boundaries
    fn split_long<'a>(&self, sentence: &'a str) -> Vec<&'a str> {
        let mut pieces = Vec::new();
        let mut start = 0;
        let mut end = 0;

        for (idx, word) in sentence.split_word_bound_indices() {
            let word_end = idx + word.len();
            if word_end - start > self.chunk_size && end > start {
                pieces.push(&sentence[start..end]);
                start = end;
            }
            end = word_end;
        }
        if start < sentence.len() {
            pieces.push(&sentence[start..]);
        }

        pieces
    }

    /// Get overlap text from the end of a chunk
    fn overlap_text(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }
        if text.len() <= self.overlap {
            return text.to_string();
        }

        let mut start = text.len().saturating_sub(self.overlap);
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }

        let tail = &text[start..];

        // Prefer starting on a sentence, then a word
        if let Some(pos) = tail.find(". ") {
            return tail[pos + 2..].to_string();
        }
        if let Some(pos) = tail.find(' ') {
            return tail[pos + 1..].to_string();
        }

        tail.to_string()
    }
}

fn push_trimmed(chunks: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunker = TextChunker::new(1024, 200);
        assert_eq!(chunker.chunk("  The sky is green.  "), vec!["The sky is green."]);
    }

    #[test]
    fn test_blank_text_has_no_chunks() {
        let chunker = TextChunker::new(1024, 200);
        assert!(chunker.chunk(" \n\t ").is_empty());
    }

    #[test]
    fn test_chunks_respect_size_and_overlap() {
        let chunker = TextChunker::new(60, 20);
        let text = "Alpha beta gamma delta. Epsilon zeta eta theta. Iota kappa lambda mu. \
                    Nu xi omicron pi. Rho sigma tau upsilon.";
        let chunks = chunker.chunk(text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 60 + 20, "chunk too long: {:?}", chunk);
        }
        // Every sentence survives somewhere
        for sentence in ["Alpha beta", "Iota kappa", "Rho sigma"] {
            assert!(chunks.iter().any(|c| c.contains(sentence)));
        }
    }

    #[test]
    fn test_sizes_count_bytes() {
        // 17 characters but 32 bytes
        let chunker = TextChunker::new(18, 0);
        let chunks = chunker.chunk("ééééé ééééé ééééé");

        assert_eq!(chunks, vec!["ééééé"; 3]);
        assert!(chunks.iter().all(|c| c.len() <= 18));
    }

    #[test]
    fn test_oversized_sentence_is_split_on_words() {
        let chunker = TextChunker::new(20, 0);
        let text = "one two three four five six seven eight nine ten";
        let chunks = chunker.chunk(text);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() <= 20));
        assert_eq!(chunks.join(" ").split_whitespace().count(), 10);
    }
}
