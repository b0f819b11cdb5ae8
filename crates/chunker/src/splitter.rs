use crate::config::SplitterConfig;
use crate::error::Result;
use unicode_segmentation::UnicodeSegmentation;

/// Recursive character splitter with a fixed overlap between chunks.
///
/// Break points are chosen from the configured separator list, in order of
/// preference (paragraph, line, sentence, word by default), before falling
/// back to a hard cut at a grapheme boundary. Sizes and the overlap are
/// counted in characters.
pub struct TextSplitter {
    config: SplitterConfig,
}

impl TextSplitter {
    /// Create a splitter from a validated configuration
    pub fn new(config: SplitterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Split `text` into overlapping chunks.
    ///
    /// The returned iterator is lazy and finite; calling `split` again
    /// restarts from the beginning. Empty input yields no chunks. Input
    /// shorter than `chunk_size` yields a single chunk with no overlap
    /// applied. Consecutive chunks share exactly `chunk_overlap` characters.
    pub fn split<'a>(&'a self, text: &'a str) -> SplitIter<'a> {
        SplitIter {
            text,
            separators: &self.config.separators,
            chunk_size: self.config.chunk_size,
            chunk_overlap: self.config.chunk_overlap,
            pos: 0,
            done: false,
        }
    }

    /// Access the active configuration
    #[must_use]
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }
}

/// Lazy iterator over the chunks of one input text
pub struct SplitIter<'a> {
    text: &'a str,
    separators: &'a [String],
    chunk_size: usize,
    chunk_overlap: usize,
    pos: usize,
    done: bool,
}

impl<'a> Iterator for SplitIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.done {
            return None;
        }

        let remaining = &self.text[self.pos..];
        if remaining.is_empty() {
            self.done = true;
            return None;
        }

        // Byte length of the first `chunk_size` characters; None means the
        // rest of the text fits in one chunk.
        let Some(window_bytes) = byte_len_of_chars(remaining, self.chunk_size) else {
            self.done = true;
            return Some(remaining);
        };

        let window = &remaining[..window_bytes];
        let mut end = None;
        for sep in self.separators {
            if let Some(idx) = window.rfind(sep.as_str()) {
                let candidate = idx + sep.len();
                // A usable cut must reach past the overlap, otherwise the
                // next chunk would not advance.
                if window[..candidate].chars().count() > self.chunk_overlap {
                    end = Some(candidate);
                    break;
                }
            }
        }
        let end = end.unwrap_or_else(|| {
            grapheme_cut(remaining, window_bytes, self.chunk_overlap)
        });

        let chunk = &remaining[..end];
        let kept = chunk.chars().count() - self.chunk_overlap;
        let step = byte_len_of_chars(chunk, kept).unwrap_or(chunk.len());
        self.pos += step;
        Some(chunk)
    }
}

/// Byte offset after the first `n` characters of `s`, or None when `s`
/// holds at most `n` characters.
fn byte_len_of_chars(s: &str, n: usize) -> Option<usize> {
    s.char_indices().nth(n).map(|(idx, _)| idx)
}

/// Hard-cut fallback: align `window_bytes` down to a grapheme boundary so a
/// cluster is not split. The raw window edge is used when alignment would
/// leave the chunk shorter than the overlap.
fn grapheme_cut(remaining: &str, window_bytes: usize, overlap: usize) -> usize {
    let mut cut = 0;
    for (idx, grapheme) in remaining.grapheme_indices(true) {
        let end = idx + grapheme.len();
        if end > window_bytes {
            break;
        }
        cut = end;
    }
    if cut == 0 || remaining[..cut].chars().count() <= overlap {
        window_bytes
    } else {
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> TextSplitter {
        TextSplitter::new(SplitterConfig::new(chunk_size, chunk_overlap)).unwrap()
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let splitter = splitter(10, 2);
        assert_eq!(splitter.split("").count(), 0);
    }

    #[test]
    fn test_short_text_single_chunk() {
        let splitter = splitter(100, 20);
        let chunks: Vec<&str> = splitter.split("hello world").collect();
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn test_exact_size_single_chunk() {
        let splitter = splitter(5, 1);
        let chunks: Vec<&str> = splitter.split("abcde").collect();
        assert_eq!(chunks, vec!["abcde"]);
    }

    #[test]
    fn test_consecutive_chunks_share_exact_overlap() {
        let splitter = splitter(10, 3);
        let text = "abcdefghijklmnopqrstuvwxyz0123456789";
        let chunks: Vec<&str> = splitter.split(text).collect();
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().rev().take(3).collect::<Vec<_>>()
                .into_iter().rev().collect();
            let head: String = pair[1].chars().take(3).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn test_coverage_reconstructs_text() {
        let splitter = splitter(10, 3);
        let text = "the quick brown fox jumps over the lazy dog again and again";
        let chunks: Vec<&str> = splitter.split(text).collect();

        let mut rebuilt = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i + 1 == chunks.len() {
                rebuilt.push_str(chunk);
            } else {
                let kept = chunk.chars().count() - 3;
                let cut = chunk.char_indices().nth(kept).map_or(chunk.len(), |(b, _)| b);
                rebuilt.push_str(&chunk[..cut]);
            }
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_prefers_paragraph_boundary() {
        let splitter = splitter(20, 0);
        let text = "first para\n\nsecond paragraph that continues";
        let chunks: Vec<&str> = splitter.split(text).collect();
        assert_eq!(chunks[0], "first para\n\n");
    }

    #[test]
    fn test_prefers_word_boundary_over_hard_cut() {
        let splitter = splitter(12, 0);
        let text = "alpha beta gamma delta";
        let chunks: Vec<&str> = splitter.split(text).collect();
        // Every cut except the last lands after a space
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.ends_with(' '), "unexpected cut in {chunk:?}");
        }
    }

    #[test]
    fn test_hard_cut_on_unbroken_text() {
        let splitter = splitter(8, 2);
        let text = "a".repeat(30);
        let chunks: Vec<String> = splitter.split(&text).map(str::to_string).collect();
        assert!(chunks.len() > 1);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.chars().count(), 8);
        }
    }

    #[test]
    fn test_multibyte_text_is_not_split_mid_char() {
        let splitter = splitter(5, 1);
        let text = "日本語のテキストを分割する";
        let chunks: Vec<&str> = splitter.split(text).collect();
        assert!(chunks.len() > 1);
        let total: usize = chunks.iter().map(|c| c.chars().count()).sum();
        assert!(total >= text.chars().count());
    }

    #[test]
    fn test_split_is_restartable() {
        let splitter = splitter(10, 3);
        let text = "abcdefghijklmnopqrstuvwxyz";
        let first: Vec<&str> = splitter.split(text).collect();
        let second: Vec<&str> = splitter.split(text).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(TextSplitter::new(SplitterConfig::new(0, 0)).is_err());
        assert!(TextSplitter::new(SplitterConfig::new(10, 10)).is_err());
    }
}
