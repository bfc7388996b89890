//! Transcript document loading.
//!
//! Bridges the artifact store to the indexing stage: reads every plain-text
//! transcript in the work directory and splits long transcripts into
//! embedding-sized chunks.

use crate::error::Result;
use std::path::Path;
use tracing::{debug, info};

/// File extension of the plain-text transcript artifact.
pub const TRANSCRIPT_SUFFIX: &str = "transcript";

/// One transcript file loaded from the work directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptDocument {
    /// Lecture identifier (the file stem).
    pub lecture_id: String,
    /// Full transcript text.
    pub content: String,
}

/// Load every `*.transcript` file in `dir`, sorted by lecture id for a
/// deterministic indexing order.
pub fn load_transcripts(dir: &Path) -> Result<Vec<TranscriptDocument>> {
    let mut documents = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        let is_transcript = path
            .extension()
            .is_some_and(|ext| ext == TRANSCRIPT_SUFFIX);
        if !is_transcript {
            continue;
        }

        let Some(lecture_id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let content = std::fs::read_to_string(&path)?;
        debug!("Loaded transcript {} ({} bytes)", lecture_id, content.len());

        documents.push(TranscriptDocument {
            lecture_id: lecture_id.to_string(),
            content,
        });
    }

    documents.sort_by(|a, b| a.lecture_id.cmp(&b.lecture_id));

    info!("Loaded {} transcript(s) from {}", documents.len(), dir.display());
    Ok(documents)
}

/// Split text into chunks of at most `max_chars` characters, preferring to
/// break at paragraph and sentence boundaries. Embedding models cap input
/// size, and lecture transcripts routinely exceed it.
pub fn split_text(content: &str, max_chars: usize) -> Vec<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.len() <= max_chars {
        return vec![trimmed.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for piece in sentence_pieces(trimmed) {
        if !current.is_empty() && current.len() + piece.len() + 1 > max_chars {
            chunks.push(current.trim().to_string());
            current = String::new();
        }

        // A single oversized sentence gets hard-split.
        if piece.len() > max_chars {
            for hard in hard_split(piece, max_chars) {
                chunks.push(hard);
            }
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(piece);
    }

    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }

    chunks
}

/// Split on sentence-ending punctuation, keeping the terminator with the
/// sentence.
fn sentence_pieces(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?' | '\n') {
            let end = idx + ch.len_utf8();
            let piece = text[start..end].trim();
            if !piece.is_empty() {
                pieces.push(piece);
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        pieces.push(tail);
    }

    pieces
}

fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        // A single word longer than the cap gets sliced mid-word.
        if word.len() > max_chars {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let mut rest = word;
            while rest.len() > max_chars {
                let cut = floor_char_boundary(rest, max_chars);
                out.push(rest[..cut].to_string());
                rest = &rest[cut..];
            }
            current.push_str(rest);
            continue;
        }

        if !current.is_empty() && current.len() + word.len() + 1 > max_chars {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        out.push(current);
    }

    out
}

/// Largest char boundary at or below `index`, or the first boundary above it
/// when `index` falls inside the leading character.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut cut = index.min(text.len());
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    if cut == 0 {
        cut = text
            .chars()
            .next()
            .map(|c| c.len_utf8())
            .unwrap_or(text.len());
    }
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_transcripts_filters_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lec1.transcript"), "hello").unwrap();
        std::fs::write(dir.path().join("lec2.transcript"), "world").unwrap();
        std::fs::write(dir.path().join("lec1.wav"), "audio").unwrap();
        std::fs::write(dir.path().join("lec1.srt"), "subs").unwrap();

        let docs = load_transcripts(dir.path()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].lecture_id, "lec1");
        assert_eq!(docs[0].content, "hello");
        assert_eq!(docs[1].lecture_id, "lec2");
    }

    #[test]
    fn test_load_transcripts_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_transcripts(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_split_text_short_passthrough() {
        assert_eq!(split_text("short text.", 100), vec!["short text."]);
        assert!(split_text("   ", 100).is_empty());
    }

    #[test]
    fn test_split_text_respects_max_chars() {
        let text = "First sentence here. Second sentence here. Third sentence here.";
        let chunks = split_text(text, 25);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 25, "chunk too long: {chunk:?}");
        }
        // Nothing is lost.
        let rejoined = chunks.join(" ");
        assert!(rejoined.contains("First sentence"));
        assert!(rejoined.contains("Third sentence"));
    }

    #[test]
    fn test_split_text_oversized_sentence() {
        let text = "word ".repeat(100);
        let chunks = split_text(&text, 30);
        assert!(chunks.iter().all(|c| c.len() <= 30));
    }

    #[test]
    fn test_split_text_breaks_overlong_words() {
        let text = format!("short {}", "x".repeat(100));
        let chunks = split_text(&text, 30);
        assert!(chunks.iter().all(|c| c.len() <= 30), "chunks: {chunks:?}");
        let rejoined = chunks.concat();
        assert_eq!(rejoined.matches('x').count(), 100);
    }

    #[test]
    fn test_split_text_overlong_word_respects_char_boundaries() {
        let text = "é".repeat(40);
        let chunks = split_text(&text, 10);
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.len() <= 10));
    }
}
