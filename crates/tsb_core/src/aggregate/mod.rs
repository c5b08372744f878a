//! Ordered, all-or-nothing reassembly of chunk transcripts.
//!
//! The aggregator walks an item's chunk sequence in index order,
//! invokes the per-chunk transcription function, and joins segment
//! texts into one document. If any chunk fails, the item fails as a
//! whole; a transcript containing only a successfully transcribed
//! prefix is never emitted. Each chunk's backing file is deleted as
//! soon as its text has been obtained, so scratch usage stays bounded.

use std::fs;
use std::path::Path;

use crate::models::{AudioChunk, TranscriptSegment};
use crate::services::TranscriptionError;

/// Remove a consumed chunk file, logging (not failing) on error.
fn remove_chunk_file(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!("Failed to remove chunk file {}: {}", path.display(), e);
    }
}

/// Assemble one transcript from an item's chunk sequence.
///
/// Chunks are processed strictly in index order regardless of the order
/// they arrive in. Segment texts (already trimmed by the client) are
/// each followed by exactly one newline; the final result is trimmed
/// once more. On the first failure all partial text is discarded, the
/// remaining chunk files are released, and the failure is returned.
pub fn aggregate_chunks<F>(
    mut chunks: Vec<AudioChunk>,
    mut transcribe: F,
) -> Result<String, TranscriptionError>
where
    F: FnMut(&AudioChunk) -> Result<String, TranscriptionError>,
{
    chunks.sort_by_key(|c| c.index);

    let mut segments: Vec<TranscriptSegment> = Vec::with_capacity(chunks.len());

    for (position, chunk) in chunks.iter().enumerate() {
        let result = transcribe(chunk);
        remove_chunk_file(&chunk.path);

        match result {
            Ok(text) => {
                tracing::debug!(
                    "Chunk {}/{} transcribed ({} chars)",
                    position + 1,
                    chunks.len(),
                    text.len()
                );
                segments.push(TranscriptSegment {
                    index: chunk.index,
                    text,
                });
            }
            Err(e) => {
                // All-or-nothing: discard the prefix, release the rest.
                for remaining in &chunks[position + 1..] {
                    remove_chunk_file(&remaining.path);
                }
                return Err(e);
            }
        }
    }

    let mut full = String::new();
    for segment in &segments {
        full.push_str(&segment.text);
        full.push('\n');
    }

    Ok(full.trim().to_string())
}
