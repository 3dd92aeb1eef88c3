/*!
 * Paragraph-aware chunk segmentation.
 *
 * Long chapters are split into overlapping windows sized for one model call each.
 * Boundaries prefer paragraph breaks near the target size so a chunk rarely cuts
 * a sentence in half; consecutive chunks share a fixed overlap so the model sees
 * the tail of the previous window again.
 */

use crate::errors::SegmentationError;

/// How far back from the proposed cut to look for a paragraph break
const PARA_SEARCH_WINDOW: usize = 500;

/// How far past the proposed cut a paragraph break may still win
const PARA_SEARCH_SLACK: usize = 100;

/// One contiguous slice of chapter text, translated as a unit
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// The chunk text, identical to the original text between the offsets
    pub text: String,
    /// Byte offset of the chunk start in the original chapter text
    pub start_offset: usize,
    /// Byte offset one past the chunk end in the original chapter text
    pub end_offset: usize,
}

impl Chunk {
    /// Length of this chunk in bytes
    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    /// Whether the chunk holds no text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Split chapter text into ordered, overlapping chunks.
///
/// Starting at offset 0, each iteration proposes a naive cut at
/// `pos + chunk_size` and then prefers the last paragraph break (`\n\n`) found
/// within the trailing window before the cut (the window reaches slightly past
/// the cut as well). The boundary snaps to just after the break so the blank
/// line stays with the earlier chunk. The next chunk starts `overlap` bytes
/// before the previous end.
///
/// All offsets are byte positions; cuts that would land inside a multi-byte
/// character are moved to the nearest character boundary. A paragraph snap is
/// only taken when it still moves the window forward, so the loop terminates
/// for every valid configuration.
///
/// # Errors
/// Returns `SegmentationError` unless `0 < overlap < chunk_size`.
pub fn segment(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk>, SegmentationError> {
    if chunk_size == 0 {
        return Err(SegmentationError::InvalidChunkSize(chunk_size));
    }
    if overlap == 0 || overlap >= chunk_size {
        return Err(SegmentationError::InvalidOverlap { chunk_size, overlap });
    }

    let text_len = text.len();
    let mut chunks = Vec::new();
    let mut pos = 0usize;

    while pos < text_len {
        // Propose a naive end for this chunk
        let naive_end = pos.saturating_add(chunk_size).min(text_len);
        let mut end = ceil_char_boundary(text, naive_end);

        // If we are not at the text end, try to break at a paragraph boundary
        if end < text_len {
            let search_start = pos.max(end.saturating_sub(PARA_SEARCH_WINDOW));
            let window_end = floor_char_boundary(text, end.saturating_add(PARA_SEARCH_SLACK).min(text_len));

            if let Some(found) = text[pos..window_end].rfind("\n\n") {
                let break_pos = pos + found;
                let break_end = break_pos + 2; // keep the blank line with this chunk
                if break_pos > search_start && break_end > pos + overlap {
                    end = break_end;
                }
            }
        }

        chunks.push(Chunk {
            text: text[pos..end].to_string(),
            start_offset: pos,
            end_offset: end,
        });

        if end >= text_len {
            break;
        }

        // Step back by the overlap for the next window. end > pos + overlap holds
        // here, so the subtraction cannot underflow; the boundary snap may still
        // land on pos with pathological multi-byte input, in which case the
        // overlap is dropped rather than stalling.
        let next_pos = floor_char_boundary(text, end - overlap);
        pos = if next_pos > pos { next_pos } else { end };
    }

    Ok(chunks)
}

/// Largest character boundary at or below `index`
fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest character boundary at or above `index`
fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
