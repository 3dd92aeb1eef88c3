/*!
 * Tests for paragraph-aware chunk segmentation
 */

use yantai::errors::SegmentationError;
use yantai::translation::segment;

/// Builds a chapter of numbered paragraphs sized well past one chunk
fn long_chapter() -> String {
    (0..30)
        .map(|i| format!("Paragraph {} with a handful of ordinary words in it.", i))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Test that text shorter than the chunk size comes back as one chunk
#[test]
fn test_segment_withShortText_shouldReturnSingleChunk() {
    let text = "A single small paragraph.";

    let chunks = segment(text, 500, 50).unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, text);
    assert_eq!(chunks[0].start_offset, 0);
    assert_eq!(chunks[0].end_offset, text.len());
}

/// Test that every chunk's text matches the original slice at its offsets
#[test]
fn test_segment_withLongText_chunksShouldMirrorOriginalSlices() {
    let text = long_chapter();

    let chunks = segment(&text, 300, 40).unwrap();

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert_eq!(chunk.text, &text[chunk.start_offset..chunk.end_offset]);
    }
}

/// Test that consecutive chunks overlap and cover the text with no gaps
#[test]
fn test_segment_withLongText_consecutiveChunksShouldOverlap() {
    let text = long_chapter();

    let chunks = segment(&text, 300, 40).unwrap();

    assert_eq!(chunks[0].start_offset, 0);
    assert_eq!(chunks.last().unwrap().end_offset, text.len());
    for pair in chunks.windows(2) {
        assert!(pair[1].start_offset < pair[0].end_offset, "gap between chunks");
        assert!(pair[1].start_offset > pair[0].start_offset, "no forward progress");
    }
}

/// Test that dropping each chunk's overlap prefix reconstructs the chapter
#[test]
fn test_segment_withLongText_shouldReconstructOriginalText() {
    let text = long_chapter();

    let chunks = segment(&text, 300, 40).unwrap();

    let mut rebuilt = String::new();
    let mut covered = 0usize;
    for chunk in &chunks {
        rebuilt.push_str(&chunk.text[covered - chunk.start_offset..]);
        covered = chunk.end_offset;
    }

    assert_eq!(rebuilt, text);
}

/// Test that chunk boundaries prefer paragraph breaks
#[test]
fn test_segment_withParagraphs_shouldSnapBoundaryToBlankLine() {
    let text = long_chapter();

    let chunks = segment(&text, 300, 40).unwrap();

    // Every boundary except the final one should sit right after a "\n\n"
    for chunk in &chunks[..chunks.len() - 1] {
        let before = &text[chunk.end_offset.saturating_sub(2)..chunk.end_offset];
        assert_eq!(before, "\n\n", "boundary at {} not on a paragraph break", chunk.end_offset);
    }
}

/// Test that multi-byte text segments without panicking and on char boundaries
#[test]
fn test_segment_withMultiByteText_shouldKeepCharBoundaries() {
    let paragraph = "魔王の城は山の向こうにあった。誰もその門を見た者はいない。";
    let text = vec![paragraph; 20].join("\n\n");

    let chunks = segment(&text, 200, 30).unwrap();

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(text.is_char_boundary(chunk.start_offset));
        assert!(text.is_char_boundary(chunk.end_offset));
    }
}

/// Test that a zero chunk size is rejected
#[test]
fn test_segment_withZeroChunkSize_shouldFail() {
    let result = segment("text", 0, 10);
    assert!(matches!(result, Err(SegmentationError::InvalidChunkSize(0))));
}

/// Test that overlap must stay below the chunk size
#[test]
fn test_segment_withOverlapNotBelowChunkSize_shouldFail() {
    assert!(matches!(
        segment("text", 100, 100),
        Err(SegmentationError::InvalidOverlap { .. })
    ));
    assert!(matches!(
        segment("text", 100, 0),
        Err(SegmentationError::InvalidOverlap { .. })
    ));
}

/// Test that empty input yields no chunks
#[test]
fn test_segment_withEmptyText_shouldReturnNoChunks() {
    let chunks = segment("", 100, 10).unwrap();
    assert!(chunks.is_empty());
}
