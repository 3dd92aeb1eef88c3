use std::fs;
use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ChapterError;

/// A chapter loaded from disk, cleaned up and ready for translation
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    /// File name the chapter came from
    pub file_name: String,
    /// Cleaned text the translation pipeline works on
    pub text: String,
    /// Title stripped from the heading lines, when one was found
    pub title: Option<String>,
}

/// Stylistic letter-substitution spellings restored to plain words.
/// Web originals use these to dodge keyword filters; left as-is they
/// survive translation verbatim.
static OBFUSCATION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\b4ever\b", "forever"),
        (r"(?i)\bgr8\b", "great"),
        (r"(?i)\bl8e?r\b", "later"),
        (r"(?i)\bw8\b", "wait"),
        (r"(?i)\bm8\b", "mate"),
        (r"(?i)\bstr8\b", "straight"),
        (r"(?i)\bb4\b", "before"),
        (r"(?i)\b2night\b", "tonight"),
        (r"(?i)\b2morrow\b", "tomorrow"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// Heading in the form "Chapter 12 - Title" or "Capítulo IV: Título".
/// The chapter number may be arabic or roman; the title is capture 2.
/// A separator (or at least a space) between number and title is required,
/// otherwise "Chapter 55" would backtrack into number "5", title "5".
static CHAPTER_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:Chapter|Capítulo|Cap\.?)\s*([IVX\d]+)(?:\s*[-:]+\s*|\s+)(.+)$").unwrap()
});

/// Heading in the form "Volume 2, Chapter 13 - Title"; the title is capture 1.
static VOLUME_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:Volume|Vol\.?)\s*\d+\s*,?\s*(?:Chapter|Capítulo|Cap\.?)\s*\d+(?:\s*[-:]+\s*|\s+)(.+)$",
    )
    .unwrap()
});

/// Reads a chapter file and runs the full cleanup cascade on its content.
///
/// Files are expected to be UTF-8; stray invalid bytes are replaced rather
/// than failing the whole chapter.
pub fn load_chapter(path: &Path) -> Result<Chapter, ChapterError> {
    let raw = fs::read(path).map_err(|source| ChapterError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let content = String::from_utf8_lossy(&raw);

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let (text, title) = clean_chapter_text(&content);
    if let Some(heading) = &title {
        debug!("Chapter {}: stripped heading '{}'", file_name, heading);
    }

    Ok(Chapter {
        file_name,
        text,
        title,
    })
}

/// Runs the cleanup cascade on raw chapter text: line endings are unified
/// to `\n`, obfuscated spellings are restored and a heading line, if one
/// opens the chapter, is stripped out and returned separately.
pub fn clean_chapter_text(raw: &str) -> (String, Option<String>) {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let restored = restore_obfuscations(&unified);
    strip_chapter_heading(&restored)
}

/// Replaces stylistic letter-substitution spellings with their plain forms
pub fn restore_obfuscations(text: &str) -> String {
    let mut restored = text.to_string();
    for (pattern, replacement) in OBFUSCATION_PATTERNS.iter() {
        if pattern.is_match(&restored) {
            restored = pattern.replace_all(&restored, *replacement).into_owned();
        }
    }
    restored
}

/// Detects a chapter heading among the first three non-empty lines,
/// removes it from the text and returns the extracted title.
///
/// Only the first matching line is treated as the heading; anything that
/// looks like a heading deeper into the chapter is regular prose and is
/// left alone. A bare "Chapter 5" line with no title text never matches.
pub fn strip_chapter_heading(text: &str) -> (String, Option<String>) {
    let mut title: Option<String> = None;
    let mut kept_lines: Vec<&str> = Vec::new();
    let mut inspected = 0usize;

    for line in text.lines() {
        let trimmed = line.trim();
        if title.is_none() && inspected < 3 && !trimmed.is_empty() {
            inspected += 1;
            if let Some(captures) = CHAPTER_HEADING_RE.captures(trimmed) {
                title = captures.get(2).map(|m| m.as_str().trim().to_string());
                continue;
            }
            if let Some(captures) = VOLUME_HEADING_RE.captures(trimmed) {
                title = captures.get(1).map(|m| m.as_str().trim().to_string());
                continue;
            }
        }
        kept_lines.push(line);
    }

    (kept_lines.join("\n").trim().to_string(), title)
}
