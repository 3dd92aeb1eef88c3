/*!
 * Dialogue quotation repair and balancing.
 *
 * Model output quotes dialogue inconsistently: straight double quotes, dash-led
 * lines, inverted or duplicated bracket marks. This module rewrites everything
 * into the single bracket-pair convention `「…」` and rebalances each line.
 *
 * The passes run in a fixed order; each one relies on the artifacts removed by
 * the ones before it.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening dialogue mark
const OPEN_QUOTE: char = '「';

/// Closing dialogue mark
const CLOSE_QUOTE: char = '」';

/// Straight double-quoted span, non-greedy via the negated class
static STRAIGHT_QUOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([^"]+)""#).unwrap()
});

/// Line-initial em-dash or en-dash dialogue lead-in; the span runs to the next
/// ideographic full stop or end of line
static DASH_DIALOGUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*[—–]\s*([^。\n]+)").unwrap()
});

/// Rewrites mixed quoting styles into balanced `「…」` dialogue spans.
pub struct QuoteNormalizer;

impl QuoteNormalizer {
    /// Run every repair pass over the text, in order.
    ///
    /// The result is stable: normalizing already-normalized text returns it
    /// unchanged.
    pub fn normalize(text: &str) -> String {
        let text = Self::collapse_malformed_triples(text);
        let text = Self::uninvert_swapped_pairs(&text);
        let text = Self::collapse_duplicate_closes(&text);
        let text = Self::convert_straight_quotes(&text);
        let text = Self::convert_dash_dialogue(&text);
        Self::balance_lines(&text)
    }

    /// Pass 1: an adjacent `「」」` run collapses to a single `「`.
    fn collapse_malformed_triples(text: &str) -> String {
        text.replace("「」」", "「")
    }

    /// Pass 2: an unmatched `」` followed by bracket-free content and then `「`
    /// is an inverted pair; rewrite it to `「content」`.
    ///
    /// Only unmatched closes trigger the rewrite. The text between a properly
    /// closed span and the next opening mark contains the same shape, and
    /// rewriting it would corrupt well-formed dialogue and make the pass
    /// oscillate between runs.
    fn uninvert_swapped_pairs(text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out: Vec<char> = Vec::with_capacity(chars.len());
        let mut opens = 0usize;
        let mut closes = 0usize;

        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];

            if c == CLOSE_QUOTE && closes >= opens {
                // Look ahead for the matching open; stop at any bracket
                let mut j = i + 1;
                while j < chars.len() && chars[j] != OPEN_QUOTE && chars[j] != CLOSE_QUOTE {
                    j += 1;
                }
                let has_content = j > i + 1;
                if has_content && j < chars.len() && chars[j] == OPEN_QUOTE {
                    out.push(OPEN_QUOTE);
                    out.extend_from_slice(&chars[i + 1..j]);
                    out.push(CLOSE_QUOTE);
                    opens += 1;
                    closes += 1;
                    i = j + 1;
                    continue;
                }
            }

            match c {
                OPEN_QUOTE => opens += 1,
                CLOSE_QUOTE => closes += 1,
                _ => {}
            }
            out.push(c);
            i += 1;
        }

        out.into_iter().collect()
    }

    /// Pass 3: `」」` collapses to one `」` unless an `「` follows immediately,
    /// in which case the second close belongs to the next span's repair.
    fn collapse_duplicate_closes(text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());

        let mut i = 0;
        while i < chars.len() {
            if chars[i] == CLOSE_QUOTE
                && chars.get(i + 1) == Some(&CLOSE_QUOTE)
                && chars.get(i + 2) != Some(&OPEN_QUOTE)
            {
                out.push(CLOSE_QUOTE);
                i += 2;
            } else {
                out.push(chars[i]);
                i += 1;
            }
        }

        out
    }

    /// Pass 4: each distinct straight-quoted span converts at its first
    /// remaining occurrence, so repeated identical lines of dialogue convert
    /// one occurrence per captured instance.
    fn convert_straight_quotes(text: &str) -> String {
        let spans: Vec<String> = STRAIGHT_QUOTE_RE
            .captures_iter(text)
            .map(|captures| captures[1].to_string())
            .collect();

        let mut out = text.to_string();
        for span in spans {
            let needle = format!("\"{}\"", span);
            let replacement = format!("{}{}{}", OPEN_QUOTE, span, CLOSE_QUOTE);
            if let Some(found) = out.find(&needle) {
                out.replace_range(found..found + needle.len(), &replacement);
            }
        }

        out
    }

    /// Pass 5: a line-initial dash introduces dialogue; the led text becomes a
    /// bracket span.
    fn convert_dash_dialogue(text: &str) -> String {
        DASH_DIALOGUE_RE
            .replace_all(text, format!("{}${{1}}{}", OPEN_QUOTE, CLOSE_QUOTE).as_str())
            .into_owned()
    }

    /// Pass 6: balance each line independently. An open is inserted directly
    /// before every close whose prefix cannot match it; missing closes are
    /// appended at the end of the line. Balanced lines pass through untouched.
    fn balance_lines(text: &str) -> String {
        let lines: Vec<String> = text
            .split('\n')
            .map(Self::balance_line)
            .collect();
        lines.join("\n")
    }

    fn balance_line(line: &str) -> String {
        let opens = line.chars().filter(|&c| c == OPEN_QUOTE).count();
        let closes = line.chars().filter(|&c| c == CLOSE_QUOTE).count();

        if opens == closes {
            return line.to_string();
        }

        if opens > closes {
            let mut balanced = String::with_capacity(line.len() + (opens - closes) * CLOSE_QUOTE.len_utf8());
            balanced.push_str(line);
            for _ in 0..(opens - closes) {
                balanced.push(CLOSE_QUOTE);
            }
            return balanced;
        }

        // More closes than opens: single left-to-right scan with running
        // counts, inserting an open in front of each close that has nothing
        // to match it. Stops once the line totals are level, mirroring a
        // rescan-until-balanced loop in linear time.
        let mut deficit = closes - opens;
        let mut out = String::with_capacity(line.len() + deficit * OPEN_QUOTE.len_utf8());
        let mut open_seen = 0usize;
        let mut close_seen = 0usize;

        for c in line.chars() {
            if c == CLOSE_QUOTE {
                if deficit > 0 && close_seen >= open_seen {
                    out.push(OPEN_QUOTE);
                    open_seen += 1;
                    deficit -= 1;
                }
                close_seen += 1;
            } else if c == OPEN_QUOTE {
                open_seen += 1;
            }
            out.push(c);
        }

        out
    }
}
