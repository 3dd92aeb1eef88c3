/*!
 * Tests for dialogue quote normalization
 */

use yantai::translation::QuoteNormalizer;

/// Test that a mixed-style dialogue passage is rewritten into bracket pairs
#[test]
fn test_normalize_withMixedQuoteStyles_shouldUnifyToBrackets() {
    let text = "\"Wait,\" she said.\n— Too late。He was already gone.\n」Who goes there?「";

    let normalized = QuoteNormalizer::normalize(text);

    let lines: Vec<&str> = normalized.split('\n').collect();
    assert_eq!(lines[0], "「Wait,」 she said.");
    assert_eq!(lines[1], "「Too late」。He was already gone.");
    assert_eq!(lines[2], "「Who goes there?」");
}

/// Test that well-formed dialogue passes through byte-identical
#[test]
fn test_normalize_withWellFormedDialogue_shouldNotChangeAnything() {
    let text = "「Good morning」 said the guard.\n「Morning」 she answered.\nNothing else moved.";

    assert_eq!(QuoteNormalizer::normalize(text), text);
}

/// Test that en-dash dialogue lead-ins convert like em-dashes
#[test]
fn test_normalize_withEnDashLeadIn_shouldConvert() {
    let normalized = QuoteNormalizer::normalize("– Stay close.");

    assert_eq!(normalized, "「Stay close.」");
}

/// Test that two straight-quoted spans on one line each become a pair
#[test]
fn test_normalize_withTwoStraightSpans_shouldConvertBoth() {
    let normalized = QuoteNormalizer::normalize("\"I know.\" He nodded. \"Truly.\"");

    assert_eq!(normalized, "「I know.」 He nodded. 「Truly.」");
}

/// Test that every output line carries as many opens as closes, whatever
/// the input damage looked like
#[test]
fn test_normalize_withDamagedInput_shouldBalanceEveryLine() {
    let text = "「he lied」」 twice\nno marks here\n」stray close at dawn\n「left hanging";

    let normalized = QuoteNormalizer::normalize(text);

    for line in normalized.split('\n') {
        let opens = line.chars().filter(|&c| c == '「').count();
        let closes = line.chars().filter(|&c| c == '」').count();
        assert_eq!(opens, closes, "unbalanced line: {:?}", line);
    }
}

/// Test that running normalize twice gives the same text as running it once
#[test]
fn test_normalize_runTwice_shouldBeStable() {
    let text = "\"Wait,\" she said.\n— Too late。\n」inverted「\n「open only\nplain narration line";

    let once = QuoteNormalizer::normalize(text);
    let twice = QuoteNormalizer::normalize(&once);

    assert_eq!(twice, once);
}
