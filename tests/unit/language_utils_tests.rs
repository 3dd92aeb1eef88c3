/*!
 * Tests for language code validation and display names
 */

use yantai::language_utils::{get_language_name, validate_language_code};

/// Test that common two-letter codes validate
#[test]
fn test_validate_language_code_withTwoLetterCodes_shouldSucceed() {
    assert!(validate_language_code("ja").is_ok());
    assert!(validate_language_code("en").is_ok());
    assert!(validate_language_code("ko").is_ok());
    assert!(validate_language_code("zh").is_ok());
}

/// Test that three-letter codes and mixed case validate
#[test]
fn test_validate_language_code_withThreeLetterAndMixedCase_shouldSucceed() {
    assert!(validate_language_code("jpn").is_ok());
    assert!(validate_language_code("KOR").is_ok());
    assert!(validate_language_code(" fra ").is_ok());
}

/// Test that region-qualified codes validate on the primary subtag
#[test]
fn test_validate_language_code_withRegionSubtag_shouldSucceed() {
    assert!(validate_language_code("pt-BR").is_ok());
    assert!(validate_language_code("en-GB").is_ok());
}

/// Test that garbage codes are rejected
#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("q").is_err());
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("japanese").is_err());
}

/// Test that display names resolve for plain codes
#[test]
fn test_get_language_name_withPlainCodes_shouldResolve() {
    assert_eq!(get_language_name("ja").unwrap(), "Japanese");
    assert_eq!(get_language_name("ko").unwrap(), "Korean");
    assert_eq!(get_language_name("de").unwrap(), "German");
    assert_eq!(get_language_name("kor").unwrap(), "Korean");
}

/// Test that well-known region variants get their established names
#[test]
fn test_get_language_name_withKnownRegionVariants_shouldUseEstablishedNames() {
    assert_eq!(get_language_name("pt-BR").unwrap(), "Brazilian Portuguese");
    assert_eq!(get_language_name("pt-PT").unwrap(), "European Portuguese");
    assert_eq!(get_language_name("zh-TW").unwrap(), "Traditional Chinese");
    assert_eq!(get_language_name("en-US").unwrap(), "American English");
}

/// Test that an unlisted region subtag is appended in parentheses
#[test]
fn test_get_language_name_withUnknownRegion_shouldAppendRegion() {
    assert_eq!(get_language_name("fr-CA").unwrap(), "French (CA)");
}

/// Test that name resolution fails for an invalid code
#[test]
fn test_get_language_name_withInvalidCode_shouldFail() {
    assert!(get_language_name("none-XY").is_err());
    assert!(get_language_name("xx").is_err());
}
