//! Case-insensitive pattern-against-candidate matching.
//!
//! Used for alarm-name exclusion lists and for inferring an event type from
//! a free-text subject. The directionality is load-bearing: patterns are
//! compiled as live regex, while the candidate is only ever the haystack
//! and is never compiled. That lets a configured pattern like `Foo.*` match
//! dynamic alarm-name suffixes while an alarm name full of dots and slashes
//! is matched literally and can never blow up as an invalid regex.

use regex::RegexBuilder;
use tracing::warn;

/// Check whether `candidate` matches any of `patterns`.
///
/// Each pattern is compiled case-insensitively and searched anywhere in
/// the candidate. Patterns are independent, so ordering does not affect
/// the result.
pub fn matches(patterns: &[String], candidate: &str) -> bool {
    matching_pattern(patterns, candidate).is_some()
}

/// Like [`matches`], but returns the first matching pattern itself.
///
/// Used to reverse-infer an event type from free text: the caller maps the
/// returned pattern back to the registry entry it came from.
pub fn matching_pattern<'a>(patterns: &'a [String], candidate: &str) -> Option<&'a str> {
    patterns.iter().find_map(|pattern| {
        let re = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(re) => re,
            Err(e) => {
                // Config validation rejects these at load time; a pattern
                // arriving here unvalidated is skipped, not fatal.
                warn!(pattern = %pattern, error = %e, "skipping invalid match pattern");
                return None;
            }
        };
        re.is_match(candidate).then_some(pattern.as_str())
    })
}

/// Compile-check a pattern list, for fail-fast validation at config load.
pub fn validate_patterns(patterns: &[String]) -> Result<(), regex::Error> {
    for pattern in patterns {
        RegexBuilder::new(pattern).case_insensitive(true).build()?;
    }
    Ok(())
}
