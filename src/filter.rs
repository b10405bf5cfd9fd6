//! Eligibility filter deciding which modules the loader rewrites.

use once_cell::sync::Lazy;
use regex::Regex;

const VENDOR_SEGMENT: &str = "node_modules";

static DECLARATION_FILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.d\.ts$").unwrap());
static TEST_FILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(test|spec)\.(t|j)sx?$").unwrap());
static SOURCE_FILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(t|j)sx?$").unwrap());

/// Returns true when `id` names a script or script-with-markup source file
/// outside of vendored dependencies, declaration files and test files.
pub fn is_processable(id: &str) -> bool {
    !id.is_empty()
        && !id.contains(VENDOR_SEGMENT)
        && !DECLARATION_FILE.is_match(id)
        && !TEST_FILE.is_match(id)
        && SOURCE_FILE.is_match(id)
}
