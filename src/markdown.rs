//! Reply text cleanup before it is shown and spoken

use std::sync::LazyLock;

use regex::Regex;

/// Regex for a bold span on a single line
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));

/// Remove markdown bold markers, turning `**text**` into `text`
///
/// Replacement repeats until nothing matches, so applying this twice gives the
/// same result as applying it once. Other markdown passes through untouched.
#[must_use]
pub fn strip_bold(text: &str) -> String {
    let mut current = text.to_string();
    while BOLD.is_match(&current) {
        current = BOLD.replace_all(&current, "$1").into_owned();
    }
    current
}
