//! Model output parsing.

/// Split model output into list items.
///
/// Lines are trimmed; blank lines and lines starting with `#` or `>` are
/// dropped. One leading marker is removed per line: `- `, `* `, `•`, or a
/// number followed by `.` and a non-digit. Items keep model order and are
/// not de-duplicated.
#[must_use]
pub fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('>'))
        .map(|line| strip_marker(line).to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Free-text stage output: surrounding whitespace removed, otherwise verbatim.
#[must_use]
pub fn parse_text(text: &str) -> String {
    text.trim().to_string()
}

fn strip_marker(line: &str) -> &str {
    if let Some(rest) = strip_bullet(line) {
        return rest.trim_start();
    }

    let digits = line.find(|c: char| !c.is_ascii_digit()).unwrap_or(line.len());
    if digits > 0 {
        // `3.5 Hours` is a decimal, not a marker.
        if let Some(rest) = line[digits..]
            .strip_prefix('.')
            .filter(|rest| !rest.starts_with(|c: char| c.is_ascii_digit()))
        {
            return rest.trim_start();
        }
    }

    line
}

fn strip_bullet(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix('•') {
        return Some(rest);
    }
    ['-', '*'].into_iter().find_map(|marker| {
        line.strip_prefix(marker)
            .filter(|rest| rest.starts_with(char::is_whitespace))
    })
}
