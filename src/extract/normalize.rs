// src/extract/normalize.rs

/// Page header repeated by the salary list on every page.
pub const BOILERPLATE_MARKER: &str = "Unclassified Personnel List";

/// Characters that end a line in extracted PDF text. Besides `\n`/`\r` this
/// covers the form feed emitted between pages and the other universal-newline
/// separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split `text` into lines on any line-break character, treating `\r\n` as one break.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..idx]);
        let mut next = idx + c.len_utf8();
        if c == '\r' {
            if let Some(&(nidx, '\n')) = chars.peek() {
                chars.next();
                next = nidx + 1;
            }
        }
        start = next;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Drop blank lines and page-header lines, keeping the remaining lines in order.
pub fn normalize(raw: &str) -> String {
    split_lines(raw)
        .into_iter()
        .filter(|line| !line.trim().is_empty() && !line.contains(BOILERPLATE_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_blank_and_header_lines() {
        let raw = "Unclassified Personnel List  Page 1\n\nName: Doe, Jane\n   \nJob Type: P\n";
        assert_eq!(normalize(raw), "Name: Doe, Jane\nJob Type: P");
    }

    #[test]
    fn header_match_is_substring_not_full_line() {
        let raw = "keep me\nFY24 Unclassified Personnel List (cont.)\nme too";
        assert_eq!(normalize(raw), "keep me\nme too");
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\n\n  \n"), "");
    }

    #[test]
    fn form_feed_breaks_lines() {
        let raw = "first\r\nsecond\u{0c}Unclassified Personnel List\u{0c}third";
        assert_eq!(split_lines(raw), vec!["first", "second", "Unclassified Personnel List", "third"]);
        assert_eq!(normalize(raw), "first\nsecond\nthird");
    }

    #[test]
    fn preserves_inner_padding() {
        let raw = "Name: Doe, Jane      Home Orgn: Biology    ";
        assert_eq!(normalize(raw), raw);
    }
}
