/// One physical line of notation after cleanup, with its 1-based number in
/// the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub line: usize,
    pub text: String,
}

/// Splits raw notation into trimmed lines. Markdown code fences that
/// generated text often arrives wrapped in are dropped, as are BOM and
/// zero-width characters. Blank lines are kept so numbering stays stable.
pub fn split_lines(source: &str) -> Vec<SourceLine> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let cleaned = raw
                .chars()
                .filter(|ch| !is_ignorable_format_char(*ch))
                .collect::<String>();
            let text = cleaned.trim();
            if is_code_fence(text) {
                return None;
            }
            Some(SourceLine {
                line: index + 1,
                text: text.to_string(),
            })
        })
        .collect()
}

fn is_code_fence(text: &str) -> bool {
    match text.strip_prefix("```") {
        Some(rest) => rest.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'),
        None => false,
    }
}

/// Removes the trailing dropdown marker from a bracketed value:
/// `score v` becomes `score`, `left arrow ▾` becomes `left arrow`.
pub fn strip_dropdown_marker(value: &str) -> String {
    let trimmed = value.trim();
    for marker in [" v", " V", " ▾", " ▼"] {
        if let Some(stripped) = trimmed.strip_suffix(marker) {
            let stripped = stripped.trim_end();
            if !stripped.is_empty() {
                return stripped.to_string();
            }
        }
    }
    trimmed.to_string()
}

fn is_ignorable_format_char(ch: char) -> bool {
    matches!(
        ch,
        '\u{feff}' // BOM / zero width no-break space
            | '\u{200b}' // zero width space
            | '\u{200c}' // zero width non-joiner
            | '\u{200d}' // zero width joiner
            | '\u{2060}' // word joiner
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_fences_and_keeps_numbering() {
        let lines = split_lines("```scratch\n\u{feff}when green flag clicked\n\n  say [hi]  \n```");
        let texts = lines.iter().map(|l| (l.line, l.text.as_str())).collect::<Vec<_>>();
        assert_eq!(
            texts,
            vec![(2, "when green flag clicked"), (3, ""), (4, "say [hi]")]
        );
    }

    #[test]
    fn fence_with_trailing_prose_is_not_a_fence() {
        let lines = split_lines("```this is text");
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn strips_dropdown_markers() {
        assert_eq!(strip_dropdown_marker("score v"), "score");
        assert_eq!(strip_dropdown_marker(" left arrow ▾ "), "left arrow");
        assert_eq!(strip_dropdown_marker("score"), "score");
        assert_eq!(strip_dropdown_marker("v"), "v");
        assert_eq!(strip_dropdown_marker(" v"), "v");
    }
}
