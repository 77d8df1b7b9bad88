//! Boolean expressions embedded in `if`/`repeat until` headers.
//!
//! ```text
//! expr    := '<' expr '>' | '(' expr ')'
//!          | expr ('and' | 'or' | 'y' | 'o') expr      (split at the last top-level connective)
//!          | ('not' | 'no') expr
//!          | leaf
//! leaf    := touching [t]? | touching color [c]? | key [k] pressed? | mouse down?
//!          | (a) > (b) | (a) < (b) | (a) = (b)
//! ```
//!
//! Parsing never fails: an unrecognized leaf becomes `None` and the slot it
//! would have filled stays empty.

use crate::ast::{Comparison, Predicate};
use crate::catalog::{normalize_key, unwrap_operand};
use crate::lexer::strip_dropdown_marker;
use log::{error, trace};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

struct Leaf {
    re: Regex,
    build: fn(&Captures<'_>) -> Predicate,
}

static LEAVES: Lazy<Vec<Leaf>> = Lazy::new(|| {
    [
        leaf(
            r"^(?:touching colou?r|tocando (?:el )?color) \[([^\]]+)\]$",
            |c| Predicate::TouchingColor(group(c, 1)),
        ),
        leaf(r"^(?:touching|tocando) \[([^\]]+)\]$", |c| {
            Predicate::TouchingObject(touch_target(&group(c, 1)))
        }),
        leaf(
            r"^(?:key|tecla) \[([^\]]+)\] (?:pressed|presionada)$",
            |c| Predicate::KeyPressed(normalize_key(&group(c, 1))),
        ),
        leaf(
            r"^(?:mouse down|rat[oó]n presionado|mouse presionado)$",
            |_| Predicate::MouseDown,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
});

fn leaf(src: &str, build: fn(&Captures<'_>) -> Predicate) -> Option<Leaf> {
    match Regex::new(&format!("(?i){}", src)) {
        Ok(re) => Some(Leaf { re, build }),
        Err(err) => {
            error!("Invalid condition leaf pattern '{}': {}", src, err);
            None
        }
    }
}

fn group(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index)
        .map(|m| strip_dropdown_marker(m.as_str()))
        .unwrap_or_default()
}

fn touch_target(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "mouse-pointer" | "mouse pointer" | "puntero del ratón" | "puntero del raton" => {
            "_mouse_".to_string()
        }
        "edge" | "borde" => "_edge_".to_string(),
        _ => raw.to_string(),
    }
}

/// Parses a condition string, returning `None` when nothing in it could be
/// recognized.
pub fn parse_condition(text: &str) -> Option<Predicate> {
    let parsed = parse_expr(text);
    trace!("condition {:?} -> {:?}", text, parsed);
    parsed
}

fn parse_expr(text: &str) -> Option<Predicate> {
    let text = strip_enclosing(text.trim());
    if text.is_empty() {
        return None;
    }
    if let Some((left, connective, right)) = split_connective(text) {
        let left = parse_expr(left).map(Box::new);
        let right = parse_expr(right).map(Box::new);
        return Some(match connective {
            Connective::And => Predicate::And(left, right),
            Connective::Or => Predicate::Or(left, right),
        });
    }
    if let Some(rest) = strip_not(text) {
        return Some(Predicate::Not(parse_expr(rest).map(Box::new)));
    }
    parse_leaf(text)
}

fn parse_leaf(text: &str) -> Option<Predicate> {
    let cleaned = text
        .trim()
        .trim_start_matches('¿')
        .trim_end_matches('?')
        .trim();
    if let Some(compare) = parse_comparison(cleaned) {
        return Some(compare);
    }
    LEAVES
        .iter()
        .find_map(|leaf| leaf.re.captures(cleaned).map(|c| (leaf.build)(&c)))
}

/// `(a) > (b)`, `[a] = [b]` and friends. The operator must sit at bracket
/// depth zero with whitespace on both sides.
fn parse_comparison(text: &str) -> Option<Predicate> {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    for (index, ch) in text.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            '>' | '<' | '=' if depth == 0 => {
                let before = index.checked_sub(1).map(|i| bytes[i]);
                let after = bytes.get(index + 1).copied();
                if before != Some(b' ') || after != Some(b' ') {
                    continue;
                }
                let left = text[..index].trim();
                let right = text[index + 1..].trim();
                if !is_operand(left) || !is_operand(right) {
                    return None;
                }
                let op = match ch {
                    '>' => Comparison::Greater,
                    '<' => Comparison::Less,
                    _ => Comparison::Equal,
                };
                return Some(Predicate::Compare {
                    op,
                    left: unwrap_operand(left),
                    right: unwrap_operand(right),
                });
            }
            _ => {}
        }
    }
    None
}

fn is_operand(text: &str) -> bool {
    (text.starts_with('(') && text.ends_with(')')) || (text.starts_with('[') && text.ends_with(']'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    And,
    Or,
}

/// Finds the last connective outside any brackets so that `a and b or c`
/// groups as `(a and b) or c`.
fn split_connective(text: &str) -> Option<(&str, Connective, &str)> {
    let mut found = None;
    for (index, depth) in depth_map(text) {
        if depth != 0 {
            continue;
        }
        let rest = &text[index..];
        let matched = [
            (" and ", Connective::And),
            (" or ", Connective::Or),
            (" y ", Connective::And),
            (" o ", Connective::Or),
        ]
        .into_iter()
        .find(|(word, _)| {
            rest.get(..word.len())
                .map(|head| head.eq_ignore_ascii_case(word))
                .unwrap_or(false)
        });
        if let Some((word, connective)) = matched {
            found = Some((index, word.len(), connective));
        }
    }
    let (index, len, connective) = found?;
    let left = text[..index].trim();
    let right = text[index + len..].trim();
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some((left, connective, right))
}

fn strip_not(text: &str) -> Option<&str> {
    for word in ["not ", "no "] {
        if let Some(head) = text.get(..word.len()) {
            if head.eq_ignore_ascii_case(word) {
                let rest = text[word.len()..].trim_start();
                if rest.starts_with('<') || rest.starts_with('(') {
                    return Some(rest);
                }
            }
        }
    }
    None
}

/// Removes one pair of `<...>` or `(...)` when it wraps the whole text,
/// repeatedly.
fn strip_enclosing(mut text: &str) -> &str {
    loop {
        let (open, close) = match text.chars().next() {
            Some('<') => ('<', '>'),
            Some('(') => ('(', ')'),
            _ => return text,
        };
        if !text.ends_with(close) || matching_close(text, open) != Some(text.len() - 1) {
            return text;
        }
        text = text[1..text.len() - 1].trim();
    }
}

/// Byte index of the bracket that closes the one at position 0.
fn matching_close(text: &str, open: char) -> Option<usize> {
    let mut last = None;
    for (index, depth) in depth_map(text) {
        if index > 0 && depth == 0 {
            last = Some(index);
            break;
        }
    }
    let close_index = last?.checked_sub(1)?;
    let close_char = text[close_index..].chars().next()?;
    let expected = if open == '<' { '>' } else { ')' };
    (close_char == expected).then_some(close_index)
}

/// Yields `(byte index, depth before this char)` for every char, treating
/// `<`/`>` as brackets only when they hug their content (`<a>`), not when
/// used as comparison operators (`(a) < (b)`).
fn depth_map(text: &str) -> Vec<(usize, i32)> {
    let chars = text.char_indices().collect::<Vec<_>>();
    let mut out = Vec::with_capacity(chars.len() + 1);
    let mut depth = 0i32;
    for (pos, &(index, ch)) in chars.iter().enumerate() {
        out.push((index, depth));
        let prev = pos.checked_sub(1).map(|p| chars[p].1);
        let next = chars.get(pos + 1).map(|&(_, c)| c);
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            '<' if next != Some(' ') => depth += 1,
            '>' if prev != Some(' ') => depth -= 1,
            _ => {}
        }
    }
    out.push((text.len(), depth));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(p: Predicate) -> Option<Box<Predicate>> {
        Some(Box::new(p))
    }

    #[test]
    fn parses_and_of_two_leaves() {
        let parsed = parse_condition("<touching [Sprite1]?> and <key [space] pressed?>");
        assert_eq!(
            parsed,
            Some(Predicate::And(
                boxed(Predicate::TouchingObject("Sprite1".into())),
                boxed(Predicate::KeyPressed("space".into())),
            ))
        );
    }

    #[test]
    fn strips_outer_brackets_of_compound() {
        let parsed = parse_condition("<<mouse down?> or <touching [edge v]?>>");
        assert_eq!(
            parsed,
            Some(Predicate::Or(
                boxed(Predicate::MouseDown),
                boxed(Predicate::TouchingObject("_edge_".into())),
            ))
        );
    }

    #[test]
    fn connectives_group_left() {
        let parsed = parse_condition("<mouse down?> and <key [a] pressed?> or <touching [b]?>");
        assert_eq!(
            parsed,
            Some(Predicate::Or(
                boxed(Predicate::And(
                    boxed(Predicate::MouseDown),
                    boxed(Predicate::KeyPressed("a".into())),
                )),
                boxed(Predicate::TouchingObject("b".into())),
            ))
        );
    }

    #[test]
    fn nested_parenthesized_compound() {
        let parsed = parse_condition("<(<mouse down?> and <key [x] pressed?>) or <mouse down?>>");
        assert!(matches!(parsed, Some(Predicate::Or(Some(ref l), Some(_))) if matches!(**l, Predicate::And(..))));
    }

    #[test]
    fn comparison_and_not() {
        assert_eq!(
            parse_condition("<(score) > (10)>"),
            Some(Predicate::Compare {
                op: Comparison::Greater,
                left: "score".into(),
                right: "10".into(),
            })
        );
        assert_eq!(
            parse_condition("<not <mouse down?>>"),
            Some(Predicate::Not(boxed(Predicate::MouseDown)))
        );
    }

    #[test]
    fn spanish_leaves() {
        assert_eq!(
            parse_condition("<¿tocando [Gato]?> y <¿tecla [espacio v] presionada?>"),
            Some(Predicate::And(
                boxed(Predicate::TouchingObject("Gato".into())),
                boxed(Predicate::KeyPressed("space".into())),
            ))
        );
    }

    #[test]
    fn unknown_leaf_is_soft_failure() {
        assert_eq!(parse_condition("<dance party?>"), None);
        assert_eq!(
            parse_condition("<dance party?> and <mouse down?>"),
            Some(Predicate::And(None, boxed(Predicate::MouseDown)))
        );
        assert_eq!(parse_condition(""), None);
    }

    #[test]
    fn touching_color_is_not_touching_object() {
        assert_eq!(
            parse_condition("<touching color [#ff0000]?>"),
            Some(Predicate::TouchingColor("#ff0000".into()))
        );
    }
}
