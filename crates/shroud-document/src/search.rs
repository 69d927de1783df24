//! Structural search over a body's internal text

use crate::SearchOptions;

/// Formatting glyphs that occupy a position in the document but are
/// dropped from plain-text extraction
pub fn is_invisible_glyph(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}'
    )
}

/// Non-breaking space and the non-ASCII dashes
pub fn is_special_glyph(c: char) -> bool {
    c == '\u{00A0}' || (is_dash_glyph(c) && c != '-')
}

fn is_dash_glyph(c: char) -> bool {
    matches!(
        c,
        '-' | '\u{2010}'..='\u{2015}' | '\u{2212}' | '\u{FE58}' | '\u{FE63}' | '\u{FF0D}'
    )
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || is_dash_glyph(c)
        || is_invisible_glyph(c)
        || matches!(
            c,
            '\u{2018}'..='\u{201F}' | '\u{2026}' | '\u{00AB}' | '\u{00BB}' | '\u{00B7}'
        )
}

fn is_ignorable(c: char, options: SearchOptions) -> bool {
    (options.ignore_space && c.is_whitespace()) || (options.ignore_punct && is_punctuation(c))
}

fn fold(c: char, options: SearchOptions) -> char {
    if options.match_case {
        c
    } else {
        c.to_lowercase().next().unwrap_or(c)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Significant characters of a text with the byte span each came from
struct Projection {
    chars: Vec<char>,
    spans: Vec<(usize, usize)>,
}

fn project(text: &str, options: SearchOptions) -> Projection {
    let mut chars = Vec::with_capacity(text.len());
    let mut spans = Vec::with_capacity(text.len());

    for (offset, c) in text.char_indices() {
        if is_ignorable(c, options) {
            continue;
        }
        chars.push(fold(c, options));
        spans.push((offset, offset + c.len_utf8()));
    }

    Projection { chars, spans }
}

/// Glyph identity used when widening a match over ignored edges
fn canonical(c: char) -> char {
    if is_dash_glyph(c) {
        '-'
    } else if c.is_whitespace() {
        ' '
    } else {
        c.to_lowercase().next().unwrap_or(c)
    }
}

/// Non-overlapping byte ranges of `haystack` matching `query`, left to right.
///
/// Characters ignored by `options` are skipped on both sides, so a match
/// runs from its first to its last significant character, widened over any
/// ignored characters the query starts or ends with that the document
/// repeats verbatim (up to dash and space variants).
pub fn find_matches(haystack: &str, query: &str, options: SearchOptions) -> Vec<(usize, usize)> {
    let needle = project(query, options).chars;
    if needle.is_empty() {
        return Vec::new();
    }

    let leading: Vec<char> = query
        .chars()
        .take_while(|c| is_ignorable(*c, options))
        .collect();
    let trailing: Vec<char> = query
        .chars()
        .rev()
        .take_while(|c| is_ignorable(*c, options))
        .collect();

    let hay = project(haystack, options);
    let mut matches = Vec::new();
    let mut i = 0;

    while i + needle.len() <= hay.chars.len() {
        if hay.chars[i..i + needle.len()] == needle[..] {
            let start = hay.spans[i].0;
            let end = hay.spans[i + needle.len() - 1].1;

            let floor = matches.last().map_or(0, |(_, e)| *e);
            let end = widen_forward(haystack, end, &trailing);
            let mut start = widen_back(haystack, start, floor, &leading);
            if leading.is_empty() && options.ignore_punct {
                start = widen_open_bracket(haystack, start, end, floor);
            }

            if !options.match_whole_word || is_whole_word(haystack, start, end) {
                matches.push((start, end));
                i += needle.len();
                continue;
            }
        }
        i += 1;
    }

    matches
}

fn widen_back(haystack: &str, mut start: usize, floor: usize, leading: &[char]) -> usize {
    for expected in leading.iter().rev() {
        match haystack[floor..start].chars().next_back() {
            Some(c) if canonical(c) == canonical(*expected) => start -= c.len_utf8(),
            _ => break,
        }
    }
    start
}

/// Take in an opening bracket right before `start` whose closer falls
/// inside the match, so `(555) 445-6677` is claimed whole
fn widen_open_bracket(haystack: &str, start: usize, end: usize, floor: usize) -> usize {
    let Some(open) = haystack[floor..start].chars().next_back() else {
        return start;
    };
    let close = match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        _ => return start,
    };

    let mut depth = 0usize;
    for c in haystack[start..end].chars() {
        if c == open {
            depth += 1;
        } else if c == close {
            if depth == 0 {
                return start - open.len_utf8();
            }
            depth -= 1;
        }
    }
    start
}

fn widen_forward(haystack: &str, mut end: usize, trailing: &[char]) -> usize {
    for expected in trailing.iter() {
        match haystack[end..].chars().next() {
            Some(c) if canonical(c) == canonical(*expected) => end += c.len_utf8(),
            _ => break,
        }
    }
    end
}

fn is_whole_word(haystack: &str, start: usize, end: usize) -> bool {
    let before = haystack[..start].chars().next_back();
    let after = haystack[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}
