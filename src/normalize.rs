//! Title normalization.
//!
//! Catalogue titles are scraped from wiki tables and still carry markup,
//! footnotes and punctuation that cannot appear in a file name.
//! [`normalize_title`] turns them into a stable, filesystem-safe form. The
//! steps run in a fixed order; each one assumes the previous ones already ran.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Characters that cannot appear in a path component
pub const ILLEGAL_PATH_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

// "(files 1-2 tomes 3)", "(file 12)", "(tomes 4-5)"
static FILE_RANGE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(\s*(?:files?|tomes?)\b[^()]*\)").unwrap());

static SMALL_PRINT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(?:small|sup)\b[^>]*>.*?</(?:small|sup)\s*>").unwrap());

static REFERENCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<ref\b[^>]*/>|<ref\b[^>]*>.*?</ref\s*>").unwrap());

// "[1]", "[note 2]", "[réf. nécessaire]"
static CITATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[\s*(?:\d+|note\s*\d+|réf\.?\s*nécessaire)\s*\]").unwrap()
});

// "{{2e|partie}}", "{{1st|part}}"
static ORDINAL_PART_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\{\{\s*(\d+)\s*(ère|ème|eme|er|re|e|st|nd|rd|th)\s*\|\s*part(?:ie)?\s*\}\}")
        .unwrap()
});

static BARE_ORDINAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d+(?:ère|ème|eme|er|re|e|st|nd|rd|th))\b(\s+Part\b)?").unwrap()
});

static HYPHEN_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());

static WHITESPACE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a raw catalogue title into a filesystem-safe string.
///
/// Total and idempotent: `normalize_title(&normalize_title(t)) ==
/// normalize_title(t)`. The pipeline is repeated until it reaches a fixed
/// point, since removing markup can expose text an earlier step would have
/// rewritten. Every step but the ordinal rewrite only shrinks the text, and
/// that one never fires twice on the same token, so the loop terminates.
pub fn normalize_title(raw: &str) -> String {
    let mut current = normalize_once(raw);

    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(raw: &str) -> String {
    let text = strip_file_ranges(raw);
    let text = strip_footnotes(&text);
    let text = rewrite_ordinal_parts(&text);
    let text = remove_double_braces(&text);
    let text = replace_separators(&text);
    let text = replace_double_quotes(&text);
    let text = replace_illegal_chars(&text);
    collapse_runs(&text)
}

fn strip_file_ranges(text: &str) -> String {
    FILE_RANGE_REGEX.replace_all(text, " ").into_owned()
}

fn strip_footnotes(text: &str) -> String {
    let text = SMALL_PRINT_REGEX.replace_all(text, "");
    let text = REFERENCE_REGEX.replace_all(&text, "");
    CITATION_REGEX.replace_all(&text, "").into_owned()
}

/// `{{2e|partie}}` becomes `2e Part`, then any ordinal token not already
/// followed by `Part` gets one appended.
fn rewrite_ordinal_parts(text: &str) -> String {
    let text = ORDINAL_PART_REGEX.replace_all(text, "${1}${2} Part");

    BARE_ORDINAL_REGEX
        .replace_all(&text, |caps: &Captures| match caps.get(2) {
            Some(_) => caps[0].to_string(),
            None => format!("{} Part", &caps[1]),
        })
        .into_owned()
}

fn remove_double_braces(text: &str) -> String {
    text.replace("{{", "").replace("}}", "")
}

fn replace_separators(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ':' | '–' | ';' => '-',
            c => c,
        })
        .collect()
}

fn replace_double_quotes(text: &str) -> String {
    text.replace('"', "'")
}

fn replace_illegal_chars(text: &str) -> String {
    text.chars()
        .map(|c| {
            if ILLEGAL_PATH_CHARS.contains(&c) || (c.is_control() && !c.is_whitespace()) {
                '-'
            } else {
                c
            }
        })
        .collect()
}

fn collapse_runs(text: &str) -> String {
    let text = HYPHEN_RUN_REGEX.replace_all(text, "-");
    let text = WHITESPACE_RUN_REGEX.replace_all(&text, " ");
    text.trim().to_string()
}
