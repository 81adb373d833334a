//! # Command Templates
//!
//! Placeholder grammar for command templates, the synchronous positional pass,
//! and the final reassembly/tokenization step.
//!
//! Two placeholder families exist:
//! - positional: `${N}`, `${N:}`, `${N:M}` select from the invocation's arguments
//! - named: `${name}` or `${name parameter}` call a resolver (see `resolver`)

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::domain::types::{ParsedInvocation, Placeholder, PlaceholderKind, ResolvedValue, Slice};

static POSITIONAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([0-9]+)(:([0-9]*))?\}").unwrap());

// Parameter ends at the first closing brace.
static NAMED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\$\{([a-z][0-9a-z]*)(?: (.+?))?\}").unwrap());

/// All placeholders of both families in left-to-right order.
pub fn scan(text: &str) -> Vec<Placeholder> {
    let mut found = scan_positional(text);
    found.extend(scan_named(text));
    found.sort_by_key(|p| p.span.start);
    found
}

pub fn scan_positional(text: &str) -> Vec<Placeholder> {
    POSITIONAL_RE
        .captures_iter(text)
        .enumerate()
        .filter_map(|(sequence, caps)| {
            let whole = caps.get(0)?;
            Some(Placeholder {
                kind: PlaceholderKind::Positional(positional_slice(&caps)),
                span: whole.range(),
                sequence,
            })
        })
        .collect()
}

pub fn scan_named(text: &str) -> Vec<Placeholder> {
    NAMED_RE
        .captures_iter(text)
        .enumerate()
        .filter_map(|(sequence, caps)| {
            let whole = caps.get(0)?;
            let function = caps.get(1)?.as_str().to_string();
            let parameter = caps.get(2).map(|m| m.as_str().to_string());
            Some(Placeholder {
                kind: PlaceholderKind::Named {
                    function,
                    parameter,
                },
                span: whole.range(),
                sequence,
            })
        })
        .collect()
}

fn positional_slice(caps: &Captures<'_>) -> Slice {
    // Indices too large for usize select nothing.
    let index = |m: regex::Match<'_>| m.as_str().parse::<usize>().unwrap_or(usize::MAX);
    let start = caps.get(1).map(index).unwrap_or(usize::MAX);

    if caps.get(2).is_none() {
        return Slice::Index(start);
    }
    match caps.get(3).filter(|m| !m.as_str().is_empty()) {
        Some(end) => Slice::Range(start, index(end)),
        None => Slice::From(start),
    }
}

/// Text a positional reference expands to. Out-of-range selections are empty.
pub fn slice_args(args: &[String], slice: Slice) -> String {
    let (start, end) = match slice {
        Slice::Index(i) => return args.get(i).cloned().unwrap_or_default(),
        Slice::From(start) => (start, args.len()),
        Slice::Range(start, end) => (start, end.min(args.len())),
    };
    if start >= end {
        return String::new();
    }
    args[start..end].join(" ")
}

/// Rewrites every positional placeholder. Named placeholders are left untouched.
pub fn substitute_positional(text: &str, args: &[String]) -> String {
    POSITIONAL_RE
        .replace_all(text, |caps: &Captures<'_>| slice_args(args, positional_slice(caps)))
        .into_owned()
}

/// Puts resolved values back into the named spans of `text`.
///
/// Values are matched to spans by sequence number, so the order in which they
/// arrive does not matter. A span without a value keeps its original text.
pub fn reassemble(text: &str, named: &[Placeholder], values: Vec<ResolvedValue>) -> String {
    let mut by_sequence: Vec<Option<String>> = vec![None; named.len()];
    for value in values {
        if let Some(slot) = by_sequence.get_mut(value.sequence) {
            *slot = Some(value.text);
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for placeholder in named {
        out.push_str(&text[cursor..placeholder.span.start]);
        match by_sequence.get_mut(placeholder.sequence).and_then(Option::take) {
            Some(value) => out.push_str(&value),
            None => out.push_str(placeholder.source(text)),
        }
        cursor = placeholder.span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Splits on whitespace runs. `None` when there are no tokens.
pub fn tokenize(text: &str) -> Option<ParsedInvocation> {
    let mut tokens = text.split_whitespace().map(str::to_string);
    let command = tokens.next()?;
    Some(ParsedInvocation {
        command,
        args: tokens.collect(),
    })
}
