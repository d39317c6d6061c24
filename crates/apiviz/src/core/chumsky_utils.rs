//! Shared chumsky parser utilities for annotation payloads
//!
//! Annotation text comes straight out of doc comments, so it may span lines
//! and carry arbitrary runs of whitespace.

use chumsky::prelude::*;

/// Parse optional whitespace of any kind, including newlines.
///
/// Uses an explicit character filter to avoid the "repeated combinator making
/// no progress" issue of `chumsky::text::whitespace().repeated()`.
pub fn optional_whitespace<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    any()
        .filter(|c: &char| c.is_whitespace())
        .repeated()
        .ignored()
}

/// Parse required whitespace (at least one whitespace character).
pub fn whitespace_required<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    any()
        .filter(|c: &char| c.is_whitespace())
        .repeated()
        .at_least(1)
        .ignored()
}

/// Parse a run of non-whitespace characters.
pub fn word<'src>() -> impl Parser<'src, &'src str, &'src str> + Clone {
    any()
        .filter(|c: &char| !c.is_whitespace())
        .repeated()
        .at_least(1)
        .to_slice()
}

/// Parse a whole payload into whitespace-separated words.
///
/// Leading and trailing whitespace is dropped and inner runs collapse, so
/// `"  a \n b  "` yields `["a", "b"]` and blank input yields no words.
pub fn words<'src>() -> impl Parser<'src, &'src str, Vec<&'src str>> + Clone {
    optional_whitespace()
        .ignore_then(
            word()
                .separated_by(whitespace_required())
                .allow_trailing()
                .collect(),
        )
        .then_ignore(end())
}
