//! # versediff
//!
//! Compares the US and UK editions of an XML Bible corpus and renders a
//! word-level diff of each chapter as an HTML fragment.
//!
//! The pipeline per book:
//!
//! 1. Parse each edition's XML into an arena [`xml::Document`].
//! 2. Normalize structure: verse numbers become `***N***` sentinels,
//!    footnote/cross-reference superscripts are blanked, headings removed
//!    ([`normalize`]).
//! 3. Flatten each chapter to plain text, collapse whitespace, unify dash
//!    conventions; for the UK edition, swap single/double curly quotes
//!    ([`extract`], [`normalize::quotes`]).
//! 4. Word-diff the paired chapter strings ([`diff`]).
//! 5. Render classified spans as `<span>`/`<ins>`/`<del>` inside a `<p>`
//!    wrapper, with verse markers restored as `<sup>` elements ([`render`]).
//!
//! ## Quick Start
//!
//! ```
//! use versediff::{diff_words, render_chapter};
//!
//! let us = "<sup>1</sup> The word was gray.";
//! let uk = "<sup>1</sup> The word was grey.";
//! let fragment = render_chapter(&diff_words(us, uk));
//! assert!(fragment.contains("<del>gray</del>"));
//! assert!(fragment.contains("<ins>grey</ins>"));
//! ```
//!
//! The [`corpus`] module drives the whole corpus: it walks the paired book
//! directories, isolates per-book failures, audits verse alignment between
//! editions, and writes the JSON artifacts the browser viewer fetches.

pub mod corpus;
pub mod diff;
pub mod error;
pub mod extract;
pub mod logging;
pub mod normalize;
pub mod render;
pub mod xml;

pub(crate) mod util;

pub use diff::{DiffKind, DiffSpan, diff_words};
pub use error::{Error, Result};
pub use extract::{Edition, Granularity, extract_chapters, restore_verse_markers};
pub use render::{render_chapter, render_spans};
pub use xml::{Document, parse_document};
