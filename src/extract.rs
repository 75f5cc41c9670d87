//! Per-chapter plain-text extraction.
//!
//! Drives the normalizer over a parsed book and yields one comparable string
//! per unit (chapter or paragraph). The transformation order matters:
//! overrides run before whitespace collapsing so their patterns can span the
//! source's ragged spacing, and verse markers are restored last, after every
//! pass that could disturb them has run.

use memchr::memmem;

use crate::normalize::{
    apply_overrides, collapse_whitespace, quotes::swap_quotes, remove_headings,
    replace_superscripts, unify_dashes,
};
use crate::xml::Document;

/// One of the two regional editions of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edition {
    Us,
    Uk,
}

impl Edition {
    /// Directory name the corpus uses for this edition.
    pub fn dir_name(self) -> &'static str {
        match self {
            Edition::Us => "US",
            Edition::Uk => "UK",
        }
    }
}

/// Unit size at which text is extracted and diffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// One string per `<chapter>`.
    Chapter,
    /// One string per `<p>` within each chapter. Paragraph counts are not
    /// guaranteed to align between editions; chapter granularity is what the
    /// driver diffs with.
    Paragraph,
}

/// Extract one normalized string per chapter, in document order.
///
/// The document is consumed conceptually: normalization mutates the tree.
pub fn extract_chapters(doc: &mut Document, edition: Edition, book_id: &str) -> Vec<String> {
    extract_units(doc, edition, book_id, Granularity::Chapter)
        .into_iter()
        .map(|mut units| units.pop().unwrap_or_default())
        .collect()
}

/// Extract normalized text units grouped by chapter.
///
/// Chapter granularity yields exactly one unit per chapter; paragraph
/// granularity yields one unit per `<p>`.
pub fn extract_units(
    doc: &mut Document,
    edition: Edition,
    book_id: &str,
    granularity: Granularity,
) -> Vec<Vec<String>> {
    replace_superscripts(doc);
    remove_headings(doc);

    let mut chapters = Vec::new();
    for chapter in doc.find_all("chapter") {
        let raw_units = match granularity {
            Granularity::Chapter => vec![doc.text_content(chapter)],
            Granularity::Paragraph => doc
                .find_all_in(chapter, "p", None)
                .into_iter()
                .map(|p| doc.text_content(p))
                .collect(),
        };

        let units = raw_units
            .into_iter()
            .map(|raw| finalize_unit(&raw, edition, book_id))
            .collect();
        chapters.push(units);
    }
    chapters
}

/// Run the string-level passes over one flattened unit.
fn finalize_unit(raw: &str, edition: Edition, book_id: &str) -> String {
    let text = apply_overrides(book_id, raw);
    let text = collapse_whitespace(&text);
    let text = unify_dashes(&text);
    let text = match edition {
        Edition::Uk => swap_quotes(&text),
        Edition::Us => text,
    };
    restore_verse_markers(&text)
}

/// Convert `***N***` sentinels back into `<sup>N</sup>` verse markers.
///
/// Every sentinel the normalizer wrote must come back out here; a leaked
/// sentinel in final output is a pipeline defect, not a recoverable error.
pub fn restore_verse_markers(text: &str) -> String {
    let bytes = text.as_bytes();
    let finder = memmem::Finder::new(b"***");
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while let Some(rel) = finder.find(&bytes[i..]) {
        let start = i + rel;
        let digits_start = start + 3;
        let digits_end = digits_start
            + bytes[digits_start..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count();

        if digits_end > digits_start && bytes[digits_end..].starts_with(b"***") {
            out.push_str(&text[i..start]);
            out.push_str("<sup>");
            out.push_str(&text[digits_start..digits_end]);
            out.push_str("</sup>");
            i = digits_end + 3;
        } else {
            // Not a sentinel; emit up to and including this '*' and rescan
            // from the next byte, the way a global regex would
            out.push_str(&text[i..start + 1]);
            i = start + 1;
        }
    }
    out.push_str(&text[i..]);
    out
}
