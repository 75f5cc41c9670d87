//! Structural normalization of book markup into comparable plain text.
//!
//! Both editions mark up the same text quite differently (whitespace noise,
//! superscript conventions, dash style). The passes here flatten that markup
//! so the word diff only sees genuine wording differences.
//!
//! Verse numbers are the one piece of structure that must survive: they are
//! rewritten to `***N***` sentinels, which pass through whitespace collapsing
//! and quote swapping untouched and are restored to `<sup>` elements at the
//! end of extraction.

pub mod quotes;

use crate::xml::Document;

/// Sentinel form of a verse number. `***` never occurs in body text, so the
/// digits inside remain unambiguous all the way through the pipeline.
pub fn verse_sentinel(num: &str) -> String {
    format!(" ***{num}*** ")
}

/// Rewrite every superscript in the document.
///
/// Three cases, in order:
/// 1. `sup.verse-ref` becomes a space-padded `***N***` sentinel.
/// 2. A `<sup>` immediately preceding a `<sub>` is a fraction numerator
///    (`<sub>` is only ever a fraction denominator in this corpus); it is
///    replaced by its bare numeral padded with spaces. The `<sub>` text
///    flattens on its own later.
/// 3. Any remaining `<sup>` (cross-ref, translate-note, alt-reading-note,
///    help-note) is discarded signal and becomes a single space.
pub fn replace_superscripts(doc: &mut Document) {
    for sup in doc.find_all_with_class("sup", "verse-ref") {
        let num = doc.text_content(sup).trim().to_string();
        doc.replace_with_text(sup, verse_sentinel(&num));
    }

    for sub in doc.find_all("sub") {
        let prev = doc.prev_sibling_element(sub);
        // Guardrail in case a future revision puts something else before a <sub>
        if prev.is_some() && doc.tag_name(prev) == Some("sup") {
            let numerator = doc.text_content(prev);
            doc.replace_with_text(prev, format!(" {numerator} "));
        }
    }

    for sup in doc.find_all("sup") {
        doc.replace_with_text(sup, " ");
    }
}

/// Remove headings and section labels: `<head1>` section headings and
/// `<psalm>` labels ("BOOK I", "Psalm 1"). Neither is comparable body text.
pub fn remove_headings(doc: &mut Document) {
    for head in doc.find_all("head1") {
        doc.remove(head);
    }
    for psalm in doc.find_all("psalm") {
        doc.remove(psalm);
    }
}

/// Collapse every run of whitespace to a single space.
///
/// Absorbs both the source files' formatting noise and the padding spaces the
/// superscript pass introduced. Does not trim: a leading or trailing run
/// becomes a single space, exactly like the original `\s+` rewrite.
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out
}

/// Rewrite en-dashes to em-dashes.
///
/// The UK files use U+2013 where the US files use U+2014; left alone this
/// shows up as a false positive in every dash-bearing verse.
pub fn unify_dashes(s: &str) -> String {
    s.replace('\u{2013}', "\u{2014}")
}

/// Per-book literal text overrides, applied to both editions before
/// whitespace collapsing. These patch known irregular rendering conventions
/// in specific books; they are data, not logic.
pub struct BookOverride {
    /// Book identifier (the `NN-Name` file stem).
    pub book: &'static str,
    pub rules: &'static [(&'static str, &'static str)],
}

/// The Psalms file renders the italicized "Selah" with literal asterisks in
/// places; strip them so the word compares equal across editions.
pub const BOOK_OVERRIDES: &[BookOverride] = &[BookOverride {
    book: "19-Ps",
    rules: &[("*Selah*", "Selah")],
}];

/// Apply any literal overrides registered for `book_id`.
pub fn apply_overrides(book_id: &str, text: &str) -> String {
    let mut text = text.to_string();
    for entry in BOOK_OVERRIDES {
        if entry.book == book_id {
            for (find, replace) in entry.rules {
                text = text.replace(find, replace);
            }
        }
    }
    text
}
