//! Corpus driver: walks the book files, runs the pipeline per book, and
//! writes the artifacts the viewer consumes.
//!
//! Layout expectations: `<input>/US/NN-Name.xml` paired with
//! `<input>/UK/NN-Name.xml`. Output: one `NN.json` per book (zero-indexed,
//! matching the viewer's fetch scheme) holding the JSON array of chapter
//! fragments, plus `book-names.json` with the ordered names. A malformed book
//! is reported and skipped; it never halts the rest of the corpus.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::diff::diff_words;
use crate::error::{Error, Result};
use crate::extract::{Edition, extract_chapters};
use crate::render::{render_book_page, render_chapter};
use crate::util::{decode_text, extract_xml_encoding};
use crate::xml::parse_document;

/// Options for a corpus run.
#[derive(Debug, Default)]
pub struct RunOptions {
    /// Write standalone debug HTML pages instead of JSON artifacts.
    pub html: bool,
    /// Process only this book file (e.g. `01-Gen.xml`).
    pub book: Option<String>,
}

/// Outcome of a corpus run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub books_ok: usize,
    pub books_failed: usize,
    pub verse_mismatches: usize,
}

/// A chapter whose verse-number sets differ between editions. Data-quality
/// signal, not an error: the diff output for the book is still produced.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct VerseMismatch {
    pub book: String,
    /// 1-based chapter number.
    pub chapter: usize,
    /// Verse numbers present in the US edition only.
    pub missing_in_uk: Vec<u32>,
    /// Verse numbers present in the UK edition only.
    pub missing_in_us: Vec<u32>,
}

/// Parse one edition of one book into normalized chapter strings.
pub fn parse_book(input_root: &Path, edition: Edition, filename: &str) -> Result<Vec<String>> {
    let path = input_root.join(edition.dir_name()).join(filename);
    let bytes = fs::read(&path)?;
    let hint = extract_xml_encoding(&bytes);
    let content = decode_text(&bytes, hint);

    let mut doc = parse_document(&content)?;
    if doc.find_all("chapter").is_empty() {
        return Err(Error::MissingElement(format!(
            "no <chapter> elements in {}",
            path.display()
        )));
    }

    let book_id = filename.strip_suffix(".xml").unwrap_or(filename);
    Ok(extract_chapters(&mut doc, edition, book_id))
}

/// Diff paired chapter strings and render one HTML fragment per chapter.
///
/// Output order is chapter order; `fragments[i]` corresponds to source
/// chapter `i + 1`. A chapter-count mismatch is reported and the diff
/// proceeds over the chapters that align by index.
pub fn diff_book(book_id: &str, us: &[String], uk: &[String]) -> Vec<String> {
    if us.len() != uk.len() {
        log::warn!(
            "{book_id}: chapter count mismatch (US {}, UK {})",
            us.len(),
            uk.len()
        );
    }

    us.iter()
        .zip(uk.iter())
        .map(|(us_chapter, uk_chapter)| render_chapter(&diff_words(us_chapter, uk_chapter)))
        .collect()
}

/// Compare per-chapter verse-number sets between the two editions.
pub fn audit_verse_alignment(book_id: &str, us: &[String], uk: &[String]) -> Vec<VerseMismatch> {
    let mut mismatches = Vec::new();

    for (i, (us_chapter, uk_chapter)) in us.iter().zip(uk.iter()).enumerate() {
        let us_verses: BTreeSet<u32> = verse_numbers(us_chapter).into_iter().collect();
        let uk_verses: BTreeSet<u32> = verse_numbers(uk_chapter).into_iter().collect();
        if us_verses == uk_verses {
            continue;
        }

        let missing_in_uk: Vec<u32> = us_verses.difference(&uk_verses).copied().collect();
        let missing_in_us: Vec<u32> = uk_verses.difference(&us_verses).copied().collect();
        log::warn!(
            "{book_id} chapter {}: verse sets differ (US-only: {missing_in_uk:?}, UK-only: {missing_in_us:?})",
            i + 1
        );
        mismatches.push(VerseMismatch {
            book: book_id.to_string(),
            chapter: i + 1,
            missing_in_uk,
            missing_in_us,
        });
    }

    mismatches
}

/// Verse numbers in a normalized chapter, in marker order.
pub fn verse_numbers(chapter: &str) -> Vec<u32> {
    let mut out = Vec::new();
    for (start, _) in chapter.match_indices("<sup>") {
        let rest = &chapter[start + 5..];
        if let Some(end) = rest.find("</sup>")
            && let Ok(num) = rest[..end].parse::<u32>()
        {
            out.push(num);
        }
    }
    out
}

/// Process every book under `input_root`, writing artifacts to `output_dir`.
pub fn run(input_root: &Path, output_dir: &Path, opts: &RunOptions) -> Result<RunSummary> {
    fs::create_dir_all(output_dir)?;

    let mut filenames = list_book_files(input_root)?;
    if let Some(only) = &opts.book {
        filenames.retain(|f| f == only);
        if filenames.is_empty() {
            return Err(Error::InvalidBook(format!("book file not found: {only}")));
        }
    }

    let mut summary = RunSummary::default();
    let mut all_mismatches = Vec::new();
    let mut book_names = Vec::new();

    for filename in &filenames {
        match process_book(input_root, output_dir, filename, opts.html) {
            Ok(mismatches) => {
                summary.books_ok += 1;
                summary.verse_mismatches += mismatches.len();
                all_mismatches.extend(mismatches);
                book_names.push(display_name(filename).to_string());
            }
            Err(e) => {
                log::error!("{filename}: {e}");
                summary.books_failed += 1;
            }
        }
    }

    if !opts.html {
        let names_file = fs::File::create(output_dir.join("book-names.json"))?;
        serde_json::to_writer(names_file, &book_names)?;
    }
    if !all_mismatches.is_empty() {
        let audit_file = fs::File::create(output_dir.join("audit.json"))?;
        serde_json::to_writer_pretty(audit_file, &all_mismatches)?;
    }

    Ok(summary)
}

/// Run the full pipeline for one book and write its artifact.
fn process_book(
    input_root: &Path,
    output_dir: &Path,
    filename: &str,
    html: bool,
) -> Result<Vec<VerseMismatch>> {
    let book_id = filename.strip_suffix(".xml").unwrap_or(filename);

    let us = parse_book(input_root, Edition::Us, filename)?;
    let uk = parse_book(input_root, Edition::Uk, filename)?;

    let mismatches = audit_verse_alignment(book_id, &us, &uk);
    let fragments = diff_book(book_id, &us, &uk);

    if html {
        let page = render_book_page(&fragments);
        let out_name = format!("{}-{}.html", artifact_index(filename)?, display_name(filename));
        fs::write(output_dir.join(out_name), page)?;
    } else {
        let out_name = format!("{}.json", artifact_index(filename)?);
        let file = fs::File::create(output_dir.join(out_name))?;
        serde_json::to_writer(file, &fragments)?;
    }

    log::info!("{book_id}: {} chapters diffed", fragments.len());
    Ok(mismatches)
}

/// Book files of the US edition, sorted by filename. The `NN-` prefix makes
/// lexicographic order canonical book order.
fn list_book_files(input_root: &Path) -> Result<Vec<String>> {
    let us_dir = input_root.join(Edition::Us.dir_name());
    let mut filenames: Vec<String> = fs::read_dir(&us_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".xml"))
        .collect();
    filenames.sort();
    Ok(filenames)
}

/// Zero-indexed, zero-padded artifact index from a `NN-Name.xml` filename,
/// matching the viewer's fetch scheme (`01-Gen.xml` -> `00`).
fn artifact_index(filename: &str) -> Result<String> {
    let digits: String = filename.chars().take_while(|c| c.is_ascii_digit()).collect();
    let number: u32 = digits
        .parse()
        .map_err(|_| Error::InvalidBook(format!("no numeric prefix in {filename}")))?;
    let index = number
        .checked_sub(1)
        .ok_or_else(|| Error::InvalidBook(format!("book number 0 in {filename}")))?;
    Ok(format!("{index:02}"))
}

/// Short display name from a `NN-Name.xml` filename (`01-Gen.xml` -> `Gen`).
fn display_name(filename: &str) -> &str {
    let stem = filename.strip_suffix(".xml").unwrap_or(filename);
    stem.split_once('-').map_or(stem, |(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_index() {
        assert_eq!(artifact_index("01-Gen.xml").unwrap(), "00");
        assert_eq!(artifact_index("45-Rom.xml").unwrap(), "44");
        assert!(artifact_index("Gen.xml").is_err());
        assert!(artifact_index("00-Bad.xml").is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("01-Gen.xml"), "Gen");
        assert_eq!(display_name("19-Ps.xml"), "Ps");
        assert_eq!(display_name("odd.xml"), "odd");
    }

    #[test]
    fn test_verse_numbers() {
        let chapter = "<sup>1</sup> In the beginning <sup>2</sup> and";
        assert_eq!(verse_numbers(chapter), vec![1, 2]);
        // Non-numeric sup content is not a verse marker
        assert_eq!(verse_numbers("<sup>a</sup> note"), Vec::<u32>::new());
    }

    #[test]
    fn test_audit_detects_symmetric_difference() {
        let us = vec!["<sup>1</sup> a <sup>2</sup> b".to_string()];
        let uk = vec!["<sup>1</sup> a <sup>3</sup> b".to_string()];
        let mismatches = audit_verse_alignment("01-Gen", &us, &uk);
        assert_eq!(
            mismatches,
            vec![VerseMismatch {
                book: "01-Gen".to_string(),
                chapter: 1,
                missing_in_uk: vec![2],
                missing_in_us: vec![3],
            }]
        );
    }

    #[test]
    fn test_audit_aligned_is_quiet() {
        let us = vec!["<sup>1</sup> a".to_string()];
        let uk = vec!["<sup>1</sup> b".to_string()];
        assert!(audit_verse_alignment("01-Gen", &us, &uk).is_empty());
    }

    #[test]
    fn test_diff_book_order_and_length() {
        let us = vec!["one".to_string(), "two".to_string()];
        let uk = vec!["one".to_string(), "too".to_string()];
        let fragments = diff_book("01-Gen", &us, &uk);
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].contains("<span>one</span>"));
        assert!(fragments[1].contains("<del>two</del>"));
        assert!(fragments[1].contains("<ins>too</ins>"));
    }

    #[test]
    fn test_diff_book_mismatched_counts_zip() {
        let us = vec!["one".to_string(), "two".to_string()];
        let uk = vec!["one".to_string()];
        let fragments = diff_book("01-Gen", &us, &uk);
        assert_eq!(fragments.len(), 1);
    }
}
