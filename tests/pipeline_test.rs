//! End-to-end pipeline tests on inline XML fixtures.
//!
//! These exercise the full parse -> normalize -> extract -> diff -> render
//! chain for both editions, plus the corpus driver's artifact writing and
//! per-book failure isolation.

use std::fs;

use versediff::corpus::{self, RunOptions};
use versediff::{Edition, diff_words, extract_chapters, parse_document, render_chapter};

/// Diff one pair of single-book XML strings and return per-chapter fragments.
fn diff_xml(us_xml: &str, uk_xml: &str, book_id: &str) -> Vec<String> {
    let mut us_doc = parse_document(us_xml).expect("US XML should parse");
    let mut uk_doc = parse_document(uk_xml).expect("UK XML should parse");
    let us = extract_chapters(&mut us_doc, Edition::Us, book_id);
    let uk = extract_chapters(&mut uk_doc, Edition::Uk, book_id);
    assert_eq!(us.len(), uk.len(), "fixture chapter counts should align");
    us.iter()
        .zip(uk.iter())
        .map(|(a, b)| render_chapter(&diff_words(a, b)))
        .collect()
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

// ============================================================================
// Diff quality
// ============================================================================

#[test]
fn test_dash_convention_produces_no_noise() {
    // Same text; US uses em-dash, UK en-dash; one genuinely differing word
    let us = "<book><chapter><p><sup class=\"verse-ref\">1</sup>The king\u{2014}great in honor\u{2014}spoke.</p></chapter></book>";
    let uk = "<book><chapter><p><sup class=\"verse-ref\">1</sup>The king\u{2013}great in honour\u{2013}spoke.</p></chapter></book>";

    let fragments = diff_xml(us, uk, "01-Gen");
    let fragment = &fragments[0];

    assert_eq!(count(fragment, "<del>"), 1, "only the spelling change: {fragment}");
    assert_eq!(count(fragment, "<ins>"), 1, "only the spelling change: {fragment}");
    assert!(fragment.contains("<del>honor</del>"));
    assert!(fragment.contains("<ins>honour</ins>"));
}

#[test]
fn test_quote_convention_produces_no_noise() {
    // US nests double-outside, UK single-outside; wording identical
    let us = "<book><chapter><p>\u{201C}Come,\u{201D} he said, \u{201C}don\u{2019}t wait.\u{201D}</p></chapter></book>";
    let uk = "<book><chapter><p>\u{2018}Come,\u{2019} he said, \u{2018}don\u{2019}t wait.\u{2019}</p></chapter></book>";

    let fragments = diff_xml(us, uk, "01-Gen");
    let fragment = &fragments[0];

    assert_eq!(count(fragment, "<del>"), 0, "quote styling alone must not diff: {fragment}");
    assert_eq!(count(fragment, "<ins>"), 0, "quote styling alone must not diff: {fragment}");
}

#[test]
fn test_whitespace_noise_produces_no_diff() {
    let us = "<book><chapter><p>In the beginning God created</p></chapter></book>";
    let uk = "<book><chapter><p>In   the\n      beginning\tGod  created</p></chapter></book>";

    let fragments = diff_xml(us, uk, "01-Gen");
    assert_eq!(count(&fragments[0], "<del>"), 0);
    assert_eq!(count(&fragments[0], "<ins>"), 0);
}

// ============================================================================
// Verse marker round-trip
// ============================================================================

#[test]
fn test_verse_markers_round_trip_through_diff() {
    let us = r#"<book><chapter>
        <p><sup class="verse-ref">1</sup>In the beginning God created the heavens.
        <sup class="verse-ref">2</sup>The earth was formless.
        <sup class="verse-ref">3</sup>Then God said let there be light.</p>
    </chapter></book>"#;
    // UK changes wording around every marker
    let uk = r#"<book><chapter>
        <p><sup class="verse-ref">1</sup>In the beginning God made the heavens.
        <sup class="verse-ref">2</sup>The earth was shapeless.
        <sup class="verse-ref">3</sup>Then God said let there be brightness.</p>
    </chapter></book>"#;

    let fragments = diff_xml(us, uk, "01-Gen");
    let fragment = &fragments[0];

    // Exactly three markers, in order, with the original numbers
    for n in 1..=3 {
        assert_eq!(count(fragment, &format!("<sup>{n}</sup>")), 1, "{fragment}");
    }
    let p1 = fragment.find("<sup>1</sup>").unwrap();
    let p2 = fragment.find("<sup>2</sup>").unwrap();
    let p3 = fragment.find("<sup>3</sup>").unwrap();
    assert!(p1 < p2 && p2 < p3);

    // No sentinel may leak into final output
    assert!(!fragment.contains("***"), "sentinel leaked: {fragment}");
}

#[test]
fn test_footnote_superscripts_are_discarded() {
    let us = r#"<book><chapter><p><sup class="verse-ref">1</sup>The word<sup class="cross-ref">a</sup> stood.</p></chapter></book>"#;
    let uk = r#"<book><chapter><p><sup class="verse-ref">1</sup>The word<sup class="translate-note">b</sup> stood.</p></chapter></book>"#;

    let fragments = diff_xml(us, uk, "01-Gen");
    assert_eq!(count(&fragments[0], "<del>"), 0);
    assert_eq!(count(&fragments[0], "<ins>"), 0);
}

#[test]
fn test_fraction_superscript_survives() {
    let us = r#"<book><chapter><p>an omer is <sup>1</sup><sub>10</sub> of an ephah</p></chapter></book>"#;
    let uk = r#"<book><chapter><p>an omer is <sup>1</sup><sub>10</sub> of an ephah</p></chapter></book>"#;

    let fragments = diff_xml(us, uk, "02-Ex");
    let fragment = &fragments[0];
    assert!(fragment.contains("1 10 of an ephah"), "{fragment}");
    assert_eq!(count(fragment, "<del>"), 0);
}

// ============================================================================
// Chapter alignment
// ============================================================================

#[test]
fn test_chapter_alignment_order() {
    let us = "<book>\
        <chapter><p>alpha text</p></chapter>\
        <chapter><p>beta text</p></chapter>\
        <chapter><p>gamma text</p></chapter>\
    </book>";
    let uk = us;

    let fragments = diff_xml(us, uk, "01-Gen");
    assert_eq!(fragments.len(), 3);
    assert!(fragments[0].contains("alpha"));
    assert!(fragments[1].contains("beta"));
    assert!(fragments[2].contains("gamma"));
}

#[test]
fn test_headings_do_not_reach_output() {
    let us = "<book><psalm>BOOK I</psalm><chapter><head1>The Creation</head1><p>body text</p></chapter></book>";
    let fragments = diff_xml(us, us, "19-Ps");
    assert!(!fragments[0].contains("Creation"));
    assert!(!fragments[0].contains("BOOK"));
    assert!(fragments[0].contains("body text"));
}

// ============================================================================
// Corpus driver
// ============================================================================

fn write_fixture(root: &std::path::Path, edition: &str, filename: &str, content: &str) {
    let dir = root.join(edition);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(filename), content).unwrap();
}

#[test]
fn test_driver_writes_json_artifacts() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let book = r#"<book><chapter><p><sup class="verse-ref">1</sup>words here</p></chapter></book>"#;
    write_fixture(input.path(), "US", "01-Gen.xml", book);
    write_fixture(input.path(), "UK", "01-Gen.xml", book);

    let summary = corpus::run(input.path(), output.path(), &RunOptions::default()).unwrap();
    assert_eq!(summary.books_ok, 1);
    assert_eq!(summary.books_failed, 0);

    // Zero-indexed artifact per the viewer's fetch scheme
    let json = fs::read_to_string(output.path().join("00.json")).unwrap();
    let fragments: Vec<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(fragments.len(), 1);
    assert!(fragments[0].contains("<sup>1</sup>"));

    let names = fs::read_to_string(output.path().join("book-names.json")).unwrap();
    let names: Vec<String> = serde_json::from_str(&names).unwrap();
    assert_eq!(names, vec!["Gen"]);
}

#[test]
fn test_driver_isolates_per_book_failures() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let good = "<book><chapter><p>fine</p></chapter></book>";
    write_fixture(input.path(), "US", "01-Gen.xml", good);
    write_fixture(input.path(), "UK", "01-Gen.xml", good);
    // Malformed UK file: the book fails, the run continues
    write_fixture(input.path(), "US", "02-Ex.xml", good);
    write_fixture(input.path(), "UK", "02-Ex.xml", "<book><chapter><p>broken</book>");

    let summary = corpus::run(input.path(), output.path(), &RunOptions::default()).unwrap();
    assert_eq!(summary.books_ok, 1);
    assert_eq!(summary.books_failed, 1);
    assert!(output.path().join("00.json").exists());
    assert!(!output.path().join("01.json").exists());
}

#[test]
fn test_driver_reports_verse_mismatch_and_still_outputs() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let us = r#"<book><chapter><p><sup class="verse-ref">1</sup>a <sup class="verse-ref">2</sup>b</p></chapter></book>"#;
    let uk = r#"<book><chapter><p><sup class="verse-ref">1</sup>a</p></chapter></book>"#;
    write_fixture(input.path(), "US", "01-Gen.xml", us);
    write_fixture(input.path(), "UK", "01-Gen.xml", uk);

    let summary = corpus::run(input.path(), output.path(), &RunOptions::default()).unwrap();
    assert_eq!(summary.books_ok, 1);
    assert_eq!(summary.verse_mismatches, 1);

    // Best-effort output still produced, and the audit artifact names the gap
    assert!(output.path().join("00.json").exists());
    let audit = fs::read_to_string(output.path().join("audit.json")).unwrap();
    assert!(audit.contains("\"book\": \"01-Gen\""));
    assert!(audit.contains('2'));
}

#[test]
fn test_driver_html_mode() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let book = "<book><chapter><p>page text</p></chapter></book>";
    write_fixture(input.path(), "US", "01-Gen.xml", book);
    write_fixture(input.path(), "UK", "01-Gen.xml", book);

    let opts = RunOptions {
        html: true,
        book: None,
    };
    corpus::run(input.path(), output.path(), &opts).unwrap();

    let page = fs::read_to_string(output.path().join("00-Gen.html")).unwrap();
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<h2>Chapter: 1</h2>"));
}

#[test]
fn test_driver_single_book_selection() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let book = "<book><chapter><p>text</p></chapter></book>";
    write_fixture(input.path(), "US", "01-Gen.xml", book);
    write_fixture(input.path(), "UK", "01-Gen.xml", book);
    write_fixture(input.path(), "US", "02-Ex.xml", book);
    write_fixture(input.path(), "UK", "02-Ex.xml", book);

    let opts = RunOptions {
        html: false,
        book: Some("02-Ex.xml".to_string()),
    };
    let summary = corpus::run(input.path(), output.path(), &opts).unwrap();
    assert_eq!(summary.books_ok, 1);
    assert!(output.path().join("01.json").exists());
    assert!(!output.path().join("00.json").exists());
}

#[test]
fn test_driver_unknown_book_is_error() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::create_dir_all(input.path().join("US")).unwrap();

    let opts = RunOptions {
        html: false,
        book: Some("99-Nope.xml".to_string()),
    };
    assert!(corpus::run(input.path(), output.path(), &opts).is_err());
}
