//! HTML fragment rendering of classified diff spans.
//!
//! Three mutually exclusive wrappers, one per classification: `<span>` for
//! unchanged text, `<ins>` for UK-only text, `<del>` for US-only text.
//! The semantic ins/del tags are kept deliberately: most screen reader and
//! browser combinations announce them correctly, and layering off-screen
//! text on top interfered with the ones that already did.

use crate::diff::{DiffKind, DiffSpan};

/// Render one span per line at the given indent. Span text is emitted
/// verbatim; restored `<sup>` verse markers pass straight through.
pub fn render_spans(spans: &[DiffSpan], indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = String::new();
    for span in spans {
        let (open, close) = match span.kind {
            DiffKind::Inserted => ("<ins>", "</ins>"),
            DiffKind::Removed => ("<del>", "</del>"),
            DiffKind::Unchanged => ("<span>", "</span>"),
        };
        out.push_str(&pad);
        out.push_str(open);
        out.push_str(&span.text);
        out.push_str(close);
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// Wrap one chapter's spans in the paragraph container the viewer expects.
pub fn render_chapter(spans: &[DiffSpan]) -> String {
    format!("<p>\n{}\n  </p>\n", render_spans(spans, 4))
}

/// Assemble a standalone HTML page from a book's chapter fragments, with
/// `<h2>` separators. Debug output only; the viewer consumes the JSON form.
pub fn render_book_page(fragments: &[String]) -> String {
    let mut body = String::new();
    for (i, fragment) in fragments.iter().enumerate() {
        body.push_str(&format!("\n<h2>Chapter: {}</h2>\n", i + 1));
        body.push_str(fragment);
    }

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
             <meta charset=\"UTF-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
             <title>versediff debug output</title>\n\
             <link rel=\"stylesheet\" href=\"diff.css\">\n\
         </head>\n\
         <body>\n{body}  </body>\n\
         </html>"
    )
}
