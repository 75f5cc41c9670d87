//! Word-level diff between two normalized chapter strings.
//!
//! Tokens are maximal runs of a single character class (whitespace,
//! alphanumeric, other), diffed with a longest-common-subsequence alignment.
//! Because paired chapters are near-identical, the common prefix and suffix
//! are trimmed off first so the DP table only ever covers the changed middle.

/// Classification of a contiguous run of diffed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// Present in both editions.
    Unchanged,
    /// Present only in the second (UK) edition.
    Inserted,
    /// Present only in the first (US) edition.
    Removed,
}

/// A contiguous run of text with its diff classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSpan {
    pub kind: DiffKind,
    pub text: String,
}

impl DiffSpan {
    fn new(kind: DiffKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Compute a word-granularity diff of `a` (US baseline) against `b` (UK).
///
/// Pure function. Concatenating the Unchanged+Removed spans reconstructs `a`
/// exactly; Unchanged+Inserted reconstructs `b` exactly. Adjacent tokens with
/// the same classification are merged into a single span.
pub fn diff_words(a: &str, b: &str) -> Vec<DiffSpan> {
    let ta = tokenize(a);
    let tb = tokenize(b);

    // Trim the common prefix and suffix before running the quadratic LCS
    let prefix = ta
        .iter()
        .zip(tb.iter())
        .take_while(|(x, y)| x == y)
        .count();
    let max_suffix = ta.len().min(tb.len()) - prefix;
    let suffix = ta
        .iter()
        .rev()
        .zip(tb.iter().rev())
        .take(max_suffix)
        .take_while(|(x, y)| x == y)
        .count();

    let mid_a = &ta[prefix..ta.len() - suffix];
    let mid_b = &tb[prefix..tb.len() - suffix];

    let mut spans = SpanBuilder::new();
    for tok in &ta[..prefix] {
        spans.push(DiffKind::Unchanged, tok);
    }
    diff_middle(mid_a, mid_b, &mut spans);
    for tok in &ta[ta.len() - suffix..] {
        spans.push(DiffKind::Unchanged, tok);
    }
    spans.finish()
}

/// LCS diff of the changed middle, emitted as removals-then-insertions
/// between matches.
fn diff_middle(a: &[&str], b: &[&str], spans: &mut SpanBuilder) {
    if a.is_empty() {
        for tok in b {
            spans.push(DiffKind::Inserted, tok);
        }
        return;
    }
    if b.is_empty() {
        for tok in a {
            spans.push(DiffKind::Removed, tok);
        }
        return;
    }

    let lcs = longest_common_subsequence(a, b);

    let mut ai = 0;
    let mut bi = 0;
    for (la, lb) in lcs {
        while ai < la {
            spans.push(DiffKind::Removed, a[ai]);
            ai += 1;
        }
        while bi < lb {
            spans.push(DiffKind::Inserted, b[bi]);
            bi += 1;
        }
        spans.push(DiffKind::Unchanged, a[la]);
        ai += 1;
        bi += 1;
    }
    while ai < a.len() {
        spans.push(DiffKind::Removed, a[ai]);
        ai += 1;
    }
    while bi < b.len() {
        spans.push(DiffKind::Inserted, b[bi]);
        bi += 1;
    }
}

fn longest_common_subsequence(a: &[&str], b: &[&str]) -> Vec<(usize, usize)> {
    let n = a.len();
    let m = b.len();

    let mut dp = vec![vec![0u32; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut lcs = Vec::new();
    let mut i = n;
    let mut j = m;
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            lcs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] > dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    lcs.reverse();
    lcs
}

/// Accumulates tokens, merging consecutive pushes of the same kind.
struct SpanBuilder {
    spans: Vec<DiffSpan>,
}

impl SpanBuilder {
    fn new() -> Self {
        Self { spans: Vec::new() }
    }

    fn push(&mut self, kind: DiffKind, text: &str) {
        if let Some(last) = self.spans.last_mut()
            && last.kind == kind
        {
            last.text.push_str(text);
            return;
        }
        self.spans.push(DiffSpan::new(kind, text));
    }

    fn finish(self) -> Vec<DiffSpan> {
        self.spans
    }
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum CharClass {
    Whitespace,
    Word,
    Other,
}

fn char_class(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Whitespace
    } else if c.is_alphanumeric() {
        CharClass::Word
    } else {
        CharClass::Other
    }
}

/// Split into maximal runs of a single character class.
fn tokenize(s: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<CharClass> = None;

    for (idx, c) in s.char_indices() {
        let class = char_class(c);
        match current {
            Some(prev) if prev == class => {}
            Some(_) => {
                tokens.push(&s[start..idx]);
                start = idx;
                current = Some(class);
            }
            None => current = Some(class),
        }
    }
    if current.is_some() {
        tokens.push(&s[start..]);
    }
    tokens
}
