//! UK-edition quote swapping.
//!
//! The UK files nest quotations single-outside/double-inside; the US files do
//! the opposite. To keep the diff quiet, every directional quote in the UK
//! text is reassigned to the US convention. The only ambiguous case is the
//! close-single character U+2019, which doubles as the apostrophe in
//! possessives and contractions; [`is_closing_quote`] decides which it is.
//!
//! The heuristic is a fixed sequence of ordered checks tuned against the
//! corpus. It is known to be imperfect; the rule order and conditions are
//! deliberate and must not be reordered.

const OPEN_SINGLE: char = '\u{2018}';
const CLOSE_SINGLE: char = '\u{2019}';
const OPEN_DOUBLE: char = '\u{201C}';
const CLOSE_DOUBLE: char = '\u{201D}';

const ZERO_WIDTH_SPACE: char = '\u{200B}';
const EM_DASH: char = '\u{2014}';

/// Swap single and double curly quotes throughout `input`.
///
/// Straight quotes are ignored; apostrophes (per [`is_closing_quote`]) are
/// left as-is. Pure function: identical input yields identical output.
pub fn swap_quotes(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());

    for (i, &c) in chars.iter().enumerate() {
        match c {
            OPEN_SINGLE => out.push(OPEN_DOUBLE),
            OPEN_DOUBLE => out.push(OPEN_SINGLE),
            CLOSE_SINGLE if is_closing_quote(&chars, i) => out.push(CLOSE_DOUBLE),
            CLOSE_DOUBLE => out.push(CLOSE_SINGLE),
            _ => out.push(c),
        }
    }

    out
}

/// Decide whether the close-single character at `chars[i]` is a genuine
/// closing quotation mark rather than an apostrophe.
///
/// Five ordered checks, short-circuiting on the first match:
/// 1. Preceded by a non-letter. Possessives and contractions always sit
///    between letters, so this alone settles most cases.
/// 2. Followed by space + zero-width space + em-dash (quotation interrupted
///    by a dash).
/// 3. Followed by space + open or close parenthesis.
/// 4. Followed directly by punctuation (non-word, non-space).
/// 5. Not preceded by "s", followed by a space and then a letter. Catches
///    quote marks the typesetters left off-pattern, while keeping plural
///    possessives ("servants\u{2019}") out.
pub fn is_closing_quote(chars: &[char], i: usize) -> bool {
    // Step 1
    if i >= 1 && !chars[i - 1].is_ascii_alphabetic() {
        return true;
    }

    // Step 2
    if chars.get(i + 1..i + 4) == Some(&[' ', ZERO_WIDTH_SPACE, EM_DASH][..]) {
        return true;
    }

    // Step 3
    if chars.get(i + 1..i + 3) == Some(&[' ', '('][..])
        || chars.get(i + 1..i + 3) == Some(&[' ', ')'][..])
    {
        return true;
    }

    // Step 4
    if chars
        .get(i + 1)
        .is_some_and(|&c| !is_word_char(c) && !c.is_whitespace())
    {
        return true;
    }

    // Step 5
    if i >= 1
        && chars[i - 1] != 's'
        && chars.get(i + 1) == Some(&' ')
        && chars.get(i + 2).is_some_and(|c| c.is_ascii_alphabetic())
    {
        return true;
    }

    false
}

/// ASCII word character, matching the `\w` class the original rules use.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
