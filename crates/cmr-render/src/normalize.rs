//! Text normalization for the two font paths
//!
//! The CMR form is printed in capitals. On the standard-font path the
//! Turkish letters the base-14 fonts cannot show are folded to their ASCII
//! base letters first; on the embedded-font path they are kept as-is.

/// Turkish letters and their ASCII base letters
const FOLD_TABLE: &[(char, char)] = &[
    ('ğ', 'g'),
    ('Ğ', 'G'),
    ('ş', 's'),
    ('Ş', 'S'),
    ('ı', 'i'),
    ('İ', 'I'),
    ('ç', 'c'),
    ('Ç', 'C'),
    ('ö', 'o'),
    ('Ö', 'O'),
    ('ü', 'u'),
    ('Ü', 'U'),
];

fn fold_char(c: char) -> char {
    FOLD_TABLE
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Normalize for the standard (Latin-1 only) font: fold diacritics, then
/// upper-case. Idempotent; empty input yields empty output.
pub fn fold_and_upper(text: &str) -> String {
    text.chars()
        .map(fold_char)
        .collect::<String>()
        .to_uppercase()
}

/// Normalize for the embedded font: upper-case only, diacritics preserved
pub fn upper_only(text: &str) -> String {
    text.to_uppercase()
}
