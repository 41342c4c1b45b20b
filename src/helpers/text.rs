//! Text normalization utilities shared by the catalog loader and the template
//! locator. Spreadsheet authors are inconsistent about case, accents and
//! embedded line breaks; every comparison in this crate goes through one of
//! the normalizers below so lookups survive that variation.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of whitespace, including embedded line breaks.
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Runs of anything that is not a lowercase letter, digit or underscore.
static NON_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("identifier regex"));

/// Folds common Latin accented characters to their ASCII base letter.
/// Characters outside the table pass through unchanged.
pub(crate) fn fold_accents(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => folded.push('a'),
            'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => folded.push('A'),
            'ç' => folded.push('c'),
            'Ç' => folded.push('C'),
            'è' | 'é' | 'ê' | 'ë' => folded.push('e'),
            'È' | 'É' | 'Ê' | 'Ë' => folded.push('E'),
            'ì' | 'í' | 'î' | 'ï' => folded.push('i'),
            'Ì' | 'Í' | 'Î' | 'Ï' => folded.push('I'),
            'ñ' => folded.push('n'),
            'Ñ' => folded.push('N'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => folded.push('o'),
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => folded.push('O'),
            'ù' | 'ú' | 'û' | 'ü' => folded.push('u'),
            'Ù' | 'Ú' | 'Û' | 'Ü' => folded.push('U'),
            'ý' | 'ÿ' => folded.push('y'),
            'Ý' => folded.push('Y'),
            'œ' => folded.push_str("oe"),
            'Œ' => folded.push_str("OE"),
            'æ' => folded.push_str("ae"),
            'Æ' => folded.push_str("AE"),
            other => folded.push(other),
        }
    }
    folded
}

/// Normalizes free-form cell text for comparison: accents folded, case
/// folded, whitespace runs (line breaks included) collapsed to single
/// spaces, surrounding whitespace trimmed. Idempotent.
pub(crate) fn normalize_cell_text(text: &str) -> String {
    let folded = fold_accents(text).to_lowercase();
    WHITESPACE.replace_all(&folded, " ").trim().to_string()
}

/// Normalizes a column header into an identifier: accents folded, case
/// folded, every run of non-alphanumeric characters collapsed to a single
/// underscore, leading/trailing underscores trimmed. Idempotent.
pub(crate) fn normalize_column_name(header: &str) -> String {
    let folded = fold_accents(header).to_lowercase();
    NON_IDENTIFIER
        .replace_all(&folded, "_")
        .trim_matches('_')
        .to_string()
}

/// Returns the first line of a (possibly multi-line) header that carries at
/// least one alphanumeric character. Placeholder lines such as `-` or `...`
/// are skipped; a header with no useful line yields an empty string.
pub(crate) fn first_useful_line(header: &str) -> &str {
    header
        .lines()
        .find(|line| line.chars().any(char::is_alphanumeric))
        .map(str::trim)
        .unwrap_or("")
}
