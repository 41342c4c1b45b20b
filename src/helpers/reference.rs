//! A1-style cell reference arithmetic. Both the reference-workbook parser and
//! the template engine address cells by 1-based `(column, row)` pairs; these
//! helpers convert between that form and the textual `B18` / `B2:D4` form
//! used by the xlsx format and the merge tables.

/// Converts a 1-based column index to its letter form (1 -> "A", 27 -> "AA").
pub(crate) fn column_to_letters(column: u32) -> String {
    let mut letters = Vec::new();
    let mut remaining = column;
    while remaining > 0 {
        let digit = (remaining - 1) % 26;
        letters.push(char::from(b'A' + digit as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Converts a column letter form to its 1-based index ("A" -> 1, "AA" -> 27).
/// Returns `None` for anything that is not purely ASCII letters.
pub(crate) fn letters_to_column(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut column = 0u32;
    for character in letters.chars() {
        if !character.is_ascii_alphabetic() {
            return None;
        }
        let digit = character.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        column = column.checked_mul(26)?.checked_add(digit)?;
    }
    Some(column)
}

/// Parses an `A1`-style reference into a 1-based `(column, row)` pair.
pub(crate) fn parse_reference(reference: &str) -> Option<(u32, u32)> {
    let reference = reference.trim().trim_start_matches('$');
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    let column = letters_to_column(letters.trim_end_matches('$'))?;
    let row = digits.trim_start_matches('$').parse::<u32>().ok()?;
    if row == 0 {
        return None;
    }
    Some((column, row))
}

/// Formats a 1-based `(column, row)` pair as an `A1`-style reference.
pub(crate) fn format_reference(column: u32, row: u32) -> String {
    format!("{}{}", column_to_letters(column), row)
}

/// Parses an `A1:B2`-style range into `((col, row), (col, row))` corners.
/// A single-cell reference is accepted as a degenerate range.
pub(crate) fn parse_range(range: &str) -> Option<((u32, u32), (u32, u32))> {
    match range.split_once(':') {
        Some((start, end)) => {
            let start = parse_reference(start)?;
            let end = parse_reference(end)?;
            Some((start, end))
        }
        None => {
            let cell = parse_reference(range)?;
            Some((cell, cell))
        }
    }
}

/// Formats two 1-based corners as an `A1:B2`-style range.
pub(crate) fn format_range(start: (u32, u32), end: (u32, u32)) -> String {
    format!(
        "{}:{}",
        format_reference(start.0, start.1),
        format_reference(end.0, end.1)
    )
}
