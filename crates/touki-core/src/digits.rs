//! Full-width / half-width digit conversion.

const FULL_WIDTH_OFFSET: u32 = 0xFEE0;

/// Replace full-width digits (`０`-`９`) with ASCII digits.
///
/// Every other character is kept as is.
pub fn to_half_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - FULL_WIDTH_OFFSET).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Replace ASCII digits with full-width digits (`０`-`９`).
pub fn to_full_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0'..='9' => char::from_u32(c as u32 + FULL_WIDTH_OFFSET).unwrap_or(c),
            _ => c,
        })
        .collect()
}
