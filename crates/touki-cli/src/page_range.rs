use std::ops::RangeInclusive;

/// Parse a 1-based page list such as `"1,3-5"` into sorted, distinct
/// 0-based page indices.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, String> {
    let mut pages = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let span = parse_span(part)?;
        for page in [*span.start(), *span.end()] {
            check_page(page, page_count)?;
        }
        pages.extend(span.map(|p| p - 1));
    }
    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn parse_span(part: &str) -> Result<RangeInclusive<usize>, String> {
    match part.split_once('-') {
        Some((start, end)) => Ok(parse_page(start)?..=parse_page(end)?),
        None => {
            let page = parse_page(part)?;
            Ok(page..=page)
        }
    }
}

fn parse_page(text: &str) -> Result<usize, String> {
    let text = text.trim();
    text.parse()
        .map_err(|_| format!("invalid page number: '{text}'"))
}

fn check_page(page: usize, page_count: usize) -> Result<(), String> {
    if page == 0 {
        Err("page 0 is invalid (pages start at 1)".to_string())
    } else if page > page_count {
        Err(format!("page {page} exceeds document page count ({page_count})"))
    } else {
        Ok(())
    }
}
