//! End-to-end parser scenarios over linearized registry text.

use touki_core::*;

fn owner_table(rows: &[&str]) -> String {
    let mut lines = vec![
        "２０２５／０６／１２　１７：４５".to_string(),
        "東京都墨田区八広４丁目 所有者一覧表".to_string(),
        "┏━━━━━━━━━━━━┯━━━━━━┓".to_string(),
        "┃住所│氏名┃".to_string(),
        "┠────────────┼──────┨".to_string(),
    ];
    lines.extend(rows.iter().map(|row| row.to_string()));
    lines.push("┗━━━━━━━━━━━━┷━━━━━━┛".to_string());
    lines.join("\n")
}

#[test]
fn test_scenario_single_owner() {
    let text = "２０２５／０６／１２　１７：４５\n\
                東京都墨田区八広４丁目 所有者一覧表\n\
                ┃住所│氏名┃\n\
                ┃東京都墨田区八広４丁目１２－３│田中太郎┃";
    let records = parse(text);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.record_date, "2025-06-12T17:45:00");
    assert_eq!(record.property_address, "東京都墨田区八広４丁目");
    assert_eq!(record.owner_address, "東京都墨田区八広４丁目１２－３");
    assert_eq!(record.owner_name, "田中太郎");
}

#[test]
fn test_empty_input() {
    assert!(parse("").is_empty());
    assert_eq!(parse_with_report("").lines_scanned, 0);
}

#[test]
fn test_unmatched_garbage() {
    let text = "Lorem ipsum dolor sit amet\n\
                登記簿に関するお知らせ\n\
                | a | b |\n\
                1234-56-78";
    let report = parse_with_report(text);
    assert!(report.records.is_empty());
    assert_eq!(report.skipped_rows, 0);
    assert_eq!(report.lines_scanned, 4);
}

#[test]
fn test_half_and_full_width_dates_agree() {
    let full = parse("２０２５／０６／１２　１７：４５\n┃東京都│田中太郎┃");
    let half = parse("2025/06/12 17:45\n┃東京都│田中太郎┃");
    assert_eq!(full, half);
    assert_eq!(half[0].record_date, "2025-06-12T17:45:00");
}

#[test]
fn test_date_built_from_converted_digits() {
    for (year, month, day) in [(2024, 1, 9), (2025, 12, 31), (1999, 7, 4)] {
        let half = format!("{year}/{month:02}/{day:02} 08:05\n┃東京都│A┃");
        let full = to_full_width(&half);
        assert_eq!(parse(&half), parse(&full));
        assert_eq!(
            parse(&full)[0].record_date,
            format!("{year}-{month:02}-{day:02}T08:05:00")
        );
    }
}

#[test]
fn test_header_persistence() {
    let text = owner_table(&["┃東京都墨田区│田中太郎┃", "┃大阪府大阪市│山田花子┃"]);
    let records = parse(&text);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].property_address, records[1].property_address);
    assert_eq!(records[0].record_date, records[1].record_date);
}

#[test]
fn test_co_owner_flush() {
    let text = "共有者\n┃東京都墨田区│２分の１│A┃\n┃│２分の１│B┃";
    let records = parse(text);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].owner_name, "A、B");
    assert_eq!(records[0].owner_address, "東京都墨田区");
}

#[test]
fn test_co_owner_latch_never_resets() {
    let text = "共有者一覧\n\
                ┃東京都墨田区│１／２│A┃\n\
                東京都墨田区八広 所有者一覧表\n\
                ┃住所│氏名┃\n\
                ┃大阪府大阪市│B┃";
    let records = parse(text);
    // The two-column row is read as a co-owner row and does not match.
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].owner_name, "A");
    assert_eq!(records[0].property_address, "東京都墨田区八広");
}

#[test]
fn test_address_continuation_merge() {
    let text = owner_table(&["┃東京都墨田区│田中太郎┃", "┃八広4丁目│┃"]);
    let records = parse(&text);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].owner_address, "東京都墨田区八広4丁目");
    assert_eq!(records[0].owner_name, "田中太郎");
}

#[test]
fn test_company_name_continuation() {
    let text = owner_table(&[
        "┃東京都千代田区丸の内１－１│株式会社八広商事┃",
        "┃│（会社法人等番号 0100 01 234567）┃",
        "┃東京都墨田区│田中太郎┃",
    ]);
    let records = parse(&text);
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].owner_name,
        "株式会社八広商事（　会社法人等番号　010001234567）"
    );
    assert_eq!(records[1].owner_name, "田中太郎");
}

#[test]
fn test_rows_spread_over_pages() {
    let text = format!(
        "{}{}{}",
        owner_table(&["┃東京都墨田区│田中太郎┃"]),
        page_break_marker(2),
        "┃東京都江東区│佐藤一郎┃"
    );
    let records = parse(&text);
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].property_address, "東京都墨田区八広４丁目");
}

#[test]
fn test_linearized_fragments_parse() {
    let page = vec![
        PositionedTextFragment::new("┃東京都墨田区八広４丁目１２－３", 2.0, 8.0),
        PositionedTextFragment::new("│田中太郎┃", 20.0, 8.0),
        PositionedTextFragment::new("┃住所│氏名┃", 2.0, 6.0),
        PositionedTextFragment::new("東京都墨田区八広４丁目 所有者一覧表", 2.0, 4.0),
        PositionedTextFragment::new("２０２５／０６／１２　１７：４５", 2.0, 2.0),
    ];
    let text = linearize(&[page]);
    let records = parse(&text);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].owner_address, "東京都墨田区八広４丁目１２－３");
    assert_eq!(records[0].owner_name, "田中太郎");
    assert_eq!(records[0].record_date, "2025-06-12T17:45:00");
}

#[test]
fn test_parse_idempotent() {
    let text = owner_table(&["┃東京都墨田区│田中太郎┃", "┃八広4丁目│┃"]);
    assert_eq!(parse(&text), parse(&text));
}
