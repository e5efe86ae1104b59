//! Ownership-record parser for linearized registry extracts.
//!
//! The parser walks the lines of a [`LinearizedText`](crate::LinearizedText)
//! once. Date and property headers set the context stamped on every record;
//! table rows become records. After a co-owner marker the rest of the
//! document is read as one co-owner table that yields a single record at the
//! end.

mod cursor;
mod patterns;
mod state;

use crate::record::OwnershipRecord;

use cursor::LineCursor;
use state::ParserState;

/// Records plus counters describing how much of the input was used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Records in document order.
    pub records: Vec<OwnershipRecord>,
    /// Data rows that produced nothing (unmatched, stray or blank).
    pub skipped_rows: usize,
    /// Lines read, continuation lines included.
    pub lines_scanned: usize,
    /// Date headers naming an impossible date or time; the previous record
    /// date stays in effect after one.
    pub invalid_dates: usize,
}

/// Parse linearized registry text into ownership records.
///
/// Never fails: lines that do not fit any known row shape are ignored.
pub fn parse(text: &str) -> Vec<OwnershipRecord> {
    parse_with_report(text).records
}

/// Like [`parse`], also counting skipped rows.
pub fn parse_with_report(text: &str) -> ParseReport {
    let mut state = ParserState::default();
    let mut report = ParseReport::default();
    let mut cursor = LineCursor::new(text);

    while let Some(line) = cursor.next() {
        if patterns::is_date_header(line) {
            match patterns::record_date(line) {
                Some(date) => state.record_date = date,
                None => report.invalid_dates += 1,
            }
        }
        if let Some(address) = patterns::property_address(line) {
            state.property_address = address;
        }
        if patterns::is_co_owner_marker(line) {
            state.co_owner_mode = true;
        }
        if !patterns::is_data_row(line) {
            continue;
        }

        if state.co_owner_mode {
            match patterns::match_co_owner_row(line) {
                Some(row) => state.co_owners.push(row.address, row.name),
                None => report.skipped_rows += 1,
            }
            continue;
        }

        match patterns::match_owner_row(line) {
            Some(row) if row.is_stray_address() || row.is_blank() => report.skipped_rows += 1,
            Some(row) => {
                let mut address = row.address;
                for extra in cursor.consume_while(patterns::address_continuation) {
                    address.push_str(&extra);
                }
                let mut names = vec![row.name];
                names.extend(cursor.consume_while(patterns::name_continuation));
                let name = patterns::merge_name_lines(&names);
                report.records.push(state.record(name, address));
            }
            None => report.skipped_rows += 1,
        }
    }

    report.lines_scanned = cursor.position();
    if let Some(record) = state.finish() {
        report.records.push(record);
    }
    report
}
