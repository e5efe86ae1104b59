//! Line classifiers and row matchers for registry extracts.
//!
//! Table rows are printed with heavy vertical bars (`┃`) on the outside and
//! light vertical bars (`│`) between cells; rule lines use `━`/`─`.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::digits::to_half_width;

const PREFECTURES: [&str; 47] = [
    "北海道", "青森県", "岩手県", "宮城県", "秋田県", "山形県", "福島県", "茨城県",
    "栃木県", "群馬県", "埼玉県", "千葉県", "東京都", "神奈川県", "新潟県", "富山県",
    "石川県", "福井県", "山梨県", "長野県", "岐阜県", "静岡県", "愛知県", "三重県",
    "滋賀県", "京都府", "大阪府", "兵庫県", "奈良県", "和歌山県", "鳥取県", "島根県",
    "岡山県", "広島県", "山口県", "徳島県", "香川県", "愛媛県", "高知県", "福岡県",
    "佐賀県", "長崎県", "熊本県", "大分県", "宮崎県", "鹿児島県", "沖縄県",
];

const PROPERTY_HEADER_SUFFIX: &str = "所有者一覧表";
const CORPORATE_NUMBER_LABEL: &str = "会社法人等番号";

static DATE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([0-9０-９]{4})[／/]([0-9０-９]{1,2})[／/]([0-9０-９]{1,2})\s*([0-9０-９]{1,2})[：:]([0-9０-９]{2})",
    )
    .expect("date header pattern is valid")
});

static PROPERTY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"((?:{}).*?)\s*{PROPERTY_HEADER_SUFFIX}",
        PREFECTURES.join("|")
    ))
    .expect("property header pattern is valid")
});

/// `┃address│name┃` patterns, strictest first.
static OWNER_ROWS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"^┃\s*([^┃│]*?)\s*│\s*([^┃│]*?)\s*┃$",
        r"┃\s*([^┃│]*?)\s*│\s*([^┃│]*?)\s*┃",
        r"┃([^│]*)│(.*?)┃?\s*$",
    ]
    .map(|pattern| Regex::new(pattern).expect("owner row pattern is valid"))
});

static CO_OWNER_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"┃\s*([^┃│]*?)\s*│\s*([^┃│]*?)\s*│\s*([^┃│]*?)\s*┃")
        .expect("co-owner row pattern is valid")
});

static ADDRESS_CONTINUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^┃\s*([^┃│]*?)\s*│\s*┃$").expect("address continuation pattern is valid")
});

static NAME_CONTINUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^┃\s*│\s*([^┃│]*?)\s*┃$").expect("name continuation pattern is valid")
});

/// Cells of a two-column owner row, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OwnerRow {
    pub address: String,
    pub name: String,
}

impl OwnerRow {
    /// A left cell without a name: the tail of an address that wrapped.
    pub fn is_stray_address(&self) -> bool {
        !self.address.is_empty() && self.name.is_empty()
    }

    pub fn is_blank(&self) -> bool {
        self.address.is_empty() && self.name.is_empty()
    }
}

/// Cells of a three-column co-owner row; the share column is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CoOwnerRow {
    pub address: String,
    pub name: String,
}

fn cell(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

pub(crate) fn is_date_header(line: &str) -> bool {
    DATE_HEADER.is_match(line)
}

/// Timestamp of a date header line as `YYYY-MM-DDTHH:MM:00`.
///
/// Returns `None` when the line has no date/time or it is not a real
/// calendar date.
pub(crate) fn record_date(line: &str) -> Option<String> {
    let caps = DATE_HEADER.captures(line)?;
    let number = |index: usize| to_half_width(&caps[index]).parse::<u32>().ok();
    let date = NaiveDate::from_ymd_opt(i32::try_from(number(1)?).ok()?, number(2)?, number(3)?)?;
    let timestamp = date.and_hms_opt(number(4)?, number(5)?, 0)?;
    Some(timestamp.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Property address of a `<prefecture>...所有者一覧表` header line.
pub(crate) fn property_address(line: &str) -> Option<String> {
    let caps = PROPERTY_HEADER.captures(line)?;
    let address = cell(&caps, 1);
    (!address.is_empty()).then_some(address)
}

pub(crate) fn is_co_owner_marker(line: &str) -> bool {
    ['共', '有', '者'].iter().all(|&c| line.contains(c))
}

pub(crate) fn is_header_row(line: &str) -> bool {
    ['住', '所', '氏', '名'].iter().all(|&c| line.contains(c))
}

pub(crate) fn is_rule_line(line: &str) -> bool {
    line.contains('━') || line.contains('─')
}

/// A line that may hold table cells.
pub(crate) fn is_data_row(line: &str) -> bool {
    line.contains('┃') && line.contains('│') && !is_rule_line(line) && !is_header_row(line)
}

pub(crate) fn match_owner_row(line: &str) -> Option<OwnerRow> {
    OWNER_ROWS.iter().find_map(|re| {
        re.captures(line).map(|caps| OwnerRow {
            address: cell(&caps, 1),
            name: cell(&caps, 2),
        })
    })
}

pub(crate) fn match_co_owner_row(line: &str) -> Option<CoOwnerRow> {
    CO_OWNER_ROW.captures(line).map(|caps| CoOwnerRow {
        address: cell(&caps, 1),
        name: cell(&caps, 3),
    })
}

fn continuation(re: &Regex, line: &str) -> Option<String> {
    if is_rule_line(line) {
        return None;
    }
    let text = cell(&re.captures(line)?, 1);
    (!text.is_empty()).then_some(text)
}

/// Left-cell text of a `┃extra│┃` row.
pub(crate) fn address_continuation(line: &str) -> Option<String> {
    continuation(&ADDRESS_CONTINUATION, line)
}

/// Right-cell text of a `┃│extra┃` row.
pub(crate) fn name_continuation(line: &str) -> Option<String> {
    continuation(&NAME_CONTINUATION, line)
}

/// Join the name lines of one owner cell.
///
/// A multi-line cell is a company name followed by its registry number:
/// the lines after the first lose their whitespace and the number label is
/// set off with full-width spaces.
pub(crate) fn merge_name_lines(lines: &[String]) -> String {
    match lines {
        [] => String::new(),
        [single] => single.clone(),
        [company, rest @ ..] => {
            let tail: String = rest
                .iter()
                .flat_map(|line| line.chars().filter(|c| !c.is_whitespace()))
                .collect();
            format!("{company}{tail}").replace(
                CORPORATE_NUMBER_LABEL,
                &format!("　{CORPORATE_NUMBER_LABEL}　"),
            )
        }
    }
}
