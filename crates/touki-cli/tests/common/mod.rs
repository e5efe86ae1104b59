//! Fixtures shared by the CLI integration tests.

#![allow(dead_code)]

use std::io::Write;

use assert_cmd::Command;
use lopdf::{Object, Stream, dictionary};

pub fn cmd() -> Command {
    Command::cargo_bin("touki").unwrap()
}

/// A PDF with one page per entry; each line of a page is shown at its own
/// baseline in a UTF-16BE Japanese font.
pub fn registry_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let cid_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType0",
        "BaseFont" => "MS-Mincho",
        "DW" => 1000,
    });
    let font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "MS-Mincho",
        "Encoding" => "UniJIS-UCS2-H",
        "DescendantFonts" => vec![Object::Reference(cid_font)],
    });

    let mut kids = Vec::new();
    for lines in pages {
        let mut ops = String::from("BT\n/F1 10 Tf\n");
        for (i, line) in lines.iter().enumerate() {
            let hex: String = line.encode_utf16().map(|u| format!("{u:04X}")).collect();
            let y = 800 - 20 * i as i64;
            ops.push_str(&format!("1 0 0 1 40 {y} Tm\n<{hex}> Tj\n"));
        }
        ops.push_str("ET\n");

        let content_id = doc.add_object(Stream::new(dictionary! {}, ops.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Write bytes to a temporary `.pdf` file.
pub fn write_temp_pdf(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    f.write_all(bytes).unwrap();
    f.flush().unwrap();
    f
}

pub fn path_of(f: &tempfile::NamedTempFile) -> &str {
    f.path().to_str().unwrap()
}

pub const SINGLE_OWNER_PAGE: &[&str] = &[
    "２０２５／０６／１２　１７：４５",
    "東京都墨田区八広４丁目 所有者一覧表",
    "┃住所│氏名┃",
    "┃東京都墨田区八広４丁目１２－３│田中太郎┃",
];

pub const TWO_OWNER_PAGE: &[&str] = &[
    "2025/06/13 10:00",
    "神奈川県横浜市中区 所有者一覧表",
    "┃住所│氏名┃",
    "┃神奈川県横浜市中区本町１－１│株式会社サンプル,本店┃",
    "┃神奈川県横浜市中区本町２－２│佐藤次郎┃",
];
