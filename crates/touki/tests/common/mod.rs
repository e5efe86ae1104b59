//! Shared PDF fixture builders for integration tests.
//!
//! Registry fixtures use a Type0 font with the predefined `UniJIS-UCS2-H`
//! CMap, so shown strings are plain UTF-16BE and need no embedded font.

#![allow(dead_code)]

use lopdf::{Object, Stream, dictionary};

/// Vertical distance between two table lines, in points.
pub const LINE_HEIGHT: f64 = 20.0;

/// Build a PDF whose pages carry the given content streams.
///
/// `/F1` is a Japanese Type0 font (UTF-16BE strings), `/F2` is Helvetica.
pub fn build_pdf(contents: &[Vec<u8>]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let cid_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType0",
        "BaseFont" => "MS-Mincho",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Japan1"),
            "Supplement" => 2,
        },
        "DW" => 1000,
    });
    let jp_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "MS-Mincho",
        "Encoding" => "UniJIS-UCS2-H",
        "DescendantFonts" => vec![Object::Reference(cid_font)],
    });
    let latin_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.clone()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => jp_font,
                    "F2" => latin_font,
                },
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
    doc.save_to(&mut buf).expect("failed to save PDF");
    buf
}

/// Hex string operand holding `text` as UTF-16BE.
pub fn utf16_hex(text: &str) -> String {
    let hex: String = text.encode_utf16().map(|unit| format!("{unit:04X}")).collect();
    format!("<{hex}>")
}

/// Content stream showing each line in `/F1`, one line per `LINE_HEIGHT`.
pub fn lines_content(lines: &[&str]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 10 Tf\n");
    for (i, line) in lines.iter().enumerate() {
        let y = 800.0 - i as f64 * LINE_HEIGHT;
        content.push_str(&format!("1 0 0 1 40 {y} Tm\n{} Tj\n", utf16_hex(line)));
    }
    content.push_str("ET\n");
    content.into_bytes()
}

/// A PDF with one page per entry, each page showing its lines top to bottom.
pub fn registry_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let contents: Vec<Vec<u8>> = pages.iter().map(|lines| lines_content(lines)).collect();
    build_pdf(&contents)
}

/// The single-owner extract used across the tests.
pub const SINGLE_OWNER_PAGE: &[&str] = &[
    "２０２５／０６／１２　１７：４５",
    "東京都墨田区八広４丁目 所有者一覧表",
    "┏━━━━━━━━━━━━┯━━━━━━┓",
    "┃住所│氏名┃",
    "┠────────────┼──────┨",
    "┃東京都墨田区八広４丁目１２－３│田中太郎┃",
    "┗━━━━━━━━━━━━┷━━━━━━┛",
];

/// A co-owner extract: two owners sharing one address.
pub const CO_OWNER_PAGE: &[&str] = &[
    "2025/07/01 09:30",
    "大阪府大阪市北区梅田１丁目 所有者一覧表",
    "共有者一覧",
    "┃住所│持分│氏名┃",
    "┃大阪府大阪市北区梅田１丁目２－３│２分の１│山田一郎┃",
    "┃│２分の１│山田花子┃",
];
