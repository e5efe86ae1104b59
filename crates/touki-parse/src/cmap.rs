//! ToUnicode CMap parser.
//!
//! Parses the CMap programs embedded in font `/ToUnicode` streams:
//! `begincodespacerange` (how many bytes make one code), `beginbfchar`
//! (single mappings) and `beginbfrange` (range mappings), with UTF-16BE
//! destination strings.

use std::collections::HashMap;

use crate::error::BackendError;

/// Upper bound on the codes one `bfrange` line may expand to.
const MAX_RANGE_SPAN: u32 = 0xFFFF;

/// One `<low> <high>` line of a `codespacerange` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CodespaceRange {
    byte_len: usize,
    low: u32,
    high: u32,
}

/// A parsed ToUnicode CMap.
#[derive(Debug, Clone, Default)]
pub struct CMap {
    mappings: HashMap<u32, String>,
    codespace: Vec<CodespaceRange>,
}

impl CMap {
    /// Parse a ToUnicode CMap from its decoded stream bytes.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut cmap = CMap::default();

        for section in sections(&text, "begincodespacerange", "endcodespacerange") {
            parse_codespace_section(section, &mut cmap.codespace)?;
        }
        for section in sections(&text, "beginbfchar", "endbfchar") {
            parse_bfchar_section(section, &mut cmap.mappings)?;
        }
        for section in sections(&text, "beginbfrange", "endbfrange") {
            parse_bfrange_section(section, &mut cmap.mappings)?;
        }

        Ok(cmap)
    }

    /// Unicode text for a character code.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Split a shown string into `(code, byte_len)` pairs.
    ///
    /// Code boundaries come from the codespace ranges; without any, every
    /// code is `default_width` bytes long. A trailing partial code is read
    /// with the bytes that are left.
    pub fn split_codes(&self, bytes: &[u8], default_width: usize) -> Vec<(u32, usize)> {
        let mut codes = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let width = self
                .code_width(&bytes[i..])
                .unwrap_or(default_width)
                .clamp(1, bytes.len() - i);
            codes.push((code_from_bytes(&bytes[i..i + width]), width));
            i += width;
        }
        codes
    }

    fn code_width(&self, bytes: &[u8]) -> Option<usize> {
        (1..=4).take_while(|len| *len <= bytes.len()).find(|&len| {
            let code = code_from_bytes(&bytes[..len]);
            self.codespace
                .iter()
                .any(|range| range.byte_len == len && (range.low..=range.high).contains(&code))
        })
    }
}

/// Big-endian integer value of up to four code bytes.
pub(crate) fn code_from_bytes(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte))
}

/// Bodies of every `begin...end` section in the CMap text.
fn sections<'a>(text: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut search_from = 0;
    while let Some(start) = text[search_from..].find(begin) {
        let section_start = search_from + start + begin.len();
        let Some(len) = text[section_start..].find(end) else {
            break;
        };
        found.push(&text[section_start..section_start + len]);
        search_from = section_start + len + end.len();
    }
    found
}

fn parse_hex_code(hex: &str) -> Result<u32, BackendError> {
    u32::from_str_radix(hex, 16)
        .map_err(|e| BackendError::Parse(format!("invalid hex code '{hex}': {e}")))
}

fn utf16_units(hex: &str) -> Result<Vec<u16>, BackendError> {
    let hex = if hex.len() == 2 {
        format!("00{hex}")
    } else {
        hex.to_string()
    };
    if hex.len() % 4 != 0 {
        return Err(BackendError::Parse(format!(
            "UTF-16BE hex string must have length divisible by 4, got '{hex}'"
        )));
    }
    hex.as_bytes()
        .chunks(4)
        .map(|chunk| {
            let digits = std::str::from_utf8(chunk)
                .map_err(|e| BackendError::Parse(format!("invalid UTF-8 in hex: {e}")))?;
            u16::from_str_radix(digits, 16)
                .map_err(|e| BackendError::Parse(format!("invalid hex in UTF-16BE '{digits}': {e}")))
        })
        .collect()
}

/// Decode a `<hex>` destination as UTF-16BE text.
fn decode_utf16be_hex(hex: &str) -> Result<String, BackendError> {
    String::from_utf16(&utf16_units(hex)?)
        .map_err(|e| BackendError::Parse(format!("invalid UTF-16BE sequence: {e}")))
}

/// All `<hex>` tokens of a line, without the brackets.
fn extract_hex_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        let Some(end) = rest[start + 1..].find('>') else {
            break;
        };
        tokens.push(rest[start + 1..start + 1 + end].trim());
        rest = &rest[start + 1 + end + 1..];
    }
    tokens
}

/// Tokens of a section body; CMap programs may put several entries on one line.
fn entries(section: &str) -> impl Iterator<Item = &str> {
    section
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.contains('<'))
}

fn parse_codespace_section(
    section: &str,
    ranges: &mut Vec<CodespaceRange>,
) -> Result<(), BackendError> {
    for line in entries(section) {
        for pair in extract_hex_tokens(line).chunks(2) {
            if let [low, high] = pair {
                ranges.push(CodespaceRange {
                    byte_len: low.len().div_ceil(2).max(1),
                    low: parse_hex_code(low)?,
                    high: parse_hex_code(high)?,
                });
            }
        }
    }
    Ok(())
}

/// `<srcCode> <dstString>` entries.
fn parse_bfchar_section(
    section: &str,
    mappings: &mut HashMap<u32, String>,
) -> Result<(), BackendError> {
    for line in entries(section) {
        for pair in extract_hex_tokens(line).chunks(2) {
            if let [src, dst] = pair {
                mappings.insert(parse_hex_code(src)?, decode_utf16be_hex(dst)?);
            }
        }
    }
    Ok(())
}

/// `<srcLow> <srcHigh> <dstStart>` or `<srcLow> <srcHigh> [<dst1> <dst2> ...]`.
fn parse_bfrange_section(
    section: &str,
    mappings: &mut HashMap<u32, String>,
) -> Result<(), BackendError> {
    for line in entries(section) {
        if let Some(bracket_start) = line.find('[') {
            let src = extract_hex_tokens(&line[..bracket_start]);
            let [low, high, ..] = src.as_slice() else {
                continue;
            };
            let low = parse_hex_code(low)?;
            let high = parse_hex_code(high)?;
            let bracket_end = line.rfind(']').unwrap_or(line.len());
            let destinations = extract_hex_tokens(&line[bracket_start + 1..bracket_end]);
            for (code, dst) in (low..=high).zip(destinations) {
                mappings.insert(code, decode_utf16be_hex(dst)?);
            }
        } else {
            let tokens = extract_hex_tokens(line);
            let [low, high, dst, ..] = tokens.as_slice() else {
                continue;
            };
            let low = parse_hex_code(low)?;
            let high = parse_hex_code(high)?;
            if high < low || high - low > MAX_RANGE_SPAN {
                continue;
            }
            let mut units = utf16_units(dst)?;
            for code in low..=high {
                if let Ok(text) = String::from_utf16(&units) {
                    mappings.insert(code, text);
                }
                // The last code unit is incremented for each code of the range.
                if let Some(last) = units.last_mut() {
                    *last = last.wrapping_add(1);
                }
            }
        }
    }
    Ok(())
}
