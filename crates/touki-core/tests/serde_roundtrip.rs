//! Serde serialization/deserialization tests for the public data types.

#![cfg(feature = "serde")]

use touki_core::*;

fn roundtrip<T>(value: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    let json = serde_json::to_string(value).expect("serialize failed");
    let restored: T = serde_json::from_str(&json).expect("deserialize failed");
    assert_eq!(*value, restored, "round-trip mismatch for JSON: {json}");
}

#[test]
fn test_serde_record_uses_camel_case() {
    let record = OwnershipRecord {
        record_date: "2025-06-12T17:45:00".into(),
        property_address: "東京都墨田区八広４丁目".into(),
        owner_name: "田中太郎".into(),
        owner_address: "東京都墨田区八広４丁目１２－３".into(),
    };
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["recordDate"], "2025-06-12T17:45:00");
    assert_eq!(value["propertyAddress"], "東京都墨田区八広４丁目");
    assert_eq!(value["ownerName"], "田中太郎");
    assert_eq!(value["ownerAddress"], "東京都墨田区八広４丁目１２－３");
    roundtrip(&record);
}

#[test]
fn test_serde_linearized_text_is_a_plain_string() {
    let text = LinearizedText::from("一行目\n二行目".to_string());
    assert_eq!(serde_json::to_string(&text).unwrap(), "\"一行目\\n二行目\"");
    roundtrip(&text);
}

#[test]
fn test_serde_fragment() {
    roundtrip(&PositionedTextFragment::new("田中", 2.5, 8.125));
}

#[test]
fn test_serde_unicode_norm() {
    roundtrip(&UnicodeNorm::Nfkc);
    roundtrip(&UnicodeNorm::None);
}
