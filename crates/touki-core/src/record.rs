//! Ownership records produced by the registry parser.

/// One owner (or co-owner group) of a registered property.
///
/// `record_date` is an ISO-8601 local timestamp without a zone suffix
/// (`2025-06-12T17:45:00`); it and `property_address` are empty when the
/// document had no date or property header before the row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct OwnershipRecord {
    /// Timestamp of the extract the row was printed in.
    pub record_date: String,
    /// Address from the most recent property header.
    pub property_address: String,
    /// Owner name; co-owner groups are joined with `、`.
    pub owner_name: String,
    /// Owner address.
    pub owner_address: String,
}
