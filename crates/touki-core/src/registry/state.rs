use crate::record::OwnershipRecord;

const CO_OWNER_SEPARATOR: &str = "、";

/// Co-owner rows collected since the co-owner marker.
#[derive(Debug, Default)]
pub(crate) struct CoOwnerGroup {
    address: String,
    names: Vec<String>,
}

impl CoOwnerGroup {
    /// Add one co-owner row; the first non-empty address wins.
    pub fn push(&mut self, address: String, name: String) {
        if self.address.is_empty() {
            self.address = address;
        }
        if !name.is_empty() {
            self.names.push(name);
        }
    }

    /// A group flushes only with an address and at least one name.
    pub fn is_complete(&self) -> bool {
        !self.address.is_empty() && !self.names.is_empty()
    }

    fn joined_names(&self) -> String {
        self.names.join(CO_OWNER_SEPARATOR)
    }
}

/// Context carried across lines while scanning a document.
#[derive(Debug, Default)]
pub(crate) struct ParserState {
    pub record_date: String,
    pub property_address: String,
    pub co_owner_mode: bool,
    pub co_owners: CoOwnerGroup,
}

impl ParserState {
    /// A record carrying the current date and property context.
    pub fn record(&self, owner_name: String, owner_address: String) -> OwnershipRecord {
        OwnershipRecord {
            record_date: self.record_date.clone(),
            property_address: self.property_address.clone(),
            owner_name,
            owner_address,
        }
    }

    /// The single record for the co-owner group.
    ///
    /// Uses the date and property context current at end of input.
    pub fn finish(self) -> Option<OwnershipRecord> {
        if !self.co_owner_mode || !self.co_owners.is_complete() {
            return None;
        }
        let name = self.co_owners.joined_names();
        Some(OwnershipRecord {
            record_date: self.record_date,
            property_address: self.property_address,
            owner_name: name,
            owner_address: self.co_owners.address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_empty_address_wins() {
        let mut group = CoOwnerGroup::default();
        group.push(String::new(), "A".into());
        group.push("東京都".into(), "B".into());
        group.push("大阪府".into(), "C".into());
        assert_eq!(group.address, "東京都");
        assert_eq!(group.joined_names(), "A、B、C");
    }

    #[test]
    fn empty_names_are_skipped() {
        let mut group = CoOwnerGroup::default();
        group.push("東京都".into(), String::new());
        assert!(group.names.is_empty());
        assert!(!group.is_complete());
    }

    #[test]
    fn group_without_address_is_incomplete() {
        let mut group = CoOwnerGroup::default();
        group.push(String::new(), "A".into());
        assert!(!group.is_complete());
    }

    #[test]
    fn finish_without_co_owners_is_none() {
        assert_eq!(ParserState::default().finish(), None);
    }

    #[test]
    fn finish_uses_final_context() {
        let mut state = ParserState {
            record_date: "2025-06-12T17:45:00".into(),
            property_address: "東京都墨田区".into(),
            co_owner_mode: true,
            ..Default::default()
        };
        state.co_owners.push("東京都墨田区八広".into(), "山田花子".into());
        state.co_owners.push(String::new(), "山田次郎".into());
        let record = state.finish().unwrap();
        assert_eq!(record.owner_name, "山田花子、山田次郎");
        assert_eq!(record.owner_address, "東京都墨田区八広");
        assert_eq!(record.property_address, "東京都墨田区");
    }
}
