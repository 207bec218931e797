use serde::{Deserialize, Serialize};

/// An item as it is written to disk: just the registry id and how many.
///
/// This is what the save file's `inventory` and `vaultItems` arrays, and level vaults,
/// hold. Turning one back into an `Item` goes through `ItemRegistry::restore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    pub item_id: String,
    pub stack_count: u32,
}

impl SavedItem {
    pub fn new(item_id: impl Into<String>, stack_count: u32) -> Self {
        SavedItem {
            item_id: item_id.into(),
            stack_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_item_json_keys() {
        let json = serde_json::to_string(&SavedItem::new("amber_shard", 3)).unwrap();
        assert_eq!(json, r#"{"itemId":"amber_shard","stackCount":3}"#);
    }
}
