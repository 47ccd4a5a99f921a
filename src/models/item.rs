use serde::{Deserialize, Serialize};

/// A single catalog entry.
///
/// Items are immutable once created: list membership changes by replacement,
/// never by in-place field mutation. `object_id` is the stable identity used
/// for removal; uniqueness is maintained by the data source, not enforced
/// here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub object_id: u64,
    pub title: String,
    pub year_published: i32,
}

impl Item {
    pub fn new(object_id: u64, title: impl Into<String>, year_published: i32) -> Self {
        Self {
            object_id,
            title: title.into(),
            year_published,
        }
    }
}

/// Identity-based removal.
///
/// Returns a new ordered list containing every item of `list` whose
/// `object_id` does not equal `object_id`. Idempotent: removing an absent id
/// returns a list equal in content and order to the input. The input is never
/// mutated, so callers may keep the original for comparison.
pub fn remove_item(list: &[Item], object_id: u64) -> Vec<Item> {
    list.iter()
        .filter(|item| item.object_id != object_id)
        .cloned()
        .collect()
}
