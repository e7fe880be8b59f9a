// Participant record and eligibility rules.

use serde::{Deserialize, Serialize};

/// Maximum number of items a wishlist may hold.
pub const MAX_WISHLIST_ITEMS: usize = 10;

/// A gift-exchange participant as stored in the database and returned over
/// the wire. `wishlist` is empty until the participant submits one; the
/// wire field for `has_drawn` is `hasDrawn` to match the client contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub wishlist: Vec<String>,
    pub excluded: bool,
    #[serde(rename = "hasDrawn")]
    pub has_drawn: bool,
}

impl Participant {
    /// A participant is eligible for a draw iff neither exclusion flag is
    /// set and their name differs from the caller-excluded name (exact,
    /// case-sensitive comparison).
    pub fn is_eligible(&self, exclude_name: Option<&str>) -> bool {
        !self.excluded && !self.has_drawn && exclude_name != Some(self.name.as_str())
    }
}
