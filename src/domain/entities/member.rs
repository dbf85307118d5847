use serde::{Deserialize, Serialize};

/// PartyMember entity - a (member, party) relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMember {
    pub member_id: i64,
    pub party_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub owner: bool,
    pub joined_at: i64,
}

impl PartyMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
