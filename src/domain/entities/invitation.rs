use serde::{Deserialize, Serialize};

/// Invitation to a party, addressed by email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: i64,
    pub party_id: i64,
    pub email: String,
    /// Known only when the email belonged to an account at invite time
    pub profile_id: Option<i64>,
    pub invited_by: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub party_id: i64,
    pub email: String,
    pub profile_id: Option<i64>,
    pub invited_by: i64,
}
