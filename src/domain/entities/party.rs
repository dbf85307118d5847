use serde::{Deserialize, Serialize};

/// Length of a party join code
pub const JOIN_CODE_LENGTH: usize = 6;

const JOIN_CODE_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Party entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: i64,
    pub name: String,
    pub join_code: String,
    pub owner_id: i64,
    pub created_at: i64,
}

impl Party {
    pub fn is_owned_by(&self, member_id: i64) -> bool {
        self.owner_id == member_id
    }
}

/// Party as listed on a member's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartySummary {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub member_count: i64,
    pub movie_count: i64,
    pub created_at: i64,
}

/// Generate a random join code drawn from `[A-Za-z0-9]`
pub fn generate_join_code() -> String {
    generate_join_code_with(&mut rand::thread_rng())
}

pub fn generate_join_code_with<R: rand::Rng + ?Sized>(rng: &mut R) -> String {
    (0..JOIN_CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..JOIN_CODE_CHARSET.len());
            JOIN_CODE_CHARSET[idx] as char
        })
        .collect()
}
