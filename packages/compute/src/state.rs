use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Uint128};
use cw_storage_plus::{Item, Map};

/// Lifecycle states an escrow can occupy. There is no `None` variant: the
/// absence of an entry in [`ESCROWS`] *is* the `NONE` state.
#[cw_serde]
pub enum EscrowStatus {
    Locked,
    Challenged,
    Released,
    Refunded,
}

#[cw_serde]
pub struct Escrow {
    pub id: u64,
    pub requester: Addr,
    pub provider: Addr,
    pub amount: Uint128,
    pub denom: String,
    pub status: EscrowStatus,
    pub locked_at: i64,
    pub expires_at: i64,
    pub challenge_ends_at: i64,
    pub released_at: i64,
    pub refunded_at: i64,
    pub release_attempts: u8,
    pub refund_attempts: u8,
    pub result_commitment: Option<Binary>,
}

/// One slash event kept in a provider's bounded history.
#[cw_serde]
pub struct SlashEvent {
    pub amount: Uint128,
    pub reason: String,
    pub height: i64,
}

pub const SLASH_HISTORY_CAPACITY: usize = 8;

#[cw_serde]
pub struct Provider {
    pub address: Addr,
    pub endpoint_url: String,
    pub stake_amount: Uint128,
    pub active: bool,
    /// `[0, 100]`.
    pub reputation_score: u8,
    /// Newest event last; capped at [`SLASH_HISTORY_CAPACITY`].
    pub slash_history: Vec<SlashEvent>,
}

impl Provider {
    pub fn record_slash(&mut self, amount: Uint128, reason: &str, height: i64) {
        self.slash_history.push(SlashEvent {
            amount,
            reason: reason.to_string(),
            height,
        });
        if self.slash_history.len() > SLASH_HISTORY_CAPACITY {
            self.slash_history.remove(0);
        }
        self.reputation_score = self.reputation_score.saturating_sub(20);
    }

    pub fn reward_completion(&mut self) {
        self.reputation_score = self.reputation_score.saturating_add(5).min(100);
    }
}

pub const NEXT_REQUEST_ID: Item<u64> = Item::new("compute_next_request_id");
pub const ESCROWS: Map<u64, Escrow> = Map::new("compute_escrows");
pub const PROVIDERS: Map<&Addr, Provider> = Map::new("compute_providers");
