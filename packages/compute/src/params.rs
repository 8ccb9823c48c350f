use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;
use params::{HasEnabled, ParamsStore};

#[cw_serde]
pub struct ComputeParams {
    pub enabled: bool,
    pub min_stake_amount: Uint128,
    pub default_timeout_blocks: i64,
    pub default_challenge_blocks: i64,
}

impl HasEnabled for ComputeParams {
    fn enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ComputeParams {
    fn default() -> Self {
        Self {
            enabled: true,
            min_stake_amount: Uint128::new(1_000),
            default_timeout_blocks: 100,
            default_challenge_blocks: 20,
        }
    }
}

pub const COMPUTE_PARAMS: ParamsStore<ComputeParams> = ParamsStore::new("compute_params");
