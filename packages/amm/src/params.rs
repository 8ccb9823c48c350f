use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;
use params::{HasEnabled, ParamsStore};

/// Module-internal parameter schema: concrete shapes for the numeric
/// bounds that gate pool creation and liquidity locking.
#[cw_serde]
pub struct AmmParams {
    pub enabled: bool,
    pub min_initial_liquidity: Uint128,
    pub lp_lock_blocks: u64,
    pub pool_creation_fee_denom: String,
    pub pool_creation_fee_amount: Uint128,
}

impl HasEnabled for AmmParams {
    fn enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for AmmParams {
    fn default() -> Self {
        Self {
            enabled: true,
            min_initial_liquidity: Uint128::new(1_000),
            lp_lock_blocks: 10,
            pool_creation_fee_denom: "uposa".to_string(),
            pool_creation_fee_amount: Uint128::new(100),
        }
    }
}

pub const AMM_PARAMS: ParamsStore<AmmParams> = ParamsStore::new("amm_params");
