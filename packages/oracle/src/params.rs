use cosmwasm_schema::cw_serde;
use cosmwasm_std::Decimal;
use params::{HasEnabled, ParamsStore};

#[cw_serde]
pub struct OracleParams {
    pub enabled: bool,
    /// Fraction of total active voting power a round must clear to aggregate.
    pub vote_threshold: Decimal,
    /// Modified z-score cutoff beyond which a submission is an outlier.
    pub mad_threshold: Decimal,
    /// IQR fence multiplier.
    pub iqr_k: Decimal,
    /// Maximum fractional move between consecutive aggregated prices.
    pub jump_clamp: Decimal,
    pub max_submissions_per_block: u64,
    pub miss_jail_threshold: u64,
    pub base_slash_fraction: Decimal,
}

impl HasEnabled for OracleParams {
    fn enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for OracleParams {
    fn default() -> Self {
        Self {
            enabled: true,
            vote_threshold: Decimal::percent(67),
            mad_threshold: Decimal::permille(3500),
            iqr_k: Decimal::permille(1500),
            jump_clamp: Decimal::percent(10),
            max_submissions_per_block: 16,
            miss_jail_threshold: 10,
            base_slash_fraction: Decimal::permille(1),
        }
    }
}

pub const ORACLE_PARAMS: ParamsStore<OracleParams> = ParamsStore::new("oracle_params");
