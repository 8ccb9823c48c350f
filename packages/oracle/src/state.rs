use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal, Uint128};
use cw_storage_plus::Map;

/// A registered price feed and its freshness policy.
#[cw_serde]
pub struct OracleAsset {
    pub symbol: String,
    pub decimals: u8,
    pub registered_at_height: i64,
    pub max_age_secs: i64,
    pub max_clock_drift_secs: i64,
}

/// One validator's price report for the current round.
#[cw_serde]
pub struct PriceSubmission {
    pub validator: Addr,
    pub feeder: Addr,
    pub asset: String,
    pub price: Decimal,
    pub voting_power: Uint128,
    pub height: i64,
    pub timestamp: i64,
}

/// The result of a successful EndBlock aggregation for one asset.
#[cw_serde]
pub struct AggregatedPrice {
    pub asset: String,
    pub price: Decimal,
    pub height: i64,
    pub num_contributors: u64,
    pub total_voting_power: Uint128,
}

/// Per-validator oracle bookkeeping, created at genesis for every validator
/// rather than lazily on first submission.
#[cw_serde]
#[derive(Default)]
pub struct ValidatorSigningInfo {
    pub missed_rounds: u64,
    pub jailed_until: i64,
    pub tombstoned: bool,
}

pub const ASSETS: Map<&str, OracleAsset> = Map::new("oracle_assets");
/// Keyed by `(asset, validator)`; cleared at BeginBlock round-init.
pub const SUBMISSIONS: Map<(&str, &Addr), PriceSubmission> = Map::new("oracle_submissions");
pub const LATEST_PRICE: Map<&str, AggregatedPrice> = Map::new("oracle_latest_price");
pub const SIGNING_INFO: Map<&Addr, ValidatorSigningInfo> = Map::new("oracle_signing_info");
/// Validator -> delegated feeder address.
pub const FEEDER_DELEGATION: Map<&Addr, Addr> = Map::new("oracle_feeder_delegation");
/// How many assets a validator has submitted a price for this block;
/// reset alongside `SUBMISSIONS` at round-init.
pub const SUBMISSION_COUNTS: Map<&Addr, u64> = Map::new("oracle_submission_counts");
