use std::path::Path;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Storage, Uint128};

use amm::{AmmParams, AMM_PARAMS};
use chain_core::{GovernanceAuthority, InMemoryBank, InMemoryStaking};
use compute::{ComputeParams, COMPUTE_PARAMS};
use oracle::{OracleParams, ORACLE_PARAMS};

use crate::error::AppError;

#[cw_serde]
pub struct GenesisValidator {
    pub address: Addr,
    pub voting_power: Uint128,
}

#[cw_serde]
pub struct GenesisBalance {
    pub address: Addr,
    pub denom: String,
    pub amount: Uint128,
}

#[cw_serde]
pub struct GenesisOracleAsset {
    pub symbol: String,
    pub decimals: u8,
    pub max_age_secs: i64,
    pub max_clock_drift_secs: i64,
}

/// The genesis document: per-module params, initial validator
/// set, initial balances, registered assets, and governance authority.
#[cw_serde]
pub struct GenesisState {
    pub governance_authority: Addr,
    #[serde(default)]
    pub amm_params: AmmParams,
    #[serde(default)]
    pub compute_params: ComputeParams,
    #[serde(default)]
    pub oracle_params: OracleParams,
    #[serde(default)]
    pub validators: Vec<GenesisValidator>,
    #[serde(default)]
    pub balances: Vec<GenesisBalance>,
    #[serde(default)]
    pub oracle_assets: Vec<GenesisOracleAsset>,
}

pub fn load_genesis_file(path: &Path) -> Result<GenesisState, AppError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Initializes every module's storage from the genesis document. Signing
/// info is populated for every validator unconditionally instead of
/// relying on a later first-block patch.
pub fn apply_genesis(
    amm_storage: &mut dyn Storage,
    compute_storage: &mut dyn Storage,
    oracle_storage: &mut dyn Storage,
    bank: &mut InMemoryBank,
    staking: &mut InMemoryStaking,
    genesis: &GenesisState,
) -> Result<GovernanceAuthority, AppError> {
    AMM_PARAMS.init(amm_storage, &genesis.amm_params)?;
    COMPUTE_PARAMS.init(compute_storage, &genesis.compute_params)?;
    ORACLE_PARAMS.init(oracle_storage, &genesis.oracle_params)?;

    for asset in &genesis.oracle_assets {
        oracle::register_asset(
            oracle_storage,
            &asset.symbol,
            asset.decimals,
            asset.max_age_secs,
            asset.max_clock_drift_secs,
            0,
        )?;
    }

    let mut validator_addrs = Vec::with_capacity(genesis.validators.len());
    for v in &genesis.validators {
        staking.bond(v.address.clone(), v.voting_power);
        validator_addrs.push(v.address.clone());
    }
    oracle::init_signing_info(oracle_storage, &validator_addrs)?;

    for balance in &genesis.balances {
        bank.mint(&balance.address, &balance.denom, balance.amount);
    }

    Ok(GovernanceAuthority::new(genesis.governance_authority.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_core::{MemoryStore, PrefixedStore};

    #[test]
    fn genesis_populates_signing_info_for_every_validator() {
        let raw = r#"{
            "governance_authority": "gov",
            "validators": [
                {"address": "validator1", "voting_power": "100"},
                {"address": "validator2", "voting_power": "50"}
            ],
            "balances": [
                {"address": "alice", "denom": "uposa", "amount": "1000"}
            ],
            "oracle_assets": [
                {"symbol": "uatom", "decimals": 6, "max_age_secs": 60, "max_clock_drift_secs": 5}
            ]
        }"#;
        let genesis: GenesisState = serde_json::from_str(raw).unwrap();

        let mut amm_store = MemoryStore::new();
        let mut compute_store = MemoryStore::new();
        let mut oracle_store = MemoryStore::new();
        let mut bank = InMemoryBank::new();
        let mut staking = InMemoryStaking::new();

        let authority = apply_genesis(
            &mut PrefixedStore::new(&mut amm_store, "amm"),
            &mut PrefixedStore::new(&mut compute_store, "compute"),
            &mut PrefixedStore::new(&mut oracle_store, "oracle"),
            &mut bank,
            &mut staking,
            &genesis,
        )
        .unwrap();
        assert_eq!(authority.address(), &Addr::unchecked("gov"));

        let oracle_storage = PrefixedStore::new(&mut oracle_store, "oracle");
        for validator in ["validator1", "validator2"] {
            assert!(oracle::state::SIGNING_INFO.has(&oracle_storage, &Addr::unchecked(validator)));
        }
        assert_eq!(bank.spendable(&Addr::unchecked("alice"), "uposa"), Uint128::new(1_000));
    }
}
