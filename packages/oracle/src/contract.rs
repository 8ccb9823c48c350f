use std::collections::BTreeSet;

use cosmwasm_std::{Addr, Decimal, Order, Storage, Uint128};

use chain_core::{SlashingSink, StakingView};

use crate::error::ContractError;
use crate::params::ORACLE_PARAMS;
use crate::state::{
    AggregatedPrice, OracleAsset, PriceSubmission, ValidatorSigningInfo, ASSETS, FEEDER_DELEGATION,
    LATEST_PRICE, SIGNING_INFO, SUBMISSIONS, SUBMISSION_COUNTS,
};
use crate::math::{iqr_bounds, is_outlier, median, median_absolute_deviation, weighted_median};

fn require_enabled(storage: &dyn Storage) -> Result<(), ContractError> {
    let params = ORACLE_PARAMS.get(storage)?;
    if !params.enabled {
        return Err(ContractError::ModuleDisabled {});
    }
    Ok(())
}

pub fn register_asset(
    storage: &mut dyn Storage,
    symbol: &str,
    decimals: u8,
    max_age_secs: i64,
    max_clock_drift_secs: i64,
    height: i64,
) -> Result<(), ContractError> {
    if ASSETS.has(storage, symbol) {
        return Err(ContractError::AssetAlreadyExists(symbol.to_string()));
    }
    ASSETS.save(
        storage,
        symbol,
        &OracleAsset {
            symbol: symbol.to_string(),
            decimals,
            registered_at_height: height,
            max_age_secs,
            max_clock_drift_secs,
        },
    )?;
    Ok(())
}

/// Registers oracle bookkeeping for every validator, meant to run once at
/// genesis so `SIGNING_INFO` is never missing an entry for a bonded
/// validator.
pub fn init_signing_info(storage: &mut dyn Storage, validators: &[Addr]) -> Result<(), ContractError> {
    for validator in validators {
        if !SIGNING_INFO.has(storage, validator) {
            SIGNING_INFO.save(storage, validator, &ValidatorSigningInfo::default())?;
        }
    }
    Ok(())
}

pub fn delegate_feed_consent(
    storage: &mut dyn Storage,
    staking: &dyn StakingView,
    validator: &Addr,
    feeder: Addr,
) -> Result<(), ContractError> {
    if !staking.is_bonded(validator) {
        return Err(ContractError::ValidatorNotBonded(validator.to_string()));
    }
    FEEDER_DELEGATION.save(storage, validator, &feeder)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn submit_price(
    storage: &mut dyn Storage,
    staking: &dyn StakingView,
    signer: &Addr,
    validator: &Addr,
    asset: &str,
    price: Decimal,
    height: i64,
    timestamp: i64,
    block_time: i64,
) -> Result<(), ContractError> {
    require_enabled(storage)?;
    let params = ORACLE_PARAMS.get(storage)?;

    if price.is_zero() {
        return Err(ContractError::InvalidPrice {});
    }

    if !staking.is_bonded(validator) {
        return Err(ContractError::ValidatorNotBonded(validator.to_string()));
    }
    let signing_info = SIGNING_INFO
        .may_load(storage, validator)?
        .unwrap_or_default();
    if signing_info.tombstoned || block_time < signing_info.jailed_until {
        return Err(ContractError::ValidatorJailed(validator.to_string()));
    }

    let delegated = FEEDER_DELEGATION.may_load(storage, validator)?;
    let authorized = delegated.as_ref().map(|d| d == signer).unwrap_or(false) || signer == validator;
    if !authorized {
        return Err(ContractError::NotAuthorizedFeeder {});
    }

    let asset_info = ASSETS
        .may_load(storage, asset)?
        .ok_or_else(|| ContractError::AssetNotFound(asset.to_string()))?;
    let min_ts = block_time - asset_info.max_age_secs;
    let max_ts = block_time + asset_info.max_clock_drift_secs;
    if timestamp < min_ts || timestamp > max_ts {
        return Err(ContractError::StaleTimestamp {
            timestamp,
            min: min_ts,
            max: max_ts,
        });
    }

    if SUBMISSIONS.has(storage, (asset, validator)) {
        return Err(ContractError::DuplicateSubmission(validator.to_string()));
    }

    let count = SUBMISSION_COUNTS.may_load(storage, validator)?.unwrap_or(0);
    if count >= params.max_submissions_per_block {
        return Err(ContractError::SubmissionLimitExceeded(validator.to_string()));
    }

    SUBMISSIONS.save(
        storage,
        (asset, validator),
        &PriceSubmission {
            validator: validator.clone(),
            feeder: signer.clone(),
            asset: asset.to_string(),
            price,
            voting_power: staking.voting_power(validator),
            height,
            timestamp,
        },
    )?;
    SUBMISSION_COUNTS.save(storage, validator, &(count + 1))?;

    Ok(())
}

/// BeginBlock hook: clears every submission and counter
/// left over from the previous round so each block starts a fresh one.
pub fn begin_block_round_init(storage: &mut dyn Storage) -> Result<(), ContractError> {
    let stale: Vec<(String, Addr)> = SUBMISSIONS
        .keys(storage, None, None, Order::Ascending)
        .collect::<Result<_, _>>()?;
    for key in stale {
        SUBMISSIONS.remove(storage, (&key.0, &key.1));
    }
    let counted: Vec<Addr> = SUBMISSION_COUNTS
        .keys(storage, None, None, Order::Ascending)
        .collect::<Result<_, _>>()?;
    for validator in counted {
        SUBMISSION_COUNTS.remove(storage, &validator);
    }
    Ok(())
}

fn increment_miss(
    storage: &mut dyn Storage,
    slashing: &mut dyn SlashingSink,
    validator: &Addr,
    params_jail_threshold: u64,
    height: i64,
) -> Result<(), ContractError> {
    let mut info = SIGNING_INFO.may_load(storage, validator)?.unwrap_or_default();
    if info.tombstoned {
        return Ok(());
    }
    info.missed_rounds += 1;
    if info.missed_rounds >= params_jail_threshold {
        slashing.jail(validator, height + 1);
        info.jailed_until = height + 1;
    }
    SIGNING_INFO.save(storage, validator, &info)?;
    Ok(())
}

fn reset_miss(storage: &mut dyn Storage, validator: &Addr) -> Result<(), ContractError> {
    let mut info = SIGNING_INFO.may_load(storage, validator)?.unwrap_or_default();
    info.missed_rounds = 0;
    SIGNING_INFO.save(storage, validator, &info)?;
    Ok(())
}

/// Active validators not present in `present`, the "non-submitting active
/// validators" that miss counters are charged against.
fn active_but_absent(staking: &dyn StakingView, present: &[&PriceSubmission]) -> Vec<Addr> {
    let present: BTreeSet<&Addr> = present.iter().map(|s| &s.validator).collect();
    staking
        .active_validators()
        .into_iter()
        .filter(|v| !present.contains(v))
        .collect()
}

/// EndBlock aggregation for a single asset. Returns the
/// aggregated price when the round clears every validity gate, or `None`
/// when aggregation was skipped or its candidate failed the jump clamp.
pub fn end_block_aggregate_asset(
    storage: &mut dyn Storage,
    staking: &dyn StakingView,
    slashing: &mut dyn SlashingSink,
    asset: &str,
    height: i64,
) -> Result<Option<AggregatedPrice>, ContractError> {
    require_enabled(storage)?;
    let params = ORACLE_PARAMS.get(storage)?;

    let submissions: Vec<PriceSubmission> = SUBMISSIONS
        .prefix(asset)
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, v)| v))
        .collect::<Result<_, _>>()?;

    let total_active_vp = staking.total_bonded_power();
    if total_active_vp.is_zero() {
        return Ok(None);
    }

    let submitted_vp: Uint128 = submissions
        .iter()
        .fold(Uint128::zero(), |acc, s| acc + s.voting_power);

    let threshold_vp = total_active_vp * params.vote_threshold;
    if submitted_vp < threshold_vp {
        let submitted_refs: Vec<&PriceSubmission> = submissions.iter().collect();
        for validator in active_but_absent(staking, &submitted_refs) {
            increment_miss(storage, slashing, &validator, params.miss_jail_threshold, height)?;
        }
        return Ok(None);
    }

    let prices: Vec<Decimal> = submissions.iter().map(|s| s.price).collect();
    let center = median(&prices);
    let mad = median_absolute_deviation(&prices, center);
    let (iqr_lower, iqr_upper) = iqr_bounds(&prices, params.iqr_k);

    let (honest, outliers): (Vec<&PriceSubmission>, Vec<&PriceSubmission>) = submissions
        .iter()
        .partition(|s| !is_outlier(s.price, center, mad, params.mad_threshold, iqr_lower, iqr_upper));

    let honest_vp: Uint128 = honest.iter().fold(Uint128::zero(), |acc, s| acc + s.voting_power);
    if honest_vp < threshold_vp {
        for validator in active_but_absent(staking, &honest) {
            increment_miss(storage, slashing, &validator, params.miss_jail_threshold, height)?;
        }
        return Ok(None);
    }

    for outlier in &outliers {
        let severity = if mad.is_zero() {
            Decimal::one()
        } else {
            let ratio = (Decimal::from_ratio(6745u128, 10_000u128)
                * if center > outlier.price {
                    center - outlier.price
                } else {
                    outlier.price - center
                })
                / (params.mad_threshold * mad);
            ratio.min(Decimal::from_ratio(3u128, 1u128))
        };
        slashing.slash(&outlier.validator, params.base_slash_fraction * severity, "oracle_outlier");
        increment_miss(storage, slashing, &outlier.validator, params.miss_jail_threshold, height)?;
    }
    for submission in &honest {
        reset_miss(storage, &submission.validator)?;
    }
    let submitted_refs: Vec<&PriceSubmission> = submissions.iter().collect();
    for validator in active_but_absent(staking, &submitted_refs) {
        increment_miss(storage, slashing, &validator, params.miss_jail_threshold, height)?;
    }

    let candidate = weighted_median(honest.iter().map(|s| (s.price, s.voting_power)).collect());

    if let Some(prev) = LATEST_PRICE.may_load(storage, asset)? {
        let diff = if candidate > prev.price {
            candidate - prev.price
        } else {
            prev.price - candidate
        };
        if diff > params.jump_clamp * prev.price {
            return Ok(None);
        }
    }

    let aggregated = AggregatedPrice {
        asset: asset.to_string(),
        price: candidate,
        height,
        num_contributors: honest.len() as u64,
        total_voting_power: honest_vp,
    };
    LATEST_PRICE.save(storage, asset, &aggregated)?;
    Ok(Some(aggregated))
}

/// EndBlock driver entry point: aggregates every registered asset in turn.
pub fn end_block_aggregate_all(
    storage: &mut dyn Storage,
    staking: &dyn StakingView,
    slashing: &mut dyn SlashingSink,
    height: i64,
) -> Result<Vec<AggregatedPrice>, ContractError> {
    let assets: Vec<String> = ASSETS
        .keys(storage, None, None, Order::Ascending)
        .collect::<Result<_, _>>()?;
    let mut produced = Vec::new();
    for asset in assets {
        if let Some(price) = end_block_aggregate_asset(storage, staking, slashing, &asset, height)? {
            produced.push(price);
        }
    }
    Ok(produced)
}
