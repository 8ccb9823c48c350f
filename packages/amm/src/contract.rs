use cosmwasm_std::{Addr, Storage, Uint128, Uint256};

use chain_core::Bank;

use crate::error::ContractError;
use crate::math::{add_liquidity_shares, compute_swap, fee_split, initial_ratio_bounded, initial_shares, ratio_within_tolerance, remove_liquidity_amounts, MEV_BOUND_DENOMINATOR, MEV_BOUND_NUMERATOR};
use crate::params::AMM_PARAMS;
use crate::state::{canonical_pair, pool_pair_key, LpPosition, Pool, PoolStats, LP_POSITIONS, NEXT_POOL_ID, POOLS, POOL_BY_PAIR, POOL_STATS};

const FEE_ACCOUNT: &str = "amm/fees";
const MAX_FEE_BPS: u64 = 10_000;
/// `1 : 1_000_000` tolerance at pool creation.
const CREATE_TOLERANCE: (u128, u128) = (1, 1_000_000);
/// `±1%` tolerance at `AddLiquidity`.
const ADD_LIQUIDITY_TOLERANCE: (u128, u128) = (1, 100);

fn pool_account(pool_id: u64) -> String {
    format!("amm/pool/{pool_id}")
}

fn require_enabled(storage: &dyn Storage) -> Result<(), ContractError> {
    let params = AMM_PARAMS.get(storage)?;
    if !params.enabled {
        return Err(ContractError::ModuleDisabled {});
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn create_pool(
    storage: &mut dyn Storage,
    bank: &mut dyn Bank,
    creator: &Addr,
    denom_x: &str,
    denom_y: &str,
    amount_x: Uint128,
    amount_y: Uint128,
    fee_bps: u64,
    height: i64,
) -> Result<Pool, ContractError> {
    require_enabled(storage)?;
    let params = AMM_PARAMS.get(storage)?;

    if denom_x == denom_y {
        return Err(ContractError::DoublingAssets {});
    }
    if fee_bps >= MAX_FEE_BPS {
        return Err(ContractError::InvalidZeroAmount {});
    }

    let key = pool_pair_key(denom_x, denom_y);
    if POOL_BY_PAIR.has(storage, &key) {
        return Err(ContractError::PoolAlreadyExists {});
    }

    if amount_x < params.min_initial_liquidity || amount_y < params.min_initial_liquidity {
        return Err(ContractError::MinimumLiquidityAmountError(
            params.min_initial_liquidity.u128(),
        ));
    }

    let (denom_a, denom_b) = canonical_pair(denom_x, denom_y);
    let (amount_a, amount_b) = if denom_a == denom_x {
        (amount_x, amount_y)
    } else {
        (amount_y, amount_x)
    };

    if !initial_ratio_bounded(amount_a, amount_b, CREATE_TOLERANCE.1 / CREATE_TOLERANCE.0) {
        return Err(ContractError::RatioSkewExceeded {});
    }

    let shares = initial_shares(amount_a, amount_b)?;
    if shares.is_zero() {
        return Err(ContractError::InsufficientShareAmount {});
    }

    bank.transfer_to_module(
        creator,
        FEE_ACCOUNT,
        &params.pool_creation_fee_denom,
        params.pool_creation_fee_amount,
    )?;

    let id = NEXT_POOL_ID.may_load(storage)?.unwrap_or_default();
    NEXT_POOL_ID.save(storage, &(id + 1))?;

    let account = pool_account(id);
    bank.transfer_to_module(creator, &account, &denom_a, amount_a)?;
    bank.transfer_to_module(creator, &account, &denom_b, amount_b)?;

    let pool = Pool {
        id,
        denom_a,
        denom_b,
        reserve_a: amount_a,
        reserve_b: amount_b,
        fee_bps,
        total_shares: shares,
        active: true,
    };
    POOLS.save(storage, id, &pool)?;
    POOL_BY_PAIR.save(storage, &key, &id)?;
    POOL_STATS.save(
        storage,
        id,
        &PoolStats {
            last_updated_height: height,
            ..Default::default()
        },
    )?;
    LP_POSITIONS.save(
        storage,
        (id, creator),
        &LpPosition {
            owner: creator.clone(),
            pool_id: id,
            shares,
            last_modified_height: height,
        },
    )?;

    Ok(pool)
}

pub fn add_liquidity(
    storage: &mut dyn Storage,
    bank: &mut dyn Bank,
    provider: &Addr,
    pool_id: u64,
    amount_a: Uint128,
    amount_b: Uint128,
    height: i64,
) -> Result<Uint128, ContractError> {
    require_enabled(storage)?;

    if amount_a.is_zero() || amount_b.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }

    let mut pool = POOLS.may_load(storage, pool_id)?.ok_or(ContractError::PoolNotFound {})?;
    if !pool.active {
        return Err(ContractError::PoolNotFound {});
    }

    if !ratio_within_tolerance(
        pool.reserve_a,
        pool.reserve_b,
        amount_a,
        amount_b,
        ADD_LIQUIDITY_TOLERANCE.0,
        ADD_LIQUIDITY_TOLERANCE.1,
    ) {
        return Err(ContractError::RatioSkewExceeded {});
    }

    let minted = add_liquidity_shares(pool.reserve_a, pool.reserve_b, pool.total_shares, amount_a, amount_b)?;
    if minted.is_zero() {
        return Err(ContractError::InsufficientShareAmount {});
    }

    let k_before = pool.k();

    let account = pool_account(pool_id);
    bank.transfer_to_module(provider, &account, &pool.denom_a, amount_a)?;
    bank.transfer_to_module(provider, &account, &pool.denom_b, amount_b)?;

    pool.reserve_a += amount_a;
    pool.reserve_b += amount_b;
    pool.total_shares += minted;

    if pool.k() <= k_before {
        return Err(ContractError::InvariantViolation(
            "k must strictly increase on AddLiquidity".into(),
        ));
    }

    POOLS.save(storage, pool_id, &pool)?;

    let mut position = LP_POSITIONS
        .may_load(storage, (pool_id, provider))?
        .unwrap_or(LpPosition {
            owner: provider.clone(),
            pool_id,
            shares: Uint128::zero(),
            last_modified_height: height,
        });
    position.shares += minted;
    position.last_modified_height = height;
    LP_POSITIONS.save(storage, (pool_id, provider), &position)?;

    Ok(minted)
}

pub fn remove_liquidity(
    storage: &mut dyn Storage,
    bank: &mut dyn Bank,
    provider: &Addr,
    pool_id: u64,
    shares: Uint128,
    height: i64,
) -> Result<(Uint128, Uint128), ContractError> {
    require_enabled(storage)?;
    let params = AMM_PARAMS.get(storage)?;

    if shares.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }

    let mut pool = POOLS.may_load(storage, pool_id)?.ok_or(ContractError::PoolNotFound {})?;
    let mut position = LP_POSITIONS
        .may_load(storage, (pool_id, provider))?
        .ok_or(ContractError::InsufficientShareAmount {})?;

    if shares > position.shares {
        return Err(ContractError::InsufficientShareAmount {});
    }

    let unlock_height = position.last_modified_height + params.lp_lock_blocks as i64;
    if unlock_height >= height {
        return Err(ContractError::FlashLoanLocked(unlock_height as u64));
    }

    let (amount_a, amount_b) =
        remove_liquidity_amounts(pool.reserve_a, pool.reserve_b, pool.total_shares, shares)?;
    if amount_a.is_zero() || amount_b.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }

    let shrink_factor_check = {
        // k must scale with (1 - shares/totalShares)^2: verify via the
        // post-state product rather than floating point.
        let remaining_a = pool.reserve_a - amount_a;
        let remaining_b = pool.reserve_b - amount_b;
        let remaining_shares = pool.total_shares - shares;
        // (remaining_a * remaining_b) * total_shares^2 == (reserve_a *
        // reserve_b) * remaining_shares^2, up to integer-division rounding;
        // we only assert the inequality direction that matters: withdrawal
        // must not extract more value than the share fraction entitles.
        let lhs = Uint256::from(remaining_a) * Uint256::from(remaining_b) * Uint256::from(pool.total_shares) * Uint256::from(pool.total_shares);
        let rhs = pool.k() * Uint256::from(remaining_shares) * Uint256::from(remaining_shares);
        lhs >= rhs
    };
    if !shrink_factor_check {
        return Err(ContractError::InvariantViolation(
            "remove liquidity would extract more than the share's entitlement".into(),
        ));
    }

    let account = pool_account(pool_id);
    bank.transfer_from_module(&account, provider, &pool.denom_a, amount_a)?;
    bank.transfer_from_module(&account, provider, &pool.denom_b, amount_b)?;

    pool.reserve_a -= amount_a;
    pool.reserve_b -= amount_b;
    pool.total_shares -= shares;
    POOLS.save(storage, pool_id, &pool)?;

    position.shares -= shares;
    if position.shares.is_zero() {
        LP_POSITIONS.remove(storage, (pool_id, provider));
    } else {
        LP_POSITIONS.save(storage, (pool_id, provider), &position)?;
    }

    Ok((amount_a, amount_b))
}

pub fn swap(
    storage: &mut dyn Storage,
    bank: &mut dyn Bank,
    trader: &Addr,
    pool_id: u64,
    denom_in: &str,
    amount_in: Uint128,
    min_amount_out: Uint128,
    height: i64,
) -> Result<Uint128, ContractError> {
    require_enabled(storage)?;

    if amount_in.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }

    let mut pool = POOLS.may_load(storage, pool_id)?.ok_or(ContractError::PoolNotFound {})?;
    if !pool.active {
        return Err(ContractError::PoolNotFound {});
    }

    let reserve_in = pool.reserve_of(denom_in).ok_or(ContractError::PoolNotFound {})?;
    let denom_out = pool
        .other_denom(denom_in)
        .ok_or(ContractError::PoolNotFound {})?
        .to_string();
    let reserve_out = pool.reserve_of(&denom_out).expect("other_denom is always a pool denom");

    if Uint256::from(amount_in) * Uint256::from(MEV_BOUND_DENOMINATOR)
        > Uint256::from(reserve_in) * Uint256::from(MEV_BOUND_NUMERATOR)
    {
        return Err(ContractError::MevBoundExceeded {});
    }

    let amount_out = compute_swap(reserve_in, reserve_out, amount_in, pool.fee_bps)?;
    if amount_out < min_amount_out {
        return Err(ContractError::SlippageExceeded {
            actual: amount_out.u128(),
            min: min_amount_out.u128(),
        });
    }
    if amount_out >= reserve_out {
        return Err(ContractError::ReserveExhausted {});
    }

    let k_before = pool.k();

    let account = pool_account(pool_id);
    bank.transfer_to_module(trader, &account, denom_in, amount_in)?;
    bank.transfer_from_module(&account, trader, &denom_out, amount_out)?;

    let new_reserve_in = reserve_in + amount_in;
    let new_reserve_out = reserve_out - amount_out;
    if new_reserve_out.is_zero() {
        return Err(ContractError::ReserveExhausted {});
    }

    if denom_in == pool.denom_a {
        pool.reserve_a = new_reserve_in;
        pool.reserve_b = new_reserve_out;
    } else {
        pool.reserve_b = new_reserve_in;
        pool.reserve_a = new_reserve_out;
    }

    if pool.k() < k_before {
        return Err(ContractError::InvariantViolation(
            "k must never decrease on swap".into(),
        ));
    }
    POOLS.save(storage, pool_id, &pool)?;

    let (_after_fee, fee_amount) = fee_split(amount_in, pool.fee_bps);
    let mut stats = POOL_STATS.may_load(storage, pool_id)?.unwrap_or_default();
    if denom_in == pool.denom_a {
        stats.volume_a += amount_in;
        stats.fees_collected_a += fee_amount;
    } else {
        stats.volume_b += amount_in;
        stats.fees_collected_b += fee_amount;
    }
    stats.last_updated_height = height;
    POOL_STATS.save(storage, pool_id, &stats)?;

    Ok(amount_out)
}

/// EndBlock hook: stamps every active pool's stats with
/// the current height. Reserve-affecting fields are never touched here.
pub fn refresh_stats(storage: &mut dyn Storage, height: i64) -> Result<(), ContractError> {
    let pool_ids: Vec<u64> = POOLS
        .range(storage, None, None, cosmwasm_std::Order::Ascending)
        .map(|item| item.map(|(id, _)| id))
        .collect::<Result<_, _>>()?;
    for id in pool_ids {
        let mut stats = POOL_STATS.may_load(storage, id)?.unwrap_or_default();
        stats.last_updated_height = height;
        POOL_STATS.save(storage, id, &stats)?;
    }
    Ok(())
}
