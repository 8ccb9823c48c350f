use cosmwasm_std::{to_json_vec, Addr, Storage};

use amm::state::{canonical_pair, pool_pair_key, POOL_BY_PAIR, POOLS};
use amm::AMM_PARAMS;
use chain_core::{validate_address, Bank, StakingView, TxContext};
use compute::state::{EscrowStatus, ESCROWS, PROVIDERS};
use compute::COMPUTE_PARAMS;
use oracle::state::{ASSETS, FEEDER_DELEGATION};
use oracle::ORACLE_PARAMS;

use crate::error::AnteError;
use crate::msg::{Msg, Tx};
use crate::sequence::AccountSequencer;

pub const MAX_MESSAGES_PER_TX: usize = 10;
pub const MAX_GAS_LIMIT: u64 = 10_000_000;
pub const MAX_PER_MESSAGE_GAS: u64 = 500_000;
pub const MAX_BLOCK_TIME_DRIFT_SECS: i64 = 30;
pub const MAX_MEMO_BYTES: usize = 256;
const GAS_PER_BYTE: u64 = 10;
pub const FEE_COLLECTOR_ACCOUNT: &str = "fee_collector";

/// Step 2: declared block time must not be further than
/// [`MAX_BLOCK_TIME_DRIFT_SECS`] ahead of wall-clock; historical catch-up is
/// unrestricted.
pub fn check_block_time(declared: i64, wall_clock: i64) -> Result<(), AnteError> {
    if declared > wall_clock + MAX_BLOCK_TIME_DRIFT_SECS {
        return Err(AnteError::BlockTimeTooFarAhead {
            declared,
            wall_clock,
            max_drift_secs: MAX_BLOCK_TIME_DRIFT_SECS,
        });
    }
    Ok(())
}

/// Step 3: global per-tx caps plus the per-operation gas ceiling table.
pub fn check_global_caps(tx: &Tx) -> Result<(), AnteError> {
    if tx.messages.len() > MAX_MESSAGES_PER_TX {
        return Err(AnteError::TooManyMessages {
            count: tx.messages.len(),
            max: MAX_MESSAGES_PER_TX,
        });
    }
    if tx.gas_limit > MAX_GAS_LIMIT {
        return Err(AnteError::GasLimitTooHigh {
            limit: tx.gas_limit,
            max: MAX_GAS_LIMIT,
        });
    }
    for msg in &tx.messages {
        let ceiling = msg.gas_ceiling();
        if ceiling > MAX_PER_MESSAGE_GAS {
            return Err(AnteError::PerMessageGasCeilingTooHigh {
                ceiling,
                max: MAX_PER_MESSAGE_GAS,
            });
        }
    }
    Ok(())
}

/// Step 4: no extension options are defined, so any non-empty list is
/// unknown.
pub fn check_extension_options(tx: &Tx) -> Result<(), AnteError> {
    if let Some(unknown) = tx.extension_options.first() {
        return Err(AnteError::UnknownExtensionOption(unknown.clone()));
    }
    Ok(())
}

/// Step 5: each message's static syntax check.
pub fn check_validate_basic(tx: &Tx) -> Result<(), AnteError> {
    for msg in &tx.messages {
        msg.validate_basic()?;
    }
    Ok(())
}

/// Step 6: timeout height, `0` meaning no timeout.
pub fn check_timeout_height(tx: &Tx, current_height: i64) -> Result<(), AnteError> {
    if tx.timeout_height > 0 && current_height > tx.timeout_height {
        return Err(AnteError::TimeoutExceeded {
            current: current_height,
            timeout: tx.timeout_height,
        });
    }
    Ok(())
}

/// Step 7: memo byte length cap.
pub fn check_memo_length(tx: &Tx) -> Result<(), AnteError> {
    let len = tx.memo.len();
    if len > MAX_MEMO_BYTES {
        return Err(AnteError::MemoTooLong { len, max: MAX_MEMO_BYTES });
    }
    Ok(())
}

/// Step 8: charge gas proportional to serialized tx size.
pub fn charge_size_gas(ctx: &mut TxContext, tx: &Tx) -> Result<(), AnteError> {
    let size = to_json_vec(tx).map(|b| b.len()).unwrap_or_default() as u64;
    ctx.gas.charge(size * GAS_PER_BYTE)?;
    Ok(())
}

/// Step 9: deduct the declared fee from the signer into the fee-collector
/// module account.
pub fn deduct_fee(bank: &mut dyn Bank, tx: &Tx) -> Result<(), AnteError> {
    bank.transfer_to_module(&tx.signer, FEE_COLLECTOR_ACCOUNT, &tx.fee_denom, tx.fee_amount)
        .map_err(|e| AnteError::InsufficientFee {
            have: bank.spendable(&tx.signer, &tx.fee_denom).u128(),
            need: tx.fee_amount.u128(),
            denom: e.message,
        })
}

/// Step 10: signature verification is out of scope; this only
/// checks and advances the replay-protection sequence number.
pub fn check_and_advance_sequence(sequencer: &mut dyn AccountSequencer, tx: &Tx) -> Result<(), AnteError> {
    let expected = sequencer.expected_sequence(&tx.signer);
    if tx.sequence != expected {
        return Err(AnteError::SequenceMismatch { expected, got: tx.sequence });
    }
    sequencer.increment_sequence(&tx.signer);
    Ok(())
}

/// Storage handles for step 11's module-specific read-only checks. Each
/// field is a module's own prefixed store — the ante chain never writes
/// through any of them.
pub struct ModuleStores<'a> {
    pub amm: &'a dyn Storage,
    pub compute: &'a dyn Storage,
    pub oracle: &'a dyn Storage,
}

fn require_module_enabled<P: params::HasEnabled>(name: &'static str, params: Result<P, cosmwasm_std::StdError>) -> Result<P, AnteError> {
    let params = params.map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?;
    if !params.enabled() {
        return Err(AnteError::ModuleDisabled(name));
    }
    Ok(params)
}

/// Step 11: module-specific read-only checks, one arm per message kind
/// ('s "Module checks" table). Simulation mode skips this step
/// entirely (global limits above still apply).
pub fn check_module_specific(
    stores: &ModuleStores,
    bank: &dyn Bank,
    staking: &dyn StakingView,
    msg: &Msg,
) -> Result<(), AnteError> {
    match msg {
        Msg::DexCreatePool { creator, denom_a, denom_b, amount_a, amount_b, .. } => {
            let params = require_module_enabled("amm", AMM_PARAMS.get(stores.amm))?;
            validate_address(creator.as_str()).map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?;
            let (a, b) = canonical_pair(denom_a, denom_b);
            let key = pool_pair_key(&a, &b);
            if POOL_BY_PAIR.has(stores.amm, key.as_slice()) {
                return Err(AnteError::ModuleCheckFailed(format!("pool for {a}/{b} already exists")));
            }
            if *amount_a < params.min_initial_liquidity || *amount_b < params.min_initial_liquidity {
                return Err(AnteError::ModuleCheckFailed("initial liquidity below minimum".into()));
            }
            Ok(())
        }
        Msg::DexSwap { trader, pool_id, denom_in, amount_in, .. } => {
            require_module_enabled("amm", AMM_PARAMS.get(stores.amm))?;
            validate_address(trader.as_str()).map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?;
            let pool = POOLS
                .may_load(stores.amm, *pool_id)
                .map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?
                .ok_or_else(|| AnteError::ModuleCheckFailed(format!("pool {pool_id} does not exist")))?;
            if pool.reserve_of(denom_in).is_none() {
                return Err(AnteError::ModuleCheckFailed(format!("{denom_in} is not in pool {pool_id}")));
            }
            if amount_in.is_zero() {
                return Err(AnteError::ModuleCheckFailed("amountIn must be positive".into()));
            }
            Ok(())
        }
        Msg::DexAddLiquidity { provider, pool_id, amount_a, amount_b } => {
            require_module_enabled("amm", AMM_PARAMS.get(stores.amm))?;
            validate_address(provider.as_str()).map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?;
            if !POOLS.has(stores.amm, *pool_id) {
                return Err(AnteError::ModuleCheckFailed(format!("pool {pool_id} does not exist")));
            }
            if amount_a.is_zero() || amount_b.is_zero() {
                return Err(AnteError::ModuleCheckFailed("amounts must be positive".into()));
            }
            Ok(())
        }
        Msg::DexRemoveLiquidity { provider, pool_id, shares } => {
            require_module_enabled("amm", AMM_PARAMS.get(stores.amm))?;
            validate_address(provider.as_str()).map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?;
            if !POOLS.has(stores.amm, *pool_id) {
                return Err(AnteError::ModuleCheckFailed(format!("pool {pool_id} does not exist")));
            }
            if shares.is_zero() {
                return Err(AnteError::ModuleCheckFailed("shares must be positive".into()));
            }
            Ok(())
        }
        Msg::ComputeSubmitRequest { requester, max_payment, .. } => {
            let params = require_module_enabled("compute", COMPUTE_PARAMS.get(stores.compute))?;
            let _ = params;
            validate_address(requester.as_str()).map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?;
            if bank.spendable(requester, "uposa") < *max_payment {
                return Err(AnteError::ModuleCheckFailed("requester balance below maxPayment".into()));
            }
            Ok(())
        }
        Msg::ComputeRegisterProvider { address, stake_amount, .. } => {
            let params = require_module_enabled("compute", COMPUTE_PARAMS.get(stores.compute))?;
            validate_address(address.as_str()).map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?;
            if *stake_amount < params.min_stake_amount {
                return Err(AnteError::ModuleCheckFailed("stake below MinProviderStake".into()));
            }
            if let Some(existing) = PROVIDERS
                .may_load(stores.compute, address)
                .map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?
            {
                if existing.active {
                    return Err(AnteError::ModuleCheckFailed("provider already registered and active".into()));
                }
            }
            Ok(())
        }
        Msg::ComputeSubmitResult { provider, request_id, .. } => {
            require_module_enabled("compute", COMPUTE_PARAMS.get(stores.compute))?;
            let p = PROVIDERS
                .may_load(stores.compute, provider)
                .map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?
                .ok_or_else(|| AnteError::ModuleCheckFailed(format!("provider {provider} is not registered")))?;
            if !p.active {
                return Err(AnteError::ModuleCheckFailed(format!("provider {provider} is not active")));
            }
            let escrow = ESCROWS
                .may_load(stores.compute, *request_id)
                .map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?
                .ok_or(AnteError::ModuleCheckFailed(format!("request {request_id} does not exist")))?;
            if escrow.status != EscrowStatus::Locked || &escrow.provider != provider {
                return Err(AnteError::ModuleCheckFailed(format!("request {request_id} is not assigned to {provider}")));
            }
            Ok(())
        }
        Msg::OracleSubmitPrice { validator, feeder, asset, .. } => {
            require_module_enabled("oracle", ORACLE_PARAMS.get(stores.oracle))?;
            validate_address(validator.as_str()).map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?;
            validate_address(feeder.as_str()).map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?;
            if !ASSETS.has(stores.oracle, asset.as_str()) {
                return Err(AnteError::ModuleCheckFailed(format!("asset {asset} is not registered")));
            }
            let authorized_feeder: Addr = FEEDER_DELEGATION
                .may_load(stores.oracle, validator)
                .map_err(|e| AnteError::ModuleCheckFailed(e.to_string()))?
                .unwrap_or_else(|| validator.clone());
            if &authorized_feeder != feeder {
                return Err(AnteError::ModuleCheckFailed(format!("{feeder} is not authorized to feed for {validator}")));
            }
            Ok(())
        }
        Msg::OracleDelegateFeedConsent { validator, feeder: _ } => {
            require_module_enabled("oracle", ORACLE_PARAMS.get(stores.oracle))?;
            if !staking.is_bonded(validator) {
                return Err(AnteError::ModuleCheckFailed(format!("{validator} is not bonded")));
            }
            Ok(())
        }
    }
}
