use cosmwasm_std::{Addr, Storage, Uint128};

use chain_core::Bank;

use crate::error::ContractError;
use crate::params::COMPUTE_PARAMS;
use crate::state::{Provider, PROVIDERS};

const STAKE_ACCOUNT: &str = "compute/provider_stake";

fn require_enabled(storage: &dyn Storage) -> Result<(), ContractError> {
    let params = COMPUTE_PARAMS.get(storage)?;
    if !params.enabled {
        return Err(ContractError::ModuleDisabled {});
    }
    Ok(())
}

pub fn register_provider(
    storage: &mut dyn Storage,
    bank: &mut dyn Bank,
    address: &Addr,
    endpoint_url: String,
    stake_amount: Uint128,
) -> Result<(), ContractError> {
    require_enabled(storage)?;
    let params = COMPUTE_PARAMS.get(storage)?;

    if PROVIDERS.has(storage, address) {
        return Err(ContractError::ProviderAlreadyExists(address.to_string()));
    }
    if stake_amount < params.min_stake_amount {
        return Err(ContractError::InvalidZeroAmount {});
    }

    bank.transfer_to_module(address, STAKE_ACCOUNT, "uposa", stake_amount)?;

    PROVIDERS.save(
        storage,
        address,
        &Provider {
            address: address.clone(),
            endpoint_url,
            stake_amount,
            active: true,
            reputation_score: 50,
            slash_history: Vec::new(),
        },
    )?;
    Ok(())
}

pub fn deactivate_provider(
    storage: &mut dyn Storage,
    bank: &mut dyn Bank,
    address: &Addr,
) -> Result<(), ContractError> {
    let mut provider = PROVIDERS
        .may_load(storage, address)?
        .ok_or_else(|| ContractError::ProviderNotFound(address.to_string()))?;
    if !provider.active {
        return Ok(());
    }
    provider.active = false;
    let stake = provider.stake_amount;
    provider.stake_amount = Uint128::zero();
    bank.transfer_from_module(STAKE_ACCOUNT, address, "uposa", stake)?;
    PROVIDERS.save(storage, address, &provider)?;
    Ok(())
}

/// Slashes a fraction of a provider's remaining stake, appends to its
/// bounded history, and moves its reputation down.
pub fn slash_provider(
    storage: &mut dyn Storage,
    address: &Addr,
    fraction_bps: u64,
    reason: &str,
    height: i64,
) -> Result<Uint128, ContractError> {
    let mut provider = PROVIDERS
        .may_load(storage, address)?
        .ok_or_else(|| ContractError::ProviderNotFound(address.to_string()))?;

    let slashed = provider.stake_amount.multiply_ratio(fraction_bps, 10_000u128);
    provider.stake_amount -= slashed;
    provider.record_slash(slashed, reason, height);
    if provider.stake_amount.is_zero() {
        provider.active = false;
    }
    PROVIDERS.save(storage, address, &provider)?;
    Ok(slashed)
}

pub fn record_completion(storage: &mut dyn Storage, address: &Addr) -> Result<(), ContractError> {
    let mut provider = PROVIDERS
        .may_load(storage, address)?
        .ok_or_else(|| ContractError::ProviderNotFound(address.to_string()))?;
    provider.reward_completion();
    PROVIDERS.save(storage, address, &provider)?;
    Ok(())
}

pub fn require_active_provider(storage: &dyn Storage, address: &Addr) -> Result<Provider, ContractError> {
    let provider = PROVIDERS
        .may_load(storage, address)?
        .ok_or_else(|| ContractError::ProviderNotFound(address.to_string()))?;
    if !provider.active {
        return Err(ContractError::ProviderInactive(address.to_string()));
    }
    Ok(provider)
}
