use cosmwasm_std::{Addr, Binary, Order, Storage, Uint128};

use chain_core::{Bank, GovernanceAuthority};

use crate::error::ContractError;
use crate::params::COMPUTE_PARAMS;
use crate::provider::{record_completion, require_active_provider, slash_provider};
use crate::state::{Escrow, EscrowStatus, ESCROWS, NEXT_REQUEST_ID};
use crate::zk::ProofVerifier;

const ESCROW_ACCOUNT: &str = "compute/escrow";
const DENOM: &str = "uposa";
/// Fraction of remaining stake cut from a provider whose locked request
/// times out without a submitted result.
const TIMEOUT_SLASH_BPS: u64 = 1_000;

fn require_enabled(storage: &dyn Storage) -> Result<(), ContractError> {
    let params = COMPUTE_PARAMS.get(storage)?;
    if !params.enabled {
        return Err(ContractError::ModuleDisabled {});
    }
    Ok(())
}

pub fn allocate_request_id(storage: &mut dyn Storage) -> Result<u64, ContractError> {
    let id = NEXT_REQUEST_ID.may_load(storage)?.unwrap_or_default();
    NEXT_REQUEST_ID.save(storage, &(id + 1))?;
    Ok(id)
}

/// `Lock`: debits the requester, credits the module escrow
/// account, and records the request. Reusing a `request_id` is rejected
/// rather than double-locking, so retried submissions stay idempotent.
pub fn lock(
    storage: &mut dyn Storage,
    bank: &mut dyn Bank,
    request_id: u64,
    requester: &Addr,
    provider: &Addr,
    amount: Uint128,
    height: i64,
) -> Result<Escrow, ContractError> {
    require_enabled(storage)?;
    let params = COMPUTE_PARAMS.get(storage)?;

    if amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }
    if ESCROWS.has(storage, request_id) {
        return Err(ContractError::RequestAlreadyExists(request_id));
    }
    require_active_provider(storage, provider)?;

    bank.transfer_to_module(requester, ESCROW_ACCOUNT, DENOM, amount)?;

    let escrow = Escrow {
        id: request_id,
        requester: requester.clone(),
        provider: provider.clone(),
        amount,
        denom: DENOM.to_string(),
        status: EscrowStatus::Locked,
        locked_at: height,
        expires_at: height + params.default_timeout_blocks,
        challenge_ends_at: 0,
        released_at: 0,
        refunded_at: 0,
        release_attempts: 0,
        refund_attempts: 0,
        result_commitment: None,
    };
    ESCROWS.save(storage, request_id, &escrow)?;
    Ok(escrow)
}

fn load_escrow(storage: &dyn Storage, request_id: u64) -> Result<Escrow, ContractError> {
    ESCROWS
        .may_load(storage, request_id)?
        .ok_or(ContractError::RequestNotFound(request_id))
}

/// `SubmitResult`: a provider presents a zk-verified result,
/// which — once the proof checks out — plays the role of `InitiateRelease`
/// and starts the challenge window.
pub fn submit_result(
    storage: &mut dyn Storage,
    verifier: &dyn ProofVerifier,
    request_id: u64,
    signer: &Addr,
    result_commitment: Binary,
    proof: &Binary,
    height: i64,
) -> Result<Escrow, ContractError> {
    require_enabled(storage)?;
    let params = COMPUTE_PARAMS.get(storage)?;
    let mut escrow = load_escrow(storage, request_id)?;

    if escrow.status != EscrowStatus::Locked {
        return Err(ContractError::InvalidState(request_id));
    }
    if &escrow.provider != signer {
        return Err(ContractError::Unauthorized {});
    }
    if height > escrow.expires_at {
        return Err(ContractError::AlreadyExpired(request_id));
    }
    if escrow.release_attempts != 0 {
        return Err(ContractError::AttemptAlreadyRecorded(request_id));
    }
    if !verifier.verify(request_id, &result_commitment, proof) {
        return Err(ContractError::ProofVerificationFailed(request_id));
    }

    escrow.status = EscrowStatus::Challenged;
    escrow.challenge_ends_at = height + params.default_challenge_blocks;
    escrow.release_attempts += 1;
    escrow.result_commitment = Some(result_commitment);
    ESCROWS.save(storage, request_id, &escrow)?;
    record_completion(storage, &escrow.provider)?;
    Ok(escrow)
}

/// `CompleteRelease`: pays the provider once the challenge
/// window has elapsed without dispute.
pub fn complete_release(
    storage: &mut dyn Storage,
    bank: &mut dyn Bank,
    request_id: u64,
    height: i64,
) -> Result<Escrow, ContractError> {
    require_enabled(storage)?;
    let mut escrow = load_escrow(storage, request_id)?;

    if escrow.status != EscrowStatus::Challenged {
        return Err(ContractError::InvalidState(request_id));
    }
    if height < escrow.challenge_ends_at {
        return Err(ContractError::ChallengeNotElapsed(request_id));
    }
    if escrow.released_at != 0 || escrow.refunded_at != 0 {
        return Err(ContractError::InvalidState(request_id));
    }

    bank.transfer_from_module(ESCROW_ACCOUNT, &escrow.provider, &escrow.denom, escrow.amount)?;
    escrow.status = EscrowStatus::Released;
    escrow.released_at = height;
    ESCROWS.save(storage, request_id, &escrow)?;
    Ok(escrow)
}

/// `ImmediateRelease`: governance override that skips the
/// challenge period entirely, valid from either `LOCKED` or `CHALLENGED`.
pub fn immediate_release(
    storage: &mut dyn Storage,
    bank: &mut dyn Bank,
    authority: &GovernanceAuthority,
    signer: &Addr,
    request_id: u64,
    height: i64,
) -> Result<Escrow, ContractError> {
    authority.require(signer).map_err(|_| ContractError::Unauthorized {})?;
    require_enabled(storage)?;
    let mut escrow = load_escrow(storage, request_id)?;

    if !matches!(escrow.status, EscrowStatus::Locked | EscrowStatus::Challenged) {
        return Err(ContractError::InvalidState(request_id));
    }
    if escrow.released_at != 0 || escrow.refunded_at != 0 {
        return Err(ContractError::InvalidState(request_id));
    }

    bank.transfer_from_module(ESCROW_ACCOUNT, &escrow.provider, &escrow.denom, escrow.amount)?;
    escrow.status = EscrowStatus::Released;
    escrow.released_at = height;
    ESCROWS.save(storage, request_id, &escrow)?;
    Ok(escrow)
}

/// `Refund`: requester-initiated refund from `LOCKED` or
/// `CHALLENGED`.
pub fn refund(
    storage: &mut dyn Storage,
    bank: &mut dyn Bank,
    request_id: u64,
    height: i64,
) -> Result<Escrow, ContractError> {
    require_enabled(storage)?;
    let mut escrow = load_escrow(storage, request_id)?;

    if !matches!(escrow.status, EscrowStatus::Locked | EscrowStatus::Challenged) {
        return Err(ContractError::InvalidState(request_id));
    }
    if escrow.released_at != 0 || escrow.refunded_at != 0 {
        return Err(ContractError::InvalidState(request_id));
    }
    if escrow.refund_attempts != 0 {
        return Err(ContractError::AttemptAlreadyRecorded(request_id));
    }

    escrow.refund_attempts += 1;
    bank.transfer_from_module(ESCROW_ACCOUNT, &escrow.requester, &escrow.denom, escrow.amount)?;
    escrow.status = EscrowStatus::Refunded;
    escrow.refunded_at = height;
    ESCROWS.save(storage, request_id, &escrow)?;
    Ok(escrow)
}

fn auto_refund_one(storage: &mut dyn Storage, bank: &mut dyn Bank, request_id: u64, height: i64) -> Result<Escrow, ContractError> {
    let mut escrow = load_escrow(storage, request_id)?;
    if escrow.status != EscrowStatus::Locked || height <= escrow.expires_at {
        return Err(ContractError::InvalidState(request_id));
    }
    escrow.refund_attempts += 1;
    bank.transfer_from_module(ESCROW_ACCOUNT, &escrow.requester, &escrow.denom, escrow.amount)?;
    escrow.status = EscrowStatus::Refunded;
    escrow.refunded_at = height;
    ESCROWS.save(storage, request_id, &escrow)?;
    slash_provider(storage, &escrow.provider, TIMEOUT_SLASH_BPS, "request_timeout", height)?;
    Ok(escrow)
}

/// EndBlock auto-refund sweep: every `LOCKED` escrow past its
/// `expires_at` is refunded to the requester.
pub fn sweep_expired(storage: &mut dyn Storage, bank: &mut dyn Bank, height: i64) -> Result<Vec<u64>, ContractError> {
    let expired: Vec<u64> = ESCROWS
        .range(storage, None, None, Order::Ascending)
        .filter_map(|item| match item {
            Ok((id, escrow)) if escrow.status == EscrowStatus::Locked && height > escrow.expires_at => Some(Ok(id)),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .collect::<Result<_, _>>()?;

    for id in &expired {
        auto_refund_one(storage, bank, *id, height)?;
    }
    Ok(expired)
}
