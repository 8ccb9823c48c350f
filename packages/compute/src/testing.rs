#![cfg(test)]

use cosmwasm_std::{Addr, Binary, Uint128};

use chain_core::{Bank, GovernanceAuthority, InMemoryBank, MemoryStore, PrefixedStore};

use crate::error::ContractError;
use crate::escrow::{complete_release, immediate_release, lock, refund, submit_result, sweep_expired};
use crate::params::{ComputeParams, COMPUTE_PARAMS};
use crate::provider::register_provider;
use crate::state::{EscrowStatus, PROVIDERS};
use crate::zk::CommitmentProofVerifier;

struct Fixture {
    store: MemoryStore,
    bank: InMemoryBank,
}

impl Fixture {
    fn new() -> Self {
        let mut store = MemoryStore::new();
        {
            let mut storage = PrefixedStore::new(&mut store, "compute");
            COMPUTE_PARAMS.init(&mut storage, &ComputeParams::default()).unwrap();
        }
        Self {
            store,
            bank: InMemoryBank::new(),
        }
    }

    fn storage(&mut self) -> PrefixedStore<'_> {
        PrefixedStore::new(&mut self.store, "compute")
    }
}

fn onboard_provider(fx: &mut Fixture, provider: &Addr) {
    fx.bank.mint(provider, "uposa", Uint128::new(10_000));
    let mut storage = fx.storage();
    register_provider(&mut storage, &mut fx.bank, provider, "https://p".to_string(), Uint128::new(1_000)).unwrap();
}

#[test]
fn scenario_escrow_double_finalize_race_rejects_the_loser() {
    let mut fx = Fixture::new();
    let requester = Addr::unchecked("requester");
    let provider = Addr::unchecked("provider");
    onboard_provider(&mut fx, &provider);
    fx.bank.mint(&requester, "uposa", Uint128::new(500));

    {
        let mut storage = fx.storage();
        lock(&mut storage, &mut fx.bank, 1, &requester, &provider, Uint128::new(500), 10).unwrap();
    }

    let commitment = Binary::from(b"result".to_vec());
    {
        let mut storage = fx.storage();
        let verifier = CommitmentProofVerifier;
        submit_result(&mut storage, &verifier, 1, &provider, commitment.clone(), &commitment, 10).unwrap();
    }

    // challengeBlocks default is 20, so height 30 clears the window
    let winner = {
        let mut storage = fx.storage();
        complete_release(&mut storage, &mut fx.bank, 1, 30).unwrap()
    };
    assert_eq!(winner.status, EscrowStatus::Released);
    assert_eq!(fx.bank.spendable(&provider, "uposa"), Uint128::new(9_500));

    let mut storage = fx.storage();
    let err = refund(&mut storage, &mut fx.bank, 1, 30).unwrap_err();
    assert_eq!(err, ContractError::InvalidState(1));
    // the loser never moved a balance
    assert_eq!(fx.bank.spendable(&requester, "uposa"), Uint128::zero());
}

#[test]
fn scenario_escrow_expiry_is_auto_refunded_by_the_sweep() {
    let mut fx = Fixture::new();
    let requester = Addr::unchecked("requester");
    let provider = Addr::unchecked("provider");
    onboard_provider(&mut fx, &provider);
    fx.bank.mint(&requester, "uposa", Uint128::new(500));

    {
        let mut storage = fx.storage();
        lock(&mut storage, &mut fx.bank, 7, &requester, &provider, Uint128::new(500), 10).unwrap();
    }

    {
        let mut storage = fx.storage();
        let swept = sweep_expired(&mut storage, &mut fx.bank, 100).unwrap();
        assert!(swept.is_empty());
    }

    let mut storage = fx.storage();
    let swept = sweep_expired(&mut storage, &mut fx.bank, 111).unwrap();
    assert_eq!(swept, vec![7]);
    assert_eq!(fx.bank.spendable(&requester, "uposa"), Uint128::new(500));

    let escrow = crate::state::ESCROWS.load(&storage, 7).unwrap();
    assert_eq!(escrow.status, EscrowStatus::Refunded);
}

#[test]
fn a_timed_out_request_slashes_the_assigned_provider() {
    let mut fx = Fixture::new();
    let requester = Addr::unchecked("requester");
    let provider = Addr::unchecked("provider");
    onboard_provider(&mut fx, &provider);
    fx.bank.mint(&requester, "uposa", Uint128::new(500));

    {
        let mut storage = fx.storage();
        lock(&mut storage, &mut fx.bank, 7, &requester, &provider, Uint128::new(500), 10).unwrap();
    }

    let mut storage = fx.storage();
    let swept = sweep_expired(&mut storage, &mut fx.bank, 111).unwrap();
    assert_eq!(swept, vec![7]);

    let slashed = PROVIDERS.load(&storage, &provider).unwrap();
    assert_eq!(slashed.stake_amount, Uint128::new(900));
    assert_eq!(slashed.reputation_score, 30);
    assert_eq!(slashed.slash_history.len(), 1);
    assert_eq!(slashed.slash_history[0].reason, "request_timeout");
}

#[test]
fn duplicate_request_id_is_rejected() {
    let mut fx = Fixture::new();
    let requester = Addr::unchecked("requester");
    let provider = Addr::unchecked("provider");
    onboard_provider(&mut fx, &provider);
    fx.bank.mint(&requester, "uposa", Uint128::new(1_000));

    let mut storage = fx.storage();
    lock(&mut storage, &mut fx.bank, 1, &requester, &provider, Uint128::new(500), 10).unwrap();
    let err = lock(&mut storage, &mut fx.bank, 1, &requester, &provider, Uint128::new(500), 10).unwrap_err();
    assert_eq!(err, ContractError::RequestAlreadyExists(1));
}

#[test]
fn forged_proof_is_rejected() {
    let mut fx = Fixture::new();
    let requester = Addr::unchecked("requester");
    let provider = Addr::unchecked("provider");
    onboard_provider(&mut fx, &provider);
    fx.bank.mint(&requester, "uposa", Uint128::new(500));

    let mut storage = fx.storage();
    lock(&mut storage, &mut fx.bank, 1, &requester, &provider, Uint128::new(500), 10).unwrap();

    let verifier = CommitmentProofVerifier;
    let commitment = Binary::from(b"result".to_vec());
    let forged = Binary::from(b"forged".to_vec());
    let err = submit_result(&mut storage, &verifier, 1, &provider, commitment, &forged, 10).unwrap_err();
    assert_eq!(err, ContractError::ProofVerificationFailed(1));
}

#[test]
fn governance_can_immediately_release_skipping_the_challenge_window() {
    let mut fx = Fixture::new();
    let requester = Addr::unchecked("requester");
    let provider = Addr::unchecked("provider");
    let gov = GovernanceAuthority::new(Addr::unchecked("gov"));
    onboard_provider(&mut fx, &provider);
    fx.bank.mint(&requester, "uposa", Uint128::new(500));

    let mut storage = fx.storage();
    lock(&mut storage, &mut fx.bank, 1, &requester, &provider, Uint128::new(500), 10).unwrap();

    let err = immediate_release(&mut storage, &mut fx.bank, &gov, &Addr::unchecked("random"), 1, 11).unwrap_err();
    assert_eq!(err, ContractError::Unauthorized {});

    let escrow = immediate_release(&mut storage, &mut fx.bank, &gov, &Addr::unchecked("gov"), 1, 11).unwrap();
    assert_eq!(escrow.status, EscrowStatus::Released);
    assert_eq!(fx.bank.spendable(&provider, "uposa"), Uint128::new(9_500));
}
