pub mod error;

use cosmwasm_std::{Addr, StdResult, Storage};
use cw_storage_plus::Item;
use serde::{de::DeserializeOwned, Serialize};

use chain_core::GovernanceAuthority;
use error::ContractError;

/// Every module's `Params` type implements this so the ante chain can
/// circuit-break on it generically: all modules read `params.enabled`, and
/// reject with `ErrModuleDisabled` if it is false.
pub trait HasEnabled {
    fn enabled(&self) -> bool;
}

/// A single-value parameter store for one module, gated by the governance
/// authority on writes. Mirrors the `CONFIG: Item<Config>`
/// idiom in `contracts/factory/src/state.rs`, generalized over `P` since
/// parameter schemas are module-internal.
pub struct ParamsStore<P> {
    item: Item<'static, P>,
}

impl<P> ParamsStore<P>
where
    P: Serialize + DeserializeOwned,
{
    pub const fn new(storage_key: &'static str) -> Self {
        Self {
            item: Item::new(storage_key),
        }
    }

    pub fn get(&self, storage: &dyn Storage) -> StdResult<P> {
        self.item.load(storage)
    }

    pub fn init(&self, storage: &mut dyn Storage, params: &P) -> StdResult<()> {
        self.item.save(storage, params)
    }

    /// Governance-gated update. Any other signer is rejected with
    /// [`ContractError::Unauthorized`] before the store is touched.
    pub fn set(
        &self,
        storage: &mut dyn Storage,
        authority: &GovernanceAuthority,
        signer: &Addr,
        params: P,
    ) -> Result<(), ContractError> {
        if signer != authority.address() {
            return Err(ContractError::Unauthorized {});
        }
        self.item.save(storage, &params)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_core::MemoryStore;
    use cosmwasm_schema::cw_serde;

    #[cw_serde]
    struct DummyParams {
        enabled: bool,
        fee_bps: u64,
    }

    impl HasEnabled for DummyParams {
        fn enabled(&self) -> bool {
            self.enabled
        }
    }

    #[test]
    fn only_governance_can_set_params() {
        let mut store = MemoryStore::new();
        let params_store: ParamsStore<DummyParams> = ParamsStore::new("dummy_params");
        let authority = GovernanceAuthority::new(Addr::unchecked("gov"));
        params_store
            .init(
                &mut store,
                &DummyParams {
                    enabled: true,
                    fee_bps: 30,
                },
            )
            .unwrap();

        let err = params_store
            .set(
                &mut store,
                &authority,
                &Addr::unchecked("random"),
                DummyParams {
                    enabled: false,
                    fee_bps: 99,
                },
            )
            .unwrap_err();
        assert_eq!(err, ContractError::Unauthorized {});
        assert!(params_store.get(&store).unwrap().enabled);

        params_store
            .set(
                &mut store,
                &authority,
                &Addr::unchecked("gov"),
                DummyParams {
                    enabled: false,
                    fee_bps: 99,
                },
            )
            .unwrap();
        assert!(!params_store.get(&store).unwrap().enabled);
    }
}
