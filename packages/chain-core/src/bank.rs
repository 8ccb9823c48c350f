use std::collections::BTreeMap;

use cosmwasm_std::{Addr, Uint128};

use crate::error::{ChainError, ErrorKind};

/// The outbound balance collaborator. All transfers fail
/// atomically on insufficient balance — there is no partial transfer.
pub trait Bank {
    fn spendable(&self, addr: &Addr, denom: &str) -> Uint128;

    fn transfer(
        &mut self,
        from: &Addr,
        to: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> Result<(), ChainError>;

    fn transfer_to_module(
        &mut self,
        from: &Addr,
        module: &str,
        denom: &str,
        amount: Uint128,
    ) -> Result<(), ChainError>;

    fn transfer_from_module(
        &mut self,
        module: &str,
        to: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> Result<(), ChainError>;
}

/// Account key used by [`InMemoryBank`]: either a signer address or a
/// module-owned account (escrow, fee collector, ...) addressed by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Holder {
    Account(Addr),
    Module(String),
}

/// A reference bank used by the `app` binary and by every module's test
/// suite in place of the real bank keeper. Balances are plain in-memory
/// maps; this is sufficient because the state machine never depends on the
/// bank's own storage layout, only on the trait contract above.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBank {
    balances: BTreeMap<(Holder, String), Uint128>,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, addr: &Addr, denom: &str, amount: Uint128) {
        let key = (Holder::Account(addr.clone()), denom.to_string());
        let balance = self.balances.entry(key).or_insert_with(Uint128::zero);
        *balance += amount;
    }

    fn debit(&mut self, holder: Holder, denom: &str, amount: Uint128) -> Result<(), ChainError> {
        let key = (holder, denom.to_string());
        let balance = self.balances.entry(key).or_insert_with(Uint128::zero);
        if *balance < amount {
            return Err(ChainError::new(
                ErrorKind::InsufficientFunds,
                format!("balance {balance} is less than required {amount}{denom}"),
            ));
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&mut self, holder: Holder, denom: &str, amount: Uint128) {
        let key = (holder, denom.to_string());
        let balance = self.balances.entry(key).or_insert_with(Uint128::zero);
        *balance += amount;
    }
}

impl Bank for InMemoryBank {
    fn spendable(&self, addr: &Addr, denom: &str) -> Uint128 {
        self.balances
            .get(&(Holder::Account(addr.clone()), denom.to_string()))
            .copied()
            .unwrap_or_else(Uint128::zero)
    }

    fn transfer(
        &mut self,
        from: &Addr,
        to: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> Result<(), ChainError> {
        self.debit(Holder::Account(from.clone()), denom, amount)?;
        self.credit(Holder::Account(to.clone()), denom, amount);
        Ok(())
    }

    fn transfer_to_module(
        &mut self,
        from: &Addr,
        module: &str,
        denom: &str,
        amount: Uint128,
    ) -> Result<(), ChainError> {
        self.debit(Holder::Account(from.clone()), denom, amount)?;
        self.credit(Holder::Module(module.to_string()), denom, amount);
        Ok(())
    }

    fn transfer_from_module(
        &mut self,
        module: &str,
        to: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> Result<(), ChainError> {
        self.debit(Holder::Module(module.to_string()), denom, amount)?;
        self.credit(Holder::Account(to.clone()), denom, amount);
        Ok(())
    }
}

impl InMemoryBank {
    /// Total balance held by a module account, used by property tests that
    /// assert escrow/pool conservation.
    pub fn module_balance(&self, module: &str, denom: &str) -> Uint128 {
        self.balances
            .get(&(Holder::Module(module.to_string()), denom.to_string()))
            .copied()
            .unwrap_or_else(Uint128::zero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfers_fail_atomically_on_insufficient_funds() {
        let mut bank = InMemoryBank::new();
        let alice = Addr::unchecked("alice");
        let bob = Addr::unchecked("bob");
        bank.mint(&alice, "uatom", Uint128::new(100));

        let err = bank
            .transfer(&alice, &bob, "uatom", Uint128::new(200))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InsufficientFunds);
        assert_eq!(bank.spendable(&alice, "uatom"), Uint128::new(100));
        assert_eq!(bank.spendable(&bob, "uatom"), Uint128::zero());
    }

    #[test]
    fn module_escrow_is_segregated() {
        let mut bank = InMemoryBank::new();
        let alice = Addr::unchecked("alice");
        bank.mint(&alice, "uatom", Uint128::new(100));
        bank.transfer_to_module(&alice, "compute_escrow", "uatom", Uint128::new(40))
            .unwrap();
        assert_eq!(bank.spendable(&alice, "uatom"), Uint128::new(60));
        assert_eq!(bank.module_balance("compute_escrow", "uatom"), Uint128::new(40));
    }
}
