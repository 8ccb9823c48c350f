use std::collections::BTreeMap;

use cosmwasm_std::{Addr, Uint128};

/// The oracle-only outbound staking view. Narrow by design: the oracle
/// module never needs more than this, so it takes this trait rather than
/// a handle to the full staking keeper.
pub trait StakingView {
    fn is_bonded(&self, validator: &Addr) -> bool;
    fn voting_power(&self, validator: &Addr) -> Uint128;
    fn total_bonded_power(&self) -> Uint128;
    /// Every currently bonded validator, for callers that need to compare
    /// "who submitted" against "who is active" (e.g. oracle miss counters).
    fn active_validators(&self) -> Vec<Addr>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStaking {
    bonded: BTreeMap<Addr, Uint128>,
}

impl InMemoryStaking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bond(&mut self, validator: Addr, power: Uint128) {
        self.bonded.insert(validator, power);
    }

    pub fn unbond(&mut self, validator: &Addr) {
        self.bonded.remove(validator);
    }

    pub fn validators(&self) -> impl Iterator<Item = &Addr> {
        self.bonded.keys()
    }
}

impl StakingView for InMemoryStaking {
    fn is_bonded(&self, validator: &Addr) -> bool {
        self.bonded.contains_key(validator)
    }

    fn voting_power(&self, validator: &Addr) -> Uint128 {
        self.bonded.get(validator).copied().unwrap_or_else(Uint128::zero)
    }

    fn total_bonded_power(&self) -> Uint128 {
        self.bonded.values().fold(Uint128::zero(), |acc, p| acc + *p)
    }

    fn active_validators(&self) -> Vec<Addr> {
        self.bonded.keys().cloned().collect()
    }
}
