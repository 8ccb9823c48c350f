use std::collections::BTreeMap;

use cosmwasm_std::{Addr, Decimal};

/// The oracle-only outbound slashing sink.
pub trait SlashingSink {
    fn slash(&mut self, validator: &Addr, fraction: Decimal, reason: &str);
    fn jail(&mut self, validator: &Addr, until_height: i64);
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySlashing {
    pub slashed: Vec<(Addr, Decimal, String)>,
    pub jailed_until: BTreeMap<Addr, i64>,
}

impl InMemorySlashing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_jailed(&self, validator: &Addr, current_height: i64) -> bool {
        self.jailed_until
            .get(validator)
            .map(|&until| current_height < until)
            .unwrap_or(false)
    }
}

impl SlashingSink for InMemorySlashing {
    fn slash(&mut self, validator: &Addr, fraction: Decimal, reason: &str) {
        self.slashed
            .push((validator.clone(), fraction, reason.to_string()));
    }

    fn jail(&mut self, validator: &Addr, until_height: i64) {
        self.jailed_until.insert(validator.clone(), until_height);
    }
}
