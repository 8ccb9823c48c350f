use std::collections::BTreeMap;

use cosmwasm_std::Addr;

/// Tracks the next expected sequence number per signer.
/// Real signature verification is an external collaborator; this
/// only models the replay-protection half of that step.
pub trait AccountSequencer {
    fn expected_sequence(&self, signer: &Addr) -> u64;
    fn increment_sequence(&mut self, signer: &Addr);
}

#[derive(Debug, Default, Clone)]
pub struct InMemorySequencer {
    next: BTreeMap<Addr, u64>,
}

impl InMemorySequencer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountSequencer for InMemorySequencer {
    fn expected_sequence(&self, signer: &Addr) -> u64 {
        self.next.get(signer).copied().unwrap_or_default()
    }

    fn increment_sequence(&mut self, signer: &Addr) {
        let entry = self.next.entry(signer.clone()).or_default();
        *entry += 1;
    }
}
