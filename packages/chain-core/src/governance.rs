use cosmwasm_std::Addr;

use crate::error::ChainError;

/// Exactly one well-known address. Module param updates, and
/// `Compute::ImmediateRelease`, only accept this as the authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceAuthority(Addr);

impl GovernanceAuthority {
    pub fn new(addr: Addr) -> Self {
        Self(addr)
    }

    pub fn address(&self) -> &Addr {
        &self.0
    }

    pub fn require(&self, signer: &Addr) -> Result<(), ChainError> {
        if signer != &self.0 {
            return Err(ChainError::unauthorized(format!(
                "{signer} is not the governance authority"
            )));
        }
        Ok(())
    }
}
