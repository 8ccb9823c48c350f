use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

use crate::error::ContractError;

/// The module-side view of an inbound or outbound cross-chain transfer
/// packet. The wire encoding and relaying are an external collaborator's
/// concern; this is the decoded schema a handler validates and acts on.
#[cw_serde]
pub struct Packet {
    pub channel: String,
    pub sequence: u64,
    pub sender: String,
    pub recipient: String,
    pub denom: String,
    pub amount: Uint128,
}

impl Packet {
    /// Rejects malformed packets up front so the caller can ACK with an
    /// error code instead of panicking deeper in the handler.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.channel.trim().is_empty() {
            return Err(ContractError::MalformedPacket("channel must be non-empty".into()));
        }
        if self.sender.trim().is_empty() || self.recipient.trim().is_empty() {
            return Err(ContractError::MalformedPacket("sender and recipient must be non-empty".into()));
        }
        if self.denom.trim().is_empty() {
            return Err(ContractError::MalformedPacket("denom must be non-empty".into()));
        }
        if self.amount.is_zero() {
            return Err(ContractError::MalformedPacket("amount must be positive".into()));
        }
        Ok(())
    }
}
