use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::Map;

#[cw_serde]
pub enum TransferStatus {
    Sent,
    Released,
    Refunded,
}

/// One outbound transfer this chain escrowed pending the counterparty's
/// acknowledgement: funds move into a module-owned account at send, release
/// to the module on a success ACK, and refund to the sender on an error
/// ACK or a timeout.
#[cw_serde]
pub struct OutboundTransfer {
    pub channel: String,
    pub sequence: u64,
    pub sender: Addr,
    pub denom: String,
    pub amount: Uint128,
    pub status: TransferStatus,
    pub sent_at: i64,
}

/// Keyed by `(channel, sequence)` — the packet identifier must be globally
/// unique for a given channel.
pub const OUTBOUND: Map<(&str, u64), OutboundTransfer> = Map::new("ibc_outbound");

/// Dedup set for inbound packets, keyed the same way, so a replayed
/// `(channel, sequence)` is rejected outright.
pub const SEEN_INBOUND: Map<(&str, u64), ()> = Map::new("ibc_seen_inbound");
