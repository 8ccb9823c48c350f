use cosmwasm_std::{Addr, Storage};

use chain_core::Bank;

use crate::ack::Ack;
use crate::error::ContractError;
use crate::packet::Packet;
use crate::state::{OutboundTransfer, TransferStatus, OUTBOUND, SEEN_INBOUND};

pub const TRANSFER_ESCROW_ACCOUNT: &str = "ibc/transfer_escrow";

/// Send-side of a cross-chain transfer: escrows the sender's funds in the
/// module account and records the packet under its `(channel, sequence)`
/// identity before it is relayed.
pub fn send_transfer(
    storage: &mut dyn Storage,
    bank: &mut dyn Bank,
    channel: &str,
    sequence: u64,
    sender: &Addr,
    denom: &str,
    amount: cosmwasm_std::Uint128,
    height: i64,
) -> Result<OutboundTransfer, ContractError> {
    if OUTBOUND.has(storage, (channel, sequence)) {
        return Err(ContractError::DuplicatePacket {
            channel: channel.to_string(),
            sequence,
        });
    }
    bank.transfer_to_module(sender, TRANSFER_ESCROW_ACCOUNT, denom, amount)?;

    let transfer = OutboundTransfer {
        channel: channel.to_string(),
        sequence,
        sender: sender.clone(),
        denom: denom.to_string(),
        amount,
        status: TransferStatus::Sent,
        sent_at: height,
    };
    OUTBOUND.save(storage, (channel, sequence), &transfer)?;
    Ok(transfer)
}

fn load_transfer(storage: &dyn Storage, channel: &str, sequence: u64) -> Result<OutboundTransfer, ContractError> {
    OUTBOUND
        .may_load(storage, (channel, sequence))?
        .ok_or_else(|| ContractError::TransferNotFound { channel: channel.to_string(), sequence })
}

/// Counterparty acknowledged the packet: a success ack finalizes the
/// escrow (the funds stay escrowed, representing value now held on the
/// receiving chain); an error ack is treated exactly like a timeout.
pub fn on_ack(
    storage: &mut dyn Storage,
    bank: &mut dyn Bank,
    channel: &str,
    sequence: u64,
    ack: &Ack,
) -> Result<OutboundTransfer, ContractError> {
    let mut transfer = load_transfer(storage, channel, sequence)?;
    if transfer.status != TransferStatus::Sent {
        return Err(ContractError::TransferAlreadyFinalized { channel: channel.to_string(), sequence });
    }

    if ack.is_success() {
        transfer.status = TransferStatus::Released;
    } else {
        bank.transfer_from_module(TRANSFER_ESCROW_ACCOUNT, &transfer.sender, &transfer.denom, transfer.amount)?;
        transfer.status = TransferStatus::Refunded;
    }
    OUTBOUND.save(storage, (channel, sequence), &transfer)?;
    Ok(transfer)
}

/// The packet timed out before any ack arrived: refund the sender in full.
pub fn on_timeout(
    storage: &mut dyn Storage,
    bank: &mut dyn Bank,
    channel: &str,
    sequence: u64,
) -> Result<OutboundTransfer, ContractError> {
    let mut transfer = load_transfer(storage, channel, sequence)?;
    if transfer.status != TransferStatus::Sent {
        return Err(ContractError::TransferAlreadyFinalized { channel: channel.to_string(), sequence });
    }
    bank.transfer_from_module(TRANSFER_ESCROW_ACCOUNT, &transfer.sender, &transfer.denom, transfer.amount)?;
    transfer.status = TransferStatus::Refunded;
    OUTBOUND.save(storage, (channel, sequence), &transfer)?;
    Ok(transfer)
}

/// Receive-side: validates the packet schema, rejects replays of the same
/// `(channel, sequence)`, credits the recipient, and returns the
/// deterministic ack to relay back.
pub fn on_recv(storage: &mut dyn Storage, bank: &mut dyn Bank, packet: &Packet) -> Ack {
    if let Err(err) = packet.validate() {
        return Ack::error(1, err.to_string());
    }
    if SEEN_INBOUND.has(storage, (packet.channel.as_str(), packet.sequence)) {
        return Ack::error(2, format!("packet ({}, {}) already processed", packet.channel, packet.sequence));
    }

    let recipient = Addr::unchecked(&packet.recipient);
    if let Err(err) = bank.transfer_from_module(TRANSFER_ESCROW_ACCOUNT, &recipient, &packet.denom, packet.amount) {
        return Ack::error(3, err.to_string());
    }
    match SEEN_INBOUND.save(storage, (packet.channel.as_str(), packet.sequence), &()) {
        Ok(()) => Ack::success(),
        Err(err) => Ack::error(4, err.to_string()),
    }
}
