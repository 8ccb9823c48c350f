pub mod ack;
pub mod contract;
pub mod error;
pub mod packet;
pub mod state;

mod testing;

pub use ack::Ack;
pub use contract::{on_ack, on_recv, on_timeout, send_transfer, TRANSFER_ESCROW_ACCOUNT};
pub use error::ContractError;
pub use packet::Packet;
pub use state::{OutboundTransfer, TransferStatus};
