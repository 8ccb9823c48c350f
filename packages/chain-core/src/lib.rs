pub mod address;
pub mod bank;
pub mod context;
pub mod error;
pub mod event;
pub mod gas;
pub mod governance;
pub mod slashing;
pub mod staking;
pub mod store;

pub use address::validate_address;
pub use bank::{Bank, InMemoryBank};
pub use context::{BlockInfo, TxContext};
pub use error::{ChainError, ChainResult, ErrorKind};
pub use event::{attr, Attribute, Event};
pub use gas::GasMeter;
pub use governance::GovernanceAuthority;
pub use slashing::{InMemorySlashing, SlashingSink};
pub use staking::{InMemoryStaking, StakingView};
pub use store::{MemoryStore, PrefixedStore};
