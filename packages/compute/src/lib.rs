pub mod error;
pub mod escrow;
pub mod params;
pub mod provider;
pub mod state;
pub mod zk;

mod testing;

pub use error::ContractError;
pub use escrow::{
    allocate_request_id, complete_release, immediate_release, lock, refund, submit_result,
    sweep_expired,
};
pub use params::{ComputeParams, COMPUTE_PARAMS};
pub use provider::{deactivate_provider, record_completion, register_provider, slash_provider};
pub use state::{Escrow, EscrowStatus, Provider, SlashEvent};
pub use zk::{CommitmentProofVerifier, ProofVerifier};
