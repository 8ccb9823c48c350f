pub mod contract;
pub mod error;
pub mod math;
pub mod params;
pub mod state;

mod testing;

pub use contract::{
    begin_block_round_init, delegate_feed_consent, end_block_aggregate_all,
    end_block_aggregate_asset, init_signing_info, register_asset, submit_price,
};
pub use error::ContractError;
pub use params::{OracleParams, ORACLE_PARAMS};
pub use state::{AggregatedPrice, OracleAsset, PriceSubmission, ValidatorSigningInfo};
