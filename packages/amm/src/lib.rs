pub mod contract;
pub mod error;
pub mod math;
pub mod params;
pub mod state;

mod testing;

pub use contract::{add_liquidity, create_pool, refresh_stats, remove_liquidity, swap};
pub use error::ContractError;
pub use params::{AmmParams, AMM_PARAMS};
pub use state::{Pool, PoolStats, LpPosition};
