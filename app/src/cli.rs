use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cosmwasm_std::{Addr, Decimal, Uint128};

use crate::driver::ChainState;
use crate::error::AppError;

/// The thin query/submit surface over the state machine, in the
/// style of `cosmic-lab-inc-arbiter`'s `arbiter_client` binary: one
/// subcommand per user-facing operation, no interactive shell.
#[derive(Parser)]
#[command(name = "poaiw-chaind", about = "Single-process driver for the poaiw chain state machine")]
pub struct Cli {
    /// Path to the genesis JSON document.
    #[arg(long, default_value = "genesis.json")]
    pub genesis: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a pool.
    CreatePool {
        #[arg(long)]
        creator: String,
        #[arg(long)]
        denom_a: String,
        #[arg(long)]
        denom_b: String,
        #[arg(long)]
        amount_a: u128,
        #[arg(long)]
        amount_b: u128,
        #[arg(long)]
        fee_bps: u64,
    },
    /// Swap through an existing pool.
    Swap {
        #[arg(long)]
        trader: String,
        #[arg(long)]
        pool_id: u64,
        #[arg(long)]
        denom_in: String,
        #[arg(long)]
        amount_in: u128,
        #[arg(long, default_value_t = 0)]
        min_amount_out: u128,
    },
    /// Add liquidity to an existing pool.
    AddLiquidity {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        pool_id: u64,
        #[arg(long)]
        amount_a: u128,
        #[arg(long)]
        amount_b: u128,
    },
    /// Remove liquidity from an existing pool.
    RemoveLiquidity {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        pool_id: u64,
        #[arg(long)]
        shares: u128,
    },
    /// Query a pool's reserves and accrued statistics.
    QueryPool {
        #[arg(long)]
        pool_id: u64,
    },
    /// Submit a compute job against a registered provider.
    SubmitComputeRequest {
        #[arg(long)]
        requester: String,
        #[arg(long)]
        provider: String,
        #[arg(long)]
        max_payment: u128,
    },
    /// Submit a price observation for an asset.
    SubmitPrice {
        #[arg(long)]
        validator: String,
        #[arg(long)]
        feeder: String,
        #[arg(long)]
        asset: String,
        #[arg(long)]
        price: String,
        /// Unix timestamp the observation was taken at; defaults to now.
        #[arg(long)]
        timestamp: Option<i64>,
    },
    /// Query the latest aggregated price for an asset.
    QueryPrice {
        #[arg(long)]
        asset: String,
    },
}

fn parse_addr(s: &str) -> Addr {
    Addr::unchecked(s)
}

/// Runs one CLI invocation against freshly loaded genesis state and prints
/// the outcome. Every mutating subcommand operates on the current height
/// only — there is no facility to replay a historical one.
pub fn run(cli: &Cli, wall_clock: i64) -> Result<(), AppError> {
    let genesis = crate::genesis::load_genesis_file(&cli.genesis)?;
    let mut state = ChainState::from_genesis(&genesis)?;
    state.begin_block(1)?;

    match &cli.command {
        Command::CreatePool { creator, denom_a, denom_b, amount_a, amount_b, fee_bps } => {
            let signer = parse_addr(creator);
            let tx = ante::Tx {
                signer: signer.clone(),
                sequence: state.expected_sequence(&signer),
                messages: vec![ante::Msg::DexCreatePool {
                    creator: signer,
                    denom_a: denom_a.clone(),
                    denom_b: denom_b.clone(),
                    amount_a: Uint128::new(*amount_a),
                    amount_b: Uint128::new(*amount_b),
                    fee_bps: *fee_bps,
                }],
                gas_limit: 1_000_000,
                memo: String::new(),
                timeout_height: 0,
                extension_options: vec![],
                fee_amount: Uint128::zero(),
                fee_denom: "uposa".into(),
            };
            let events = state.deliver_tx(&tx, 1, wall_clock)?;
            for event in events {
                log::info!("{}: {:?}", event.ty, event.attributes);
            }
        }
        Command::Swap { trader, pool_id, denom_in, amount_in, min_amount_out } => {
            let signer = parse_addr(trader);
            let tx = ante::Tx {
                signer: signer.clone(),
                sequence: state.expected_sequence(&signer),
                messages: vec![ante::Msg::DexSwap {
                    trader: signer,
                    pool_id: *pool_id,
                    denom_in: denom_in.clone(),
                    amount_in: Uint128::new(*amount_in),
                    min_amount_out: Uint128::new(*min_amount_out),
                }],
                gas_limit: 1_000_000,
                memo: String::new(),
                timeout_height: 0,
                extension_options: vec![],
                fee_amount: Uint128::zero(),
                fee_denom: "uposa".into(),
            };
            let events = state.deliver_tx(&tx, 1, wall_clock)?;
            for event in events {
                log::info!("{}: {:?}", event.ty, event.attributes);
            }
        }
        Command::AddLiquidity { provider, pool_id, amount_a, amount_b } => {
            let signer = parse_addr(provider);
            let tx = ante::Tx {
                signer: signer.clone(),
                sequence: state.expected_sequence(&signer),
                messages: vec![ante::Msg::DexAddLiquidity {
                    provider: signer,
                    pool_id: *pool_id,
                    amount_a: Uint128::new(*amount_a),
                    amount_b: Uint128::new(*amount_b),
                }],
                gas_limit: 1_000_000,
                memo: String::new(),
                timeout_height: 0,
                extension_options: vec![],
                fee_amount: Uint128::zero(),
                fee_denom: "uposa".into(),
            };
            let events = state.deliver_tx(&tx, 1, wall_clock)?;
            for event in events {
                log::info!("{}: {:?}", event.ty, event.attributes);
            }
        }
        Command::RemoveLiquidity { provider, pool_id, shares } => {
            let signer = parse_addr(provider);
            let tx = ante::Tx {
                signer: signer.clone(),
                sequence: state.expected_sequence(&signer),
                messages: vec![ante::Msg::DexRemoveLiquidity {
                    provider: signer,
                    pool_id: *pool_id,
                    shares: Uint128::new(*shares),
                }],
                gas_limit: 1_000_000,
                memo: String::new(),
                timeout_height: 0,
                extension_options: vec![],
                fee_amount: Uint128::zero(),
                fee_denom: "uposa".into(),
            };
            let events = state.deliver_tx(&tx, 1, wall_clock)?;
            for event in events {
                log::info!("{}: {:?}", event.ty, event.attributes);
            }
        }
        Command::QueryPool { pool_id } => {
            let pool = amm::state::POOLS
                .may_load(&state.amm_store, *pool_id)
                .map_err(AppError::from)?
                .ok_or(AppError::UnsupportedMessage)?;
            println!("{}", serde_json::to_string_pretty(&pool)?);
        }
        Command::SubmitComputeRequest { requester, provider, max_payment } => {
            let signer = parse_addr(requester);
            let tx = ante::Tx {
                signer: signer.clone(),
                sequence: state.expected_sequence(&signer),
                messages: vec![ante::Msg::ComputeSubmitRequest {
                    requester: signer,
                    provider: parse_addr(provider),
                    max_payment: Uint128::new(*max_payment),
                }],
                gas_limit: 1_000_000,
                memo: String::new(),
                timeout_height: 0,
                extension_options: vec![],
                fee_amount: Uint128::zero(),
                fee_denom: "uposa".into(),
            };
            let events = state.deliver_tx(&tx, 1, wall_clock)?;
            for event in events {
                log::info!("{}: {:?}", event.ty, event.attributes);
            }
        }
        Command::SubmitPrice { validator, feeder, asset, price, timestamp } => {
            let price: Decimal = price.parse().map_err(|_| AppError::UnsupportedMessage)?;
            let signer = parse_addr(feeder);
            let tx = ante::Tx {
                signer: signer.clone(),
                sequence: state.expected_sequence(&signer),
                messages: vec![ante::Msg::OracleSubmitPrice {
                    validator: parse_addr(validator),
                    feeder: signer,
                    asset: asset.clone(),
                    price,
                    timestamp: timestamp.unwrap_or(wall_clock),
                }],
                gas_limit: 1_000_000,
                memo: String::new(),
                timeout_height: 0,
                extension_options: vec![],
                fee_amount: Uint128::zero(),
                fee_denom: "uposa".into(),
            };
            let events = state.deliver_tx(&tx, 1, wall_clock)?;
            for event in events {
                log::info!("{}: {:?}", event.ty, event.attributes);
            }
        }
        Command::QueryPrice { asset } => {
            let price = oracle::state::LATEST_PRICE
                .may_load(&state.oracle_store, asset.as_str())
                .map_err(AppError::from)?
                .ok_or(AppError::UnsupportedMessage)?;
            println!("{}", serde_json::to_string_pretty(&price)?);
        }
    }

    state.end_block(1)?;
    state.commit();
    Ok(())
}
