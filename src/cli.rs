//! Definitions of CLI arguments and commands for the contract management scripts

use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ethers::providers::Middleware;

use crate::{
    commands::{
        bridge_burn, bridge_mint, create_market_gauge, deploy_system, mint_emissions,
        voter_create_gauge, voter_factory,
    },
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_PATH},
    errors::ScriptError,
};

/// Deploy and administer the vote-escrow tokenomics contracts
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "DEPLOYER_PRIV_KEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Path of the deployments file
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: String,

    /// Directory holding the compiled contract artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: String,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The scripts that can be run against a network
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the full contract system, reusing anything already deployed
    Deploy(DeployArgs),
    /// Mint a lock NFT through the mock bridge
    BridgeMint(BridgeMintArgs),
    /// Burn a lock NFT through the mock bridge
    BridgeBurn(BridgeBurnArgs),
    /// Create a market gauge through the gauge factory
    CreateMarketGauge(CreateMarketGaugeArgs),
    /// Create a market gauge directly through the voter
    VoterCreateGauge(VoterCreateGaugeArgs),
    /// Mint emissions to the deployer
    MintEmissions(MintEmissionsArgs),
    /// Manage the gauge factories registered on the voter
    VoterFactory(VoterFactoryArgs),
}

impl Command {
    /// Run the command against the connected network
    pub async fn run(
        self,
        client: Arc<impl Middleware>,
        deployments_path: &str,
        artifacts_dir: &str,
    ) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => {
                deploy_system(args, client, deployments_path, artifacts_dir).await
            }
            Command::BridgeMint(args) => bridge_mint(args, client, deployments_path).await,
            Command::BridgeBurn(args) => bridge_burn(args, client, deployments_path).await,
            Command::CreateMarketGauge(args) => {
                create_market_gauge(args, client, deployments_path).await
            }
            Command::VoterCreateGauge(args) => {
                voter_create_gauge(args, client, deployments_path).await
            }
            Command::MintEmissions(args) => mint_emissions(args, client, deployments_path).await,
            Command::VoterFactory(args) => voter_factory(args, client, deployments_path).await,
        }
    }
}

/// Deploy the full contract system
#[derive(Args)]
pub struct DeployArgs {
    /// Token the escrow locks, in hex.
    ///
    /// Required on production networks; test networks lock the emissions
    /// token itself.
    #[arg(long)]
    pub lock_token: Option<String>,
}

/// Mint a lock NFT through the mock bridge
#[derive(Args)]
pub struct BridgeMintArgs {
    /// Recipient of the minted NFT, in hex
    #[arg(long)]
    pub to: String,

    /// Id of the lock NFT to mint
    #[arg(long)]
    pub token_id: u64,

    /// Amount locked in the position
    #[arg(long)]
    pub amount: u64,

    /// Unlock timestamp of the position
    #[arg(long)]
    pub timestamp: u64,
}

/// Burn a lock NFT through the mock bridge
#[derive(Args)]
pub struct BridgeBurnArgs {
    /// Id of the lock NFT to burn
    #[arg(long)]
    pub token_id: u64,
}

/// Create a market gauge through the gauge factory
#[derive(Args)]
pub struct CreateMarketGaugeArgs {
    /// Address of the flywheel deployed to the market, in hex
    #[arg(short, long)]
    pub flywheel: String,
}

/// Create a market gauge directly through the voter
#[derive(Args)]
pub struct VoterCreateGaugeArgs {
    /// Address of the flywheel deployed to the market, in hex
    #[arg(short, long)]
    pub flywheel: String,
}

/// Mint emissions to the deployer
#[derive(Args)]
pub struct MintEmissionsArgs {
    /// Amount to mint, in whole tokens (floating point)
    #[arg(short, long)]
    pub amount: String,
}

/// Manage the gauge factories registered on the voter
#[derive(Args)]
pub struct VoterFactoryArgs {
    /// The list operation to perform
    #[arg(long, value_enum)]
    pub action: FactoryAction,

    /// Gauge factory address, in hex; required for add and replace
    #[arg(long)]
    pub factory: Option<String>,

    /// Position in the factory list; required for remove and replace
    #[arg(long)]
    pub pos: Option<u64>,
}

/// Operations on the voter's gauge-factory list
#[derive(ValueEnum, Copy, Clone)]
pub enum FactoryAction {
    /// Append a factory to the list
    Add,
    /// Remove the factory at a position
    Remove,
    /// Replace the factory at a position
    Replace,
}
