//! Implementations of the deploy and task scripts

use std::sync::Arc;

use alloy_primitives::Address as AlloyAddress;
use alloy_sol_types::SolCall;
use ethers::{abi::Address, providers::Middleware, types::U256, utils::parse_ether};
use tracing::info;

use crate::{
    cli::{
        BridgeBurnArgs, BridgeMintArgs, CreateMarketGaugeArgs, DeployArgs, FactoryAction,
        MintEmissionsArgs, VoterCreateGaugeArgs, VoterFactoryArgs,
    },
    constants::{
        EMISSIONS_TOKEN_ARTIFACT, EMISSIONS_TOKEN_CONTRACT_KEY, EPOCH_TIMER_ARTIFACT,
        EPOCH_TIMER_CONTRACT_KEY, GAUGE_FACTORY_ARTIFACT, GAUGE_FACTORY_CONTRACT_KEY,
        MOCK_BRIDGE_ARTIFACT, MOCK_BRIDGE_CONTRACT_KEY, ROLES_AUTHORITY_ARTIFACT,
        ROLES_AUTHORITY_CONTRACT_KEY, VOTER_ARTIFACT, VOTER_CONTRACT_KEY, VOTE_ESCROW_ARTIFACT,
        VOTE_ESCROW_CONTRACT_KEY, VOTE_ESCROW_NAME, VOTE_ESCROW_SYMBOL,
    },
    deployments::read_address,
    errors::ScriptError,
    network::NetworkProfile,
    solidity::{
        emissions_token, epoch_timer, gauge_factory, roles_authority, vote_escrow, voter,
        BridgeRegistryContract, EmissionsTokenContract, GaugeFactoryContract, MockBridgeContract,
        VoteEscrowContract, VoterContract,
    },
    utils::{
        alloy_address, deploy_once, deploy_upgradeable, deployer_address, get_chain_id,
        mint_metadata, parse_addr, DeployContext,
    },
};

/// Deploy the full contract system against the connected network, reusing
/// anything already recorded in the deployments file and wiring the contracts
/// together afterwards
pub async fn deploy_system(
    args: DeployArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
    artifacts_dir: &str,
) -> Result<(), ScriptError> {
    let chain_id = get_chain_id(&client).await?;
    let profile = NetworkProfile::from_chain_id(chain_id)?;
    let deployer = deployer_address(&client)?;
    info!("deploying to {profile} (chain id {chain_id})");
    info!("deployer: {deployer:#x}");

    let ctx = DeployContext {
        chain_id,
        deployments_path,
        artifacts_dir,
    };

    let token = deploy_upgradeable(
        &ctx,
        EMISSIONS_TOKEN_CONTRACT_KEY,
        EMISSIONS_TOKEN_ARTIFACT,
        emissions_token::initializeCall {}.abi_encode(),
        Some(emissions_token::reinitializeCall {}.abi_encode()),
        client.clone(),
    )
    .await?;

    let roles_authority = deploy_upgradeable(
        &ctx,
        ROLES_AUTHORITY_CONTRACT_KEY,
        ROLES_AUTHORITY_ARTIFACT,
        roles_authority::initializeCall {
            owner: alloy_address(deployer),
        }
        .abi_encode(),
        None,
        client.clone(),
    )
    .await?;

    let gauge_factory = deploy_upgradeable(
        &ctx,
        GAUGE_FACTORY_CONTRACT_KEY,
        GAUGE_FACTORY_ARTIFACT,
        gauge_factory::initializeCall {
            rolesAuthority: alloy_address(roles_authority),
        }
        .abi_encode(),
        None,
        client.clone(),
    )
    .await?;

    let lock_token = resolve_lock_token(&args, profile, token)?;

    // On the designated production network the deployer itself holds mint
    // rights rather than a mock bridge
    if profile.deployer_is_minter() {
        ensure_bridge(token, deployer, client.clone()).await?;
    }

    let escrow = deploy_upgradeable(
        &ctx,
        VOTE_ESCROW_CONTRACT_KEY,
        VOTE_ESCROW_ARTIFACT,
        vote_escrow::initializeCall {
            name: VOTE_ESCROW_NAME.to_string(),
            symbol: VOTE_ESCROW_SYMBOL.to_string(),
            lockedToken: alloy_address(lock_token),
        }
        .abi_encode(),
        None,
        client.clone(),
    )
    .await?;

    let timer = deploy_upgradeable(
        &ctx,
        EPOCH_TIMER_CONTRACT_KEY,
        EPOCH_TIMER_ARTIFACT,
        epoch_timer::initializeCall {}.abi_encode(),
        None,
        client.clone(),
    )
    .await?;

    // No bribe factory is deployed yet
    let bribe_factory = AlloyAddress::ZERO;

    let voter = deploy_upgradeable(
        &ctx,
        VOTER_CONTRACT_KEY,
        VOTER_ARTIFACT,
        voter::initializeCall {
            votingEscrow: alloy_address(escrow),
            gaugeFactory: alloy_address(gauge_factory),
            bribeFactory: bribe_factory,
            epochTimer: alloy_address(timer),
            rolesAuthority: alloy_address(roles_authority),
        }
        .abi_encode(),
        Some(
            voter::reinitializeCall {
                votingEscrow: alloy_address(escrow),
            }
            .abi_encode(),
        ),
        client.clone(),
    )
    .await?;

    // Point the escrow at the voter, submitting only if the recorded voter differs
    let escrow_contract = VoteEscrowContract::new(escrow, client.clone());
    let current_voter = escrow_contract
        .voter()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if current_voter != voter {
        let call = escrow_contract.set_voter(voter);
        let pending = call
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        let tx_hash = pending.tx_hash();
        pending
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        info!("set the voter on the escrow in tx {tx_hash:#x}");
    } else {
        info!("the escrow already points at voter {voter:#x}");
    }

    if profile.supports_mock_bridge() {
        let bridge = deploy_once(
            &ctx,
            MOCK_BRIDGE_CONTRACT_KEY,
            MOCK_BRIDGE_ARTIFACT,
            escrow,
            client.clone(),
        )
        .await?;

        // The bridge mints lock NFTs on the escrow and tokens on the token
        ensure_bridge(escrow, bridge, client.clone()).await?;
        ensure_bridge(token, bridge, client.clone()).await?;
    }

    Ok(())
}

/// Mint a lock NFT to an address through the mock bridge
pub async fn bridge_mint(
    args: BridgeMintArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let chain_id = get_chain_id(&client).await?;
    let bridge_address = read_address(deployments_path, chain_id, MOCK_BRIDGE_CONTRACT_KEY)?;
    let bridge = MockBridgeContract::new(bridge_address, client);

    let to = parse_addr(&args.to)?;
    let metadata = mint_metadata(U256::from(args.amount), U256::from(args.timestamp));

    let call = bridge.mint(to, U256::from(args.token_id), metadata);
    let pending = call
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let tx_hash = pending.tx_hash();
    pending
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    info!("minted {} for {to:#x} in tx {tx_hash:#x}", args.amount);
    Ok(())
}

/// Burn a lock NFT through the mock bridge
pub async fn bridge_burn(
    args: BridgeBurnArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let chain_id = get_chain_id(&client).await?;
    let bridge_address = read_address(deployments_path, chain_id, MOCK_BRIDGE_CONTRACT_KEY)?;
    let bridge = MockBridgeContract::new(bridge_address, client);

    let call = bridge.burn(U256::from(args.token_id));
    let pending = call
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let tx_hash = pending.tx_hash();
    pending
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    info!("burned {} in tx {tx_hash:#x}", args.token_id);
    Ok(())
}

/// Create a market gauge through the gauge factory
pub async fn create_market_gauge(
    args: CreateMarketGaugeArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let chain_id = get_chain_id(&client).await?;
    let token = read_address(deployments_path, chain_id, EMISSIONS_TOKEN_CONTRACT_KEY)?;
    let escrow = read_address(deployments_path, chain_id, VOTE_ESCROW_CONTRACT_KEY)?;
    let voter = read_address(deployments_path, chain_id, VOTER_CONTRACT_KEY)?;
    let factory_address = read_address(deployments_path, chain_id, GAUGE_FACTORY_CONTRACT_KEY)?;

    let flywheel = parse_addr(&args.flywheel)?;
    let lock_token = locked_token(escrow, client.clone()).await?;

    let factory = GaugeFactoryContract::new(factory_address, client);
    let call = factory.create_market_gauge(flywheel, token, escrow, lock_token, voter);
    let pending = call
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let tx_hash = pending.tx_hash();
    pending
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    info!("creating market gauge in tx {tx_hash:#x}");
    Ok(())
}

/// Create a market gauge directly through the voter
pub async fn voter_create_gauge(
    args: VoterCreateGaugeArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let chain_id = get_chain_id(&client).await?;
    let escrow = read_address(deployments_path, chain_id, VOTE_ESCROW_CONTRACT_KEY)?;
    let voter_address = read_address(deployments_path, chain_id, VOTER_CONTRACT_KEY)?;

    let flywheel = parse_addr(&args.flywheel)?;
    let lock_token = locked_token(escrow, client.clone()).await?;

    let voter = VoterContract::new(voter_address, client);
    let call = voter.create_market_gauge(lock_token, flywheel);
    let pending = call
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let tx_hash = pending.tx_hash();
    pending
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    info!("creating market gauge in tx {tx_hash:#x}");
    Ok(())
}

/// Mint emissions to the deployer, refusing to run anywhere but the
/// designated emissions network
pub async fn mint_emissions(
    args: MintEmissionsArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let chain_id = get_chain_id(&client).await?;
    let profile = NetworkProfile::from_chain_id(chain_id)?;
    if !profile.allows_emissions_mint() {
        return Err(ScriptError::WrongNetwork(format!(
            "emissions cannot be minted on {profile}, only on {}",
            NetworkProfile::Arbitrum
        )));
    }

    let deployer = deployer_address(&client)?;
    let amount =
        parse_ether(&args.amount).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;

    let token_address = read_address(deployments_path, chain_id, EMISSIONS_TOKEN_CONTRACT_KEY)?;
    let token = EmissionsTokenContract::new(token_address, client);

    let call = token.mint(deployer, amount);
    let pending = call
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let tx_hash = pending.tx_hash();
    pending
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    info!("minted {} tokens to the deployer in tx {tx_hash:#x}", args.amount);
    Ok(())
}

/// Add, remove, or replace a gauge factory registered on the voter
pub async fn voter_factory(
    args: VoterFactoryArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let chain_id = get_chain_id(&client).await?;
    let voter_address = read_address(deployments_path, chain_id, VOTER_CONTRACT_KEY)?;
    let voter = VoterContract::new(voter_address, client);

    let call = match args.action {
        FactoryAction::Add => {
            let factory = required_factory(&args)?;
            info!("adding factory {factory:#x} to voter {voter_address:#x}");
            voter.add_factory(factory)
        }
        FactoryAction::Remove => {
            let pos = required_pos(&args)?;
            info!("removing the factory at position {pos}");
            voter.remove_factory(U256::from(pos))
        }
        FactoryAction::Replace => {
            let factory = required_factory(&args)?;
            let pos = required_pos(&args)?;
            info!("replacing the factory at position {pos} with {factory:#x}");
            voter.replace_factory(factory, U256::from(pos))
        }
    };

    let pending = call
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let tx_hash = pending.tx_hash();
    pending
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    info!("updated the gauge factories in tx {tx_hash:#x}");
    Ok(())
}

/// The token the escrow locks: the emissions token itself on test networks,
/// an operator-supplied token on production networks
fn resolve_lock_token(
    args: &DeployArgs,
    profile: NetworkProfile,
    token: Address,
) -> Result<Address, ScriptError> {
    if profile.uses_emissions_lock_token() {
        return Ok(token);
    }

    let lock_token = args.lock_token.as_deref().ok_or_else(|| {
        ScriptError::InvalidArguments(format!(
            "--lock-token is required when deploying to {profile}"
        ))
    })?;
    parse_addr(lock_token)
}

/// Grant `bridge` mint rights on the bridge-managed contract at `target`,
/// submitting only if they are not already granted
async fn ensure_bridge(
    target: Address,
    bridge: Address,
    client: Arc<impl Middleware>,
) -> Result<(), ScriptError> {
    let registry = BridgeRegistryContract::new(target, client);
    let enabled = registry
        .is_bridge(bridge)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if enabled {
        info!("{bridge:#x} is already a bridge on {target:#x}");
        return Ok(());
    }

    let call = registry.add_bridge(bridge);
    let pending = call
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let tx_hash = pending.tx_hash();
    pending
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    info!("enabled bridge {bridge:#x} on {target:#x} in tx {tx_hash:#x}");
    Ok(())
}

/// Read the lock token out of the escrow
async fn locked_token(
    escrow: Address,
    client: Arc<impl Middleware>,
) -> Result<Address, ScriptError> {
    VoteEscrowContract::new(escrow, client)
        .locked_token()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
}

/// The factory argument, required by the add and replace actions
fn required_factory(args: &VoterFactoryArgs) -> Result<Address, ScriptError> {
    let factory = args.factory.as_deref().ok_or_else(|| {
        ScriptError::InvalidArguments("--factory is required for this action".to_string())
    })?;
    parse_addr(factory)
}

/// The position argument, required by the remove and replace actions
fn required_pos(args: &VoterFactoryArgs) -> Result<u64, ScriptError> {
    args.pos.ok_or_else(|| {
        ScriptError::InvalidArguments("--pos is required for this action".to_string())
    })
}
