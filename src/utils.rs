//! Utilities shared by the deploy and task scripts

use std::{fs, path::Path, str::FromStr, sync::Arc};

use alloy_primitives::Address as AlloyAddress;
use ethers::{
    abi::{self, Address, Contract, Token, Tokenize},
    contract::ContractFactory,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Bytes, H256, U256},
    utils::keccak256,
};
use tracing::info;

use crate::{
    constants::{
        ARTIFACT_ABI_KEY, ARTIFACT_BYTECODE_KEY, NUM_BYTES_ADDRESS, NUM_BYTES_STORAGE_SLOT,
        NUM_DEPLOY_CONFIRMATIONS, PROXY_ADMIN_STORAGE_SLOT, PROXY_ARTIFACT,
    },
    deployments::{plan_action, read_record, write_record, DeployAction, DeploymentRecord},
    errors::ScriptError,
    solidity::ProxyAdminContract,
};

/// A compiled contract artifact, as produced by the contracts build
pub struct ContractArtifact {
    /// The parsed contract ABI
    pub abi: Contract,
    /// The creation bytecode
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// The hex-encoded keccak hash of the creation bytecode, used to detect
    /// implementation changes across runs
    pub fn code_hash(&self) -> String {
        format!("0x{}", hex::encode(keccak256(&self.bytecode)))
    }
}

/// Context shared by every deployment step of a single sequencer run
pub struct DeployContext<'a> {
    /// The chain id of the connected network
    pub chain_id: u64,
    /// The path of the deployments file
    pub deployments_path: &'a str,
    /// The directory holding the compiled contract artifacts
    pub artifacts_dir: &'a str,
}

/// Set up the client with which to deploy and call contracts, signing with
/// the given private key against the given RPC endpoint
pub async fn setup_client(
    priv_key: &str,
    rpc_url: &str,
) -> Result<Arc<impl Middleware>, ScriptError> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let wallet = LocalWallet::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .as_u64();
    let client = Arc::new(SignerMiddleware::new(provider, wallet.with_chain_id(chain_id)));

    Ok(client)
}

/// The chain id reported by the connected network
pub async fn get_chain_id(client: &Arc<impl Middleware>) -> Result<u64, ScriptError> {
    Ok(client
        .get_chainid()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .as_u64())
}

/// The address of the signer attached to the client
pub fn deployer_address(client: &Arc<impl Middleware>) -> Result<Address, ScriptError> {
    client
        .default_sender()
        .ok_or_else(|| {
            ScriptError::ClientInitialization("client does not have sender attached".to_string())
        })
}

/// Load a named contract artifact from the artifacts directory
pub fn load_artifact(artifacts_dir: &str, name: &str) -> Result<ContractArtifact, ScriptError> {
    let path = Path::new(artifacts_dir).join(format!("{name}.json"));
    let contents = fs::read_to_string(&path)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))?;

    parse_artifact(&contents)
}

/// Parse a contract artifact out of its JSON encoding
pub fn parse_artifact(contents: &str) -> Result<ContractArtifact, ScriptError> {
    let parsed: serde_json::Value =
        serde_json::from_str(contents).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let abi: Contract = serde_json::from_value(parsed[ARTIFACT_ABI_KEY].clone())
        .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let bytecode_hex = parsed[ARTIFACT_BYTECODE_KEY]
        .as_str()
        .ok_or_else(|| ScriptError::ArtifactParsing("artifact has no bytecode".to_string()))?;
    let bytecode = Bytes::from(
        hex::decode(bytecode_hex.trim_start_matches("0x"))
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?,
    );

    Ok(ContractArtifact { abi, bytecode })
}

/// Parse a user-supplied hex address argument
pub fn parse_addr(addr: &str) -> Result<Address, ScriptError> {
    Address::from_str(addr).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

/// Convert an address into its alloy representation for calldata encoding
pub fn alloy_address(address: Address) -> AlloyAddress {
    AlloyAddress::from_slice(address.as_bytes())
}

/// The metadata digest a bridge mint commits to: the keccak hash of the
/// ABI-encoded locked amount and unlock timestamp
pub fn mint_metadata(amount: U256, timestamp: U256) -> [u8; 32] {
    keccak256(abi::encode(&[Token::Uint(amount), Token::Uint(timestamp)]))
}

/// Deploy a contract behind a transparent upgradeable proxy, or reuse or
/// upgrade the deployment already recorded for this network.
///
/// A fresh deploy runs `init_calldata` through the proxy constructor; an
/// upgrade of an existing proxy runs `reinit_calldata` instead, never the
/// original initializer.
pub async fn deploy_upgradeable(
    ctx: &DeployContext<'_>,
    contract_key: &str,
    artifact_name: &str,
    init_calldata: Vec<u8>,
    reinit_calldata: Option<Vec<u8>>,
    client: Arc<impl Middleware>,
) -> Result<Address, ScriptError> {
    let artifact = load_artifact(ctx.artifacts_dir, artifact_name)?;
    let code_hash = artifact.code_hash();
    let existing = read_record(ctx.deployments_path, ctx.chain_id, contract_key)?;

    match plan_action(existing, &code_hash) {
        DeployAction::Reuse(record) => {
            info!("reusing {artifact_name} at {:#x}", record.address);
            Ok(record.address)
        }
        DeployAction::Fresh => {
            let implementation = deploy_implementation(&artifact, client.clone()).await?;

            let owner = deployer_address(&client)?;
            let proxy_artifact = load_artifact(ctx.artifacts_dir, PROXY_ARTIFACT)?;
            let proxy_factory = ContractFactory::new(
                proxy_artifact.abi.clone(),
                proxy_artifact.bytecode.clone(),
                client.clone(),
            );

            let proxy = proxy_factory
                .deploy((implementation, owner, Bytes::from(init_calldata)))
                .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
                .confirmations(NUM_DEPLOY_CONFIRMATIONS)
                .send()
                .await
                .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
            let proxy_address = proxy.address();

            let proxy_admin = proxy_admin_address(proxy_address, &client).await?;

            let record = DeploymentRecord {
                address: proxy_address,
                implementation: Some(implementation),
                proxy_admin: Some(proxy_admin),
                code_hash,
            };
            write_record(ctx.deployments_path, ctx.chain_id, contract_key, &record)?;

            info!("{artifact_name} deployed at {proxy_address:#x}");
            info!("{artifact_name} proxy admin deployed at {proxy_admin:#x}");
            Ok(proxy_address)
        }
        DeployAction::Upgrade(record) => {
            let implementation = deploy_implementation(&artifact, client.clone()).await?;

            let proxy_admin = record.proxy_admin.ok_or_else(|| {
                ScriptError::ContractInteraction(format!(
                    "no proxy admin recorded for {contract_key}"
                ))
            })?;
            let admin = ProxyAdminContract::new(proxy_admin, client.clone());
            let data = Bytes::from(reinit_calldata.unwrap_or_default());

            let call = admin.upgrade_and_call(record.address, implementation, data);
            let pending = call
                .send()
                .await
                .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
            let tx_hash = pending.tx_hash();
            pending
                .await
                .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

            let updated = DeploymentRecord {
                address: record.address,
                implementation: Some(implementation),
                proxy_admin: Some(proxy_admin),
                code_hash,
            };
            write_record(ctx.deployments_path, ctx.chain_id, contract_key, &updated)?;

            info!("{artifact_name} upgraded to {implementation:#x} in tx {tx_hash:#x}");
            Ok(record.address)
        }
    }
}

/// Deploy a contract without a proxy, reusing any deployment already recorded
/// for this network regardless of its code
pub async fn deploy_once<T: Tokenize>(
    ctx: &DeployContext<'_>,
    contract_key: &str,
    artifact_name: &str,
    constructor_args: T,
    client: Arc<impl Middleware>,
) -> Result<Address, ScriptError> {
    if let Some(record) = read_record(ctx.deployments_path, ctx.chain_id, contract_key)? {
        info!("reusing {artifact_name} at {:#x}", record.address);
        return Ok(record.address);
    }

    let artifact = load_artifact(ctx.artifacts_dir, artifact_name)?;
    let factory = ContractFactory::new(
        artifact.abi.clone(),
        artifact.bytecode.clone(),
        client.clone(),
    );

    let contract = factory
        .deploy(constructor_args)
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
        .confirmations(NUM_DEPLOY_CONFIRMATIONS)
        .send()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
    let address = contract.address();

    let record = DeploymentRecord {
        address,
        implementation: None,
        proxy_admin: None,
        code_hash: artifact.code_hash(),
    };
    write_record(ctx.deployments_path, ctx.chain_id, contract_key, &record)?;

    info!("{artifact_name} deployed at {address:#x}");
    Ok(address)
}

/// Deploy a bare implementation contract from its artifact, waiting for the
/// configured confirmations
async fn deploy_implementation(
    artifact: &ContractArtifact,
    client: Arc<impl Middleware>,
) -> Result<Address, ScriptError> {
    let factory = ContractFactory::new(artifact.abi.clone(), artifact.bytecode.clone(), client);

    let contract = factory
        .deploy(())
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
        .confirmations(NUM_DEPLOY_CONFIRMATIONS)
        .send()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    Ok(contract.address())
}

/// Resolve the admin contract of an upgradeable proxy.
///
/// This is the recommended way to get the proxy admin address:
/// https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v5.0.0/contracts/proxy/ERC1967/ERC1967Utils.sol#L104-L106
async fn proxy_admin_address(
    proxy_address: Address,
    client: &Arc<impl Middleware>,
) -> Result<Address, ScriptError> {
    Ok(Address::from_slice(
        &client
            .get_storage_at(
                proxy_address,
                // Can `unwrap` here since we know the storage slot constitutes a valid H256
                H256::from_str(PROXY_ADMIN_STORAGE_SLOT).unwrap(),
                None, /* block */
            )
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            [NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..NUM_BYTES_STORAGE_SLOT],
    ))
}

#[cfg(test)]
#[allow(clippy::missing_docs_in_private_items)]
mod tests {
    use ethers::{
        types::U256,
        utils::{keccak256, parse_ether},
    };

    use super::{alloy_address, mint_metadata, parse_addr, parse_artifact};

    const TEST_ARTIFACT: &str = r#"{
        "contractName": "EmissionsToken",
        "abi": [
            {
                "inputs": [],
                "name": "initialize",
                "outputs": [],
                "stateMutability": "nonpayable",
                "type": "function"
            }
        ],
        "bytecode": "0x6080604052"
    }"#;

    #[test]
    fn artifacts_parse_their_abi_and_bytecode() {
        let artifact = parse_artifact(TEST_ARTIFACT).unwrap();

        assert!(artifact.abi.function("initialize").is_ok());
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn code_hash_commits_to_the_bytecode() {
        let artifact = parse_artifact(TEST_ARTIFACT).unwrap();
        let expected = format!(
            "0x{}",
            hex::encode(keccak256([0x60u8, 0x80, 0x60, 0x40, 0x52]))
        );

        assert_eq!(artifact.code_hash(), expected);
    }

    #[test]
    fn artifacts_without_bytecode_are_rejected() {
        assert!(parse_artifact(r#"{"abi": []}"#).is_err());
    }

    #[test]
    fn malformed_artifacts_are_rejected() {
        assert!(parse_artifact("not json").is_err());
        assert!(parse_artifact(r#"{"abi": [], "bytecode": "0xzz"}"#).is_err());
    }

    #[test]
    fn mint_metadata_is_the_hash_of_the_abi_encoding() {
        let amount = U256::from(1000u64);
        let timestamp = U256::from(1_700_000_000u64);

        // The encoding is two 32-byte big-endian words
        let mut words = [0u8; 64];
        amount.to_big_endian(&mut words[..32]);
        timestamp.to_big_endian(&mut words[32..]);

        assert_eq!(mint_metadata(amount, timestamp), keccak256(words));
    }

    #[test]
    fn mint_metadata_distinguishes_the_argument_positions() {
        let a = U256::from(1u64);
        let b = U256::from(2u64);

        assert_ne!(mint_metadata(a, b), mint_metadata(b, a));
    }

    #[test]
    fn emission_amounts_parse_to_wei() {
        assert_eq!(
            parse_ether("1.5").unwrap(),
            U256::from(1_500_000_000_000_000_000u64)
        );
    }

    #[test]
    fn addresses_parse_from_hex() {
        let addr = parse_addr("0x000000000000000000000000000000000000dEaD").unwrap();

        assert_eq!(addr.as_bytes()[18..], [0xde, 0xad]);
        assert!(parse_addr("not an address").is_err());
    }

    #[test]
    fn alloy_addresses_preserve_the_bytes() {
        let addr = parse_addr("0x000000000000000000000000000000000000dEaD").unwrap();

        assert_eq!(alloy_address(addr).as_slice(), addr.as_bytes());
    }
}
