//! Constants used in the deploy and task scripts

/// The number of confirmations to wait for on each deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: usize = 1;

/// The storage slot containing the proxy admin contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: &str =
    "0xb53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103";

/// The number of bytes stored in a single storage slot
pub const NUM_BYTES_STORAGE_SLOT: usize = 32;

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default directory holding the compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The chain id of the local development network
pub const DEVNET_CHAIN_ID: u64 = 1337;

/// The chain id of the BSC testnet
pub const CHAPEL_CHAIN_ID: u64 = 97;

/// The chain id of the Polygon testnet
pub const MUMBAI_CHAIN_ID: u64 = 80001;

/// The chain id of the Arbitrum testnet
pub const ARBITRUM_GOERLI_CHAIN_ID: u64 = 421613;

/// The chain id of Arbitrum One
pub const ARBITRUM_CHAIN_ID: u64 = 42161;

/// The chain id of Polygon mainnet
pub const POLYGON_CHAIN_ID: u64 = 137;

/// The key under which an artifact stores its ABI
pub const ARTIFACT_ABI_KEY: &str = "abi";

/// The key under which an artifact stores its creation bytecode
pub const ARTIFACT_BYTECODE_KEY: &str = "bytecode";

/// The address key in a deployment record
pub const ADDRESS_KEY: &str = "address";

/// The implementation address key in a deployment record
pub const IMPLEMENTATION_KEY: &str = "implementation";

/// The proxy admin address key in a deployment record
pub const PROXY_ADMIN_KEY: &str = "proxy_admin";

/// The creation code hash key in a deployment record
pub const CODE_HASH_KEY: &str = "code_hash";

/// The artifact name of the transparent upgradeable proxy
pub const PROXY_ARTIFACT: &str = "TransparentUpgradeableProxy";

/// The artifact name of the emissions token
pub const EMISSIONS_TOKEN_ARTIFACT: &str = "EmissionsToken";

/// The emissions token key in the deployments file
pub const EMISSIONS_TOKEN_CONTRACT_KEY: &str = "emissions_token_contract";

/// The artifact name of the voter roles authority
pub const ROLES_AUTHORITY_ARTIFACT: &str = "VoterRolesAuthority";

/// The voter roles authority key in the deployments file
pub const ROLES_AUTHORITY_CONTRACT_KEY: &str = "roles_authority_contract";

/// The artifact name of the gauge factory
pub const GAUGE_FACTORY_ARTIFACT: &str = "GaugeFactory";

/// The gauge factory key in the deployments file
pub const GAUGE_FACTORY_CONTRACT_KEY: &str = "gauge_factory_contract";

/// The artifact name of the vote escrow
pub const VOTE_ESCROW_ARTIFACT: &str = "VoteEscrow";

/// The vote escrow key in the deployments file
pub const VOTE_ESCROW_CONTRACT_KEY: &str = "vote_escrow_contract";

/// The artifact name of the epoch timer
pub const EPOCH_TIMER_ARTIFACT: &str = "EpochTimer";

/// The epoch timer key in the deployments file
pub const EPOCH_TIMER_CONTRACT_KEY: &str = "epoch_timer_contract";

/// The artifact name of the voter
pub const VOTER_ARTIFACT: &str = "Voter";

/// The voter key in the deployments file
pub const VOTER_CONTRACT_KEY: &str = "voter_contract";

/// The artifact name of the mock bridge
pub const MOCK_BRIDGE_ARTIFACT: &str = "MockBridge";

/// The mock bridge key in the deployments file
pub const MOCK_BRIDGE_CONTRACT_KEY: &str = "mock_bridge_contract";

/// The ERC-721 name of the vote escrow lock
pub const VOTE_ESCROW_NAME: &str = "Vote Escrow";

/// The ERC-721 symbol of the vote escrow lock
pub const VOTE_ESCROW_SYMBOL: &str = "veEMIT";
