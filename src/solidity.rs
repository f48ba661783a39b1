//! Definitions of the contract methods called during deployment and administration

use ethers::contract::abigen;

/// Initializer methods of the emissions token
pub mod emissions_token {
    use alloy_sol_types::sol;

    sol! {
        function initialize() external;
        function reinitialize() external;
    }
}

/// Initializer methods of the voter roles authority
pub mod roles_authority {
    use alloy_sol_types::sol;

    sol! {
        function initialize(address owner) external;
    }
}

/// Initializer methods of the gauge factory
pub mod gauge_factory {
    use alloy_sol_types::sol;

    sol! {
        function initialize(address rolesAuthority) external;
    }
}

/// Initializer methods of the vote escrow
pub mod vote_escrow {
    use alloy_sol_types::sol;

    sol! {
        function initialize(string name, string symbol, address lockedToken) external;
    }
}

/// Initializer methods of the epoch timer
pub mod epoch_timer {
    use alloy_sol_types::sol;

    sol! {
        function initialize() external;
    }
}

/// Initializer methods of the voter
pub mod voter {
    use alloy_sol_types::sol;

    sol! {
        function initialize(address votingEscrow, address gaugeFactory, address bribeFactory, address epochTimer, address rolesAuthority) external;
        function reinitialize(address votingEscrow) external;
    }
}

abigen!(
    EmissionsTokenContract,
    r#"[
        function mint(address to, uint256 amount) external
    ]"#
);

abigen!(
    VoteEscrowContract,
    r#"[
        function voter() external view returns (address)
        function setVoter(address voter) external
        function lockedToken() external view returns (address)
    ]"#
);

// Shared bridge-whitelist interface of the token and the escrow
abigen!(
    BridgeRegistryContract,
    r#"[
        function isBridge(address bridge) external view returns (bool)
        function addBridge(address bridge) external
    ]"#
);

abigen!(
    GaugeFactoryContract,
    r#"[
        function createMarketGauge(address flywheel, address rewardToken, address votingEscrow, address lockToken, address distribution) external
    ]"#
);

abigen!(
    VoterContract,
    r#"[
        function addFactory(address factory) external
        function removeFactory(uint256 pos) external
        function replaceFactory(address factory, uint256 pos) external
        function createMarketGauge(address lockToken, address flywheel) external
    ]"#
);

abigen!(
    MockBridgeContract,
    r#"[
        function mint(address to, uint256 tokenId, bytes32 metadata) external
        function burn(uint256 tokenId) external
    ]"#
);

abigen!(
    ProxyAdminContract,
    r#"[
        function upgradeAndCall(address proxy, address implementation, bytes memory data) external
    ]"#
);

#[cfg(test)]
#[allow(clippy::missing_docs_in_private_items)]
mod tests {
    use alloy_primitives::Address;
    use alloy_sol_types::SolCall;
    use ethers::utils::keccak256;

    use super::{emissions_token, epoch_timer, gauge_factory, roles_authority, vote_escrow, voter};

    fn selector(signature: &str) -> [u8; 4] {
        let hash = keccak256(signature.as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    #[test]
    fn initializer_selectors_match_their_signatures() {
        assert_eq!(
            emissions_token::initializeCall::SELECTOR,
            selector("initialize()")
        );
        assert_eq!(
            emissions_token::reinitializeCall::SELECTOR,
            selector("reinitialize()")
        );
        assert_eq!(
            roles_authority::initializeCall::SELECTOR,
            selector("initialize(address)")
        );
        assert_eq!(
            gauge_factory::initializeCall::SELECTOR,
            selector("initialize(address)")
        );
        assert_eq!(
            vote_escrow::initializeCall::SELECTOR,
            selector("initialize(string,string,address)")
        );
        assert_eq!(
            epoch_timer::initializeCall::SELECTOR,
            selector("initialize()")
        );
        assert_eq!(
            voter::initializeCall::SELECTOR,
            selector("initialize(address,address,address,address,address)")
        );
        assert_eq!(
            voter::reinitializeCall::SELECTOR,
            selector("reinitialize(address)")
        );
    }

    #[test]
    fn initializer_calldata_starts_with_the_selector() {
        let calldata = roles_authority::initializeCall {
            owner: Address::ZERO,
        }
        .abi_encode();

        assert_eq!(calldata.len(), 4 + 32);
        assert_eq!(calldata[..4], selector("initialize(address)"));
    }

    #[test]
    fn no_arg_initializer_calldata_is_just_the_selector() {
        let calldata = epoch_timer::initializeCall {}.abi_encode();

        assert_eq!(calldata, selector("initialize()"));
    }
}
