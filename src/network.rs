//! Typed profiles of the networks the scripts can target

use std::fmt::{self, Display, Formatter};

use crate::{
    constants::{
        ARBITRUM_CHAIN_ID, ARBITRUM_GOERLI_CHAIN_ID, CHAPEL_CHAIN_ID, DEVNET_CHAIN_ID,
        MUMBAI_CHAIN_ID, POLYGON_CHAIN_ID,
    },
    errors::ScriptError,
};

/// A supported target network, along with the deployment policies attached to it
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NetworkProfile {
    /// The local development network
    Devnet,
    /// The BSC testnet
    Chapel,
    /// The Polygon testnet
    Mumbai,
    /// The Arbitrum testnet
    ArbitrumGoerli,
    /// Arbitrum One
    Arbitrum,
    /// Polygon mainnet
    Polygon,
}

impl NetworkProfile {
    /// Resolve the profile for the given chain id, erroring on networks the
    /// scripts were never configured for
    pub fn from_chain_id(chain_id: u64) -> Result<Self, ScriptError> {
        match chain_id {
            DEVNET_CHAIN_ID => Ok(NetworkProfile::Devnet),
            CHAPEL_CHAIN_ID => Ok(NetworkProfile::Chapel),
            MUMBAI_CHAIN_ID => Ok(NetworkProfile::Mumbai),
            ARBITRUM_GOERLI_CHAIN_ID => Ok(NetworkProfile::ArbitrumGoerli),
            ARBITRUM_CHAIN_ID => Ok(NetworkProfile::Arbitrum),
            POLYGON_CHAIN_ID => Ok(NetworkProfile::Polygon),
            _ => Err(ScriptError::UnsupportedNetwork(chain_id)),
        }
    }

    /// The chain id of the network
    pub fn chain_id(&self) -> u64 {
        match self {
            NetworkProfile::Devnet => DEVNET_CHAIN_ID,
            NetworkProfile::Chapel => CHAPEL_CHAIN_ID,
            NetworkProfile::Mumbai => MUMBAI_CHAIN_ID,
            NetworkProfile::ArbitrumGoerli => ARBITRUM_GOERLI_CHAIN_ID,
            NetworkProfile::Arbitrum => ARBITRUM_CHAIN_ID,
            NetworkProfile::Polygon => POLYGON_CHAIN_ID,
        }
    }

    /// Whether the network holds real value
    pub fn is_production(&self) -> bool {
        matches!(self, NetworkProfile::Arbitrum | NetworkProfile::Polygon)
    }

    /// Whether the mock bridge is deployed and granted mint rights on this network
    pub fn supports_mock_bridge(&self) -> bool {
        matches!(
            self,
            NetworkProfile::Devnet
                | NetworkProfile::Chapel
                | NetworkProfile::Mumbai
                | NetworkProfile::ArbitrumGoerli
        )
    }

    /// Whether the escrow locks the emissions token itself rather than an
    /// operator-supplied lock token
    pub fn uses_emissions_lock_token(&self) -> bool {
        self.supports_mock_bridge()
    }

    /// Whether emissions may be minted on this network
    pub fn allows_emissions_mint(&self) -> bool {
        matches!(self, NetworkProfile::Arbitrum)
    }

    /// Whether the deployer is granted mint rights on the token during deployment
    pub fn deployer_is_minter(&self) -> bool {
        matches!(self, NetworkProfile::Arbitrum)
    }
}

impl Display for NetworkProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NetworkProfile::Devnet => write!(f, "devnet"),
            NetworkProfile::Chapel => write!(f, "chapel"),
            NetworkProfile::Mumbai => write!(f, "mumbai"),
            NetworkProfile::ArbitrumGoerli => write!(f, "arbitrum-goerli"),
            NetworkProfile::Arbitrum => write!(f, "arbitrum"),
            NetworkProfile::Polygon => write!(f, "polygon"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_docs_in_private_items)]
mod tests {
    use super::NetworkProfile;

    const PROFILES: [NetworkProfile; 6] = [
        NetworkProfile::Devnet,
        NetworkProfile::Chapel,
        NetworkProfile::Mumbai,
        NetworkProfile::ArbitrumGoerli,
        NetworkProfile::Arbitrum,
        NetworkProfile::Polygon,
    ];

    #[test]
    fn chain_ids_round_trip() {
        for profile in PROFILES {
            assert_eq!(
                NetworkProfile::from_chain_id(profile.chain_id()).unwrap(),
                profile
            );
        }
    }

    #[test]
    fn unknown_chain_ids_are_rejected() {
        for chain_id in [0, 1, 5, 56, 10, 8453] {
            assert!(NetworkProfile::from_chain_id(chain_id).is_err());
        }
    }

    #[test]
    fn mock_bridge_networks_are_exactly_the_non_production_networks() {
        for profile in PROFILES {
            assert_eq!(profile.supports_mock_bridge(), !profile.is_production());
        }
    }

    #[test]
    fn test_networks_lock_the_emissions_token() {
        for profile in PROFILES {
            assert_eq!(profile.uses_emissions_lock_token(), !profile.is_production());
        }
    }

    #[test]
    fn emissions_minting_is_restricted_to_arbitrum() {
        for profile in PROFILES {
            assert_eq!(
                profile.allows_emissions_mint(),
                profile == NetworkProfile::Arbitrum
            );
            assert_eq!(
                profile.deployer_is_minter(),
                profile == NetworkProfile::Arbitrum
            );
        }
    }
}
