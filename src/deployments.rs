//! Persistence of deployed contract addresses, keyed by network and contract.
//!
//! The deployments file is the source of truth for idempotent re-runs: a
//! contract with a record whose code hash matches the artifact is never
//! redeployed, and a record with a stale code hash is upgraded in place.

use std::{fs, path::Path, str::FromStr};

use ethers::abi::Address;
use json::JsonValue;

use crate::{
    constants::{ADDRESS_KEY, CODE_HASH_KEY, IMPLEMENTATION_KEY, PROXY_ADMIN_KEY},
    errors::ScriptError,
};

/// A persisted record of a single contract deployment on one network
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentRecord {
    /// The canonical address of the deployment, i.e. the proxy address for
    /// proxied contracts
    pub address: Address,
    /// The implementation behind the proxy, absent for unproxied deployments
    pub implementation: Option<Address>,
    /// The admin contract managing the proxy, absent for unproxied deployments
    pub proxy_admin: Option<Address>,
    /// The hex-encoded keccak hash of the creation bytecode that was deployed
    pub code_hash: String,
}

impl DeploymentRecord {
    /// Serialize the record into the shape stored in the deployments file
    fn to_json(&self) -> JsonValue {
        let mut record = JsonValue::new_object();
        record[ADDRESS_KEY] = JsonValue::String(format!("{:#x}", self.address));
        if let Some(implementation) = self.implementation {
            record[IMPLEMENTATION_KEY] = JsonValue::String(format!("{implementation:#x}"));
        }
        if let Some(proxy_admin) = self.proxy_admin {
            record[PROXY_ADMIN_KEY] = JsonValue::String(format!("{proxy_admin:#x}"));
        }
        record[CODE_HASH_KEY] = JsonValue::String(self.code_hash.clone());
        record
    }

    /// Parse a record from its stored shape
    fn from_json(value: &JsonValue) -> Result<Self, ScriptError> {
        let address = parse_address_field(value, ADDRESS_KEY)?.ok_or_else(|| {
            ScriptError::ReadDeployments("deployment record has no address".to_string())
        })?;
        let implementation = parse_address_field(value, IMPLEMENTATION_KEY)?;
        let proxy_admin = parse_address_field(value, PROXY_ADMIN_KEY)?;
        let code_hash = value[CODE_HASH_KEY]
            .as_str()
            .ok_or_else(|| {
                ScriptError::ReadDeployments("deployment record has no code hash".to_string())
            })?
            .to_string();

        Ok(DeploymentRecord {
            address,
            implementation,
            proxy_admin,
            code_hash,
        })
    }
}

/// The action the sequencer takes for one contract, decided from its
/// deployment record and the code hash of the artifact about to be deployed
pub enum DeployAction {
    /// No record exists, deploy the proxy and implementation from scratch
    Fresh,
    /// The recorded deployment already runs this code, submit nothing
    Reuse(DeploymentRecord),
    /// The recorded proxy exists but the implementation code changed,
    /// deploy the new implementation and point the proxy at it
    Upgrade(DeploymentRecord),
}

/// Decide the deployment action for a contract from its existing record and
/// the code hash of the artifact to deploy
pub fn plan_action(existing: Option<DeploymentRecord>, code_hash: &str) -> DeployAction {
    match existing {
        None => DeployAction::Fresh,
        Some(record) if record.code_hash == code_hash => DeployAction::Reuse(record),
        Some(record) => DeployAction::Upgrade(record),
    }
}

/// Read the record for the given contract on the given network, if any.
///
/// A missing file or missing entry is not an error, it simply means nothing
/// has been deployed yet.
pub fn read_record(
    file_path: &str,
    chain_id: u64,
    contract_key: &str,
) -> Result<Option<DeploymentRecord>, ScriptError> {
    if !Path::new(file_path).exists() {
        return Ok(None);
    }

    let parsed = read_deployments(file_path)?;
    let entry = &parsed[chain_id.to_string().as_str()][contract_key];
    if entry.is_null() {
        return Ok(None);
    }

    DeploymentRecord::from_json(entry).map(Some)
}

/// Write the record for the given contract on the given network, creating the
/// deployments file on first use and preserving all other entries
pub fn write_record(
    file_path: &str,
    chain_id: u64,
    contract_key: &str,
    record: &DeploymentRecord,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !Path::new(file_path).exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    }
    let mut parsed = read_deployments(file_path)?;

    parsed[chain_id.to_string().as_str()][contract_key] = record.to_json();

    fs::write(file_path, json::stringify_pretty(parsed, 4))
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

    Ok(())
}

/// Read the address of a contract the tasks expect to already be deployed on
/// the given network
pub fn read_address(
    file_path: &str,
    chain_id: u64,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    read_record(file_path, chain_id, contract_key)?
        .map(|record| record.address)
        .ok_or_else(|| {
            ScriptError::MissingDeployment(format!(
                "{contract_key} has no deployment recorded for chain {chain_id}"
            ))
        })
}

/// Parse the whole deployments file
fn read_deployments(file_path: &str) -> Result<JsonValue, ScriptError> {
    let contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

    json::parse(&contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Parse an optional address field out of a stored record
fn parse_address_field(value: &JsonValue, key: &str) -> Result<Option<Address>, ScriptError> {
    match value[key].as_str() {
        None => Ok(None),
        Some(addr) => Address::from_str(addr)
            .map(Some)
            .map_err(|e| ScriptError::ReadDeployments(e.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::missing_docs_in_private_items)]
mod tests {
    use ethers::abi::Address;
    use tempfile::TempDir;

    use super::{plan_action, read_address, read_record, write_record, DeployAction, DeploymentRecord};

    fn record(seed: u64) -> DeploymentRecord {
        DeploymentRecord {
            address: Address::from_low_u64_be(seed),
            implementation: Some(Address::from_low_u64_be(seed + 1)),
            proxy_admin: Some(Address::from_low_u64_be(seed + 2)),
            code_hash: format!("0x{seed:064x}"),
        }
    }

    fn deployments_file(dir: &TempDir) -> String {
        dir.path()
            .join("deployments.json")
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn missing_file_reads_as_no_record() {
        let dir = TempDir::new().unwrap();
        let path = deployments_file(&dir);

        assert_eq!(read_record(&path, 97, "voter_contract").unwrap(), None);
    }

    #[test]
    fn records_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = deployments_file(&dir);
        let written = record(1);

        write_record(&path, 97, "voter_contract", &written).unwrap();

        assert_eq!(
            read_record(&path, 97, "voter_contract").unwrap(),
            Some(written)
        );
    }

    #[test]
    fn unproxied_records_omit_the_proxy_fields() {
        let dir = TempDir::new().unwrap();
        let path = deployments_file(&dir);
        let written = DeploymentRecord {
            implementation: None,
            proxy_admin: None,
            ..record(1)
        };

        write_record(&path, 97, "mock_bridge_contract", &written).unwrap();

        assert_eq!(
            read_record(&path, 97, "mock_bridge_contract").unwrap(),
            Some(written)
        );
    }

    #[test]
    fn networks_do_not_share_records() {
        let dir = TempDir::new().unwrap();
        let path = deployments_file(&dir);

        write_record(&path, 97, "voter_contract", &record(1)).unwrap();

        assert_eq!(read_record(&path, 137, "voter_contract").unwrap(), None);

        write_record(&path, 137, "voter_contract", &record(2)).unwrap();

        assert_eq!(
            read_record(&path, 97, "voter_contract").unwrap(),
            Some(record(1))
        );
        assert_eq!(
            read_record(&path, 137, "voter_contract").unwrap(),
            Some(record(2))
        );
    }

    #[test]
    fn rewriting_a_record_preserves_the_others() {
        let dir = TempDir::new().unwrap();
        let path = deployments_file(&dir);

        write_record(&path, 97, "voter_contract", &record(1)).unwrap();
        write_record(&path, 97, "vote_escrow_contract", &record(2)).unwrap();
        write_record(&path, 97, "voter_contract", &record(3)).unwrap();

        assert_eq!(
            read_record(&path, 97, "voter_contract").unwrap(),
            Some(record(3))
        );
        assert_eq!(
            read_record(&path, 97, "vote_escrow_contract").unwrap(),
            Some(record(2))
        );
    }

    #[test]
    fn read_address_requires_a_recorded_deployment() {
        let dir = TempDir::new().unwrap();
        let path = deployments_file(&dir);

        assert!(read_address(&path, 97, "voter_contract").is_err());

        write_record(&path, 97, "voter_contract", &record(1)).unwrap();

        assert_eq!(
            read_address(&path, 97, "voter_contract").unwrap(),
            record(1).address
        );
    }

    #[test]
    fn fresh_deploy_without_a_record() {
        assert!(matches!(plan_action(None, "0x01"), DeployAction::Fresh));
    }

    #[test]
    fn matching_code_hash_is_reused() {
        let existing = record(1);
        let code_hash = existing.code_hash.clone();

        assert!(matches!(
            plan_action(Some(existing), &code_hash),
            DeployAction::Reuse(_)
        ));
    }

    #[test]
    fn changed_code_hash_is_upgraded() {
        let existing = record(1);

        assert!(matches!(
            plan_action(Some(existing), "0xdeadbeef"),
            DeployAction::Upgrade(_)
        ));
    }
}
