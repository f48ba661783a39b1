//! Definitions of errors that can occur during the execution of the contract management scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the contract management scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
    /// Error parsing a compiled contract artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// The connected network is not a supported deployment target
    UnsupportedNetwork(u64),
    /// The task cannot be run against the connected network
    WrongNetwork(String),
    /// A contract the task targets has no recorded deployment
    MissingDeployment(String),
    /// A task argument is missing or malformed
    InvalidArguments(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::UnsupportedNetwork(id) => {
                write!(f, "unsupported network with chain id {}", id)
            }
            ScriptError::WrongNetwork(s) => write!(f, "wrong network: {}", s),
            ScriptError::MissingDeployment(s) => write!(f, "missing deployment: {}", s),
            ScriptError::InvalidArguments(s) => write!(f, "invalid arguments: {}", s),
        }
    }
}

impl Error for ScriptError {}
