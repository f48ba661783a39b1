//! Parsing tests for the script CLI

use clap::{CommandFactory, Parser};
use ve_scripts::cli::{Cli, Command, FactoryAction};

/// The arguments every invocation carries
const BASE_ARGS: [&str; 5] = [
    "ve-scripts",
    "--priv-key",
    "0xkey",
    "--rpc-url",
    "http://localhost:8545",
];

/// Parse a command line made of the base arguments plus `extra`
fn parse(extra: &[&str]) -> Cli {
    try_parse(extra).unwrap()
}

/// Try to parse a command line made of the base arguments plus `extra`
fn try_parse(extra: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(BASE_ARGS.iter().copied().chain(extra.iter().copied()))
}

#[test]
fn cli_is_well_formed() {
    Cli::command().debug_assert();
}

#[test]
fn deploy_parses_with_default_paths() {
    let cli = parse(&["deploy"]);

    assert_eq!(cli.priv_key, "0xkey");
    assert_eq!(cli.rpc_url, "http://localhost:8545");
    assert_eq!(cli.deployments_path, "deployments.json");
    assert_eq!(cli.artifacts_dir, "artifacts");
    assert!(matches!(cli.command, Command::Deploy(_)));
}

#[test]
fn deploy_accepts_a_lock_token() {
    let cli = parse(&["deploy", "--lock-token", "0x00000000000000000000000000000000000000aa"]);

    match cli.command {
        Command::Deploy(args) => assert_eq!(
            args.lock_token.as_deref(),
            Some("0x00000000000000000000000000000000000000aa")
        ),
        _ => unreachable!(),
    }
}

#[test]
fn bridge_mint_parses_its_typed_parameters() {
    let cli = parse(&[
        "bridge-mint",
        "--to",
        "0x00000000000000000000000000000000000000aa",
        "--token-id",
        "7",
        "--amount",
        "1000",
        "--timestamp",
        "1700000000",
    ]);

    match cli.command {
        Command::BridgeMint(args) => {
            assert_eq!(args.token_id, 7);
            assert_eq!(args.amount, 1000);
            assert_eq!(args.timestamp, 1_700_000_000);
        }
        _ => unreachable!(),
    }
}

#[test]
fn bridge_mint_rejects_non_numeric_parameters() {
    assert!(try_parse(&[
        "bridge-mint",
        "--to",
        "0x00000000000000000000000000000000000000aa",
        "--token-id",
        "seven",
        "--amount",
        "1000",
        "--timestamp",
        "1700000000",
    ])
    .is_err());
}

#[test]
fn mint_emissions_takes_a_decimal_amount() {
    let cli = parse(&["mint-emissions", "--amount", "1.5"]);

    match cli.command {
        Command::MintEmissions(args) => assert_eq!(args.amount, "1.5"),
        _ => unreachable!(),
    }
}

#[test]
fn voter_factory_parses_the_action_enum() {
    let cli = parse(&[
        "voter-factory",
        "--action",
        "add",
        "--factory",
        "0x00000000000000000000000000000000000000aa",
    ]);

    match cli.command {
        Command::VoterFactory(args) => {
            assert!(matches!(args.action, FactoryAction::Add));
            assert!(args.factory.is_some());
            assert_eq!(args.pos, None);
        }
        _ => unreachable!(),
    }
}

#[test]
fn voter_factory_rejects_unknown_actions() {
    assert!(try_parse(&["voter-factory", "--action", "drop"]).is_err());
}

#[test]
fn voter_factory_requires_an_action() {
    assert!(try_parse(&["voter-factory"]).is_err());
}
