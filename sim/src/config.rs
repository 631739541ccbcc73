//! Scenario configuration

use anyhow::{Context, Result};
use cpamm_common::SwapDirection;
use pinocchio::pubkey::Pubkey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("invalid identity '{0}': expected a base58 key or a 1-32 byte name")]
    InvalidIdentity(String),

    #[error("pool {seed} setup failed: {source}")]
    Setup {
        seed: u64,
        source: crate::ledger::LedgerError,
    },

    #[error("pool {seed} report failed: {error}")]
    Report {
        seed: u64,
        error: cpamm_common::AmmError,
    },

    #[error("funding {owner} with {mint} failed: {source}")]
    Funding {
        owner: String,
        mint: String,
        source: crate::ledger::LedgerError,
    },
}

/// A scenario: pools to create, balances to fund, operations to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub pools: Vec<PoolSpec>,

    #[serde(default)]
    pub funding: Vec<Funding>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSpec {
    pub seed: u64,

    /// Swap fee in basis points
    pub fee_bps: u16,

    /// Lock/unlock authority; pools without one can never be locked
    #[serde(default)]
    pub authority: Option<String>,

    pub mint_x: String,
    pub mint_y: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funding {
    pub owner: String,
    pub mint: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    XToY,
    YToX,
}

impl From<Direction> for SwapDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::XToY => SwapDirection::XToY,
            Direction::YToX => SwapDirection::YToX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    Deposit {
        lp_amount: u64,
        max_x: u64,
        max_y: u64,
    },
    Withdraw {
        lp_amount: u64,
        #[serde(default)]
        min_x: u64,
        #[serde(default)]
        min_y: u64,
    },
    Swap {
        amount_in: u64,
        direction: Direction,
        #[serde(default)]
        min_out: u64,
    },
    Lock,
    Unlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub pool: u64,
    pub caller: String,

    #[serde(flatten)]
    pub action: Action,

    /// Expected error name (e.g. "SlippageExceeded"); absent means success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<String>,
}

/// Resolve a scenario identity into a 32-byte key
///
/// Base58 strings that decode to exactly 32 bytes are taken as keys; anything
/// else of 1..=32 bytes is zero-padded.
pub fn parse_identity(s: &str) -> std::result::Result<Pubkey, ScenarioError> {
    if let Ok(bytes) = bs58::decode(s).into_vec() {
        if let Ok(key) = <[u8; 32]>::try_from(bytes.as_slice()) {
            return Ok(key);
        }
    }
    let raw = s.as_bytes();
    if raw.is_empty() || raw.len() > 32 {
        return Err(ScenarioError::InvalidIdentity(s.to_string()));
    }
    let mut key = [0u8; 32];
    key[..raw.len()].copy_from_slice(raw);
    Ok(key)
}

/// Display form of an identity: the name if it was padded, base58 otherwise
pub fn display_identity(key: &Pubkey) -> String {
    let len = key.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    match std::str::from_utf8(&key[..len]) {
        Ok(name) if len > 0 && name.chars().all(|c| c.is_ascii_graphic()) => name.to_string(),
        _ => bs58::encode(key).into_string(),
    }
}

impl Scenario {
    /// Scenario path: `CPAMM_SCENARIO`, else the first CLI argument, else `scenario.toml`
    pub fn path() -> String {
        let raw = std::env::var("CPAMM_SCENARIO")
            .ok()
            .or_else(|| std::env::args().nth(1))
            .unwrap_or_else(|| "scenario.toml".to_string());
        shellexpand::tilde(&raw).into_owned()
    }

    /// Load a scenario from TOML
    pub fn load(path: &str) -> Result<Self> {
        let path = shellexpand::tilde(path).into_owned();
        let scenario_str = std::fs::read_to_string(&path)
            .context(format!("Failed to read scenario file: {}", path))?;

        Self::from_toml(&scenario_str)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s).context("Failed to parse scenario TOML")
    }

    /// Reference scenario: one pool through deposit, swap and lock, and a
    /// second pool at 300M/450M for the swap pricing check
    pub fn reference() -> Self {
        let step = |pool: u64, caller: &str, action: Action, expect: Option<&str>| Step {
            pool,
            caller: caller.to_string(),
            action,
            expect: expect.map(str::to_string),
        };
        let pool = |seed: u64| PoolSpec {
            seed,
            fee_bps: 300,
            authority: Some("admin".to_string()),
            mint_x: "mint-x".to_string(),
            mint_y: "mint-y".to_string(),
        };
        let funding = ["alice", "bob"]
            .iter()
            .flat_map(|owner| {
                ["mint-x", "mint-y"].iter().map(move |mint| Funding {
                    owner: owner.to_string(),
                    mint: mint.to_string(),
                    amount: 1_000_000_000,
                })
            })
            .collect();

        Self {
            pools: vec![pool(12345), pool(7)],
            funding,
            steps: vec![
                step(
                    12345,
                    "alice",
                    Action::Deposit {
                        lp_amount: 0,
                        max_x: 200_000_000,
                        max_y: 300_000_000,
                    },
                    None,
                ),
                step(
                    12345,
                    "bob",
                    Action::Deposit {
                        lp_amount: 50_000_000,
                        max_x: 40_000_000,
                        max_y: 70_000_000,
                    },
                    Some("SlippageExceeded"),
                ),
                step(
                    12345,
                    "bob",
                    Action::Deposit {
                        lp_amount: 50_000_000,
                        max_x: 40_824_830,
                        max_y: 61_237_244,
                    },
                    None,
                ),
                step(
                    7,
                    "alice",
                    Action::Deposit {
                        lp_amount: 0,
                        max_x: 300_000_000,
                        max_y: 450_000_000,
                    },
                    None,
                ),
                step(
                    7,
                    "bob",
                    Action::Swap {
                        amount_in: 10_000_000,
                        direction: Direction::XToY,
                        min_out: 14_000_000,
                    },
                    None,
                ),
                step(12345, "bob", Action::Lock, Some("Unauthorized")),
                step(12345, "admin", Action::Lock, None),
                step(
                    12345,
                    "bob",
                    Action::Swap {
                        amount_in: 10_000_000,
                        direction: Direction::XToY,
                        min_out: 0,
                    },
                    Some("PoolLocked"),
                ),
                step(12345, "admin", Action::Unlock, None),
                step(
                    12345,
                    "alice",
                    Action::Withdraw {
                        lp_amount: 100_000_000,
                        min_x: 0,
                        min_y: 0,
                    },
                    None,
                ),
            ],
        }
    }

    /// Write the reference scenario to file
    pub fn write_default(path: &str) -> Result<()> {
        let scenario = Self::reference();
        let toml_str = toml::to_string_pretty(&scenario)
            .context("Failed to serialize scenario")?;

        std::fs::write(path, toml_str)
            .context(format!("Failed to write scenario to {}", path))?;

        log::info!("Created default scenario at {}", path);
        Ok(())
    }
}
