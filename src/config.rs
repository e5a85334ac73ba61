use clap::Parser;
use serde::Deserialize;
use serde::Serialize;

use crate::types::Address;
use crate::types::Budgets;
use crate::types::DEFAULT_BUDGET;
use crate::types::DEFAULT_EXPIRY_WINDOW_SECS;

/// Base configuration for the relay daemon.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "rootrelay", about = "Propagate a canonical root to remote replicas")]
pub struct BaseConfig {
    /// Directory holding one RocksDB store per replica.
    #[arg(long, default_value = "./data")]
    pub storage_path: String,

    /// File the identity authority writes the canonical root to (hex).
    #[arg(long, default_value = "./root.hex")]
    pub root_file: String,

    /// Number of in-process replicas to provision.
    #[arg(long, default_value_t = 3)]
    pub replicas: usize,

    /// Seconds between propagation attempts.
    #[arg(long, default_value_t = 60)]
    pub propagate_interval_secs: u64,

    /// Expiry window for superseded roots on freshly provisioned replicas.
    #[arg(long, default_value_t = DEFAULT_EXPIRY_WINDOW_SECS)]
    pub expiry_window_secs: u64,

    /// Administrative account of the dispatcher.
    #[arg(long, default_value = "0x0000000000000000000000000000000000000001")]
    pub admin: Address,

    #[arg(long, default_value_t = DEFAULT_BUDGET)]
    pub propagate_budget: u64,

    #[arg(long, default_value_t = DEFAULT_BUDGET)]
    pub expiry_budget: u64,

    #[arg(long, default_value_t = DEFAULT_BUDGET)]
    pub authority_budget: u64,
}

impl BaseConfig {
    pub fn budgets(&self) -> Budgets {
        Budgets {
            propagate: self.propagate_budget,
            expiry: self.expiry_budget,
            authority_transfer: self.authority_budget,
        }
    }
}

impl Default for BaseConfig {
    fn default() -> Self {
        BaseConfig {
            storage_path: "./data".to_string(),
            root_file: "./root.hex".to_string(),
            replicas: 3,
            propagate_interval_secs: 60,
            expiry_window_secs: DEFAULT_EXPIRY_WINDOW_SECS, // 7 days
            admin: Address::from_low_u64(1),
            propagate_budget: DEFAULT_BUDGET,
            expiry_budget: DEFAULT_BUDGET,
            authority_budget: DEFAULT_BUDGET,
        }
    }
}
