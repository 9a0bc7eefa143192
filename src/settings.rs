use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Http {
    pub bind_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rewards {
    /// Flat credit every claim earns before machine profits are added.
    pub base_reward: f64,
    /// Mining session window in hours; a session matures this long after start.
    pub session_hours: i64,
    pub min_withdrawal: f64,
    /// Fraction of a withdrawal withheld as tax, e.g. 0.10.
    pub withdrawal_tax_rate: f64,
    pub min_deposit: f64,
    /// Level-1 commission fraction paid to the inviter on approved deposits.
    pub referral_commission_rate: f64,
}

impl Default for Rewards {
    fn default() -> Self {
        Rewards {
            base_reward: 10.0,
            session_hours: 24,
            min_withdrawal: 500.0,
            withdrawal_tax_rate: 0.10,
            min_deposit: 100.0,
            referral_commission_rate: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub postgres: Postgres,
    pub http: Http,
    #[serde(default)]
    pub rewards: Rewards,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder().add_source(File::with_name(path)).build()?;

        config.try_deserialize()
    }
}
