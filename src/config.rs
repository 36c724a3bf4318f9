use crate::strategy::{create_strategy, strategy_ids, Strategy};
use thiserror::Error;
use tracing::Level;

#[derive(Debug, Error)]
#[error("unknown strategy '{0}' (known: {known})", known = strategy_ids().join(", "))]
pub struct UnknownStrategy(pub String);

/// Knobs of one run. Built by the command line, handed to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub strategy: String,
    pub echo_input: bool,
    pub log_level: Level,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            strategy: "layered".to_string(),
            echo_input: false,
            log_level: Level::INFO,
        }
    }
}

impl BotConfig {
    pub fn build_strategy(&self) -> Result<Box<dyn Strategy>, UnknownStrategy> {
        create_strategy(&self.strategy).ok_or_else(|| UnknownStrategy(self.strategy.clone()))
    }
}
