//! Game search configuration and the supervisor handshake line

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::eval::Evaluation;
use crate::othello::Player;

/// Which tree search the agent runs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Minimax,
    AlphaBeta,
}

/// Searcher settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Plies to look ahead, `None` searches to the end of the game
    pub depth_limit: Option<u32>,
    pub caching: bool,
    /// Alpha-beta only
    pub ordering: bool,
    pub evaluation: Evaluation,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth_limit: Some(4),
            caching: false,
            ordering: false,
            evaluation: Evaluation::Utility,
        }
    }
}

impl SearchConfig {
    pub fn with_depth_limit(mut self, depth_limit: Option<u32>) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }

    pub fn with_ordering(mut self, ordering: bool) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluation = evaluation;
        self
    }
}

/// Settings announced by the supervisor:
/// `color,depthLimit,useMinimax,useCaching,useOrdering`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentConfig {
    pub color: Player,
    pub algorithm: Algorithm,
    pub search: SearchConfig,
}

const FIELDS: [&str; 5] = ["color", "depth limit", "minimax", "caching", "ordering"];

impl FromStr for AgentConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(',').map(str::trim).collect();
        if parts.len() != FIELDS.len() {
            return Err(ConfigError::FieldCount(parts.len()));
        }

        let mut values = [0i64; 5];
        for (i, (part, field)) in parts.iter().zip(FIELDS).enumerate() {
            values[i] = part.parse().map_err(|_| ConfigError::NotInteger {
                field,
                value: part.to_string(),
            })?;
        }
        let [color, limit, minimax, caching, ordering] = values;

        let color = u8::try_from(color)
            .ok()
            .and_then(Player::from_color)
            .ok_or(ConfigError::InvalidColor(color))?;

        // -1 is the protocol's "unlimited"
        let depth_limit = match limit {
            -1 => None,
            d if d >= 0 => Some(u32::try_from(d).map_err(|_| ConfigError::InvalidDepth(d))?),
            d => return Err(ConfigError::InvalidDepth(d)),
        };

        let algorithm = if flag(FIELDS[2], minimax)? {
            Algorithm::Minimax
        } else {
            Algorithm::AlphaBeta
        };

        Ok(Self {
            color,
            algorithm,
            search: SearchConfig::default()
                .with_depth_limit(depth_limit)
                .with_caching(flag(FIELDS[3], caching)?)
                .with_ordering(flag(FIELDS[4], ordering)?),
        })
    }
}

fn flag(field: &'static str, value: i64) -> Result<bool, ConfigError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(ConfigError::InvalidFlag { field, value }),
    }
}
