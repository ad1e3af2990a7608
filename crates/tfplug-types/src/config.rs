//! Conversion configuration and recursion bookkeeping

use crate::{TypeError, TypeResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default nesting limit for conversion and validation
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits applied while converting or validating wire values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Number of nested collection levels that may be entered
    pub max_depth: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Position of a conversion or validation pass in the value tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walk {
    max_depth: usize,
    depth: usize,
}

impl Walk {
    /// Start a walk at the root
    pub fn new(config: &ConversionConfig) -> Self {
        Walk {
            max_depth: config.max_depth,
            depth: 0,
        }
    }

    /// Current nesting level
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Enter one more collection level, failing once the limit is reached
    pub fn descend(self) -> TypeResult<Walk> {
        if self.depth >= self.max_depth {
            debug!(limit = self.max_depth, "value nesting limit reached");
            return Err(TypeError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(Walk {
            depth: self.depth + 1,
            ..self
        })
    }
}

impl Default for Walk {
    fn default() -> Self {
        Walk::new(&ConversionConfig::default())
    }
}
