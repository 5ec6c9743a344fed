#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default bound on expression nesting.
///
/// Compiler-generated correlation expressions rarely go past a handful of levels.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Knobs for the expression decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderConfig {
    /// Deepest nesting level the parser descends to; the root is level 0.
    pub max_depth: usize,
}

impl DecoderConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
