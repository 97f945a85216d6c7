use serde::{Deserialize, Serialize};

/// Tunables for [`MeshParser`](crate::MeshParser).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Size of the token buffer for property types and names. Tokens may
    /// hold at most `max_token_length - 1` bytes; longer ones make the
    /// property line malformed.
    pub max_token_length: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_token_length: 32,
        }
    }
}
