//! Configuration for rearrange operations.

/// Configuration options for planning and executing a rearrange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RearrangeConfig {
    /// Whether to leave out steps that do not change the tensor.
    pub elide_noops: bool,
    /// Whether a caller length for an axis the pattern never mentions is an error.
    pub reject_unused_lengths: bool,
    /// Maximum rank any intermediate tensor may reach.
    pub max_rank: Option<usize>,
}

impl Default for RearrangeConfig {
    fn default() -> Self {
        Self {
            elide_noops: true,
            reject_unused_lengths: false,
            max_rank: None,
        }
    }
}

impl RearrangeConfig {
    /// Creates a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables no-op elision.
    pub fn with_elide_noops(mut self, enabled: bool) -> Self {
        self.elide_noops = enabled;
        self
    }

    /// Enables or disables rejection of unused caller lengths.
    pub fn with_reject_unused_lengths(mut self, enabled: bool) -> Self {
        self.reject_unused_lengths = enabled;
        self
    }

    /// Caps the rank of intermediate tensors.
    pub fn with_max_rank(mut self, max_rank: usize) -> Self {
        self.max_rank = Some(max_rank);
        self
    }

    /// Creates a config that rejects anything suspicious.
    pub fn strict() -> Self {
        Self {
            elide_noops: true,
            reject_unused_lengths: true,
            max_rank: None,
        }
    }

    /// Creates a config that emits every primitive, even no-ops.
    pub fn verbose() -> Self {
        Self {
            elide_noops: false,
            reject_unused_lengths: false,
            max_rank: None,
        }
    }
}
