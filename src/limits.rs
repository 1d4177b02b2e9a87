use crate::ConfigError;

/// Archive limits enforced while assembling parts.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Limits {
    /// Maximum number of parts, the header-only first block included.
    pub max_parts: Option<usize>,
    /// Maximum decoded size in bytes of a single part.
    pub max_part_size: Option<u64>,
}

impl Limits {
    /// Creates a permissive limits configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects limits configured as zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_parts == Some(0) {
            return Err(ConfigError::InvalidLimitValue { limit: "max_parts" });
        }

        if self.max_part_size == Some(0) {
            return Err(ConfigError::InvalidLimitValue {
                limit: "max_part_size",
            });
        }

        Ok(())
    }
}
