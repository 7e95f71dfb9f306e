use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, MergeResult};
use crate::strategy::{ArrayMergeStrategy, ConcatArrays, IndexAligned, ReplaceArrays};

static DEFAULT_ARRAY_MERGE: IndexAligned = IndexAligned;

// ---------------------------------------------------------------------------
// MergeOptions
// ---------------------------------------------------------------------------

/// Options threaded through every step of a merge.
#[derive(Clone, Default)]
pub struct MergeOptions {
    /// Deep-copy composite values instead of sharing them with the inputs.
    pub clone: bool,
    /// Strategy for sequence-into-sequence merges. `None` means
    /// [`IndexAligned`].
    pub array_merge: Option<Arc<dyn ArrayMergeStrategy>>,
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that deep-copy everything they touch.
    ///
    /// This is what a configuration layer wants when folding a caller's
    /// partial override into long-lived process-wide settings.
    pub fn cloning() -> Self {
        Self {
            clone: true,
            ..Default::default()
        }
    }

    pub fn with_clone(mut self, clone: bool) -> Self {
        self.clone = clone;
        self
    }

    pub fn with_array_merge(mut self, strategy: impl ArrayMergeStrategy + 'static) -> Self {
        self.array_merge = Some(Arc::new(strategy));
        self
    }

    /// The strategy in effect for sequence merges.
    pub fn array_strategy(&self) -> &dyn ArrayMergeStrategy {
        match &self.array_merge {
            Some(strategy) => &**strategy,
            None => &DEFAULT_ARRAY_MERGE,
        }
    }
}

impl fmt::Debug for MergeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeOptions")
            .field("clone", &self.clone)
            .field(
                "array_merge",
                &if self.array_merge.is_some() { "custom" } else { "index-aligned" },
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ArrayMergeMode
// ---------------------------------------------------------------------------

/// Built-in array strategies, by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrayMergeMode {
    #[default]
    IndexAligned,
    Replace,
    Concat,
}

impl ArrayMergeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IndexAligned => "index-aligned",
            Self::Replace => "replace",
            Self::Concat => "concat",
        }
    }

    pub fn strategy(&self) -> Arc<dyn ArrayMergeStrategy> {
        match self {
            Self::IndexAligned => Arc::new(IndexAligned),
            Self::Replace => Arc::new(ReplaceArrays),
            Self::Concat => Arc::new(ConcatArrays),
        }
    }
}

impl fmt::Display for ArrayMergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArrayMergeMode {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index-aligned" => Ok(Self::IndexAligned),
            "replace" => Ok(Self::Replace),
            "concat" => Ok(Self::Concat),
            other => Err(MergeError::InvalidArgument(format!(
                "unknown array merge mode {other:?} (expected index-aligned, replace, or concat)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// MergeConfig
// ---------------------------------------------------------------------------

/// Serializable merge settings, as read from a TOML or JSON file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MergeConfig {
    /// Deep-copy composite values instead of sharing them.
    pub clone: bool,
    /// Which built-in array strategy to use.
    pub array_merge: ArrayMergeMode,
}

impl MergeConfig {
    pub fn from_toml_str(text: &str) -> MergeResult<Self> {
        toml::from_str(text).map_err(|e| MergeError::Config(e.to_string()))
    }

    pub fn from_json_str(text: &str) -> MergeResult<Self> {
        serde_json::from_str(text).map_err(|e| MergeError::Config(e.to_string()))
    }

    /// Build runtime options from these settings.
    pub fn to_options(&self) -> MergeOptions {
        let array_merge = match self.array_merge {
            ArrayMergeMode::IndexAligned => None,
            mode => Some(mode.strategy()),
        };
        MergeOptions {
            clone: self.clone,
            array_merge,
        }
    }
}
