//! Ordered storage of configuration layers
//!
//! The store is append-only during construction and sealed before the first
//! resolution. Layer order is a total order and is preserved exactly as
//! given; the engine trusts the loader's sequence.

use crate::block::ConfigBlock;
use crate::error::ConstructionError;
use crate::pattern::PatternSet;
use std::path::Path;
use tracing::debug;

/// One stored block with its compiled pattern sets.
#[derive(Debug, Clone)]
pub struct Layer {
    block: ConfigBlock,
    include: PatternSet,
    exclude: PatternSet,
}

impl Layer {
    fn compile(block: ConfigBlock) -> Result<Self, ConstructionError> {
        let include = PatternSet::compile(block.include.iter().map(String::as_str))?;
        let exclude = PatternSet::compile_ignore(block.exclude.iter().map(String::as_str))?;
        Ok(Self {
            block,
            include,
            exclude,
        })
    }

    pub fn block(&self) -> &ConfigBlock {
        &self.block
    }

    /// Whether this layer is a dedicated ignore list.
    pub fn is_ignore_only(&self) -> bool {
        self.block.is_ignore_only()
    }

    /// An empty include set covers every path (baseline layers).
    pub(crate) fn covers(&self, path: &Path) -> bool {
        self.include.is_empty() || self.include.matches(path)
    }

    pub(crate) fn excludes(&self, path: &Path) -> bool {
        self.exclude.matches(path)
    }

    /// Whether this earlier layer's plugin registrations extend to `block`.
    /// The layer must register the plugin and apply to at least the same
    /// file set: either it is a baseline (no patterns at all) or its
    /// pattern lists are identical to the block's.
    fn registers_for(&self, block: &ConfigBlock, plugin: &str) -> bool {
        if !self.block.plugins.contains_key(plugin) {
            return false;
        }
        (self.block.include.is_empty() && self.block.exclude.is_empty())
            || (self.block.include == block.include && self.block.exclude == block.exclude)
    }
}

/// Ordered, sealable sequence of configuration layers.
#[derive(Debug, Clone, Default)]
pub struct LayerStore {
    layers: Vec<Layer>,
    sealed: bool,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block to the store.
    ///
    /// Validates glob syntax and plugin references against this block and
    /// all earlier ones. Fails once the store is sealed.
    pub fn append(&mut self, block: ConfigBlock) -> Result<(), ConstructionError> {
        if self.sealed {
            return Err(ConstructionError::StoreSealed);
        }
        let index = self.layers.len();
        self.check_plugin_refs(&block, index)?;
        let layer = Layer::compile(block)?;
        debug!("appended layer {index}");
        self.layers.push(layer);
        Ok(())
    }

    /// Seal the store; further appends fail.
    pub fn seal(&mut self) {
        if !self.sealed {
            self.sealed = true;
            debug!("layer store sealed with {} layers", self.layers.len());
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// A namespaced rule (`plugin/rule`) can only activate a plugin that the
    /// block itself or an earlier same-coverage layer registers.
    fn check_plugin_refs(
        &self,
        block: &ConfigBlock,
        index: usize,
    ) -> Result<(), ConstructionError> {
        for rule in block.rules.keys() {
            let Some((plugin, _)) = rule.rsplit_once('/') else {
                continue;
            };
            if block.plugins.contains_key(plugin) {
                continue;
            }
            if self
                .layers
                .iter()
                .any(|earlier| earlier.registers_for(block, plugin))
            {
                continue;
            }
            return Err(ConstructionError::UnknownPlugin {
                rule: rule.clone(),
                plugin: plugin.to_string(),
                block_index: index,
            });
        }
        Ok(())
    }
}
