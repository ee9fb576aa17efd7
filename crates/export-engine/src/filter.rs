//! Per-layer inclusion policy.

use toonport_scene_model::layer::LayerNode;
use toonport_scene_model::options::ExportOptions;

/// Name prefix of light-table (onion reference) layers.
pub const LIGHT_TABLE_PREFIX: &str = "LT_";

/// Exact name of the light-table layer.
pub const LIGHT_TABLE_NAME: &str = "Light Table";

/// Decides whether a layer (and with it, its whole subtree) takes part in an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InclusionFilter {
    pub include_invisible: bool,
    pub include_reference: bool,
}

impl InclusionFilter {
    pub fn from_options(options: &ExportOptions) -> Self {
        Self {
            include_invisible: options.include_invisible,
            include_reference: options.include_reference,
        }
    }

    pub fn include<L: LayerNode>(&self, node: &L) -> bool {
        if !self.include_invisible && !node.visible() {
            return false;
        }
        if !self.include_reference && node.color_label().is_reference() {
            return false;
        }
        !is_light_table(node.name())
    }
}

/// Light-table layers are never exported, regardless of options.
pub fn is_light_table(name: &str) -> bool {
    name.starts_with(LIGHT_TABLE_PREFIX) || name == LIGHT_TABLE_NAME
}

#[cfg(test)]
mod tests {
    use super::*;
    use toonport_scene_model::layer::ColorLabel;
    use toonport_scene_model::memory::MemoryLayer;

    #[test]
    fn test_default_filter_skips_hidden_and_reference() {
        let filter = InclusionFilter::default();
        assert!(filter.include(&MemoryLayer::paint("Ink")));
        assert!(!filter.include(&MemoryLayer::paint("Ink").hidden()));
        assert!(!filter.include(&MemoryLayer::paint("Rough").labelled(ColorLabel::REFERENCE)));
        assert!(filter.include(&MemoryLayer::paint("Colour").labelled(ColorLabel(3))));
    }

    #[test]
    fn test_options_opt_into_hidden_and_reference() {
        let filter = InclusionFilter::from_options(&ExportOptions {
            include_invisible: true,
            include_reference: true,
            ..ExportOptions::default()
        });
        assert!(filter.include(&MemoryLayer::paint("Ink").hidden()));
        assert!(filter.include(&MemoryLayer::paint("Rough").labelled(ColorLabel::REFERENCE)));
    }

    #[test]
    fn test_light_table_is_always_excluded() {
        let filter = InclusionFilter {
            include_invisible: true,
            include_reference: true,
        };
        assert!(!filter.include(&MemoryLayer::paint("Light Table")));
        assert!(!filter.include(&MemoryLayer::paint("LT_onion")));
        assert!(filter.include(&MemoryLayer::paint("Light Table 2")));
        assert!(filter.include(&MemoryLayer::paint("lt_lower")));
    }
}
