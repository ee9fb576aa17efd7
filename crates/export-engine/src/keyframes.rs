//! Keyframe discovery over a frame range.

use std::collections::BTreeSet;

use toonport_scene_model::document::{FrameRange, Sample};
use toonport_scene_model::layer::{LayerKind, LayerNode};

/// Samples in `range` at which `layer` declares new content, ascending.
///
/// Groups have no keyframes of their own; their schedule is the union over
/// every animated paint layer below them.
pub fn collect_keyframes<L: LayerNode>(layer: &L, range: FrameRange) -> BTreeSet<Sample> {
    let mut keys = BTreeSet::new();
    match layer.kind() {
        LayerKind::Paint => scan_paint(layer, range, &mut keys),
        LayerKind::Group => scan_group(layer, range, &mut keys),
    }
    keys
}

fn scan_paint<L: LayerNode>(layer: &L, range: FrameRange, keys: &mut BTreeSet<Sample>) {
    keys.extend(range.samples().filter(|sample| layer.has_sample_at(*sample)));
}

fn scan_group<L: LayerNode>(group: &L, range: FrameRange, keys: &mut BTreeSet<Sample>) {
    for child in group.children() {
        match child.kind() {
            LayerKind::Paint if child.is_animated() => scan_paint(child, range, keys),
            LayerKind::Paint => {}
            LayerKind::Group => scan_group(child, range, keys),
        }
    }
}

/// Total keyframes across `layers`, used as the progress denominator.
pub fn count_total_keyframes<L: LayerNode>(layers: &[&L], range: FrameRange) -> u64 {
    layers
        .iter()
        .map(|layer| collect_keyframes(*layer, range).len() as u64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use toonport_scene_model::layer::Bounds;
    use toonport_scene_model::memory::{Cel, MemoryLayer};

    fn keyed(name: &str, samples: &[Sample]) -> MemoryLayer {
        samples.iter().fold(MemoryLayer::paint(name), |layer, s| {
            layer.with_key(*s, Cel::solid(Bounds::new(0, 0, 1, 1), [0, 0, 0, 255]))
        })
    }

    #[test]
    fn test_paint_keys_within_range() {
        let layer = keyed("Ink", &[-2, 0, 3, 9, 12]);
        let keys = collect_keyframes(&layer, FrameRange::new(0, 10));
        assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec![0, 3, 9]);
    }

    #[test]
    fn test_group_keys_are_union_of_descendants() {
        let group = MemoryLayer::group(
            "FX",
            vec![
                keyed("a", &[1, 4]),
                MemoryLayer::group("nested", vec![keyed("b", &[4, 6])]),
                keyed("c", &[0]),
            ],
        );
        let keys = collect_keyframes(&group, FrameRange::new(0, 7));
        assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec![0, 1, 4, 6]);
    }

    #[test]
    fn test_static_children_contribute_nothing() {
        let group = MemoryLayer::group(
            "Set",
            vec![MemoryLayer::paint("floor").with_content(Cel::solid(Bounds::new(0, 0, 1, 1), [1, 1, 1, 255]))],
        );
        assert!(collect_keyframes(&group, FrameRange::new(0, 7)).is_empty());
    }

    #[test]
    fn test_count_total_keyframes() {
        let a = keyed("a", &[0, 2]);
        let b = keyed("b", &[1, 2, 3]);
        assert_eq!(count_total_keyframes(&[&a, &b], FrameRange::new(0, 3)), 5);
    }
}
