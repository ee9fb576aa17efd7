//! Layer tree traversal producing ordered export candidates.
//!
//! Hosts list children back to front. The walker visits them in that order
//! and reverses the result, so the visually topmost layer comes first.
//! That order becomes the column order of the exported scene.

use toonport_scene_model::layer::{LayerKind, LayerNode};

use crate::filter::InclusionFilter;

/// Which candidates a traversal collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Animated,
    Static,
}

impl Classification {
    fn accepts(self, animated: bool) -> bool {
        match self {
            Self::Animated => animated,
            Self::Static => !animated,
        }
    }
}

/// Collect export candidates below `root`, foreground first.
///
/// With `flatten_groups`, an animated traversal emits any group containing
/// animated paint content as a single unit instead of descending into it.
/// Static traversals always descend into groups.
pub fn collect_candidates<'a, L: LayerNode>(
    root: &'a L,
    filter: &InclusionFilter,
    flatten_groups: bool,
    target: Classification,
) -> Vec<&'a L> {
    let mut out = Vec::new();
    walk(root, filter, flatten_groups, target, &mut out);
    out.reverse();
    out
}

fn walk<'a, L: LayerNode>(
    node: &'a L,
    filter: &InclusionFilter,
    flatten_groups: bool,
    target: Classification,
    out: &mut Vec<&'a L>,
) {
    for child in node.children() {
        if !filter.include(child) {
            continue;
        }
        match child.kind() {
            LayerKind::Group => {
                if flatten_groups && target == Classification::Animated {
                    if group_has_animated_content(child) {
                        out.push(child);
                    }
                } else {
                    walk(child, filter, flatten_groups, target, out);
                }
            }
            LayerKind::Paint => {
                if target.accepts(child.is_animated()) {
                    out.push(child);
                }
            }
        }
    }
}

/// Whether any paint layer below `group` is animated, at any depth.
pub fn group_has_animated_content<L: LayerNode>(group: &L) -> bool {
    group.children().iter().any(|child| match child.kind() {
        LayerKind::Paint => child.is_animated(),
        LayerKind::Group => group_has_animated_content(child),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use toonport_scene_model::layer::{Bounds, ColorLabel};
    use toonport_scene_model::memory::{Cel, MemoryLayer};

    fn animated(name: &str) -> MemoryLayer {
        MemoryLayer::paint(name).with_key(0, Cel::solid(Bounds::new(0, 0, 1, 1), [1, 2, 3, 255]))
    }

    fn still(name: &str) -> MemoryLayer {
        MemoryLayer::paint(name).with_content(Cel::solid(Bounds::new(0, 0, 1, 1), [9, 9, 9, 255]))
    }

    fn names(layers: &[&MemoryLayer]) -> Vec<String> {
        layers.iter().map(|l| l.name.clone()).collect()
    }

    #[test]
    fn test_front_to_back_order_is_preserved() {
        // Stored back to front: C is the bottom layer, A the top.
        let root = MemoryLayer::group("root", vec![animated("C"), animated("B"), animated("A")]);
        let found = collect_candidates(&root, &InclusionFilter::default(), true, Classification::Animated);
        assert_eq!(names(&found), ["A", "B", "C"]);
    }

    #[test]
    fn test_animated_and_static_passes_are_disjoint() {
        let root = MemoryLayer::group("root", vec![still("BG"), animated("Ink"), still("Frame")]);
        let filter = InclusionFilter::default();

        let anim = collect_candidates(&root, &filter, true, Classification::Animated);
        let stat = collect_candidates(&root, &filter, true, Classification::Static);
        assert_eq!(names(&anim), ["Ink"]);
        assert_eq!(names(&stat), ["Frame", "BG"]);
    }

    #[test]
    fn test_flatten_emits_group_as_unit() {
        let root = MemoryLayer::group(
            "root",
            vec![
                MemoryLayer::group("FX", vec![still("glow"), animated("spark")]),
                animated("Ink"),
            ],
        );
        let found = collect_candidates(&root, &InclusionFilter::default(), true, Classification::Animated);
        assert_eq!(names(&found), ["Ink", "FX"]);
    }

    #[test]
    fn test_flatten_finds_deeply_nested_animation() {
        let root = MemoryLayer::group(
            "root",
            vec![MemoryLayer::group(
                "outer",
                vec![MemoryLayer::group("inner", vec![animated("deep")])],
            )],
        );
        let found = collect_candidates(&root, &InclusionFilter::default(), true, Classification::Animated);
        assert_eq!(names(&found), ["outer"]);
    }

    #[test]
    fn test_without_flatten_groups_are_descended() {
        let root = MemoryLayer::group(
            "root",
            vec![
                MemoryLayer::group("FX", vec![animated("spark"), animated("glow")]),
                animated("Ink"),
            ],
        );
        let found = collect_candidates(&root, &InclusionFilter::default(), false, Classification::Animated);
        assert_eq!(names(&found), ["Ink", "glow", "spark"]);
    }

    #[test]
    fn test_group_without_animation_is_dropped() {
        let root = MemoryLayer::group(
            "root",
            vec![
                MemoryLayer::group("Props", vec![still("table")]),
                MemoryLayer::group("Empty", vec![]),
            ],
        );
        let found = collect_candidates(&root, &InclusionFilter::default(), true, Classification::Animated);
        assert!(found.is_empty());
    }

    #[test]
    fn test_static_pass_descends_even_when_flattening() {
        let root = MemoryLayer::group(
            "root",
            vec![MemoryLayer::group("Set", vec![still("floor"), animated("door")])],
        );
        let found = collect_candidates(&root, &InclusionFilter::default(), true, Classification::Static);
        assert_eq!(names(&found), ["floor"]);
    }

    #[test]
    fn test_excluded_group_skips_whole_subtree() {
        let root = MemoryLayer::group(
            "root",
            vec![
                MemoryLayer::group("Roughs", vec![animated("pose")]).labelled(ColorLabel::REFERENCE),
                MemoryLayer::group("Hidden", vec![animated("walk")]).hidden(),
                animated("Ink"),
            ],
        );
        let filter = InclusionFilter::default();
        assert_eq!(
            names(&collect_candidates(&root, &filter, false, Classification::Animated)),
            ["Ink"]
        );
        assert_eq!(
            names(&collect_candidates(&root, &filter, true, Classification::Animated)),
            ["Ink"]
        );
    }

    #[test]
    fn test_light_table_layers_are_skipped() {
        let root = MemoryLayer::group("root", vec![animated("LT_onion"), animated("Light Table"), animated("Ink")]);
        let found = collect_candidates(&root, &InclusionFilter::default(), true, Classification::Animated);
        assert_eq!(names(&found), ["Ink"]);
    }
}
