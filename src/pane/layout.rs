// Geometry for the pane tree. All extents are f32 character cells; the
// separator between a split's children consumes `separator_size` cells of
// the split axis, and children keep the full cross-axis extent. Sizes are a
// pure function of the root extent, the tree shape, and the split ratios.

use crate::config::EngineConfig;
use crate::pane::{Direction, PaneId, PaneNode, Size, SplitOrientation};

/// Ratio changes smaller than this are treated as no movement.
const EPS: f32 = 0.001;

/// A pane's position and extent within the tab's content region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Whether a pane of `size` can be divided in `orientation` with both
/// resulting children at or above the minimum usable extent.
pub fn can_split(size: Size, orientation: SplitOrientation, config: &EngineConfig) -> bool {
    let (extent, min) = match orientation {
        SplitOrientation::Vertical => (size.width, config.min_pane_width),
        SplitOrientation::Horizontal => (size.height, config.min_pane_height),
    };
    (extent - config.separator_size) / 2.0 >= min
}

/// Propagate `size` down the subtree, recomputing every node's extent from
/// the split ratios. Idempotent: re-running with the same extent leaves the
/// tree unchanged.
pub fn resize_content(node: &mut PaneNode, size: Size, config: &EngineConfig) {
    match node {
        PaneNode::Leaf(leaf) => leaf.size = size,
        PaneNode::Split {
            orientation,
            ratio,
            size: node_size,
            first,
            second,
        } => {
            *node_size = size;
            let (first_size, second_size) =
                child_sizes(size, *orientation, *ratio, config.separator_size);
            resize_content(first, first_size, config);
            resize_content(second, second_size, config);
        }
    }
}

fn child_sizes(
    size: Size,
    orientation: SplitOrientation,
    ratio: f32,
    separator: f32,
) -> (Size, Size) {
    match orientation {
        SplitOrientation::Vertical => {
            let avail = (size.width - separator).max(0.0);
            let first = avail * ratio;
            (
                Size::new(first, size.height),
                Size::new(avail - first, size.height),
            )
        }
        SplitOrientation::Horizontal => {
            let avail = (size.height - separator).max(0.0);
            let first = avail * ratio;
            (
                Size::new(size.width, first),
                Size::new(size.width, avail - first),
            )
        }
    }
}

/// Position of every leaf in the subtree, in-order, assuming `node` sits at
/// the content region's origin. Relies on sizes already propagated by
/// [`resize_content`].
pub fn leaf_rects(node: &PaneNode, config: &EngineConfig) -> Vec<(PaneId, Rect)> {
    let mut rects = Vec::new();
    collect_rects(node, 0.0, 0.0, config, &mut rects);
    rects
}

fn collect_rects(
    node: &PaneNode,
    x: f32,
    y: f32,
    config: &EngineConfig,
    out: &mut Vec<(PaneId, Rect)>,
) {
    match node {
        PaneNode::Leaf(leaf) => {
            out.push((
                leaf.id,
                Rect::new(x, y, leaf.size.width, leaf.size.height),
            ));
        }
        PaneNode::Split {
            orientation,
            first,
            second,
            ..
        } => {
            collect_rects(first, x, y, config, out);
            let first_size = first.size();
            match orientation {
                SplitOrientation::Vertical => collect_rects(
                    second,
                    x + first_size.width + config.separator_size,
                    y,
                    config,
                    out,
                ),
                SplitOrientation::Horizontal => collect_rects(
                    second,
                    x,
                    y + first_size.height + config.separator_size,
                    config,
                    out,
                ),
            }
        }
    }
}

enum ResizeSearch {
    /// The target leaf is not in this subtree.
    Absent,
    /// The target is below, but no enclosing split matched yet.
    Unhandled,
    /// A matching split was found; `true` if the separator actually moved.
    Handled(bool),
}

/// Move the separator nearest to `target` one increment in `direction`.
/// Only the innermost enclosing split whose separator lies in `direction`
/// from the target is considered; returns false when no such split exists
/// or the separator is already at its minimum-size bound.
pub fn resize_ratio(
    node: &mut PaneNode,
    target: PaneId,
    direction: Direction,
    config: &EngineConfig,
) -> bool {
    matches!(
        resize_search(node, target, direction, config),
        ResizeSearch::Handled(true)
    )
}

fn resize_search(
    node: &mut PaneNode,
    target: PaneId,
    direction: Direction,
    config: &EngineConfig,
) -> ResizeSearch {
    let node_size = node.size();
    let mut moved = false;
    let result = match node {
        PaneNode::Leaf(leaf) => {
            if leaf.id == target {
                ResizeSearch::Unhandled
            } else {
                ResizeSearch::Absent
            }
        }
        PaneNode::Split {
            orientation,
            ratio,
            first,
            second,
            ..
        } => match resize_search(first, target, direction, config) {
            ResizeSearch::Handled(changed) => ResizeSearch::Handled(changed),
            ResizeSearch::Unhandled => {
                // Target in the first child: the separator lies to its
                // right/below, so only Right/Down resizes here.
                if *orientation == direction.axis()
                    && matches!(direction, Direction::Right | Direction::Down)
                {
                    moved = step_ratio(ratio, *orientation, node_size, direction, config);
                    ResizeSearch::Handled(moved)
                } else {
                    ResizeSearch::Unhandled
                }
            }
            ResizeSearch::Absent => match resize_search(second, target, direction, config) {
                ResizeSearch::Handled(changed) => ResizeSearch::Handled(changed),
                ResizeSearch::Unhandled => {
                    if *orientation == direction.axis()
                        && matches!(direction, Direction::Left | Direction::Up)
                    {
                        moved = step_ratio(ratio, *orientation, node_size, direction, config);
                        ResizeSearch::Handled(moved)
                    } else {
                        ResizeSearch::Unhandled
                    }
                }
                ResizeSearch::Absent => ResizeSearch::Absent,
            },
        },
    };
    if moved {
        resize_content(node, node_size, config);
    }
    result
}

/// Step a split ratio by one increment, clamped so neither child drops
/// below the minimum usable extent. Returns whether the ratio changed.
fn step_ratio(
    ratio: &mut f32,
    orientation: SplitOrientation,
    size: Size,
    direction: Direction,
    config: &EngineConfig,
) -> bool {
    let (extent, min) = match orientation {
        SplitOrientation::Vertical => (size.width, config.min_pane_width),
        SplitOrientation::Horizontal => (size.height, config.min_pane_height),
    };
    let avail = extent - config.separator_size;
    if avail <= 0.0 {
        return false;
    }
    let min_ratio = (min / avail).min(0.5);
    let max_ratio = 1.0 - min_ratio;
    let delta = match direction {
        Direction::Right | Direction::Down => config.resize_increment,
        Direction::Left | Direction::Up => -config.resize_increment,
    };
    let stepped = (*ratio + delta).clamp(min_ratio, max_ratio);
    if (stepped - *ratio).abs() < EPS {
        return false;
    }
    *ratio = stepped;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pane::{ProfileId, SplitOrientation};
    use crate::surface::testing::TestSurface;
    use rstest::rstest;

    fn cfg() -> EngineConfig {
        EngineConfig::default()
    }

    fn root(width: f32, height: f32) -> PaneNode {
        let (surface, _) = TestSurface::new("shell");
        PaneNode::new_root(ProfileId(1), Box::new(surface), Size::new(width, height))
    }

    fn split(node: &mut PaneNode, target: PaneId, orientation: SplitOrientation) -> PaneId {
        let (surface, _) = TestSurface::new("shell");
        node.split_leaf(target, orientation, ProfileId(1), Box::new(surface), &cfg())
            .expect("split should succeed")
            .1
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    // ── can_split ────────────────────────────────────────────────────

    #[rstest]
    #[case(80.0, 24.0, SplitOrientation::Vertical, true)]
    #[case(80.0, 24.0, SplitOrientation::Horizontal, true)]
    #[case(8.0, 24.0, SplitOrientation::Vertical, false)]
    #[case(9.0, 24.0, SplitOrientation::Vertical, true)]
    #[case(80.0, 4.0, SplitOrientation::Horizontal, false)]
    #[case(80.0, 5.0, SplitOrientation::Horizontal, true)]
    fn can_split_honors_minimum_extents(
        #[case] width: f32,
        #[case] height: f32,
        #[case] orientation: SplitOrientation,
        #[case] expected: bool,
    ) {
        assert_eq!(
            can_split(Size::new(width, height), orientation, &cfg()),
            expected
        );
    }

    // ── resize_content ───────────────────────────────────────────────

    #[test]
    fn vertical_split_divides_width_minus_separator() {
        let mut node = root(80.0, 24.0);
        let a = node.leaf_ids()[0];
        let b = split(&mut node, a, SplitOrientation::Vertical);
        let first = node.find_leaf(a).unwrap().size;
        let second = node.find_leaf(b).unwrap().size;
        assert!(approx(first.width, 39.5));
        assert!(approx(second.width, 39.5));
        assert_eq!(first.height, 24.0);
        assert_eq!(second.height, 24.0);
    }

    #[test]
    fn resize_content_is_idempotent() {
        let mut node = root(80.0, 24.0);
        let a = node.leaf_ids()[0];
        let b = split(&mut node, a, SplitOrientation::Vertical);
        split(&mut node, b, SplitOrientation::Horizontal);
        resize_content(&mut node, Size::new(80.0, 24.0), &cfg());
        let before = leaf_rects(&node, &cfg());
        resize_content(&mut node, Size::new(80.0, 24.0), &cfg());
        assert_eq!(leaf_rects(&node, &cfg()), before);
    }

    #[test]
    fn resize_content_scales_nested_splits() {
        let mut node = root(80.0, 24.0);
        let a = node.leaf_ids()[0];
        let b = split(&mut node, a, SplitOrientation::Vertical);
        let c = split(&mut node, b, SplitOrientation::Horizontal);
        resize_content(&mut node, Size::new(160.0, 48.0), &cfg());
        let first = node.find_leaf(a).unwrap().size;
        assert!(approx(first.width, 79.5));
        assert_eq!(first.height, 48.0);
        let lower = node.find_leaf(c).unwrap().size;
        assert!(approx(lower.height, 23.5));
    }

    // ── leaf_rects ───────────────────────────────────────────────────

    #[test]
    fn second_child_starts_past_the_separator() {
        let mut node = root(80.0, 24.0);
        let a = node.leaf_ids()[0];
        let b = split(&mut node, a, SplitOrientation::Vertical);
        let rects = leaf_rects(&node, &cfg());
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0], (a, Rect::new(0.0, 0.0, 39.5, 24.0)));
        assert_eq!(rects[1], (b, Rect::new(40.5, 0.0, 39.5, 24.0)));
    }

    #[test]
    fn nested_rects_offset_within_their_half() {
        let mut node = root(80.0, 24.0);
        let a = node.leaf_ids()[0];
        let b = split(&mut node, a, SplitOrientation::Vertical);
        let c = split(&mut node, b, SplitOrientation::Horizontal);
        let rects = leaf_rects(&node, &cfg());
        let b_rect = rects.iter().find(|(id, _)| *id == b).unwrap().1;
        let c_rect = rects.iter().find(|(id, _)| *id == c).unwrap().1;
        assert!(approx(b_rect.x, 40.5));
        assert_eq!(b_rect.y, 0.0);
        assert!(approx(c_rect.x, 40.5));
        assert!(approx(c_rect.y, b_rect.height + 1.0));
    }

    // ── resize_ratio ─────────────────────────────────────────────────

    #[test]
    fn resize_right_from_first_child_grows_it() {
        let mut node = root(80.0, 24.0);
        let a = node.leaf_ids()[0];
        let b = split(&mut node, a, SplitOrientation::Vertical);
        assert!(resize_ratio(&mut node, a, Direction::Right, &cfg()));
        let first = node.find_leaf(a).unwrap().size;
        let second = node.find_leaf(b).unwrap().size;
        // 79 available columns at ratio 0.55.
        assert!(approx(first.width, 43.45));
        assert!(approx(second.width, 35.55));
    }

    #[test]
    fn resize_left_from_first_child_is_a_no_op() {
        // No separator lies to the first child's left.
        let mut node = root(80.0, 24.0);
        let a = node.leaf_ids()[0];
        split(&mut node, a, SplitOrientation::Vertical);
        assert!(!resize_ratio(&mut node, a, Direction::Left, &cfg()));
    }

    #[test]
    fn resize_left_from_second_child_moves_the_shared_separator() {
        let mut node = root(80.0, 24.0);
        let a = node.leaf_ids()[0];
        let b = split(&mut node, a, SplitOrientation::Vertical);
        assert!(resize_ratio(&mut node, b, Direction::Left, &cfg()));
        let first = node.find_leaf(a).unwrap().size;
        assert!(approx(first.width, 35.55));
    }

    #[test]
    fn resize_on_mismatched_axis_is_a_no_op() {
        let mut node = root(80.0, 24.0);
        let a = node.leaf_ids()[0];
        split(&mut node, a, SplitOrientation::Vertical);
        assert!(!resize_ratio(&mut node, a, Direction::Down, &cfg()));
    }

    #[test]
    fn resize_of_root_leaf_is_a_no_op() {
        let mut node = root(80.0, 24.0);
        let a = node.leaf_ids()[0];
        assert!(!resize_ratio(&mut node, a, Direction::Right, &cfg()));
    }

    #[test]
    fn resize_stops_at_the_minimum_size_bound() {
        let mut node = root(80.0, 24.0);
        let a = node.leaf_ids()[0];
        let b = split(&mut node, a, SplitOrientation::Vertical);
        let mut steps = 0;
        while resize_ratio(&mut node, a, Direction::Right, &cfg()) {
            steps += 1;
            assert!(steps < 100, "resize should reach its bound");
        }
        // The second pane bottoms out at the minimum width.
        let second = node.find_leaf(b).unwrap().size;
        assert!(approx(second.width, cfg().min_pane_width));
        // Further steps stay put.
        assert!(!resize_ratio(&mut node, a, Direction::Right, &cfg()));
        let second_again = node.find_leaf(b).unwrap().size;
        assert_eq!(second.width, second_again.width);
    }

    #[test]
    fn resize_skips_mismatched_inner_split() {
        // a | (b over c): Left from b crosses no separator at the inner
        // horizontal split, so the outer vertical separator moves.
        let mut node = root(120.0, 40.0);
        let a = node.leaf_ids()[0];
        let b = split(&mut node, a, SplitOrientation::Vertical);
        split(&mut node, b, SplitOrientation::Horizontal);
        let a_before = node.find_leaf(a).unwrap().size.width;
        assert!(resize_ratio(&mut node, b, Direction::Left, &cfg()));
        let a_after = node.find_leaf(a).unwrap().size.width;
        assert!(a_after < a_before);
    }

    #[test]
    fn resize_toward_the_outer_edge_is_a_no_op() {
        let mut node = root(120.0, 40.0);
        let a = node.leaf_ids()[0];
        let b = split(&mut node, a, SplitOrientation::Vertical);
        assert!(!resize_ratio(&mut node, b, Direction::Right, &cfg()));
    }
}
