// Directional focus movement. The walk has two halves: climb from the
// active leaf to the innermost enclosing split whose separator lies in the
// requested direction, then descend the subtree on the far side picking the
// leaf that visually borders the separator closest to the active pane.
// Selection never mutates the tree; callers apply the returned target.

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::pane::layout::{self, Rect};
use crate::pane::{Direction, PaneId, PaneNode};

const EPS: f32 = 0.001;

/// The leaf that focus should move to from `active` in `direction`, or
/// `None` when the active pane already sits on that edge of the tab.
pub fn navigate_target(
    root: &PaneNode,
    active: PaneId,
    direction: Direction,
    config: &EngineConfig,
) -> Option<PaneId> {
    let rects: HashMap<PaneId, Rect> = layout::leaf_rects(root, config).into_iter().collect();
    let active_rect = *rects.get(&active)?;
    let subtree = match find_far_subtree(root, active, direction) {
        NavSearch::Found(subtree) => subtree,
        _ => return None,
    };
    best_leaf(subtree, direction, active_rect, &rects)
}

enum NavSearch<'a> {
    /// The active leaf is not in this subtree.
    Absent,
    /// The active leaf is below, but no enclosing split matched yet.
    Unhandled,
    /// The subtree on the far side of the matching separator.
    Found(&'a PaneNode),
}

fn find_far_subtree<'a>(
    node: &'a PaneNode,
    target: PaneId,
    direction: Direction,
) -> NavSearch<'a> {
    match node {
        PaneNode::Leaf(leaf) if leaf.id == target => NavSearch::Unhandled,
        PaneNode::Leaf(_) => NavSearch::Absent,
        PaneNode::Split {
            orientation,
            first,
            second,
            ..
        } => match find_far_subtree(first, target, direction) {
            NavSearch::Found(subtree) => NavSearch::Found(subtree),
            NavSearch::Unhandled => {
                if *orientation == direction.axis()
                    && matches!(direction, Direction::Right | Direction::Down)
                {
                    NavSearch::Found(second)
                } else {
                    NavSearch::Unhandled
                }
            }
            NavSearch::Absent => match find_far_subtree(second, target, direction) {
                NavSearch::Found(subtree) => NavSearch::Found(subtree),
                NavSearch::Unhandled => {
                    if *orientation == direction.axis()
                        && matches!(direction, Direction::Left | Direction::Up)
                    {
                        NavSearch::Found(first)
                    } else {
                        NavSearch::Unhandled
                    }
                }
                NavSearch::Absent => NavSearch::Absent,
            },
        },
    }
}

/// Pick the leaf in `subtree` that borders the shared separator nearest the
/// active pane: primary key is the edge facing the separator, secondary key
/// is the cross-axis distance between pane centers. Ties go to the earlier
/// in-order leaf, which keeps repeated navigation deterministic.
fn best_leaf(
    subtree: &PaneNode,
    direction: Direction,
    active_rect: Rect,
    rects: &HashMap<PaneId, Rect>,
) -> Option<PaneId> {
    let active_center = center(active_rect, direction);
    let mut best: Option<(PaneId, f32, f32)> = None;
    for id in subtree.leaf_ids() {
        let rect = match rects.get(&id) {
            Some(rect) => *rect,
            None => continue,
        };
        let edge = facing_edge(rect, direction);
        let cross = (center(rect, direction) - active_center).abs();
        let better = match best {
            None => true,
            Some((_, best_edge, best_cross)) => {
                edge < best_edge - EPS || ((edge - best_edge).abs() < EPS && cross < best_cross - EPS)
            }
        };
        if better {
            best = Some((id, edge, cross));
        }
    }
    best.map(|(id, _, _)| id)
}

/// Distance key of the candidate's edge facing the separator; smaller means
/// closer to the active pane.
fn facing_edge(rect: Rect, direction: Direction) -> f32 {
    match direction {
        Direction::Right => rect.x,
        Direction::Left => -(rect.x + rect.width),
        Direction::Down => rect.y,
        Direction::Up => -(rect.y + rect.height),
    }
}

/// Pane center along the axis perpendicular to the movement.
fn center(rect: Rect, direction: Direction) -> f32 {
    match direction {
        Direction::Left | Direction::Right => rect.y + rect.height / 2.0,
        Direction::Up | Direction::Down => rect.x + rect.width / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pane::{ProfileId, Size, SplitOrientation};
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

    /// a|b in the top half, c across the bottom.
    fn three_pane_layout() -> (PaneNode, PaneId, PaneId, PaneId) {
        let mut node = root(80.0, 24.0);
        let a = node.leaf_ids()[0];
        let c = split(&mut node, a, SplitOrientation::Horizontal);
        let b = split(&mut node, a, SplitOrientation::Vertical);
        (node, a, b, c)
    }

    #[test]
    fn moves_across_the_nearest_vertical_separator() {
        let (node, a, b, _) = three_pane_layout();
        assert_eq!(navigate_target(&node, a, Direction::Right, &cfg()), Some(b));
        assert_eq!(navigate_target(&node, b, Direction::Left, &cfg()), Some(a));
    }

    #[test]
    fn moves_down_into_the_wide_bottom_pane() {
        let (node, a, b, c) = three_pane_layout();
        assert_eq!(navigate_target(&node, a, Direction::Down, &cfg()), Some(c));
        assert_eq!(navigate_target(&node, b, Direction::Down, &cfg()), Some(c));
    }

    #[test]
    fn equidistant_candidates_resolve_to_the_earlier_leaf() {
        // From c both a and b touch the separator with centers equally far
        // from c's center, so the in-order tie-break picks a.
        let (node, a, _, c) = three_pane_layout();
        assert_eq!(navigate_target(&node, c, Direction::Up, &cfg()), Some(a));
    }

    #[rstest]
    #[case(Direction::Up)]
    #[case(Direction::Left)]
    fn edge_panes_have_no_target_toward_the_edge(#[case] direction: Direction) {
        let (node, a, _, _) = three_pane_layout();
        assert_eq!(navigate_target(&node, a, direction, &cfg()), None);
    }

    #[test]
    fn bottom_pane_has_no_target_below() {
        let (node, _, _, c) = three_pane_layout();
        assert_eq!(navigate_target(&node, c, Direction::Down, &cfg()), None);
    }

    #[test]
    fn single_leaf_never_navigates() {
        let node = root(80.0, 24.0);
        let a = node.leaf_ids()[0];
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(navigate_target(&node, a, direction, &cfg()), None);
        }
    }

    #[test]
    fn cross_axis_distance_picks_the_aligned_neighbor() {
        // Left column stacked into three panes, right column one tall pane
        // whose center lines up with the middle-left pane.
        let mut node = root(80.0, 47.0);
        let a = node.leaf_ids()[0];
        let right = split(&mut node, a, SplitOrientation::Vertical);
        let mid = split(&mut node, a, SplitOrientation::Horizontal);
        let low = split(&mut node, mid, SplitOrientation::Horizontal);
        // All three left panes share the facing edge; the middle one's
        // center (y 29.5) is nearest to the right pane's (y 23.5).
        assert_eq!(
            navigate_target(&node, right, Direction::Left, &cfg()),
            Some(mid)
        );
        let _ = (a, low);
    }

    #[test]
    fn navigation_crosses_back_and_forth_consistently() {
        let (node, a, b, c) = three_pane_layout();
        // Down from b lands on c; up from c lands on a (tie-break), and
        // right from a returns to b.
        assert_eq!(navigate_target(&node, b, Direction::Down, &cfg()), Some(c));
        assert_eq!(navigate_target(&node, c, Direction::Up, &cfg()), Some(a));
        assert_eq!(navigate_target(&node, a, Direction::Right, &cfg()), Some(b));
    }

    #[test]
    fn unknown_active_pane_yields_no_target() {
        let (node, _, _, _) = three_pane_layout();
        assert_eq!(
            navigate_target(&node, PaneId(9999), Direction::Right, &cfg()),
            None
        );
    }
}
