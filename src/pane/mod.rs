// Pane tree: binary tree of terminal panes backing a single tab. Leaves
// host one rendering surface each; split nodes divide their area between
// exactly two children. Structural operations (split, close-and-collapse,
// active-state tracking) live here; geometry lives in `layout`, directional
// focus movement in `navigate`.

pub mod layout;
pub mod navigate;

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::surface::{NullSurface, Surface, SurfaceSettings};

/// Global monotonically increasing pane ID counter.
static NEXT_PANE_ID: AtomicU32 = AtomicU32::new(1);

/// Unique identifier for a pane leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaneId(pub u32);

impl PaneId {
    /// Generate a new unique PaneId.
    pub fn next() -> Self {
        Self(NEXT_PANE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Opaque identifier for the terminal configuration a leaf's view was
/// created with. The engine only compares it, never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub u32);

/// Orientation of a split node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOrientation {
    /// Children stacked top/bottom; the separator is a horizontal line.
    Horizontal,
    /// Children side by side; the separator is a vertical line.
    Vertical,
}

/// Direction for separator resize and focus navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The split orientation whose separator this direction crosses.
    pub(crate) fn axis(self) -> SplitOrientation {
        match self {
            Direction::Left | Direction::Right => SplitOrientation::Vertical,
            Direction::Up | Direction::Down => SplitOrientation::Horizontal,
        }
    }
}

/// A width × height extent in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A leaf pane: one terminal view plus its identity and focus flags.
pub struct LeafPane {
    pub id: PaneId,
    pub profile: ProfileId,
    pub surface: Box<dyn Surface>,
    pub size: Size,
    /// Whether this leaf is the current target of tab-scope operations.
    pub is_active: bool,
    /// Whether this leaf was the most recent one to gain real UI focus.
    pub last_focused: bool,
}

impl LeafPane {
    fn new(profile: ProfileId, surface: Box<dyn Surface>, size: Size) -> Self {
        Self {
            id: PaneId::next(),
            profile,
            surface,
            size,
            is_active: false,
            last_focused: false,
        }
    }

    /// Inert stand-in used while splicing nodes in and out of the tree.
    fn placeholder() -> Self {
        Self {
            id: PaneId(0),
            profile: ProfileId(0),
            surface: Box::new(NullSurface),
            size: Size::ZERO,
            is_active: false,
            last_focused: false,
        }
    }
}

impl fmt::Debug for LeafPane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafPane")
            .field("id", &self.id)
            .field("profile", &self.profile)
            .field("size", &self.size)
            .field("is_active", &self.is_active)
            .field("last_focused", &self.last_focused)
            .finish()
    }
}

/// A node in the binary pane tree.
pub enum PaneNode {
    /// A leaf hosting one terminal view.
    Leaf(LeafPane),
    /// An internal node dividing its area between two children.
    Split {
        orientation: SplitOrientation,
        /// Fraction of the dividable extent given to `first`, in (0, 1).
        ratio: f32,
        /// Extent this split currently occupies, set by `resize_content`.
        size: Size,
        first: Box<PaneNode>,
        second: Box<PaneNode>,
    },
}

impl fmt::Debug for PaneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaneNode::Leaf(leaf) => f.debug_tuple("Leaf").field(leaf).finish(),
            PaneNode::Split {
                orientation,
                ratio,
                size,
                first,
                second,
            } => f
                .debug_struct("Split")
                .field("orientation", orientation)
                .field("ratio", ratio)
                .field("size", size)
                .field("first", first)
                .field("second", second)
                .finish(),
        }
    }
}

/// Result of a `remove_leaf` operation.
#[derive(Debug, PartialEq, Eq)]
pub enum RemoveResult {
    /// The node itself was the target; the parent must splice it out.
    RemovedSelf,
    /// The target was found and collapsed away within this subtree.
    Removed,
    /// The target was not in this subtree.
    NotFound,
}

impl PaneNode {
    /// Create a new root leaf wrapping the tab's first terminal view. The
    /// leaf starts active so the tree always has exactly one active leaf.
    pub fn new_root(profile: ProfileId, surface: Box<dyn Surface>, size: Size) -> Self {
        let mut leaf = LeafPane::new(profile, surface, size);
        leaf.is_active = true;
        PaneNode::Leaf(leaf)
    }

    /// Create a detached, inactive leaf. Used when rebuilding a tree from
    /// a saved layout; callers mark an active leaf afterwards.
    pub fn new_leaf(profile: ProfileId, surface: Box<dyn Surface>, size: Size) -> Self {
        PaneNode::Leaf(LeafPane::new(profile, surface, size))
    }

    fn placeholder() -> Self {
        PaneNode::Leaf(LeafPane::placeholder())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, PaneNode::Leaf(_))
    }

    /// Extent this node currently occupies.
    pub fn size(&self) -> Size {
        match self {
            PaneNode::Leaf(leaf) => leaf.size,
            PaneNode::Split { size, .. } => *size,
        }
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            PaneNode::Leaf(_) => 1,
            PaneNode::Split { first, second, .. } => first.leaf_count() + second.leaf_count(),
        }
    }

    /// All leaf ids in this subtree, in-order.
    pub fn leaf_ids(&self) -> Vec<PaneId> {
        let mut ids = Vec::new();
        self.collect_leaf_ids(&mut ids);
        ids
    }

    fn collect_leaf_ids(&self, ids: &mut Vec<PaneId>) {
        match self {
            PaneNode::Leaf(leaf) => ids.push(leaf.id),
            PaneNode::Split { first, second, .. } => {
                first.collect_leaf_ids(ids);
                second.collect_leaf_ids(ids);
            }
        }
    }

    /// Whether a leaf with this id lives in this subtree.
    pub fn contains(&self, id: PaneId) -> bool {
        self.find_leaf(id).is_some()
    }

    pub fn find_leaf(&self, id: PaneId) -> Option<&LeafPane> {
        match self {
            PaneNode::Leaf(leaf) if leaf.id == id => Some(leaf),
            PaneNode::Leaf(_) => None,
            PaneNode::Split { first, second, .. } => {
                first.find_leaf(id).or_else(|| second.find_leaf(id))
            }
        }
    }

    pub fn find_leaf_mut(&mut self, id: PaneId) -> Option<&mut LeafPane> {
        match self {
            PaneNode::Leaf(leaf) if leaf.id == id => Some(leaf),
            PaneNode::Leaf(_) => None,
            PaneNode::Split { first, second, .. } => first
                .find_leaf_mut(id)
                .or_else(move || second.find_leaf_mut(id)),
        }
    }

    /// The single leaf currently marked active, if any.
    pub fn active_leaf_id(&self) -> Option<PaneId> {
        match self {
            PaneNode::Leaf(leaf) => leaf.is_active.then_some(leaf.id),
            PaneNode::Split { first, second, .. } => {
                first.active_leaf_id().or_else(|| second.active_leaf_id())
            }
        }
    }

    /// Profile of the leaf that last held real UI focus, or `None` if no
    /// leaf has ever been focused.
    pub fn focused_profile(&self) -> Option<ProfileId> {
        match self {
            PaneNode::Leaf(leaf) => leaf.last_focused.then_some(leaf.profile),
            PaneNode::Split { first, second, .. } => first
                .focused_profile()
                .or_else(|| second.focused_profile()),
        }
    }

    /// Unset the active and last-focused flags on every leaf in this
    /// subtree. Paired with `set_active_leaf` to keep both flags unique.
    pub fn clear_active(&mut self) {
        match self {
            PaneNode::Leaf(leaf) => {
                leaf.is_active = false;
                leaf.last_focused = false;
            }
            PaneNode::Split { first, second, .. } => {
                first.clear_active();
                second.clear_active();
            }
        }
    }

    /// Mark the given leaf as active and last-focused. Callers must run
    /// `clear_active` first; returns false if the leaf is not in the tree.
    pub fn set_active_leaf(&mut self, id: PaneId) -> bool {
        if let Some(leaf) = self.find_leaf_mut(id) {
            leaf.is_active = true;
            leaf.last_focused = true;
            true
        } else {
            false
        }
    }

    /// Whether the given leaf could be split in `orientation` without
    /// pushing either resulting child below the minimum usable size.
    pub fn can_split_leaf(
        &self,
        target: PaneId,
        orientation: SplitOrientation,
        config: &EngineConfig,
    ) -> bool {
        self.find_leaf(target)
            .is_some_and(|leaf| layout::can_split(leaf.size, orientation, config))
    }

    /// Split the target leaf: it becomes a split node whose first child is
    /// the original leaf (view and flags intact) and whose second child is
    /// a fresh leaf for `surface`. Sizes are re-propagated from the old
    /// leaf's extent at a 0.5 ratio. Returns the ids of both children, or
    /// `None` if the target is missing or too small to split — in which
    /// case the tree is untouched and `surface` is dropped.
    pub fn split_leaf(
        &mut self,
        target: PaneId,
        orientation: SplitOrientation,
        profile: ProfileId,
        surface: Box<dyn Surface>,
        config: &EngineConfig,
    ) -> Option<(PaneId, PaneId)> {
        let mut surface = Some(surface);
        self.split_inner(target, orientation, profile, &mut surface, config)
    }

    fn split_inner(
        &mut self,
        target: PaneId,
        orientation: SplitOrientation,
        profile: ProfileId,
        surface: &mut Option<Box<dyn Surface>>,
        config: &EngineConfig,
    ) -> Option<(PaneId, PaneId)> {
        match self {
            PaneNode::Leaf(leaf) if leaf.id == target => {
                if !layout::can_split(leaf.size, orientation, config) {
                    log::debug!(
                        "refusing split of pane {:?}: {:?} too small at {:?}",
                        target,
                        orientation,
                        leaf.size
                    );
                    return None;
                }
                let size = leaf.size;
                let new_leaf = LeafPane::new(profile, surface.take()?, Size::ZERO);
                let new_id = new_leaf.id;
                let original = std::mem::replace(leaf, LeafPane::placeholder());
                *self = PaneNode::Split {
                    orientation,
                    ratio: 0.5,
                    size,
                    first: Box::new(PaneNode::Leaf(original)),
                    second: Box::new(PaneNode::Leaf(new_leaf)),
                };
                layout::resize_content(self, size, config);
                log::debug!(
                    "split pane {:?} {:?}: new pane {:?}",
                    target,
                    orientation,
                    new_id
                );
                Some((target, new_id))
            }
            PaneNode::Leaf(_) => None,
            PaneNode::Split { first, second, .. } => first
                .split_inner(target, orientation, profile, surface, config)
                .or_else(|| second.split_inner(target, orientation, profile, surface, config)),
        }
    }

    /// Remove the target leaf and collapse its parent split into the
    /// surviving sibling subtree, which inherits the split's full extent.
    /// Returns `RemovedSelf` when this node IS the target — the root-leaf
    /// case, owned by the caller. Collapse and parent replacement happen in
    /// one step, so the tree never holds a one-child split.
    pub fn remove_leaf(&mut self, target: PaneId, config: &EngineConfig) -> RemoveResult {
        let inherited = self.size();
        let survivor = match self {
            PaneNode::Leaf(leaf) if leaf.id == target => return RemoveResult::RemovedSelf,
            PaneNode::Leaf(_) => return RemoveResult::NotFound,
            PaneNode::Split { first, second, .. } => match first.remove_leaf(target, config) {
                RemoveResult::RemovedSelf => {
                    Some(std::mem::replace(second.as_mut(), PaneNode::placeholder()))
                }
                RemoveResult::Removed => None,
                RemoveResult::NotFound => match second.remove_leaf(target, config) {
                    RemoveResult::RemovedSelf => {
                        Some(std::mem::replace(first.as_mut(), PaneNode::placeholder()))
                    }
                    RemoveResult::Removed => None,
                    RemoveResult::NotFound => return RemoveResult::NotFound,
                },
            },
        };
        if let Some(survivor) = survivor {
            *self = survivor;
            layout::resize_content(self, inherited, config);
            log::debug!("collapsed split after closing pane {:?}", target);
        }
        RemoveResult::Removed
    }

    /// Push updated settings to every leaf created with `profile`.
    pub fn update_settings(&mut self, profile: ProfileId, settings: &SurfaceSettings) {
        match self {
            PaneNode::Leaf(leaf) => {
                if leaf.profile == profile {
                    leaf.surface.apply_settings(settings);
                }
            }
            PaneNode::Split { first, second, .. } => {
                first.update_settings(profile, settings);
                second.update_settings(profile, settings);
            }
        }
    }
}
