// Layout persistence: a serializable snapshot of a tab's pane tree that
// survives restarts. Only structure is captured (split shape, ratios, the
// profile each view was created with); the host recreates live views from
// the profiles on restore.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::EngineConfig;
use crate::pane::{PaneNode, ProfileId, Size, SplitOrientation};
use crate::surface::Surface;

/// Serializable snapshot of a pane tree node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum LayoutNode {
    Leaf {
        profile: ProfileId,
    },
    Split {
        orientation: String,
        ratio: f32,
        first: Box<LayoutNode>,
        second: Box<LayoutNode>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unknown split orientation: {0}")]
    UnknownOrientation(String),
}

fn orientation_name(orientation: SplitOrientation) -> &'static str {
    match orientation {
        SplitOrientation::Horizontal => "horizontal",
        SplitOrientation::Vertical => "vertical",
    }
}

fn parse_orientation(name: &str) -> Result<SplitOrientation, SessionError> {
    match name {
        "horizontal" => Ok(SplitOrientation::Horizontal),
        "vertical" => Ok(SplitOrientation::Vertical),
        other => Err(SessionError::UnknownOrientation(other.to_string())),
    }
}

impl LayoutNode {
    /// Snapshot the structure of a live pane tree.
    pub fn capture(node: &PaneNode) -> Self {
        match node {
            PaneNode::Leaf(leaf) => LayoutNode::Leaf {
                profile: leaf.profile,
            },
            PaneNode::Split {
                orientation,
                ratio,
                first,
                second,
                ..
            } => LayoutNode::Split {
                orientation: orientation_name(*orientation).to_string(),
                ratio: *ratio,
                first: Box::new(LayoutNode::capture(first)),
                second: Box::new(LayoutNode::capture(second)),
            },
        }
    }

    /// Rebuild a live pane tree at `size`, asking `make_surface` for a
    /// fresh view per leaf. The first in-order leaf starts active.
    pub fn restore(
        &self,
        size: Size,
        config: &EngineConfig,
        make_surface: &mut dyn FnMut(ProfileId) -> Box<dyn Surface>,
    ) -> Result<PaneNode, SessionError> {
        let mut root = self.restore_node(make_surface)?;
        crate::pane::layout::resize_content(&mut root, size, config);
        let first = root.leaf_ids()[0];
        root.set_active_leaf(first);
        Ok(root)
    }

    fn restore_node(
        &self,
        make_surface: &mut dyn FnMut(ProfileId) -> Box<dyn Surface>,
    ) -> Result<PaneNode, SessionError> {
        match self {
            LayoutNode::Leaf { profile } => Ok(PaneNode::new_leaf(
                *profile,
                make_surface(*profile),
                Size::ZERO,
            )),
            LayoutNode::Split {
                orientation,
                ratio,
                first,
                second,
            } => Ok(PaneNode::Split {
                orientation: parse_orientation(orientation)?,
                ratio: ratio.clamp(0.05, 0.95),
                size: Size::ZERO,
                first: Box::new(first.restore_node(make_surface)?),
                second: Box::new(second.restore_node(make_surface)?),
            }),
        }
    }

    /// Write the snapshot to disk as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("saved layout snapshot to {}", path.display());
        Ok(())
    }

    /// Read a snapshot previously written by [`LayoutNode::save`].
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
