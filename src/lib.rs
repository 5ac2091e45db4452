// panetree: pane-tree layout and focus-navigation engine backing a single
// terminal tab. A tab owns a binary tree of panes; leaves host terminal
// rendering surfaces, internal nodes split the available area in two. The
// crate implements splitting, close-and-collapse, directional resize,
// directional focus navigation, and the tab-level bookkeeping (active pane,
// title, icon) on top of that tree.
//
// Rendering, the UI thread, and the tab strip live outside this crate and
// are reached through the `surface`, `dispatch`, and `events` boundaries.

pub mod config;
pub mod dispatch;
pub mod events;
pub mod pane;
pub mod session;
pub mod surface;
pub mod tab;

pub use config::EngineConfig;
pub use pane::{Direction, PaneId, PaneNode, ProfileId, Size, SplitOrientation};
pub use surface::Surface;
pub use tab::Tab;
