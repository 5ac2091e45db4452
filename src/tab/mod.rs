// Tab controller: owns one pane tree, tracks the active pane, and bridges
// pane-level events up to the tab's owner. Display state the owner renders
// (tab text, icon) is updated through the deferred UI queue so structural
// mutation never re-enters the host mid-operation.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender};

use crate::config::EngineConfig;
use crate::dispatch::{AliveGuard, UiDispatcher};
use crate::events::{self, PaneEvent, TabEvent};
use crate::pane::{
    layout, navigate, Direction, PaneId, PaneNode, ProfileId, RemoveResult, Size, SplitOrientation,
};
use crate::surface::{Surface, SurfaceSettings};

static NEXT_TAB_ID: AtomicU32 = AtomicU32::new(1);

/// Unique identifier for a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub u32);

impl TabId {
    pub fn next() -> Self {
        Self(NEXT_TAB_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Owner-rendered state, written only from deferred UI jobs.
#[derive(Debug, Default)]
pub struct TabDisplay {
    /// Text shown on the tab header; mirrors the active pane's title.
    pub tab_text: String,
    /// Icon currently shown on the tab header.
    pub icon_path: Option<String>,
}

/// A single tab: a pane tree plus the state and plumbing around it.
pub struct Tab {
    pub id: TabId,
    root: PaneNode,
    active_pane: PaneId,
    focused: bool,
    /// Last icon pushed to the display; repeated updates with the same
    /// path skip the queue entirely.
    last_icon_path: Option<String>,
    config: EngineConfig,
    pane_tx: Sender<PaneEvent>,
    pane_rx: Receiver<PaneEvent>,
    tab_tx: Sender<TabEvent>,
    dispatcher: UiDispatcher,
    alive: AliveGuard,
    display: Arc<Mutex<TabDisplay>>,
}

impl Tab {
    /// Create a tab around its first terminal view. Returns the tab and
    /// the receiver its owner drains for [`TabEvent`]s.
    pub fn new(
        profile: ProfileId,
        surface: Box<dyn Surface>,
        size: Size,
        config: EngineConfig,
        dispatcher: UiDispatcher,
    ) -> (Self, Receiver<TabEvent>) {
        let root = PaneNode::new_root(profile, surface, size);
        let active_pane = root.leaf_ids()[0];
        let (pane_tx, pane_rx) = events::pane_channel();
        let (tab_tx, tab_rx) = events::tab_channel();
        let tab = Self {
            id: TabId::next(),
            root,
            active_pane,
            focused: false,
            last_icon_path: None,
            config,
            pane_tx,
            pane_rx,
            tab_tx,
            dispatcher,
            alive: AliveGuard::new(),
            display: Arc::new(Mutex::new(TabDisplay::default())),
        };
        tab.sync_tab_text();
        (tab, tab_rx)
    }

    /// Sender that pane surfaces use to report focus and close events.
    pub fn event_sender(&self) -> Sender<PaneEvent> {
        self.pane_tx.clone()
    }

    /// Display state for the owner to render; written via the UI queue.
    pub fn display(&self) -> Arc<Mutex<TabDisplay>> {
        Arc::clone(&self.display)
    }

    pub fn root(&self) -> &PaneNode {
        &self.root
    }

    pub fn active_pane(&self) -> PaneId {
        self.active_pane
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Record whether this tab is the window's focused tab. Gaining focus
    /// re-asserts keyboard focus on the active pane's view.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            if let Some(leaf) = self.root.find_leaf(self.active_pane) {
                leaf.surface.request_focus();
            }
        }
    }

    /// Title of the active pane's view; doubles as the tab's display text.
    pub fn active_title(&self) -> String {
        self.root
            .find_leaf(self.active_pane)
            .map(|leaf| leaf.surface.title())
            .unwrap_or_default()
    }

    /// Profile of the pane that last held keyboard focus. Owners use it to
    /// pick the profile for a new sibling tab or pane.
    pub fn focused_profile(&self) -> Option<ProfileId> {
        self.root.focused_profile()
    }

    pub fn active_has_selection(&self) -> bool {
        self.root
            .find_leaf(self.active_pane)
            .is_some_and(|leaf| leaf.surface.has_selection())
    }

    /// Scroll the active pane's viewport by `delta` lines.
    pub fn scroll(&self, delta: i32) {
        if let Some(leaf) = self.root.find_leaf(self.active_pane) {
            leaf.surface.scroll_lines(delta);
        }
    }

    // ── Layout operations ────────────────────────────────────────────

    /// Whether the active pane has room for a split in `orientation`.
    pub fn can_split_pane(&self, orientation: SplitOrientation) -> bool {
        self.root
            .can_split_leaf(self.active_pane, orientation, &self.config)
    }

    /// Split the active pane, hosting `surface` in the new half. Returns
    /// both pane ids, or `None` when the pane is too small; the tree is
    /// untouched in that case.
    pub fn split_pane(
        &mut self,
        orientation: SplitOrientation,
        profile: ProfileId,
        surface: Box<dyn Surface>,
    ) -> Option<(PaneId, PaneId)> {
        self.root
            .split_leaf(self.active_pane, orientation, profile, surface, &self.config)
    }

    /// Re-propagate a new content extent through the whole tree.
    pub fn resize_content(&mut self, size: Size) {
        layout::resize_content(&mut self.root, size, &self.config);
    }

    /// Positions of every pane within the tab's content region.
    pub fn pane_rects(&self) -> Vec<(PaneId, layout::Rect)> {
        layout::leaf_rects(&self.root, &self.config)
    }

    /// Nudge the separator nearest the active pane in `direction`.
    /// Returns false when there is no such separator or it is already at
    /// its minimum-size bound.
    pub fn resize_pane(&mut self, direction: Direction) -> bool {
        layout::resize_ratio(&mut self.root, self.active_pane, direction, &self.config)
    }

    /// Move focus to the neighboring pane in `direction`. Returns false
    /// when the active pane already sits on that edge.
    pub fn navigate_focus(&mut self, direction: Direction) -> bool {
        let target = match navigate::navigate_target(
            &self.root,
            self.active_pane,
            direction,
            &self.config,
        ) {
            Some(target) => target,
            None => return false,
        };
        self.activate_pane(target);
        true
    }

    /// Close the active pane, collapsing its parent split. Closing the
    /// last pane raises [`TabEvent::Closed`] instead.
    pub fn close_active_pane(&mut self) {
        self.close_pane(self.active_pane);
    }

    /// Push updated settings to every pane created with `profile`.
    pub fn update_settings(&mut self, profile: ProfileId, settings: &SurfaceSettings) {
        self.root.update_settings(profile, settings);
    }

    /// Show `icon_path` on the tab header. Updates that would not change
    /// the icon are dropped before they reach the queue.
    pub fn update_icon(&mut self, icon_path: String) {
        if self.last_icon_path.as_deref() == Some(icon_path.as_str()) {
            return;
        }
        self.last_icon_path = Some(icon_path.clone());
        let display = Arc::clone(&self.display);
        self.dispatcher.post(&self.alive.token(), move || {
            display.lock().unwrap().icon_path = Some(icon_path);
        });
    }

    // ── Event pump ───────────────────────────────────────────────────

    /// Drain pending pane events. Owners call this once per host tick,
    /// before draining the UI queue.
    pub fn pump_events(&mut self) {
        while let Ok(event) = self.pane_rx.try_recv() {
            match event {
                PaneEvent::GotFocus(id) => self.handle_got_focus(id),
                PaneEvent::Closed(id) => self.close_pane(id),
            }
        }
    }

    fn handle_got_focus(&mut self, id: PaneId) {
        if !self.root.contains(id) {
            log::debug!("ignoring focus event for unknown pane {:?}", id);
            return;
        }
        if id == self.active_pane {
            // Still the active pane; only the last-focused marker may need
            // a refresh.
            self.root.clear_active();
            self.root.set_active_leaf(id);
            return;
        }
        self.root.clear_active();
        self.root.set_active_leaf(id);
        self.active_pane = id;
        self.sync_tab_text();
        self.send_tab_event(TabEvent::ActivePaneChanged);
    }

    fn close_pane(&mut self, id: PaneId) {
        match self.root.remove_leaf(id, &self.config) {
            RemoveResult::RemovedSelf => {
                // Root leaf: the tab itself is done.
                self.send_tab_event(TabEvent::Closed);
            }
            RemoveResult::Removed => {
                if !self.root.contains(self.active_pane) {
                    let next = self.next_active_pane();
                    self.activate_pane(next);
                }
            }
            RemoveResult::NotFound => {
                log::debug!("ignoring close event for unknown pane {:?}", id);
            }
        }
    }

    /// After the active pane closes, prefer the surviving leaf that last
    /// held focus, falling back to the first leaf in order.
    fn next_active_pane(&self) -> PaneId {
        let ids = self.root.leaf_ids();
        ids.iter()
            .copied()
            .find(|id| {
                self.root
                    .find_leaf(*id)
                    .is_some_and(|leaf| leaf.last_focused)
            })
            .unwrap_or(ids[0])
    }

    fn activate_pane(&mut self, id: PaneId) {
        self.root.clear_active();
        self.root.set_active_leaf(id);
        self.active_pane = id;
        if let Some(leaf) = self.root.find_leaf(id) {
            leaf.surface.request_focus();
        }
        self.sync_tab_text();
        self.send_tab_event(TabEvent::ActivePaneChanged);
    }

    /// Mirror the active pane's title onto the tab header via the UI
    /// queue.
    fn sync_tab_text(&self) {
        let title = self.active_title();
        let display = Arc::clone(&self.display);
        self.dispatcher.post(&self.alive.token(), move || {
            display.lock().unwrap().tab_text = title;
        });
    }

    fn send_tab_event(&self, event: TabEvent) {
        if self.tab_tx.send(event).is_err() {
            log::debug!("tab owner gone; dropping {:?}", event);
        }
    }
}
