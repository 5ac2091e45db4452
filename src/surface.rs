// Rendering-surface boundary: the contract a host's terminal view must
// satisfy for the pane tree to drive it. The crate never renders anything
// itself; it only asks surfaces about their title/selection/scroll state and
// issues focus and scroll requests.

/// Per-profile settings a host may push down to matching surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSettings {
    pub scrollback_lines: u32,
    pub cursor_blink: bool,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            scrollback_lines: 10_000,
            cursor_blink: true,
        }
    }
}

/// Handle to the terminal view hosted by a leaf pane. Owned by the leaf,
/// implemented by the embedding application.
pub trait Surface {
    /// Current display title of the view.
    fn title(&self) -> String;

    /// Ask the host to give this view keyboard focus. The host answers by
    /// sending `PaneEvent::GotFocus` for the owning pane.
    fn request_focus(&self);

    /// Scroll the viewport by a number of lines; negative scrolls up.
    fn scroll_lines(&self, delta: i32);

    /// Current scroll offset in lines from the bottom of the buffer.
    fn scroll_offset(&self) -> i32;

    /// Whether the view currently has an active text selection.
    fn has_selection(&self) -> bool;

    /// Apply updated per-profile settings.
    fn apply_settings(&self, settings: &SurfaceSettings);
}

/// A surface that ignores every request. Used as the placeholder during
/// tree surgery and available to hosts and tests that need an inert view.
#[derive(Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn title(&self) -> String {
        String::new()
    }

    fn request_focus(&self) {}

    fn scroll_lines(&self, _delta: i32) {}

    fn scroll_offset(&self) -> i32 {
        0
    }

    fn has_selection(&self) -> bool {
        false
    }

    fn apply_settings(&self, _settings: &SurfaceSettings) {}
}
