// Structural event plumbing: upward notifications from panes to the tab
// controller, and from the tab controller to its owner, carried over
// explicit channels instead of ambient callbacks. The tab controller is the
// single subscriber of pane events.

use crossbeam_channel::{Receiver, Sender};

use crate::pane::PaneId;

/// Events raised at the pane level, consumed by the owning tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneEvent {
    /// The view hosted by this pane gained keyboard focus.
    GotFocus(PaneId),
    /// The view hosted by this pane is closing.
    Closed(PaneId),
}

/// Events raised by a tab, consumed by the tab-strip/window owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabEvent {
    /// A different pane is now the target of tab-scope operations. The
    /// owner should re-query title or focused profile if it needs them.
    ActivePaneChanged,
    /// The tab's content is fully gone; remove the tab.
    Closed,
}

/// Create the pane-to-tab event channel.
pub fn pane_channel() -> (Sender<PaneEvent>, Receiver<PaneEvent>) {
    crossbeam_channel::unbounded()
}

/// Create the tab-to-owner event channel.
pub fn tab_channel() -> (Sender<TabEvent>, Receiver<TabEvent>) {
    crossbeam_channel::unbounded()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pane_channel_delivers_in_fifo_order() {
        let (tx, rx) = pane_channel();
        tx.send(PaneEvent::GotFocus(PaneId(1))).unwrap();
        tx.send(PaneEvent::Closed(PaneId(2))).unwrap();
        assert_eq!(rx.try_recv().unwrap(), PaneEvent::GotFocus(PaneId(1)));
        assert_eq!(rx.try_recv().unwrap(), PaneEvent::Closed(PaneId(2)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn tab_channel_delivers_events() {
        let (tx, rx) = tab_channel();
        tx.send(TabEvent::ActivePaneChanged).unwrap();
        assert_eq!(rx.try_recv().unwrap(), TabEvent::ActivePaneChanged);
    }
}
