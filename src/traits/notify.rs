//! Power-change notification trait.
//!
//! The command station above this crate usually wants to know when a
//! channel energizes or de-energizes its track, so it can update throttles,
//! broadcast to clients, or log the event. [`PowerMonitor`] is that
//! capability, injected into the channel at construction.
//!
//! The callback fires synchronously from [`power`] whenever it is called
//! with `announce = true`, including the automatic off/on transitions the
//! overload protection performs. It is fire-and-forget: the channel never
//! inspects a result.
//!
//! [`power`]: crate::PowerChannel::power

/// Receiver for channel power-state changes.
///
/// Implemented for any `FnMut(&str, bool)` closure, so a plain function
/// works as a monitor:
///
/// ```rust
/// use rs_trackpower::traits::PowerMonitor;
///
/// let mut last = None;
/// {
///     let mut monitor = |name: &str, on: bool| last = Some((name.to_owned(), on));
///     monitor.power_changed("MAIN", true);
/// }
/// assert_eq!(last, Some(("MAIN".to_owned(), true)));
/// ```
pub trait PowerMonitor {
    /// Called with the channel name and the new power state.
    fn power_changed(&mut self, name: &str, on: bool);
}

impl<F: FnMut(&str, bool)> PowerMonitor for F {
    fn power_changed(&mut self, name: &str, on: bool) {
        self(name, on)
    }
}

/// Monitor that ignores all notifications.
///
/// The default monitor for channels constructed without one.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullMonitor;

impl PowerMonitor for NullMonitor {
    fn power_changed(&mut self, _name: &str, _on: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_as_monitor() {
        let mut seen = Vec::new();
        {
            let mut monitor = |name: &str, on: bool| seen.push((name.to_owned(), on));
            monitor.power_changed("MAIN", true);
            monitor.power_changed("MAIN", false);
        }
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], ("MAIN".to_owned(), true));
        assert_eq!(seen[1], ("MAIN".to_owned(), false));
    }

    #[test]
    fn null_monitor_is_silent() {
        let mut monitor = NullMonitor;
        monitor.power_changed("PROG", true); // nothing to observe; must not panic
    }
}
