//! Reactive render scheduling.
//!
//! Change notifications are coalesced by [`Debouncer`]s: every notification
//! re-arms the timer, so a burst of edits inside the window collapses into a
//! single render pass. Time is passed in explicitly; the host calls
//! [`RenderScheduler::poll`] from its event loop, at the latest when
//! [`RenderScheduler::next_deadline`] is reached.
//!
//! Timers:
//!
//! - structural: descriptor tree edits; when due, it arms the deferred timer;
//! - deferred: zero-delay tick that actually starts the render pass;
//! - resize: container size changes; refreshes the stored diagram size
//!   without re-layout.
//!
//! Attaching returns a [`Subscription`]. Revoking it (or dropping it)
//! cancels every pending timer and turns later notifications into no-ops.

use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

use log::{debug, trace};

use nut_graph_core::geometry::Size;

use crate::config::SchedulerConfig;

/// A re-armable one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms the timer to fire `delay` after `now`, replacing any pending
    /// deadline.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` and disarms if the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Where a change happened relative to the widget root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeTarget {
    Root,
    Descendant,
}

/// A change notification from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeRecord {
    /// Descriptors were added or removed under `target`.
    ChildList { target: ChangeTarget },
    /// An attribute of `target` changed from `old` to `new`.
    Attribute {
        target: ChangeTarget,
        name: String,
        old: Option<String>,
        new: Option<String>,
    },
    /// The rendered container changed size.
    Resize { client: Size, scroll: Size },
}

impl ChangeRecord {
    /// Whether this record should schedule work.
    ///
    /// Root attributes are configuration and go through the attribute
    /// synchronizer instead. Attribute writes that did not change the value
    /// are echoes of our own reflection.
    pub fn is_relevant(&self) -> bool {
        match self {
            Self::ChildList { .. } | Self::Resize { .. } => true,
            Self::Attribute {
                target: ChangeTarget::Root,
                ..
            } => false,
            Self::Attribute { old, new, .. } => old != new,
        }
    }
}

/// Revocable handle for everything a widget observes.
#[must_use = "dropping the subscription detaches the widget"]
#[derive(Debug)]
pub struct Subscription {
    active: Rc<Cell<bool>>,
}

impl Subscription {
    fn new() -> (Self, Rc<Cell<bool>>) {
        let active = Rc::new(Cell::new(true));
        (
            Self {
                active: Rc::clone(&active),
            },
            active,
        )
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Detaches explicitly. Same as dropping the handle.
    pub fn revoke(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

/// Work the scheduler hands back to its owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulerEvent {
    /// Run a full render pass.
    Render,
    /// Refresh the stored size from the latest container metrics.
    Resize { client: Size, scroll: Size },
}

/// Debounced scheduling of render passes and resizes.
#[derive(Debug)]
pub struct RenderScheduler {
    structural: Debouncer,
    deferred: Debouncer,
    resize: Debouncer,
    latest_metrics: Option<(Size, Size)>,
    active: Option<Rc<Cell<bool>>>,
}

impl RenderScheduler {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            structural: Debouncer::new(config.structural_debounce()),
            deferred: Debouncer::new(Duration::ZERO),
            resize: Debouncer::new(config.resize_debounce()),
            latest_metrics: None,
            active: None,
        }
    }

    /// Starts observing and schedules the first render pass on the next
    /// tick. A previous subscription is superseded.
    pub fn attach(&mut self, now: Instant) -> Subscription {
        if let Some(previous) = self.active.take() {
            previous.set(false);
        }
        self.cancel_all();

        let (subscription, active) = Subscription::new();
        self.active = Some(active);
        self.deferred.arm(now);
        debug!("Render scheduler attached");
        subscription
    }

    /// Returns `true` while a live subscription exists.
    pub fn is_active(&self) -> bool {
        self.active.as_ref().is_some_and(|active| active.get())
    }

    /// Feeds a change record. Returns `true` if it scheduled work.
    pub fn observe(&mut self, record: &ChangeRecord, now: Instant) -> bool {
        if !self.is_active() || !record.is_relevant() {
            return false;
        }

        match record {
            ChangeRecord::Resize { client, scroll } => {
                self.latest_metrics = Some((*client, *scroll));
                self.resize.arm(now);
            }
            ChangeRecord::ChildList { .. } | ChangeRecord::Attribute { .. } => {
                trace!(record:? = record; "Structural change");
                self.structural.arm(now);
            }
        }
        true
    }

    /// Schedules a render pass after the structural debounce window, the
    /// same way a structural edit does.
    pub fn request_render(&mut self, now: Instant) {
        if self.is_active() {
            self.structural.arm(now);
        }
    }

    /// Fires due timers. Teardown cancels everything and yields nothing.
    pub fn poll(&mut self, now: Instant) -> Vec<SchedulerEvent> {
        if !self.is_active() {
            self.cancel_all();
            return Vec::new();
        }

        let mut events = Vec::new();

        if self.resize.fire_if_due(now) {
            if let Some((client, scroll)) = self.latest_metrics {
                events.push(SchedulerEvent::Resize { client, scroll });
            }
        }

        if self.structural.fire_if_due(now) {
            self.deferred.arm(now);
        }
        if self.deferred.fire_if_due(now) {
            events.push(SchedulerEvent::Render);
        }

        events
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.is_active() {
            return None;
        }
        [&self.structural, &self.deferred, &self.resize]
            .into_iter()
            .filter_map(Debouncer::deadline)
            .min()
    }

    pub fn cancel_all(&mut self) {
        self.structural.cancel();
        self.deferred.cancel();
        self.resize.cancel();
    }

    /// Stops observing. Equivalent to revoking the subscription.
    pub fn detach(&mut self) {
        if let Some(active) = self.active.take() {
            active.set(false);
        }
        self.cancel_all();
        debug!("Render scheduler detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn child_list() -> ChangeRecord {
        ChangeRecord::ChildList {
            target: ChangeTarget::Descendant,
        }
    }

    fn scheduler() -> RenderScheduler {
        RenderScheduler::new(&SchedulerConfig::default())
    }

    #[test]
    fn test_debouncer_rearm_replaces_deadline() {
        let t0 = Instant::now();
        let mut timer = Debouncer::new(ms(33));

        timer.arm(t0);
        timer.arm(t0 + ms(20));
        assert!(!timer.fire_if_due(t0 + ms(40)));
        assert!(timer.fire_if_due(t0 + ms(53)));
        assert!(!timer.is_pending());
        assert!(!timer.fire_if_due(t0 + ms(100)));
    }

    #[test]
    fn test_first_render_on_next_tick() {
        let t0 = Instant::now();
        let mut scheduler = scheduler();
        let _subscription = scheduler.attach(t0);

        assert_eq!(scheduler.next_deadline(), Some(t0));
        assert_eq!(scheduler.poll(t0), vec![SchedulerEvent::Render]);
        assert!(scheduler.poll(t0 + ms(100)).is_empty());
    }

    #[test]
    fn test_burst_coalesces_into_one_render() {
        let t0 = Instant::now();
        let mut scheduler = scheduler();
        let _subscription = scheduler.attach(t0);
        scheduler.poll(t0);

        let mut renders = 0;
        for i in 0..50 {
            let now = t0 + ms(i);
            assert!(scheduler.observe(&child_list(), now));
            renders += scheduler.poll(now).len();
        }
        assert_eq!(renders, 0);

        let last = t0 + ms(49);
        assert_eq!(scheduler.next_deadline(), Some(last + ms(33)));
        assert_eq!(scheduler.poll(last + ms(33)), vec![SchedulerEvent::Render]);
    }

    #[test]
    fn test_irrelevant_records_filtered() {
        let t0 = Instant::now();
        let mut scheduler = scheduler();
        let _subscription = scheduler.attach(t0);
        scheduler.poll(t0);

        let echo = ChangeRecord::Attribute {
            target: ChangeTarget::Descendant,
            name: "width".to_string(),
            old: Some("80".to_string()),
            new: Some("80".to_string()),
        };
        let root = ChangeRecord::Attribute {
            target: ChangeTarget::Root,
            name: "x".to_string(),
            old: Some("0".to_string()),
            new: Some("10".to_string()),
        };
        assert!(!scheduler.observe(&echo, t0));
        assert!(!scheduler.observe(&root, t0));
        assert_eq!(scheduler.next_deadline(), None);

        assert!(scheduler.observe(
            &ChangeRecord::ChildList {
                target: ChangeTarget::Root
            },
            t0
        ));
    }

    #[test]
    fn test_resize_reports_latest_metrics() {
        let t0 = Instant::now();
        let mut scheduler = scheduler();
        let _subscription = scheduler.attach(t0);
        scheduler.poll(t0);

        for width in [100.0, 200.0, 300.0] {
            scheduler.observe(
                &ChangeRecord::Resize {
                    client: Size::new(width, 50.0),
                    scroll: Size::new(width, 60.0),
                },
                t0,
            );
        }
        assert!(scheduler.poll(t0 + ms(199)).is_empty());
        assert_eq!(
            scheduler.poll(t0 + ms(200)),
            vec![SchedulerEvent::Resize {
                client: Size::new(300.0, 50.0),
                scroll: Size::new(300.0, 60.0),
            }]
        );
    }

    #[test]
    fn test_dropping_subscription_cancels_everything() {
        let t0 = Instant::now();
        let mut scheduler = scheduler();
        let subscription = scheduler.attach(t0);
        scheduler.observe(&child_list(), t0);
        assert!(subscription.is_active());

        subscription.revoke();
        assert!(!scheduler.is_active());
        assert_eq!(scheduler.next_deadline(), None);
        assert!(scheduler.poll(t0 + ms(1000)).is_empty());
        assert!(!scheduler.observe(&child_list(), t0));
    }

    #[test]
    fn test_reattach_supersedes_previous_subscription() {
        let t0 = Instant::now();
        let mut scheduler = scheduler();
        let first = scheduler.attach(t0);
        let second = scheduler.attach(t0);

        assert!(!first.is_active());
        assert!(second.is_active());
        drop(first);
        assert!(scheduler.is_active());
    }
}
