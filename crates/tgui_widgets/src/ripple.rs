//! Ripple feedback
//!
//! A pointer-down on a tappable surface starts a wave at the pointer's local
//! position. Each active pointer owns at most one wave; the wave is retired
//! when the pointer lifts, cancels or leaves, or when its lifetime elapses,
//! whichever comes first.
//!
//! Lifetime expiry runs on the shared [`Scheduler`]. Every wave carries a
//! generation so an expiry scheduled for a replaced wave never retires the
//! wave that replaced it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use indexmap::IndexMap;
use tgui_animation::{Scheduler, TimerId};
use tgui_core::reactive::{Effect, ReactiveGraph, Signal};
use tgui_dom::{Document, NodeId};

/// How long a wave stays on screen without a release
pub const WAVE_LIFETIME: Duration = Duration::from_millis(300);

/// One expanding circle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleWave {
    /// Position relative to the tappable's box
    pub x: f32,
    pub y: f32,
    /// Scheduler time the wave started, in milliseconds
    pub timestamp: u64,
    pub pointer_id: i32,
}

struct ActiveWave {
    wave: RippleWave,
    generation: u64,
    timer: TimerId,
}

struct RippleState {
    graph: Rc<ReactiveGraph>,
    published: Signal<Vec<RippleWave>>,
    active: RefCell<IndexMap<i32, ActiveWave>>,
    next_generation: Cell<u64>,
}

impl RippleState {
    /// Remove the wave for `pointer_id`, optionally only if it is still `generation`
    fn take(&self, pointer_id: i32, generation: Option<u64>) -> Option<ActiveWave> {
        let mut active = self.active.borrow_mut();
        let matches = active
            .get(&pointer_id)
            .is_some_and(|entry| generation.map_or(true, |g| entry.generation == g));
        if matches {
            active.shift_remove(&pointer_id)
        } else {
            None
        }
    }

    fn publish(&self) {
        let waves: Vec<RippleWave> = self
            .active
            .borrow()
            .values()
            .map(|entry| entry.wave)
            .collect();
        self.graph.set(self.published, waves);
    }
}

/// Active waves keyed by pointer id, in insertion order
pub struct RippleTracker {
    scheduler: Rc<Scheduler>,
    lifetime: Duration,
    state: Rc<RippleState>,
}

impl RippleTracker {
    pub fn new(graph: Rc<ReactiveGraph>, scheduler: Rc<Scheduler>, lifetime: Duration) -> Self {
        let published = graph.create_signal(Vec::new());
        Self {
            scheduler,
            lifetime,
            state: Rc::new(RippleState {
                graph,
                published,
                active: RefCell::new(IndexMap::new()),
                next_generation: Cell::new(0),
            }),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Start a wave for `pointer_id`, replacing any wave it already owns
    pub fn add_wave(&self, pointer_id: i32, x: f32, y: f32) -> RippleWave {
        let wave = RippleWave {
            x,
            y,
            timestamp: self.scheduler.now_ms(),
            pointer_id,
        };
        let generation = self.state.next_generation.get();
        self.state.next_generation.set(generation + 1);

        let weak: Weak<RippleState> = Rc::downgrade(&self.state);
        let timer = self.scheduler.schedule(self.lifetime, move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            if state.take(pointer_id, Some(generation)).is_some() {
                tracing::trace!("ripple wave for pointer {} expired", pointer_id);
                state.publish();
            }
        });

        let replaced = self.state.active.borrow_mut().insert(
            pointer_id,
            ActiveWave {
                wave,
                generation,
                timer,
            },
        );
        if let Some(previous) = replaced {
            self.scheduler.cancel(previous.timer);
        }

        tracing::trace!(
            "ripple wave added for pointer {} at ({}, {})",
            pointer_id,
            x,
            y
        );
        self.state.publish();
        wave
    }

    /// Retire the wave owned by `pointer_id`; false if it had none
    pub fn retire(&self, pointer_id: i32) -> bool {
        match self.state.take(pointer_id, None) {
            Some(entry) => {
                self.scheduler.cancel(entry.timer);
                tracing::trace!("ripple wave retired for pointer {}", pointer_id);
                self.state.publish();
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        let drained: Vec<ActiveWave> = self
            .state
            .active
            .borrow_mut()
            .drain(..)
            .map(|(_, entry)| entry)
            .collect();
        if drained.is_empty() {
            return;
        }
        for entry in drained {
            self.scheduler.cancel(entry.timer);
        }
        self.state.publish();
    }

    /// Current waves (reactive)
    pub fn waves(&self) -> Vec<RippleWave> {
        self.state
            .graph
            .get(self.state.published)
            .unwrap_or_default()
    }

    pub fn waves_signal(&self) -> Signal<Vec<RippleWave>> {
        self.state.published
    }

    pub fn len(&self) -> usize {
        self.state.active.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for RippleTracker {
    fn drop(&mut self) {
        for (_, entry) in self.state.active.borrow_mut().drain(..) {
            self.scheduler.cancel(entry.timer);
        }
        self.state.graph.dispose_signal(self.state.published);
    }
}

/// Renders a wave list as `span.tgui-ripple__wave` elements
///
/// Wave elements are keyed by pointer id: a change to one pointer's wave
/// leaves the elements of the other pointers in place, so their animations
/// keep running.
pub struct Ripple {
    graph: Rc<ReactiveGraph>,
    document: Document,
    host: Option<NodeId>,
    rendered: Rc<RefCell<IndexMap<i32, RenderedWave>>>,
    effect: Option<Effect>,
}

struct RenderedWave {
    wave: RippleWave,
    node: NodeId,
}

impl Ripple {
    pub const HOST_CLASS: &'static str = "tgui-ripple";
    pub const WAVE_CLASS: &'static str = "tgui-ripple__wave";

    pub fn mount(
        graph: Rc<ReactiveGraph>,
        document: Document,
        parent: NodeId,
        waves: Signal<Vec<RippleWave>>,
    ) -> tgui_dom::Result<Self> {
        let host = document.create_element("span");
        let attached = document
            .add_class(host, Self::HOST_CLASS)
            .and_then(|_| document.append_child(parent, host));
        if let Err(err) = attached {
            document.remove_node(host);
            return Err(err);
        }

        let rendered = Rc::new(RefCell::new(IndexMap::new()));
        let effect = {
            let document = document.clone();
            let rendered = rendered.clone();
            graph.create_effect(move |g| {
                let waves = g.get(waves).unwrap_or_default();
                let mut rendered = rendered.borrow_mut();
                if let Err(err) = sync_waves(&document, host, &mut rendered, &waves) {
                    tracing::warn!("ripple render failed: {}", err);
                }
            })
        };

        Ok(Self {
            graph,
            document,
            host: Some(host),
            rendered,
            effect: Some(effect),
        })
    }

    pub fn host(&self) -> Option<NodeId> {
        self.host
    }

    /// Wave elements in insertion order
    pub fn wave_nodes(&self) -> Vec<NodeId> {
        self.rendered
            .borrow()
            .values()
            .map(|rendered| rendered.node)
            .collect()
    }

    pub fn unmount(&mut self) {
        if let Some(effect) = self.effect.take() {
            self.graph.dispose_effect(effect);
        }
        self.rendered.borrow_mut().clear();
        if let Some(host) = self.host.take() {
            self.document.remove_node(host);
        }
    }
}

impl Drop for Ripple {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn sync_waves(
    document: &Document,
    host: NodeId,
    rendered: &mut IndexMap<i32, RenderedWave>,
    waves: &[RippleWave],
) -> tgui_dom::Result<()> {
    if !document.contains(host) {
        rendered.clear();
        return Ok(());
    }

    // Retired pointers, and pointers whose wave was replaced by a new press
    rendered.retain(|pointer_id, current| {
        let keep = waves
            .iter()
            .any(|wave| wave.pointer_id == *pointer_id && *wave == current.wave);
        if !keep {
            document.remove_node(current.node);
        }
        keep
    });

    for wave in waves {
        if rendered.contains_key(&wave.pointer_id) {
            continue;
        }
        let node = document.create_element("span");
        let built = document
            .add_class(node, Ripple::WAVE_CLASS)
            .and_then(|_| {
                document.set_attribute(
                    node,
                    "style",
                    &format!("left:{}px;top:{}px", wave.x, wave.y),
                )
            })
            .and_then(|_| document.append_child(host, node));
        if let Err(err) = built {
            document.remove_node(node);
            return Err(err);
        }
        rendered.insert(wave.pointer_id, RenderedWave { wave: *wave, node });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> (Rc<Scheduler>, RippleTracker) {
        let graph = Rc::new(ReactiveGraph::new());
        let scheduler = Rc::new(Scheduler::new());
        let tracker = RippleTracker::new(graph, scheduler.clone(), WAVE_LIFETIME);
        (scheduler, tracker)
    }

    #[test]
    fn test_wave_expires_after_lifetime() {
        let (scheduler, tracker) = tracker();
        tracker.add_wave(1, 10.0, 20.0);

        scheduler.advance_by(Duration::from_millis(299));
        assert_eq!(tracker.len(), 1);

        scheduler.advance_by(Duration::from_millis(1));
        assert!(tracker.is_empty());
        assert!(tracker.waves().is_empty());
    }

    #[test]
    fn test_replaced_wave_survives_old_timer() {
        let (scheduler, tracker) = tracker();
        tracker.add_wave(1, 0.0, 0.0);
        scheduler.advance_by(Duration::from_millis(200));
        tracker.add_wave(1, 5.0, 5.0);

        // The first wave's deadline passes; the replacement stays
        scheduler.advance_by(Duration::from_millis(150));
        let waves = tracker.waves();
        assert_eq!(waves.len(), 1);
        assert_eq!(waves[0].x, 5.0);
        assert_eq!(waves[0].timestamp, 200);

        scheduler.advance_by(Duration::from_millis(150));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_retire_is_idempotent_and_cancels_timer() {
        let (scheduler, tracker) = tracker();
        tracker.add_wave(7, 1.0, 1.0);
        assert_eq!(scheduler.pending_count(), 1);

        assert!(tracker.retire(7));
        assert!(!tracker.retire(7));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_waves_keep_insertion_order() {
        let (_scheduler, tracker) = tracker();
        tracker.add_wave(3, 0.0, 0.0);
        tracker.add_wave(1, 0.0, 0.0);
        tracker.add_wave(2, 0.0, 0.0);
        tracker.retire(1);

        let ids: Vec<i32> = tracker.waves().iter().map(|w| w.pointer_id).collect();
        assert_eq!(ids, vec![3, 2]);

        tracker.clear();
        assert!(tracker.waves().is_empty());
    }

    #[test]
    fn test_renderer_mirrors_waves() {
        let graph = Rc::new(ReactiveGraph::new());
        let scheduler = Rc::new(Scheduler::new());
        let tracker = RippleTracker::new(graph.clone(), scheduler, WAVE_LIFETIME);
        let document = Document::new();
        let ripple = Ripple::mount(
            graph,
            document.clone(),
            document.body(),
            tracker.waves_signal(),
        )
        .unwrap();

        tracker.add_wave(1, 4.0, 8.0);
        let nodes = ripple.wave_nodes();
        assert_eq!(nodes.len(), 1);
        assert!(document.has_class(nodes[0], Ripple::WAVE_CLASS));
        assert_eq!(
            document.attribute(nodes[0], "style").as_deref(),
            Some("left:4px;top:8px")
        );

        tracker.retire(1);
        assert!(ripple.wave_nodes().is_empty());
    }

    #[test]
    fn test_renderer_keeps_other_pointers_nodes() {
        let graph = Rc::new(ReactiveGraph::new());
        let scheduler = Rc::new(Scheduler::new());
        let tracker = RippleTracker::new(graph.clone(), scheduler, WAVE_LIFETIME);
        let document = Document::new();
        let ripple = Ripple::mount(
            graph,
            document.clone(),
            document.body(),
            tracker.waves_signal(),
        )
        .unwrap();

        tracker.add_wave(1, 4.0, 8.0);
        let first = ripple.wave_nodes()[0];

        tracker.add_wave(2, 10.0, 10.0);
        assert!(document.contains(first));
        assert_eq!(ripple.wave_nodes()[0], first);
        let second = ripple.wave_nodes()[1];

        tracker.retire(2);
        assert!(document.contains(first));
        assert!(!document.contains(second));

        // A new press by the same pointer restarts its wave
        tracker.add_wave(1, 6.0, 6.0);
        let restarted = ripple.wave_nodes();
        assert_eq!(restarted.len(), 1);
        assert_ne!(restarted[0], first);
        assert_eq!(
            document.attribute(restarted[0], "style").as_deref(),
            Some("left:6px;top:6px")
        );
    }
}
