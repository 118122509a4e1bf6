//! Reactive signal graph
//!
//! A single-threaded dependency graph of three node kinds:
//!
//! - **Signals** hold a value written through [`ReactiveGraph::set`].
//! - **Derived** values are computed from other nodes. They are marked dirty
//!   when a dependency changes and recomputed lazily on the next read, so a
//!   batch of writes costs at most one recomputation.
//! - **Effects** run immediately when created and again after every write (or
//!   once at the end of a [`ReactiveGraph::batch`]) that touches one of the
//!   nodes they read during their previous run.
//!
//! Dependencies are tracked automatically: whatever a derived value or an
//! effect reads through the graph while running becomes its dependency set
//! for the next run.
//!
//! Effects may write signals. Writes issued while effects are flushing are
//! queued and picked up by the same flush loop.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Unique identifier for a signal
    pub struct SignalId;
    /// Unique identifier for a derived value
    pub struct DerivedId;
    /// Unique identifier for an effect
    pub struct EffectId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    Signal(SignalId),
    Derived(DerivedId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Subscriber {
    Derived(DerivedId),
    Effect(EffectId),
}

type Sources = SmallVec<[Source; 4]>;
type Subscribers = SmallVec<[Subscriber; 4]>;
type ComputeFn = Box<dyn Fn(&ReactiveGraph) -> Box<dyn Any>>;
type EffectFn = Box<dyn FnMut(&ReactiveGraph)>;

struct SignalNode {
    value: Box<dyn Any>,
    subscribers: Subscribers,
}

struct DerivedNode {
    /// Taken out while the computation runs
    compute: Option<ComputeFn>,
    value: Option<Box<dyn Any>>,
    dirty: bool,
    sources: Sources,
    subscribers: Subscribers,
}

struct EffectNode {
    /// Taken out while the effect runs
    run: Option<EffectFn>,
    sources: Sources,
}

/// Typed handle to a signal stored in a [`ReactiveGraph`]
pub struct Signal<T> {
    id: SignalId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Signal<T> {
    /// Get the untyped signal id
    pub fn id(&self) -> SignalId {
        self.id
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Signal<T> {}

impl<T> PartialEq for Signal<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Signal<T> {}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&self.id).finish()
    }
}

/// Typed handle to a derived value stored in a [`ReactiveGraph`]
pub struct Derived<T> {
    id: DerivedId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Derived<T> {
    /// Get the untyped derived id
    pub fn id(&self) -> DerivedId {
        self.id
    }
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Derived<T> {}

impl<T> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Derived").field(&self.id).finish()
    }
}

/// Handle to a registered effect, used to dispose it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn id(&self) -> EffectId {
        self.id
    }
}

/// The reactive dependency graph
///
/// All methods take `&self`; the graph is meant to be shared through an `Rc`
/// by the services and widgets of one UI tree.
pub struct ReactiveGraph {
    signals: RefCell<SlotMap<SignalId, SignalNode>>,
    derived: RefCell<SlotMap<DerivedId, DerivedNode>>,
    effects: RefCell<SlotMap<EffectId, EffectNode>>,
    pending: RefCell<VecDeque<EffectId>>,
    tracking: RefCell<Vec<Sources>>,
    batch_depth: Cell<u32>,
    flushing: Cell<bool>,
}

impl ReactiveGraph {
    pub fn new() -> Self {
        Self {
            signals: RefCell::new(SlotMap::with_key()),
            derived: RefCell::new(SlotMap::with_key()),
            effects: RefCell::new(SlotMap::with_key()),
            pending: RefCell::new(VecDeque::new()),
            tracking: RefCell::new(Vec::new()),
            batch_depth: Cell::new(0),
            flushing: Cell::new(false),
        }
    }

    // ========== Signals ==========

    /// Create a signal with an initial value
    pub fn create_signal<T: 'static>(&self, initial: T) -> Signal<T> {
        let id = self.signals.borrow_mut().insert(SignalNode {
            value: Box::new(initial),
            subscribers: Subscribers::new(),
        });
        Signal {
            id,
            _marker: PhantomData,
        }
    }

    /// Read a signal, registering it as a dependency of the running computation
    pub fn get<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        self.track(Source::Signal(signal.id));
        self.get_untracked(signal)
    }

    /// Read a signal without registering a dependency
    pub fn get_untracked<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        self.signals
            .borrow()
            .get(signal.id)
            .and_then(|node| node.value.downcast_ref::<T>())
            .cloned()
    }

    /// Write a signal and notify its dependents
    ///
    /// Every write notifies, even when the new value equals the old one.
    pub fn set<T: 'static>(&self, signal: Signal<T>, value: T) {
        let subscribers = {
            let mut signals = self.signals.borrow_mut();
            let Some(node) = signals.get_mut(signal.id) else {
                tracing::trace!("ReactiveGraph::set - signal {:?} was disposed", signal.id);
                return;
            };
            node.value = Box::new(value);
            node.subscribers.clone()
        };

        self.notify(&subscribers);
        if self.batch_depth.get() == 0 {
            self.flush();
        }
    }

    /// Update a signal in place
    pub fn update<T: Clone + 'static, F: FnOnce(&mut T)>(&self, signal: Signal<T>, f: F) {
        if let Some(mut value) = self.get_untracked(signal) {
            f(&mut value);
            self.set(signal, value);
        }
    }

    /// Remove a signal from the graph
    pub fn dispose_signal<T>(&self, signal: Signal<T>) {
        self.signals.borrow_mut().remove(signal.id);
    }

    // ========== Derived Values ==========

    /// Create a derived value computed from other nodes
    ///
    /// The computation does not run until the value is first read.
    pub fn create_derived<T, F>(&self, compute: F) -> Derived<T>
    where
        T: 'static,
        F: Fn(&ReactiveGraph) -> T + 'static,
    {
        let compute: ComputeFn = Box::new(move |graph| Box::new(compute(graph)) as Box<dyn Any>);
        let id = self.derived.borrow_mut().insert(DerivedNode {
            compute: Some(compute),
            value: None,
            dirty: true,
            sources: Sources::new(),
            subscribers: Subscribers::new(),
        });
        Derived {
            id,
            _marker: PhantomData,
        }
    }

    /// Read a derived value, recomputing it first if a dependency changed
    pub fn get_derived<T: Clone + 'static>(&self, derived: Derived<T>) -> Option<T> {
        self.track(Source::Derived(derived.id));
        self.refresh_derived(derived.id);
        self.derived
            .borrow()
            .get(derived.id)
            .and_then(|node| node.value.as_ref())
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    fn refresh_derived(&self, id: DerivedId) {
        let (compute, stale_sources) = {
            let mut derived = self.derived.borrow_mut();
            let Some(node) = derived.get_mut(id) else {
                return;
            };
            if !node.dirty && node.value.is_some() {
                return;
            }
            // A derived value reading itself keeps its previous value
            let Some(compute) = node.compute.take() else {
                return;
            };
            (compute, std::mem::take(&mut node.sources))
        };

        self.unsubscribe(Subscriber::Derived(id), &stale_sources);
        self.tracking.borrow_mut().push(Sources::new());
        let value = compute(self);
        let sources = self.tracking.borrow_mut().pop().unwrap_or_default();
        self.subscribe(Subscriber::Derived(id), &sources);

        let mut derived = self.derived.borrow_mut();
        if let Some(node) = derived.get_mut(id) {
            node.compute = Some(compute);
            node.value = Some(value);
            node.dirty = false;
            node.sources = sources;
        }
    }

    // ========== Effects ==========

    /// Create an effect; it runs once immediately to collect its dependencies
    pub fn create_effect<F>(&self, run: F) -> Effect
    where
        F: FnMut(&ReactiveGraph) + 'static,
    {
        let id = self.effects.borrow_mut().insert(EffectNode {
            run: Some(Box::new(run)),
            sources: Sources::new(),
        });
        self.run_effect(id);
        Effect { id }
    }

    /// Stop an effect and release its dependencies
    pub fn dispose_effect(&self, effect: Effect) {
        let removed = self.effects.borrow_mut().remove(effect.id);
        if let Some(node) = removed {
            self.unsubscribe(Subscriber::Effect(effect.id), &node.sources);
        }
        self.pending.borrow_mut().retain(|id| *id != effect.id);
    }

    fn run_effect(&self, id: EffectId) {
        let (mut run, stale_sources) = {
            let mut effects = self.effects.borrow_mut();
            let Some(node) = effects.get_mut(id) else {
                return;
            };
            let Some(run) = node.run.take() else {
                return;
            };
            (run, std::mem::take(&mut node.sources))
        };

        self.unsubscribe(Subscriber::Effect(id), &stale_sources);
        self.tracking.borrow_mut().push(Sources::new());
        run(self);
        let sources = self.tracking.borrow_mut().pop().unwrap_or_default();

        let still_alive = {
            let mut effects = self.effects.borrow_mut();
            match effects.get_mut(id) {
                Some(node) => {
                    node.run = Some(run);
                    node.sources = sources.clone();
                    true
                }
                // Disposed from inside its own run; `run` is dropped here
                None => false,
            }
        };
        if still_alive {
            self.subscribe(Subscriber::Effect(id), &sources);
        }
    }

    // ========== Batching ==========

    /// Run `f` with effect flushing deferred until it returns
    ///
    /// Effects affected by any number of writes inside the batch run once.
    pub fn batch<R>(&self, f: impl FnOnce() -> R) -> R {
        self.batch_depth.set(self.batch_depth.get() + 1);
        let result = f();
        self.batch_depth.set(self.batch_depth.get() - 1);
        if self.batch_depth.get() == 0 {
            self.flush();
        }
        result
    }

    fn flush(&self) {
        if self.flushing.get() {
            return;
        }
        self.flushing.set(true);
        loop {
            let next = self.pending.borrow_mut().pop_front();
            match next {
                Some(id) => self.run_effect(id),
                None => break,
            }
        }
        self.flushing.set(false);
    }

    // ========== Dependency Tracking ==========

    fn track(&self, source: Source) {
        if let Some(frame) = self.tracking.borrow_mut().last_mut() {
            if !frame.contains(&source) {
                frame.push(source);
            }
        }
    }

    fn notify(&self, subscribers: &[Subscriber]) {
        let mut queue: VecDeque<Subscriber> = subscribers.iter().copied().collect();
        while let Some(subscriber) = queue.pop_front() {
            match subscriber {
                Subscriber::Derived(id) => {
                    let mut derived = self.derived.borrow_mut();
                    if let Some(node) = derived.get_mut(id) {
                        if !node.dirty {
                            node.dirty = true;
                            queue.extend(node.subscribers.iter().copied());
                        }
                    }
                }
                Subscriber::Effect(id) => {
                    let mut pending = self.pending.borrow_mut();
                    if !pending.contains(&id) {
                        pending.push_back(id);
                    }
                }
            }
        }
    }

    fn subscribe(&self, subscriber: Subscriber, sources: &[Source]) {
        for source in sources {
            match *source {
                Source::Signal(id) => {
                    if let Some(node) = self.signals.borrow_mut().get_mut(id) {
                        if !node.subscribers.contains(&subscriber) {
                            node.subscribers.push(subscriber);
                        }
                    }
                }
                Source::Derived(id) => {
                    if let Some(node) = self.derived.borrow_mut().get_mut(id) {
                        if !node.subscribers.contains(&subscriber) {
                            node.subscribers.push(subscriber);
                        }
                    }
                }
            }
        }
    }

    fn unsubscribe(&self, subscriber: Subscriber, sources: &[Source]) {
        for source in sources {
            match *source {
                Source::Signal(id) => {
                    if let Some(node) = self.signals.borrow_mut().get_mut(id) {
                        node.subscribers.retain(|s| *s != subscriber);
                    }
                }
                Source::Derived(id) => {
                    if let Some(node) = self.derived.borrow_mut().get_mut(id) {
                        node.subscribers.retain(|s| *s != subscriber);
                    }
                }
            }
        }
    }

    // ========== Introspection ==========

    /// Number of live signals
    pub fn signal_count(&self) -> usize {
        self.signals.borrow().len()
    }

    /// Number of live effects
    pub fn effect_count(&self) -> usize {
        self.effects.borrow().len()
    }
}

impl Default for ReactiveGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_signal_get_set() {
        let graph = ReactiveGraph::new();
        let name = graph.create_signal(String::from("base"));

        assert_eq!(graph.get(name), Some("base".to_string()));
        graph.set(name, "ios".to_string());
        assert_eq!(graph.get(name), Some("ios".to_string()));
    }

    #[test]
    fn test_derived_is_lazy_and_cached() {
        let graph = ReactiveGraph::new();
        let count = graph.create_signal(1);
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();

        let doubled = graph.create_derived(move |g| {
            runs_clone.set(runs_clone.get() + 1);
            g.get(count).unwrap_or(0) * 2
        });

        assert_eq!(runs.get(), 0);
        assert_eq!(graph.get_derived(doubled), Some(2));
        assert_eq!(graph.get_derived(doubled), Some(2));
        assert_eq!(runs.get(), 1);

        graph.set(count, 2);
        graph.set(count, 3);
        assert_eq!(runs.get(), 1);
        assert_eq!(graph.get_derived(doubled), Some(6));
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_effect_runs_on_create_and_on_write() {
        let graph = ReactiveGraph::new();
        let count = graph.create_signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let _effect = graph.create_effect(move |g| {
            seen_clone.borrow_mut().push(g.get(count).unwrap_or(-1));
        });

        graph.set(count, 1);
        graph.set(count, 2);
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_batch_runs_effect_once() {
        let graph = ReactiveGraph::new();
        let a = graph.create_signal(0);
        let b = graph.create_signal(0);
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();

        let _effect = graph.create_effect(move |g| {
            let _ = g.get(a);
            let _ = g.get(b);
            runs_clone.set(runs_clone.get() + 1);
        });
        assert_eq!(runs.get(), 1);

        graph.batch(|| {
            graph.set(a, 1);
            graph.set(b, 1);
            graph.set(a, 2);
        });
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_effect_through_derived() {
        let graph = ReactiveGraph::new();
        let count = graph.create_signal(1);
        let is_even = graph.create_derived(move |g| g.get(count).unwrap_or(0) % 2 == 0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let _effect = graph.create_effect(move |g| {
            seen_clone.borrow_mut().push(g.get_derived(is_even).unwrap_or(false));
        });

        graph.set(count, 2);
        graph.set(count, 3);
        assert_eq!(*seen.borrow(), vec![false, true, false]);
    }

    #[test]
    fn test_dependencies_are_retracked_each_run() {
        let graph = ReactiveGraph::new();
        let use_a = graph.create_signal(true);
        let a = graph.create_signal(1);
        let b = graph.create_signal(10);
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();

        let _effect = graph.create_effect(move |g| {
            runs_clone.set(runs_clone.get() + 1);
            if g.get(use_a).unwrap_or(false) {
                let _ = g.get(a);
            } else {
                let _ = g.get(b);
            }
        });

        graph.set(use_a, false);
        assert_eq!(runs.get(), 2);

        // `a` is no longer a dependency
        graph.set(a, 2);
        assert_eq!(runs.get(), 2);

        graph.set(b, 11);
        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn test_effect_writes_are_flushed() {
        let graph = ReactiveGraph::new();
        let source = graph.create_signal(1);
        let mirror = graph.create_signal(0);
        let seen = Rc::new(Cell::new(0));
        let seen_clone = seen.clone();

        let _copy = graph.create_effect(move |g| {
            let value = g.get(source).unwrap_or(0);
            g.set(mirror, value * 10);
        });
        let _observe = graph.create_effect(move |g| {
            seen_clone.set(g.get(mirror).unwrap_or(0));
        });

        assert_eq!(seen.get(), 10);
        graph.set(source, 4);
        assert_eq!(seen.get(), 40);
    }

    #[test]
    fn test_dispose_effect() {
        let graph = ReactiveGraph::new();
        let count = graph.create_signal(0);
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();

        let effect = graph.create_effect(move |g| {
            let _ = g.get(count);
            runs_clone.set(runs_clone.get() + 1);
        });
        graph.dispose_effect(effect);
        graph.set(count, 1);

        assert_eq!(runs.get(), 1);
        assert_eq!(graph.effect_count(), 0);
    }
}
