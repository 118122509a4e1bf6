//! Tappable surfaces
//!
//! The pressable wrapper behind buttons, cells and chips. It tracks which
//! pointers are down, drives the idle/hovered/pressed state, and on non-iOS
//! platforms with background feedback spawns a ripple wave per pointer.
//!
//! The disabled/read-only guard is checked when a pointer goes down. Turning
//! it on later does not retire waves already in flight; they end on release or
//! expiry like any other wave.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tgui_core::event_types::*;
use tgui_core::{InteractionMachine, InteractionState, PointerEvent, PointerType, Rect};
use tgui_dom::NodeId;

use crate::context::WidgetContext;
use crate::ripple::{Ripple, RippleTracker, RippleWave, WAVE_LIFETIME};

/// Visual feedback while pressed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractiveAnimation {
    /// Dim the surface
    Opacity,
    /// Ripple waves over the background
    #[default]
    Background,
}

/// Tappable configuration
#[derive(Clone, Debug)]
pub struct TappableConfig {
    pub disabled: bool,
    pub read_only: bool,
    pub interactive_animation: InteractiveAnimation,
    pub ripple_lifetime: Duration,
}

impl Default for TappableConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            read_only: false,
            interactive_animation: InteractiveAnimation::Background,
            ripple_lifetime: WAVE_LIFETIME,
        }
    }
}

impl TappableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn interactive_animation(mut self, animation: InteractiveAnimation) -> Self {
        self.interactive_animation = animation;
        self
    }

    pub fn ripple_lifetime(mut self, lifetime: Duration) -> Self {
        self.ripple_lifetime = lifetime;
        self
    }
}

/// A pressable surface
pub struct Tappable {
    ctx: WidgetContext,
    config: RefCell<TappableConfig>,
    rect: Cell<Rect>,
    ripple: RippleTracker,
    machine: RefCell<InteractionMachine<InteractionState>>,
    active_pointers: RefCell<SmallVec<[i32; 4]>>,
}

impl Tappable {
    pub fn new(ctx: &WidgetContext, config: TappableConfig) -> Self {
        let ripple = RippleTracker::new(
            ctx.graph.clone(),
            ctx.scheduler.clone(),
            config.ripple_lifetime,
        );
        Self {
            ctx: ctx.clone(),
            config: RefCell::new(config),
            rect: Cell::new(Rect::default()),
            ripple,
            machine: RefCell::new(InteractionMachine::default()),
            active_pointers: RefCell::new(SmallVec::new()),
        }
    }

    /// Client-space box, used to localize wave positions
    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.config.borrow_mut().disabled = disabled;
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.config.borrow_mut().read_only = read_only;
    }

    pub fn set_interactive_animation(&self, animation: InteractiveAnimation) {
        self.config.borrow_mut().interactive_animation = animation;
    }

    pub fn config(&self) -> TappableConfig {
        self.config.borrow().clone()
    }

    pub fn is_interactive(&self) -> bool {
        let config = self.config.borrow();
        !config.disabled && !config.read_only
    }

    /// Whether pointer-down spawns ripple waves
    pub fn has_ripple(&self) -> bool {
        !self.ctx.platform.is_ios()
            && self.config.borrow().interactive_animation == InteractiveAnimation::Background
    }

    pub fn state(&self) -> InteractionState {
        self.machine.borrow().state()
    }

    pub fn is_active(&self) -> bool {
        self.state() == InteractionState::Pressed
    }

    pub fn is_hovered(&self) -> bool {
        self.state() == InteractionState::Hovered
    }

    pub fn active_pointer_count(&self) -> usize {
        self.active_pointers.borrow().len()
    }

    pub fn ripple(&self) -> &RippleTracker {
        &self.ripple
    }

    /// Current waves (reactive)
    pub fn waves(&self) -> Vec<RippleWave> {
        self.ripple.waves()
    }

    /// Mount a ripple renderer for this surface under `parent`
    pub fn mount_ripple(&self, parent: NodeId) -> tgui_dom::Result<Ripple> {
        Ripple::mount(
            self.ctx.graph.clone(),
            self.ctx.document.clone(),
            parent,
            self.ripple.waves_signal(),
        )
    }

    /// Route a pointer event to its handler
    pub fn handle_event(&self, event: &PointerEvent) {
        match event.event_type {
            POINTER_DOWN => self.on_pointer_down(event),
            POINTER_ENTER => self.on_pointer_enter(event),
            POINTER_UP => self.on_pointer_up(event),
            _ if event.ends_gesture() => self.end_pointer(event),
            _ => {}
        }
    }

    pub fn on_pointer_down(&self, event: &PointerEvent) {
        if !self.is_interactive() {
            tracing::trace!("tappable ignored pointer {}: not interactive", event.pointer_id);
            return;
        }

        {
            let mut pointers = self.active_pointers.borrow_mut();
            if !pointers.contains(&event.pointer_id) {
                pointers.push(event.pointer_id);
            }
        }
        self.machine.borrow_mut().send(POINTER_DOWN);

        if self.has_ripple() {
            let (x, y) = self.rect.get().to_local(event.client_x, event.client_y);
            self.ripple.add_wave(event.pointer_id, x, y);
        }
    }

    pub fn on_pointer_up(&self, event: &PointerEvent) {
        self.end_pointer(event);
        // Touch pointers do not linger over the surface
        if event.pointer_type != PointerType::Mouse && self.active_pointer_count() == 0 {
            self.machine.borrow_mut().send(POINTER_LEAVE);
        }
    }

    pub fn on_pointer_enter(&self, event: &PointerEvent) {
        if event.pointer_type == PointerType::Mouse && self.is_interactive() {
            self.machine.borrow_mut().send(POINTER_ENTER);
        }
    }

    /// Release, cancel or leave for one pointer
    pub fn end_pointer(&self, event: &PointerEvent) {
        self.ripple.retire(event.pointer_id);

        let remaining = {
            let mut pointers = self.active_pointers.borrow_mut();
            pointers.retain(|id| *id != event.pointer_id);
            pointers.len()
        };
        if remaining == 0 {
            self.machine.borrow_mut().send(event.event_type);
        }
    }

    /// CSS classes for the surface's current state
    pub fn class_names(&self) -> Vec<&'static str> {
        let config = self.config.borrow();
        let mut classes = vec!["tgui-tappable"];
        if self.ctx.platform.is_ios() {
            classes.push("tgui-tappable--ios");
        }
        if config.interactive_animation == InteractiveAnimation::Opacity {
            classes.push("tgui-tappable--opacity");
        }
        match self.state() {
            InteractionState::Pressed => classes.push("tgui-tappable--active"),
            InteractionState::Hovered => classes.push("tgui-tappable--hovered"),
            InteractionState::Idle => {}
        }
        if config.disabled {
            classes.push("tgui-tappable--disabled");
        }
        if config.read_only {
            classes.push("tgui-tappable--readonly");
        }
        classes
    }
}
