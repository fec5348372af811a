//! Engine struct: the explicit context that owns all mutable engine state.
//!
//! There is no global instance. Every callback, deferred action and module
//! function receives `&mut Engine`, so several engines can coexist (tests
//! build one each).

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::config::EngineConfig;
use crate::deferred::{self, DeferredActionQueue};
use crate::error::{BackendError, EngineError};
use crate::focus::{self, FocusElement};
use crate::input_state::InputStateTracker;
use crate::registry::{DispatchKind, EventDispatchRegistry, Processor};
use crate::terminal::{Backend, Surface};
use crate::types::{Code, Handle, InputEvent, Point};

// ============================================================================
// Capability traits
// ============================================================================

/// Runs once per `Engine::update`, before the deferred queue drains.
pub trait Updatable {
    fn update(&mut self, engine: &mut Engine);
}

impl<F> Updatable for F
where
    F: FnMut(&mut Engine),
{
    fn update(&mut self, engine: &mut Engine) {
        self(engine)
    }
}

/// Runs once per `Engine::render`, after focus elements are drawn.
pub trait Drawable {
    fn draw(&mut self, surface: &mut dyn Surface) -> Result<(), BackendError>;
}

impl<F> Drawable for F
where
    F: FnMut(&mut dyn Surface) -> Result<(), BackendError>,
{
    fn draw(&mut self, surface: &mut dyn Surface) -> Result<(), BackendError> {
        self(surface)
    }
}

pub type UpdatableRef = Rc<RefCell<dyn Updatable>>;
pub type DrawableRef = Rc<RefCell<dyn Drawable>>;

// ============================================================================
// Engine
// ============================================================================

pub struct Engine {
    pub config: EngineConfig,

    // Input
    pub input: InputStateTracker,
    pub registry: EventDispatchRegistry<Engine>,
    pub mouse_position: Point,

    // Frame
    pub deferred: DeferredActionQueue<Engine>,
    pub updatables: Vec<UpdatableRef>,
    pub drawables: Vec<DrawableRef>,

    // Focus
    pub elements: IndexMap<Handle, FocusElement>,
    pub next_handle: u32,

    // Backend
    pub backend: Box<dyn Backend>,
    pub running: bool,
    pub initialized: bool,

    // Diagnostics
    pub last_error: String,
}

impl Engine {
    pub fn new(backend: Box<dyn Backend>, config: EngineConfig) -> Self {
        Self {
            config,

            input: InputStateTracker::new(),
            registry: EventDispatchRegistry::new(),
            mouse_position: Point::default(),

            deferred: DeferredActionQueue::new(),
            updatables: Vec::new(),
            drawables: Vec::new(),

            elements: IndexMap::new(),
            next_handle: 1, // Handle(0) is never issued

            backend,
            running: true,
            initialized: false,

            last_error: String::new(),
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Initialise the backend. A failure is recorded for `fail_fast` and returned.
    pub fn init(&mut self) -> Result<(), EngineError> {
        let result = if self.initialized {
            Err(EngineError::AlreadyInitialized)
        } else {
            self.backend.init().map_err(EngineError::from)
        };
        match result {
            Ok(()) => {
                self.initialized = true;
                self.running = true;
                self.last_error.clear();
                tracing::debug!(size = ?self.backend.size(), "engine initialized");
                Ok(())
            }
            Err(e) => {
                self.last_error = e.to_string();
                Err(e)
            }
        }
    }

    /// Restore the backend. No-op if `init` never succeeded.
    pub fn shutdown(&mut self) -> Result<(), EngineError> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;
        self.backend.shutdown()?;
        tracing::debug!("engine shut down");
        Ok(())
    }

    pub fn last_error(&self) -> Option<&str> {
        (!self.last_error.is_empty()).then_some(self.last_error.as_str())
    }

    /// Terminate the process if an init-class failure was recorded.
    /// Call after `init` and other setup steps.
    pub fn fail_fast(&self) {
        if let Some(message) = self.last_error() {
            tracing::error!(error = message, "fatal setup failure");
            eprintln!("{message}");
            std::process::exit(1);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn mouse_position(&self) -> Point {
        self.mouse_position
    }

    /// Issue a fresh owner identity for callback registration.
    pub fn new_owner(&mut self) -> Handle {
        let handle = Handle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    // ── Registration ───────────────────────────────────────────────────

    pub fn register_key_down(
        &mut self,
        code: Code,
        owner: Handle,
        callback: impl FnMut(&mut Engine, &InputEvent) + 'static,
    ) {
        self.registry
            .register(DispatchKind::KeyDown, code, owner, callback);
    }

    pub fn register_key_up(
        &mut self,
        code: Code,
        owner: Handle,
        callback: impl FnMut(&mut Engine, &InputEvent) + 'static,
    ) {
        self.registry.register(DispatchKind::KeyUp, code, owner, callback);
    }

    pub fn register_mouse_down(
        &mut self,
        code: Code,
        owner: Handle,
        callback: impl FnMut(&mut Engine, &InputEvent) + 'static,
    ) {
        self.registry
            .register(DispatchKind::MouseDown, code, owner, callback);
    }

    pub fn register_mouse_up(
        &mut self,
        code: Code,
        owner: Handle,
        callback: impl FnMut(&mut Engine, &InputEvent) + 'static,
    ) {
        self.registry
            .register(DispatchKind::MouseUp, code, owner, callback);
    }

    pub fn unregister_key_down(&mut self, code: Code, owner: Handle) {
        self.registry.unregister(DispatchKind::KeyDown, code, owner);
    }

    pub fn unregister_key_up(&mut self, code: Code, owner: Handle) {
        self.registry.unregister(DispatchKind::KeyUp, code, owner);
    }

    pub fn unregister_mouse_down(&mut self, code: Code, owner: Handle) {
        self.registry.unregister(DispatchKind::MouseDown, code, owner);
    }

    pub fn unregister_mouse_up(&mut self, code: Code, owner: Handle) {
        self.registry.unregister(DispatchKind::MouseUp, code, owner);
    }

    pub fn register_processor(&mut self, processor: Processor<Engine>) {
        self.registry.register_processor(processor);
    }

    pub fn unregister_processor(&mut self, processor: &Processor<Engine>) {
        self.registry.unregister_processor(processor);
    }

    pub fn register_updatable(&mut self, updatable: UpdatableRef) {
        self.updatables.push(updatable);
    }

    pub fn unregister_updatable(&mut self, updatable: &UpdatableRef) {
        self.updatables.retain(|u| !Rc::ptr_eq(u, updatable));
    }

    pub fn register_drawable(&mut self, drawable: DrawableRef) {
        self.drawables.push(drawable);
    }

    pub fn unregister_drawable(&mut self, drawable: &DrawableRef) {
        self.drawables.retain(|d| !Rc::ptr_eq(d, drawable));
    }

    // ── Tick ───────────────────────────────────────────────────────────

    pub fn process_event(&mut self, event: InputEvent) {
        crate::event::process_event(self, event);
    }

    /// Drain every event the backend has available. Returns the number processed.
    pub fn process_input(&mut self) -> usize {
        crate::event::process_input(self)
    }

    /// Refresh focus element states, run updatables, then drain the deferred queue.
    pub fn update(&mut self) {
        focus::refresh_pointer_states(self);

        for updatable in self.updatables.clone() {
            match updatable.try_borrow_mut() {
                Ok(mut u) => u.update(self),
                Err(_) => tracing::warn!("skipping reentrant updatable"),
            }
        }

        deferred::drain(self, deferred_queue);
    }

    pub fn render(&mut self) -> Result<(), EngineError> {
        crate::render::render_frame(self).map_err(EngineError::from)
    }

    // ── Queries and scheduling ─────────────────────────────────────────

    /// Held state of `code`. An unrecognised code is logged and reads as released.
    pub fn is_pressed(&self, code: Code) -> bool {
        match self.input.is_pressed(code) {
            Ok(pressed) => pressed,
            Err(e) => {
                tracing::warn!(code, error = %e, "is_pressed on unrecognised code");
                false
            }
        }
    }

    /// Schedule `action` for the next deferred drain.
    pub fn queue(
        &mut self,
        label: impl Into<Cow<'static, str>>,
        action: impl FnOnce(&mut Engine) + 'static,
    ) {
        self.deferred.enqueue(label, action);
    }

    /// Rebuild all neighbor links of the given focus elements.
    pub fn setup_navigation(&mut self, elements: &[Handle]) {
        crate::navigation::setup_navigation(self, elements);
    }

    pub fn element(&self, handle: Handle) -> Option<&FocusElement> {
        self.elements.get(&handle)
    }

    pub fn element_mut(&mut self, handle: Handle) -> Option<&mut FocusElement> {
        self.elements.get_mut(&handle)
    }
}

fn deferred_queue(engine: &mut Engine) -> &mut DeferredActionQueue<Engine> {
    &mut engine.deferred
}
