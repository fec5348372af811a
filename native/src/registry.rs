//! Dispatch Registry: per-event-kind maps from input code to owner-tagged callbacks.
//!
//! Responsibilities:
//! - Four code-keyed maps (key down/up, mouse down/up)
//! - Idempotent registration: same (code, owner) overwrites, keeping its slot
//! - Total unregistration: absent entries are a no-op
//! - Flat list of global event processors, invoked after code-keyed dispatch
//!
//! The registry is generic over the context `C` that callbacks receive, so
//! it never borrows the context itself. Dispatch hands out a snapshot of the
//! relevant list; callbacks may then mutate the registry freely.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::types::{code, Code, Handle, InputEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchKind {
    KeyDown = 0,
    KeyUp = 1,
    MouseDown = 2,
    MouseUp = 3,
}

impl DispatchKind {
    pub fn of(event: &InputEvent) -> Option<(Self, Code)> {
        match *event {
            InputEvent::KeyDown { code, .. } => Some((Self::KeyDown, code)),
            InputEvent::KeyUp { code, .. } => Some((Self::KeyUp, code)),
            InputEvent::MouseButtonDown { button, .. } => Some((Self::MouseDown, button as Code)),
            InputEvent::MouseButtonUp { button, .. } => Some((Self::MouseUp, button as Code)),
            InputEvent::Quit | InputEvent::MouseMotion { .. } => None,
        }
    }

    fn is_mouse(self) -> bool {
        matches!(self, Self::MouseDown | Self::MouseUp)
    }
}

pub type Delegate<C> = Rc<RefCell<dyn FnMut(&mut C, &InputEvent)>>;

/// Callbacks for one code, keyed by owner, in registration order.
pub type DelegateList<C> = IndexMap<Handle, Delegate<C>>;

pub type DelegateListMap<C> = HashMap<Code, DelegateList<C>>;

/// Receives every event once, regardless of code.
pub trait EventProcessor<C> {
    fn handle_event(&mut self, ctx: &mut C, event: &InputEvent);
}

impl<C, F> EventProcessor<C> for F
where
    F: FnMut(&mut C, &InputEvent),
{
    fn handle_event(&mut self, ctx: &mut C, event: &InputEvent) {
        self(ctx, event)
    }
}

pub type Processor<C> = Rc<RefCell<dyn EventProcessor<C>>>;

pub struct EventDispatchRegistry<C> {
    maps: [DelegateListMap<C>; 4],
    processors: Vec<Processor<C>>,
}

impl<C: 'static> EventDispatchRegistry<C> {
    pub fn new() -> Self {
        Self {
            maps: [
                HashMap::new(),
                HashMap::new(),
                HashMap::new(),
                HashMap::new(),
            ],
            processors: Vec::new(),
        }
    }

    pub fn register(
        &mut self,
        kind: DispatchKind,
        code: Code,
        owner: Handle,
        callback: impl FnMut(&mut C, &InputEvent) + 'static,
    ) {
        let code = normalize(kind, code);
        let delegate: Delegate<C> = Rc::new(RefCell::new(callback));
        self.maps[kind as usize]
            .entry(code)
            .or_default()
            .insert(owner, delegate);
    }

    pub fn unregister(&mut self, kind: DispatchKind, code: Code, owner: Handle) {
        let code = normalize(kind, code);
        let map = &mut self.maps[kind as usize];
        if let Some(list) = map.get_mut(&code) {
            list.shift_remove(&owner);
            if list.is_empty() {
                map.remove(&code);
            }
        }
    }

    /// Stable copy of the callbacks registered for `code`, in registration order.
    pub fn delegates(&self, kind: DispatchKind, code: Code) -> Vec<Delegate<C>> {
        self.maps[kind as usize]
            .get(&normalize(kind, code))
            .map(|list| list.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_registered(&self, kind: DispatchKind, code: Code, owner: Handle) -> bool {
        self.maps[kind as usize]
            .get(&normalize(kind, code))
            .is_some_and(|list| list.contains_key(&owner))
    }

    pub fn delegate_count(&self, kind: DispatchKind, code: Code) -> usize {
        self.maps[kind as usize]
            .get(&normalize(kind, code))
            .map_or(0, |list| list.len())
    }

    pub fn register_processor(&mut self, processor: Processor<C>) {
        self.processors.push(processor);
    }

    /// Remove by identity. No-op if not registered.
    pub fn unregister_processor(&mut self, processor: &Processor<C>) {
        if let Some(pos) = self
            .processors
            .iter()
            .position(|p| Rc::ptr_eq(p, processor))
        {
            self.processors.remove(pos);
        }
    }

    pub fn processors(&self) -> Vec<Processor<C>> {
        self.processors.clone()
    }
}

impl<C: 'static> Default for EventDispatchRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mouse registrations ignore the motion bit; buttons are keyed by number.
fn normalize(kind: DispatchKind, c: Code) -> Code {
    if kind.is_mouse() {
        c & !code::MOUSE_MASK
    } else {
        c
    }
}

/// Invoke a snapshot of delegates. A delegate that is already running further
/// up the stack is skipped.
pub fn invoke_delegates<C>(delegates: &[Delegate<C>], ctx: &mut C, event: &InputEvent) {
    for delegate in delegates {
        match delegate.try_borrow_mut() {
            Ok(mut callback) => (&mut *callback)(ctx, event),
            Err(_) => tracing::warn!(?event, "skipping reentrant event callback"),
        }
    }
}

pub fn invoke_processors<C>(processors: &[Processor<C>], ctx: &mut C, event: &InputEvent) {
    for processor in processors {
        match processor.try_borrow_mut() {
            Ok(mut p) => p.handle_event(ctx, event),
            Err(_) => tracing::warn!(?event, "skipping reentrant event processor"),
        }
    }
}
