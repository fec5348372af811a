//! Focus Module: selectable rectangular elements with directional navigation.
//!
//! Responsibilities:
//! - Element lifecycle: create registers arrow-key and pointer handlers under
//!   the element's own handle; destroy unregisters all of them
//! - Per-frame visual state from pointer position and button
//! - Selection changes with on_selected / on_unselected notification
//! - Arrow-key navigation through the precomputed neighbor links
//!
//! Elements live in `Engine::elements`, keyed by handle. Navigation never
//! mutates selection from inside key dispatch; it enqueues a deferred action.

use crate::context::Engine;
use crate::navigation::Direction;
use crate::types::{code, ButtonColors, FocusState, Handle, Point, Rect};

pub type Listener = Box<dyn FnMut()>;

pub struct FocusElement {
    pub rect: Rect,
    pub state: FocusState,
    pub selected: bool,
    pub navigatable: bool,
    /// Set by a press inside the rect, cleared by the next release.
    pub held: bool,
    /// Indexed by `Direction as usize`.
    pub neighbors: [Option<Handle>; 4],
    pub colors: ButtonColors,
    select_button: u8,
    press_listeners: Vec<Listener>,
    release_listeners: Vec<Listener>,
    selected_listeners: Vec<Listener>,
    unselected_listeners: Vec<Listener>,
}

impl FocusElement {
    fn new(rect: Rect, colors: ButtonColors, select_button: u8) -> Self {
        Self {
            rect,
            state: FocusState::Normal,
            selected: false,
            navigatable: true,
            held: false,
            neighbors: [None; 4],
            colors,
            select_button,
            press_listeners: Vec::new(),
            release_listeners: Vec::new(),
            selected_listeners: Vec::new(),
            unselected_listeners: Vec::new(),
        }
    }

    pub fn on_press(&mut self, listener: impl FnMut() + 'static) {
        self.press_listeners.push(Box::new(listener));
    }

    pub fn on_release(&mut self, listener: impl FnMut() + 'static) {
        self.release_listeners.push(Box::new(listener));
    }

    pub fn on_selected(&mut self, listener: impl FnMut() + 'static) {
        self.selected_listeners.push(Box::new(listener));
    }

    pub fn on_unselected(&mut self, listener: impl FnMut() + 'static) {
        self.unselected_listeners.push(Box::new(listener));
    }

    pub fn neighbor(&self, dir: Direction) -> Option<Handle> {
        self.neighbors[dir as usize]
    }

    pub fn clear_navigation(&mut self) {
        self.neighbors = [None; 4];
    }

    /// Recompute and store the visual state for this frame.
    pub fn evaluate(&mut self, pointer: Point, pressed: bool) -> FocusState {
        self.state = match (self.rect.contains(pointer), pressed, self.selected) {
            (true, true, _) => FocusState::Clicked,
            (true, false, true) => FocusState::HoveredSelected,
            (true, false, false) => FocusState::Hovered,
            (false, _, true) => FocusState::Selected,
            (false, _, false) => FocusState::Normal,
        };
        self.state
    }

    /// Flip `selected`, notifying only when it actually changes.
    pub fn set_selected(&mut self, selected: bool) {
        if self.selected == selected {
            return;
        }
        self.selected = selected;
        let listeners = if selected {
            &mut self.selected_listeners
        } else {
            &mut self.unselected_listeners
        };
        notify(listeners);
    }

    pub fn set_selected_no_notify(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Returns true if the press landed inside the rect.
    fn press(&mut self, pointer: Point) -> bool {
        if !self.rect.contains(pointer) {
            return false;
        }
        self.set_selected(true);
        if !self.held {
            self.held = true;
            notify(&mut self.press_listeners);
        }
        true
    }

    fn release(&mut self) {
        if self.held {
            self.held = false;
            notify(&mut self.release_listeners);
        }
    }
}

fn notify(listeners: &mut [Listener]) {
    for listener in listeners {
        listener();
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Create an element and register its handlers under a fresh handle.
pub fn create_element(engine: &mut Engine, rect: Rect) -> Handle {
    let handle = engine.new_owner();
    let button = engine.config.select_button;
    engine
        .elements
        .insert(handle, FocusElement::new(rect, engine.config.colors, button));

    for dir in Direction::ALL {
        engine.register_key_down(dir.code(), handle, move |engine: &mut Engine, _| {
            navigate(engine, handle, dir)
        });
    }
    engine.register_mouse_down(
        code::mouse_button(button),
        handle,
        move |engine: &mut Engine, event| {
            let Some(pointer) = event.position() else {
                return;
            };
            let hit = engine
                .elements
                .get_mut(&handle)
                .is_some_and(|element| element.press(pointer));
            if hit {
                engine.queue(
                    format!("focus {}", handle.raw()),
                    move |engine: &mut Engine| deselect_others(engine, handle),
                );
            }
        },
    );
    engine.register_mouse_up(
        code::mouse_button(button),
        handle,
        move |engine: &mut Engine, _| {
            if let Some(element) = engine.elements.get_mut(&handle) {
                element.release();
            }
        },
    );

    tracing::debug!(handle = handle.raw(), ?rect, "focus element created");
    handle
}

/// Remove an element, its handlers, and every link pointing at it.
/// Returns false if the handle named no element.
pub fn destroy_element(engine: &mut Engine, handle: Handle) -> bool {
    let Some(element) = engine.elements.shift_remove(&handle) else {
        return false;
    };

    for dir in Direction::ALL {
        engine.unregister_key_down(dir.code(), handle);
    }
    let button = code::mouse_button(element.select_button);
    engine.unregister_mouse_down(button, handle);
    engine.unregister_mouse_up(button, handle);

    for other in engine.elements.values_mut() {
        for link in other.neighbors.iter_mut() {
            if *link == Some(handle) {
                *link = None;
            }
        }
    }

    tracing::debug!(handle = handle.raw(), "focus element destroyed");
    true
}

// ============================================================================
// Selection and navigation
// ============================================================================

pub fn set_selected(engine: &mut Engine, handle: Handle, selected: bool) {
    if let Some(element) = engine.elements.get_mut(&handle) {
        element.set_selected(selected);
    }
}

pub fn is_selected(engine: &Engine, handle: Handle) -> bool {
    engine.elements.get(&handle).is_some_and(|e| e.selected)
}

pub fn set_navigatable(engine: &mut Engine, handle: Handle, navigatable: bool) {
    if let Some(element) = engine.elements.get_mut(&handle) {
        element.navigatable = navigatable;
    }
}

/// Move the element. Neighbor links are not recomputed until the next
/// `setup_navigation`.
pub fn set_rect(engine: &mut Engine, handle: Handle, rect: Rect) {
    if let Some(element) = engine.elements.get_mut(&handle) {
        element.rect = rect;
    }
}

/// If `handle` is selected and has a neighbor in `dir`, schedule the
/// deselect/select pair for the next deferred drain.
pub fn navigate(engine: &mut Engine, handle: Handle, dir: Direction) {
    let Some(element) = engine.elements.get(&handle) else {
        return;
    };
    if !element.selected {
        return;
    }
    let Some(next) = element.neighbor(dir) else {
        return;
    };

    tracing::debug!(from = handle.raw(), to = next.raw(), ?dir, "navigate");
    engine.queue(
        format!("navigate {dir:?} {} -> {}", handle.raw(), next.raw()),
        move |engine: &mut Engine| {
            set_selected(engine, handle, false);
            set_selected(engine, next, true);
        },
    );
}

/// Deselect, with notification, every element other than `keep`.
/// At most one element holds focus after a pointer press.
pub fn deselect_others(engine: &mut Engine, keep: Handle) {
    let others: Vec<Handle> = engine
        .elements
        .iter()
        .filter(|(h, e)| **h != keep && e.selected)
        .map(|(h, _)| *h)
        .collect();
    for other in others {
        set_selected(engine, other, false);
    }
}

/// Re-evaluate every element's visual state from the tracked pointer.
pub fn refresh_pointer_states(engine: &mut Engine) {
    let pointer = engine.mouse_position();
    let pressed = engine.is_pressed(code::mouse_button(engine.config.select_button));
    for element in engine.elements.values_mut() {
        element.evaluate(pointer, pressed);
    }
}
