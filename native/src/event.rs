//! Event Module: raw input pump.
//!
//! Responsibilities:
//! - Drain raw events from the Backend (bounded, non-blocking by default)
//! - Track held state and pointer position
//! - Code-keyed dispatch, then broadcast to global processors
//!
//! An unrecognised code is logged and skipped for state tracking; dispatch
//! and the remaining queued events are unaffected.

use crate::context::Engine;
use crate::registry::{self, DispatchKind};
use crate::types::{code, Code, InputEvent};

/// Drain every event the backend has available. Returns the number processed.
pub(crate) fn process_input(engine: &mut Engine) -> usize {
    let events = engine.backend.poll_events(engine.config.poll_timeout_ms);
    let count = events.len();
    for event in events {
        process_event(engine, event);
    }
    count
}

/// Feed one raw event: update state, dispatch by code, broadcast.
pub(crate) fn process_event(engine: &mut Engine, event: InputEvent) {
    match event {
        InputEvent::Quit => {
            tracing::debug!("quit requested");
            engine.running = false;
        }
        InputEvent::KeyDown { code, .. } => track(engine, code, true),
        InputEvent::KeyUp { code, .. } => track(engine, code, false),
        InputEvent::MouseMotion { .. } => {}
        InputEvent::MouseButtonDown { button, .. } => {
            track(engine, code::mouse_button(button), true)
        }
        InputEvent::MouseButtonUp { button, .. } => {
            track(engine, code::mouse_button(button), false)
        }
    }
    if let Some(position) = event.position() {
        engine.mouse_position = position;
    }

    if let Some((kind, code)) = DispatchKind::of(&event) {
        let delegates = engine.registry.delegates(kind, code);
        registry::invoke_delegates(&delegates, engine, &event);
    }
    let processors = engine.registry.processors();
    registry::invoke_processors(&processors, engine, &event);
}

fn track(engine: &mut Engine, code: Code, pressed: bool) {
    if let Err(e) = engine.input.set_pressed(code, pressed) {
        tracing::warn!(code, error = %e, "ignoring unrecognised input code");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::registry::Processor;
    use crate::terminal::MockBackend;
    use crate::types::{mouse_button, Handle, Point};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn test_engine() -> Engine {
        Engine::new(Box::new(MockBackend::new(80, 24)), EngineConfig::default())
    }

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn push(log: &Log, line: &str) -> impl FnMut(&mut Engine, &InputEvent) + 'static {
        let log = log.clone();
        let line = line.to_string();
        move |_: &mut Engine, _: &InputEvent| log.borrow_mut().push(line.clone())
    }

    fn inject(engine: &mut Engine, events: Vec<InputEvent>) {
        let backend = engine
            .backend
            .as_any_mut()
            .downcast_mut::<MockBackend>()
            .unwrap();
        backend.injected_events = events;
    }

    #[test]
    fn test_key_events_track_state_and_dispatch() {
        let mut engine = test_engine();
        let lines = log();
        let owner = engine.new_owner();
        engine.register_key_down('a' as Code, owner, push(&lines, "down"));
        engine.register_key_up('a' as Code, owner, push(&lines, "up"));

        engine.process_event(InputEvent::key_down('a' as Code));
        assert!(engine.is_pressed('a' as Code));
        engine.process_event(InputEvent::key_up('a' as Code));
        assert!(!engine.is_pressed('a' as Code));

        assert_eq!(*lines.borrow(), vec!["down", "up"]);
    }

    #[test]
    fn test_mouse_events_track_button_and_position() {
        let mut engine = test_engine();
        let lines = log();
        let owner = engine.new_owner();
        engine.register_mouse_down(
            code::mouse_button(mouse_button::RIGHT),
            owner,
            push(&lines, "right down"),
        );

        engine.process_event(InputEvent::MouseMotion { x: 3, y: 4 });
        assert_eq!(engine.mouse_position(), Point::new(3, 4));

        engine.process_event(InputEvent::MouseButtonDown {
            button: mouse_button::RIGHT,
            x: 7,
            y: 8,
        });
        assert_eq!(engine.mouse_position(), Point::new(7, 8));
        assert!(engine.is_pressed(code::mouse_button(mouse_button::RIGHT)));
        assert!(!engine.is_pressed(code::mouse_button(mouse_button::LEFT)));
        assert_eq!(*lines.borrow(), vec!["right down"]);

        engine.process_event(InputEvent::MouseButtonUp {
            button: mouse_button::RIGHT,
            x: 7,
            y: 8,
        });
        assert!(!engine.is_pressed(code::mouse_button(mouse_button::RIGHT)));
    }

    #[test]
    fn test_quit_stops_engine_and_reaches_processors() {
        let mut engine = test_engine();
        let lines = log();
        let l = lines.clone();
        let processor: Processor<Engine> =
            Rc::new(RefCell::new(move |_: &mut Engine, event: &InputEvent| {
                l.borrow_mut().push(format!("{event:?}"))
            }));
        engine.register_processor(processor);

        assert!(engine.is_running());
        engine.process_event(InputEvent::Quit);
        assert!(!engine.is_running());
        assert_eq!(*lines.borrow(), vec!["Quit"]);
    }

    #[test]
    fn test_keyed_dispatch_precedes_processors() {
        let mut engine = test_engine();
        let lines = log();
        let processor: Processor<Engine> = Rc::new(RefCell::new(push(&lines, "processor")));
        engine.register_processor(processor.clone());
        let owner = engine.new_owner();
        engine.register_key_down(code::ESCAPE, owner, push(&lines, "keyed"));

        engine.process_event(InputEvent::key_down(code::ESCAPE));
        assert_eq!(*lines.borrow(), vec!["keyed", "processor"]);

        engine.unregister_processor(&processor);
        engine.process_event(InputEvent::key_down(code::ESCAPE));
        assert_eq!(*lines.borrow(), vec!["keyed", "processor", "keyed"]);
    }

    #[test]
    fn test_unknown_code_does_not_abort_batch() {
        let mut engine = test_engine();
        let lines = log();
        let owner = engine.new_owner();
        engine.register_key_down(300, owner, push(&lines, "unknown"));
        engine.register_key_down('z' as Code, owner, push(&lines, "z"));

        inject(
            &mut engine,
            vec![
                InputEvent::key_down(300),
                InputEvent::key_down('z' as Code),
            ],
        );
        assert_eq!(engine.process_input(), 2);
        // Dispatch still happens for the unknown code
        assert_eq!(*lines.borrow(), vec!["unknown", "z"]);
        assert!(engine.is_pressed('z' as Code));
        assert_eq!(engine.process_input(), 0);
    }

    #[test]
    fn test_unregister_during_dispatch_uses_snapshot() {
        let mut engine = test_engine();
        let lines = log();
        let first = engine.new_owner();
        let second = engine.new_owner();

        let l = lines.clone();
        engine.register_key_down(code::TAB, first, move |engine: &mut Engine, _| {
            l.borrow_mut().push("first".into());
            engine.unregister_key_down(code::TAB, first);
            engine.unregister_key_down(code::TAB, second);
        });
        engine.register_key_down(code::TAB, second, push(&lines, "second"));

        engine.process_event(InputEvent::key_down(code::TAB));
        assert_eq!(*lines.borrow(), vec!["first", "second"]);

        engine.process_event(InputEvent::key_down(code::TAB));
        assert_eq!(lines.borrow().len(), 2);
    }

    #[test]
    fn test_register_during_dispatch_takes_effect_next_event() {
        let mut engine = test_engine();
        let lines = log();
        let owner = engine.new_owner();
        let l = lines.clone();
        engine.register_key_down(code::SPACE, owner, move |engine: &mut Engine, _| {
            l.borrow_mut().push("outer".into());
            let l = l.clone();
            engine.register_key_down(code::SPACE, Handle(99), move |_: &mut Engine, _| {
                l.borrow_mut().push("late".into())
            });
        });

        engine.process_event(InputEvent::key_down(code::SPACE));
        assert_eq!(*lines.borrow(), vec!["outer"]);
        engine.process_event(InputEvent::key_down(code::SPACE));
        assert_eq!(*lines.borrow(), vec!["outer", "outer", "late"]);
    }

    #[test]
    fn test_reentrant_dispatch_skips_running_callback() {
        let mut engine = test_engine();
        let lines = log();
        let owner = engine.new_owner();
        let l = lines.clone();
        engine.register_key_down(code::RETURN, owner, move |engine: &mut Engine, _| {
            l.borrow_mut().push("enter".into());
            // Re-dispatching the same code reaches this callback again; it is skipped
            engine.process_event(InputEvent::key_down(code::RETURN));
        });

        engine.process_event(InputEvent::key_down(code::RETURN));
        assert_eq!(*lines.borrow(), vec!["enter"]);
    }
}
