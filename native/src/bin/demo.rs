//! Terminal demo: a grid of focus elements navigable with the arrow keys
//! or the mouse. ESC or `q` quits.
//!
//! Usage: demo [config.json]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use vyengine::{
    code, focus, CrosstermBackend, Engine, EngineConfig, Handle, InputEvent, Processor, Rect,
};

const COLUMNS: i32 = 4;
const ROWS: i32 = 3;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        None => EngineConfig {
            poll_timeout_ms: 16,
            debug_navigation: true,
            ..EngineConfig::default()
        },
    };

    let backend = CrosstermBackend::new(config.synthesize_key_up);
    let mut engine = Engine::new(Box::new(backend), config);
    if let Err(e) = engine.init() {
        tracing::error!(error = %e, "terminal setup failed");
    }
    engine.fail_fast();

    let mut buttons: Vec<Handle> = Vec::new();
    for row in 0..ROWS {
        for col in 0..COLUMNS {
            // Stagger alternate rows so some links land on the diagonal
            let x = 2 + col * 16 + (row % 2) * 8;
            let y = 2 + row * 6;
            buttons.push(focus::create_element(&mut engine, Rect::new(x, y, 12, 3)));
        }
    }
    engine.setup_navigation(&buttons);
    focus::set_selected(&mut engine, buttons[0], true);

    let quit_keys: Processor<Engine> =
        Rc::new(RefCell::new(|engine: &mut Engine, event: &InputEvent| {
            if let InputEvent::KeyDown { code: c, .. } = *event {
                if c == code::ESCAPE || c == 'q' as i32 {
                    engine.running = false;
                }
            }
        }));
    engine.register_processor(quit_keys);

    while engine.is_running() {
        engine.process_input();
        engine.update();
        if let Err(e) = engine.render() {
            engine.last_error = e.to_string();
            break;
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    let restored = engine.shutdown();
    let mut failed = false;
    if let Some(message) = engine.last_error() {
        eprintln!("{message}");
        failed = true;
    }
    if let Err(e) = restored {
        tracing::error!(error = %e, "terminal restore failed");
        eprintln!("{e}");
        failed = true;
    }
    if failed {
        std::process::exit(1);
    }
}
