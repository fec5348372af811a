//! vyengine: input dispatch and directional focus navigation.
//!
//! An `Engine` owns held-key state, code-keyed callback registries, a
//! deferred action queue and a set of focus elements. A driver loop calls
//! `process_input`, `update` and `render` once per frame:
//!
//! ```no_run
//! use vyengine::{focus, Engine, EngineConfig, CrosstermBackend, Rect};
//!
//! let config = EngineConfig::default();
//! let backend = CrosstermBackend::new(config.synthesize_key_up);
//! let mut engine = Engine::new(Box::new(backend), config);
//! engine.init().ok();
//! engine.fail_fast();
//!
//! let a = focus::create_element(&mut engine, Rect::new(2, 2, 10, 3));
//! let b = focus::create_element(&mut engine, Rect::new(16, 2, 10, 3));
//! engine.setup_navigation(&[a, b]);
//!
//! while engine.is_running() {
//!     engine.process_input();
//!     engine.update();
//!     engine.render().ok();
//! }
//! engine.shutdown().ok();
//! ```

pub mod config;
pub mod context;
pub mod deferred;
pub mod error;
mod event;
pub mod focus;
pub mod input_state;
pub mod navigation;
pub mod registry;
mod render;
pub mod terminal;
pub mod types;

pub use config::EngineConfig;
pub use context::{Drawable, DrawableRef, Engine, Updatable, UpdatableRef};
pub use error::{BackendError, ConfigError, EngineError, InputError};
pub use focus::FocusElement;
pub use navigation::{build_graph, Direction, NavNode};
pub use registry::{EventProcessor, Processor};
pub use terminal::{Backend, CrosstermBackend, HeadlessBackend, Surface};
pub use types::{
    code, mouse_button, ButtonColors, Code, Color, FocusState, Handle, InputEvent, Modifiers,
    Point, Rect,
};
