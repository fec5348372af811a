//! Backend traits + CrosstermBackend implementation.
//!
//! The engine depends on these traits, not on crossterm directly, so tests
//! run against a mock and headless runs need no terminal.

use crate::error::BackendError;
use crate::types::{code, Code, Color, InputEvent, Modifiers, Point, Rect};

// ============================================================================
// Traits
// ============================================================================

/// Render handle passed to drawables.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), BackendError>;
    fn draw_line(&mut self, from: Point, to: Point, color: Color) -> Result<(), BackendError>;
}

pub trait Backend {
    fn init(&mut self) -> Result<(), BackendError>;
    fn shutdown(&mut self) -> Result<(), BackendError>;
    fn size(&self) -> (u16, u16);
    /// Drain all currently available events. Waits at most `timeout_ms` for the first one.
    fn poll_events(&mut self, timeout_ms: u32) -> Vec<InputEvent>;
    fn clear(&mut self) -> Result<(), BackendError>;
    fn present(&mut self) -> Result<(), BackendError>;
    fn surface(&mut self) -> &mut dyn Surface;

    /// Downcast support for test code.
    #[cfg(test)]
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// Cells visited by a line from `from` to `to` (Bresenham).
pub(crate) fn line_points(from: Point, to: Point) -> Vec<Point> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut p = from;
    let mut points = Vec::new();
    loop {
        points.push(p);
        if p == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += sx;
        }
        if e2 <= dx {
            err += dx;
            p.y += sy;
        }
    }
    points
}

// ============================================================================
// CrosstermBackend
// ============================================================================

pub struct CrosstermBackend {
    width: u16,
    height: u16,
    synthesize_key_up: bool,
}

impl CrosstermBackend {
    pub fn new(synthesize_key_up: bool) -> Self {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        Self {
            width: w,
            height: h,
            synthesize_key_up,
        }
    }

    fn to_crossterm(color: Color) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: color.r(),
            g: color.g(),
            b: color.b(),
        }
    }

    fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width as i32 && p.y < self.height as i32
    }
}

fn enter_screen() -> Result<(), BackendError> {
    use crossterm::{
        cursor, event::EnableMouseCapture, terminal::EnterAlternateScreen, ExecutableCommand,
    };

    let mut stdout = std::io::stdout();
    stdout
        .execute(EnterAlternateScreen)
        .map_err(BackendError::io("alternate screen"))?;
    stdout
        .execute(EnableMouseCapture)
        .map_err(BackendError::io("mouse capture"))?;
    stdout
        .execute(cursor::Hide)
        .map_err(BackendError::io("hide cursor"))?;
    Ok(())
}

/// Best-effort teardown after a partial `init`; the init error is the one reported.
fn restore_terminal() {
    use crossterm::{
        cursor,
        event::DisableMouseCapture,
        terminal::{disable_raw_mode, LeaveAlternateScreen},
        ExecutableCommand,
    };

    let mut stdout = std::io::stdout();
    let _ = stdout.execute(cursor::Show);
    let _ = stdout.execute(DisableMouseCapture);
    let _ = stdout.execute(LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Run `undo` when `result` is an error, then pass `result` through.
fn undo_on_error<T, E>(result: Result<T, E>, undo: impl FnOnce()) -> Result<T, E> {
    if result.is_err() {
        undo();
    }
    result
}

fn modifiers_from(mods: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers;

    let mut out = Modifiers::empty();
    out.set(Modifiers::SHIFT, mods.contains(KeyModifiers::SHIFT));
    out.set(Modifiers::CTRL, mods.contains(KeyModifiers::CONTROL));
    out.set(Modifiers::ALT, mods.contains(KeyModifiers::ALT));
    out.set(Modifiers::SUPER, mods.contains(KeyModifiers::SUPER));
    out
}

fn key_code_from(key: crossterm::event::KeyCode) -> Option<Code> {
    use crossterm::event::KeyCode;

    let c = match key {
        KeyCode::Char(c) => c as Code,
        KeyCode::Backspace => code::BACKSPACE,
        KeyCode::Enter => code::RETURN,
        KeyCode::Tab => code::TAB,
        KeyCode::Esc => code::ESCAPE,
        KeyCode::Delete => code::DELETE,
        KeyCode::Left => code::LEFT,
        KeyCode::Right => code::RIGHT,
        KeyCode::Up => code::UP,
        KeyCode::Down => code::DOWN,
        KeyCode::Home => code::HOME,
        KeyCode::End => code::END,
        KeyCode::PageUp => code::PAGE_UP,
        KeyCode::PageDown => code::PAGE_DOWN,
        KeyCode::Insert => code::INSERT,
        KeyCode::F(n @ 1..=12) => code::F1 + (n as Code - 1),
        _ => return None,
    };
    Some(c)
}

fn mouse_button_from(button: crossterm::event::MouseButton) -> u8 {
    use crate::types::mouse_button;
    use crossterm::event::MouseButton;

    match button {
        MouseButton::Left => mouse_button::LEFT,
        MouseButton::Middle => mouse_button::MIDDLE,
        MouseButton::Right => mouse_button::RIGHT,
    }
}

impl Surface for CrosstermBackend {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), BackendError> {
        use crossterm::{
            cursor::MoveTo,
            style::{Print, ResetColor, SetBackgroundColor},
            QueueableCommand,
        };

        let x0 = rect.x.max(0);
        let x1 = (rect.x + rect.w).min(self.width as i32);
        if x1 <= x0 {
            return Ok(());
        }
        let y0 = rect.y.max(0);
        let y1 = (rect.y + rect.h).min(self.height as i32);
        let row = " ".repeat((x1 - x0) as usize);

        let mut stdout = std::io::stdout();
        stdout
            .queue(SetBackgroundColor(Self::to_crossterm(color)))
            .map_err(BackendError::io("bg"))?;
        for y in y0..y1 {
            stdout
                .queue(MoveTo(x0 as u16, y as u16))
                .map_err(BackendError::io("move"))?;
            stdout
                .queue(Print(&row))
                .map_err(BackendError::io("print"))?;
        }
        stdout
            .queue(ResetColor)
            .map_err(BackendError::io("reset"))?;
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) -> Result<(), BackendError> {
        use crossterm::{
            cursor::MoveTo,
            style::{Print, ResetColor, SetForegroundColor},
            QueueableCommand,
        };

        let mut stdout = std::io::stdout();
        stdout
            .queue(SetForegroundColor(Self::to_crossterm(color)))
            .map_err(BackendError::io("fg"))?;
        for p in line_points(from, to) {
            if !self.in_bounds(p) {
                continue;
            }
            stdout
                .queue(MoveTo(p.x as u16, p.y as u16))
                .map_err(BackendError::io("move"))?;
            stdout
                .queue(Print('·'))
                .map_err(BackendError::io("print"))?;
        }
        stdout
            .queue(ResetColor)
            .map_err(BackendError::io("reset"))?;
        Ok(())
    }
}

impl Backend for CrosstermBackend {
    fn init(&mut self) -> Result<(), BackendError> {
        use crossterm::terminal::enable_raw_mode;

        enable_raw_mode().map_err(BackendError::io("raw mode"))?;
        undo_on_error(enter_screen(), restore_terminal)?;

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        self.width = w;
        self.height = h;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), BackendError> {
        use crossterm::{
            cursor,
            event::DisableMouseCapture,
            terminal::{disable_raw_mode, LeaveAlternateScreen},
            ExecutableCommand,
        };

        let mut stdout = std::io::stdout();
        stdout
            .execute(cursor::Show)
            .map_err(BackendError::io("show cursor"))?;
        stdout
            .execute(DisableMouseCapture)
            .map_err(BackendError::io("disable mouse"))?;
        stdout
            .execute(LeaveAlternateScreen)
            .map_err(BackendError::io("leave alternate screen"))?;
        disable_raw_mode().map_err(BackendError::io("disable raw mode"))?;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        crossterm::terminal::size().unwrap_or((self.width, self.height))
    }

    fn poll_events(&mut self, timeout_ms: u32) -> Vec<InputEvent> {
        use crossterm::event::{self, Event, KeyEventKind, MouseEventKind};

        let mut events = Vec::new();
        let timeout = std::time::Duration::from_millis(timeout_ms as u64);

        if !event::poll(timeout).unwrap_or(false) {
            return events;
        }
        while event::poll(std::time::Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key_event)) => {
                    let Some(code) = key_code_from(key_event.code) else {
                        continue;
                    };
                    let modifiers = modifiers_from(key_event.modifiers);
                    match key_event.kind {
                        KeyEventKind::Press | KeyEventKind::Repeat => {
                            events.push(InputEvent::KeyDown { code, modifiers });
                            if self.synthesize_key_up {
                                events.push(InputEvent::KeyUp { code, modifiers });
                            }
                        }
                        KeyEventKind::Release => {
                            if !self.synthesize_key_up {
                                events.push(InputEvent::KeyUp { code, modifiers });
                            }
                        }
                    }
                }
                Ok(Event::Mouse(mouse_event)) => {
                    let x = mouse_event.column as i32;
                    let y = mouse_event.row as i32;
                    match mouse_event.kind {
                        MouseEventKind::Down(b) => events.push(InputEvent::MouseButtonDown {
                            button: mouse_button_from(b),
                            x,
                            y,
                        }),
                        MouseEventKind::Up(b) => events.push(InputEvent::MouseButtonUp {
                            button: mouse_button_from(b),
                            x,
                            y,
                        }),
                        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                            events.push(InputEvent::MouseMotion { x, y })
                        }
                        _ => {}
                    }
                }
                Ok(Event::Resize(w, h)) => {
                    self.width = w;
                    self.height = h;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }

        events
    }

    fn clear(&mut self) -> Result<(), BackendError> {
        use crossterm::{
            terminal::{Clear, ClearType},
            QueueableCommand,
        };

        std::io::stdout()
            .queue(Clear(ClearType::All))
            .map_err(BackendError::io("clear"))?;
        Ok(())
    }

    fn present(&mut self) -> Result<(), BackendError> {
        use std::io::Write;
        std::io::stdout().flush().map_err(BackendError::io("flush"))
    }

    fn surface(&mut self) -> &mut dyn Surface {
        self
    }

    #[cfg(test)]
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

// ============================================================================
// HeadlessBackend (for CI and environments without a terminal)
// ============================================================================

pub struct HeadlessBackend {
    pub width: u16,
    pub height: u16,
}

impl HeadlessBackend {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl Surface for HeadlessBackend {
    fn fill_rect(&mut self, _rect: Rect, _color: Color) -> Result<(), BackendError> {
        Ok(())
    }

    fn draw_line(&mut self, _from: Point, _to: Point, _color: Color) -> Result<(), BackendError> {
        Ok(())
    }
}

impl Backend for HeadlessBackend {
    fn init(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn poll_events(&mut self, _timeout_ms: u32) -> Vec<InputEvent> {
        Vec::new()
    }

    fn clear(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn surface(&mut self) -> &mut dyn Surface {
        self
    }

    #[cfg(test)]
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

// ============================================================================
// MockBackend (for Rust unit tests only)
// ============================================================================

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Fill(Rect, Color),
    Line(Point, Point, Color),
    Present,
}

#[cfg(test)]
pub struct MockBackend {
    pub width: u16,
    pub height: u16,
    pub ops: Vec<DrawOp>,
    pub injected_events: Vec<InputEvent>,
    pub fail_init: bool,
}

#[cfg(test)]
impl MockBackend {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            injected_events: Vec::new(),
            fail_init: false,
        }
    }
}

#[cfg(test)]
impl Surface for MockBackend {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), BackendError> {
        self.ops.push(DrawOp::Fill(rect, color));
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) -> Result<(), BackendError> {
        self.ops.push(DrawOp::Line(from, to, color));
        Ok(())
    }
}

#[cfg(test)]
impl Backend for MockBackend {
    fn init(&mut self) -> Result<(), BackendError> {
        if self.fail_init {
            return Err(BackendError::Io {
                context: "mock init",
                source: std::io::Error::other("no display"),
            });
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn poll_events(&mut self, _timeout_ms: u32) -> Vec<InputEvent> {
        std::mem::take(&mut self.injected_events)
    }

    fn clear(&mut self) -> Result<(), BackendError> {
        self.ops.push(DrawOp::Clear);
        Ok(())
    }

    fn present(&mut self) -> Result<(), BackendError> {
        self.ops.push(DrawOp::Present);
        Ok(())
    }

    fn surface(&mut self) -> &mut dyn Surface {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
