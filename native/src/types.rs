//! Shared types, enums, and constants.
//!
//! All types that cross module boundaries or define the input data model live here.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// ============================================================================
// Input Codes
// ============================================================================
//
// An input code is a single i32 split into three disjoint sub-ranges:
//   0..256                  ASCII-range keys
//   code & MOUSE_MASK       mouse buttons (index = code - MOUSE_MASK)
//   code & SCANCODE_MASK    hardware-independent scan codes

pub type Code = i32;

pub mod code {
    use super::Code;

    pub const ASCII_COUNT: Code = 256;
    pub const MOUSE_MASK: Code = 0x400;
    pub const MOUSE_BUTTON_COUNT: Code = 32;
    pub const SCANCODE_MASK: Code = 1 << 30;
    pub const SCANCODE_COUNT: Code = 512;

    pub const BACKSPACE: Code = 8;
    pub const TAB: Code = 9;
    pub const RETURN: Code = 13;
    pub const ESCAPE: Code = 27;
    pub const SPACE: Code = 32;
    pub const DELETE: Code = 127;

    pub const F1: Code = from_scancode(58);
    pub const INSERT: Code = from_scancode(73);
    pub const HOME: Code = from_scancode(74);
    pub const PAGE_UP: Code = from_scancode(75);
    pub const END: Code = from_scancode(77);
    pub const PAGE_DOWN: Code = from_scancode(78);
    pub const RIGHT: Code = from_scancode(79);
    pub const LEFT: Code = from_scancode(80);
    pub const DOWN: Code = from_scancode(81);
    pub const UP: Code = from_scancode(82);

    pub const fn from_scancode(scancode: i32) -> Code {
        scancode | SCANCODE_MASK
    }

    /// Pressed-state code for a mouse button.
    pub const fn mouse_button(button: u8) -> Code {
        MOUSE_MASK | button as Code
    }
}

pub mod mouse_button {
    pub const LEFT: u8 = 1;
    pub const MIDDLE: u8 = 2;
    pub const RIGHT: u8 = 3;
}

// ============================================================================
// Modifiers (bitflags)
// ============================================================================

bitflags! {
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CTRL  = 0b0000_0010;
        const ALT   = 0b0000_0100;
        const SUPER = 0b0000_1000;
    }
}

// ============================================================================
// Raw Input Event
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown {
        code: Code,
        modifiers: Modifiers,
    },
    KeyUp {
        code: Code,
        modifiers: Modifiers,
    },
    MouseMotion {
        x: i32,
        y: i32,
    },
    MouseButtonDown {
        button: u8,
        x: i32,
        y: i32,
    },
    MouseButtonUp {
        button: u8,
        x: i32,
        y: i32,
    },
}

impl InputEvent {
    pub fn key_down(code: Code) -> Self {
        Self::KeyDown {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn key_up(code: Code) -> Self {
        Self::KeyUp {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Key symbol for key events, button number for mouse button events.
    pub fn code(&self) -> Option<Code> {
        match *self {
            Self::KeyDown { code, .. } | Self::KeyUp { code, .. } => Some(code),
            Self::MouseButtonDown { button, .. } | Self::MouseButtonUp { button, .. } => {
                Some(button as Code)
            }
            Self::Quit | Self::MouseMotion { .. } => None,
        }
    }

    pub fn position(&self) -> Option<Point> {
        match *self {
            Self::MouseMotion { x, y }
            | Self::MouseButtonDown { x, y, .. }
            | Self::MouseButtonUp { x, y, .. } => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

// ============================================================================
// Handles
// ============================================================================

/// Opaque owner identity. Issued sequentially by `Engine::new_owner`, never
/// recycled; `Handle(0)` is never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub(crate) u32);

impl Handle {
    pub fn raw(self) -> u32 {
        self.0
    }
}

// ============================================================================
// Geometry
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn magnitude_sq(self) -> i64 {
        let x = self.x as i64;
        let y = self.y as i64;
        (x * x).saturating_add(y * y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// Axis-aligned rectangle: position plus size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Clamped to the i32 range for rects that extend past it.
    pub fn center(&self) -> Point {
        let cx = self.x as i64 + self.w as i64 / 2;
        let cy = self.y as i64 + self.h as i64 / 2;
        Point::new(clamp_i32(cx), clamp_i32(cy))
    }

    /// Min edge inclusive, max edge exclusive.
    pub fn contains(&self, p: Point) -> bool {
        let (px, py) = (p.x as i64, p.y as i64);
        let (x, y) = (self.x as i64, self.y as i64);
        px >= x && px < x + self.w as i64 && py >= y && py < y + self.h as i64
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

// ============================================================================
// Color Encoding (u32, 0xAARRGGBB)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub fn a(self) -> u8 {
        ((self.0 >> 24) & 0xFF) as u8
    }

    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

// ============================================================================
// Focus Element State
// ============================================================================

/// Visual state of a focus element. `selected` and `hovered` fused into the
/// five combinations the color table is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusState {
    Normal,
    Hovered,
    Clicked,
    Selected,
    HoveredSelected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonColors {
    pub normal: Color,
    pub hovered: Color,
    pub clicked: Color,
    pub selected: Color,
    pub hovered_selected: Color,
}

impl ButtonColors {
    pub fn color_for(&self, state: FocusState) -> Color {
        match state {
            FocusState::Normal => self.normal,
            FocusState::Hovered => self.hovered,
            FocusState::Clicked => self.clicked,
            FocusState::Selected => self.selected,
            FocusState::HoveredSelected => self.hovered_selected,
        }
    }
}

impl Default for ButtonColors {
    fn default() -> Self {
        Self {
            normal: Color(0xFF88_8888),
            hovered: Color(0xFFBB_BBBB),
            clicked: Color(0x8888_8888),
            selected: Color(0xFFAA_AAAA),
            hovered_selected: Color(0xFFDD_DDDD),
        }
    }
}
