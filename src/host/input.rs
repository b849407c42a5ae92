//! Raw input signals and the activation allow-list

use crossterm::event::{KeyCode as CtKeyCode, MouseButton};

/// Pointer button that produced a pointer-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

impl From<MouseButton> for PointerButton {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            MouseButton::Middle => PointerButton::Auxiliary,
        }
    }
}

/// Logical key carried by a key-down signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Tab,
    Other,
}

impl From<CtKeyCode> for Key {
    fn from(code: CtKeyCode) -> Self {
        match code {
            CtKeyCode::Char(c) => Key::Char(c),
            CtKeyCode::Up => Key::ArrowUp,
            CtKeyCode::Down => Key::ArrowDown,
            CtKeyCode::Left => Key::ArrowLeft,
            CtKeyCode::Right => Key::ArrowRight,
            CtKeyCode::Enter => Key::Enter,
            CtKeyCode::Esc => Key::Escape,
            CtKeyCode::Tab => Key::Tab,
            _ => Key::Other,
        }
    }
}

impl Key {
    /// Whether this key counts as a response: space, WASD or an arrow key.
    ///
    /// Letters are matched case-sensitively, so Shift+W is not a response.
    pub fn is_activation(&self) -> bool {
        matches!(
            self,
            Key::Char(' ' | 'w' | 'a' | 's' | 'd')
                | Key::ArrowUp
                | Key::ArrowDown
                | Key::ArrowLeft
                | Key::ArrowRight
        )
    }
}

/// A raw input signal from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSignal {
    PointerDown(PointerButton),
    KeyDown(Key),
}

impl InputSignal {
    /// Whether this signal is an activation.
    ///
    /// Only the primary pointer button activates; the secondary button is the
    /// context-menu trigger and is swallowed without effect.
    pub fn is_activation(&self) -> bool {
        match self {
            InputSignal::PointerDown(button) => *button == PointerButton::Primary,
            InputSignal::KeyDown(key) => key.is_activation(),
        }
    }
}
