//! Key events delivered by the host UI.
//!
//! A `KeyEvent` carries the logical key identity: the character a key
//! produced, or a named key such as Backspace or Return. Scripts like
//! `a"b<BS><Enter><C-z>` parse into event sequences for replay and tests.

use std::fmt;

/// Modifier keys as a bitfield
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win on Windows

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & Self::CTRL.0 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & Self::SHIFT.0 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & Self::ALT.0 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & Self::META.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Ctrl, Alt or Meta held: the key is a shortcut, not text
    #[inline]
    pub const fn is_chord(self) -> bool {
        self.0 & (Self::CTRL.0 | Self::ALT.0 | Self::META.0) != 0
    }

    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Logical key identity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// The character a key produced (case preserved)
    Char(char),

    Enter,
    Tab,
    Space,
    Backspace,
    Delete,
    Escape,

    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,

    F(u8),
}

impl Key {
    /// Keys that only move the caret
    pub const fn is_navigation(self) -> bool {
        matches!(
            self,
            Key::Up
                | Key::Down
                | Key::Left
                | Key::Right
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
        )
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.escape_debug()),
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Space => write!(f, "Space"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Delete => write!(f, "Delete"),
            Key::Escape => write!(f, "Escape"),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Home => write!(f, "Home"),
            Key::End => write!(f, "End"),
            Key::PageUp => write!(f, "PageUp"),
            Key::PageDown => write!(f, "PageDown"),
            Key::Insert => write!(f, "Insert"),
            Key::F(n) => write!(f, "F{}", n),
        }
    }
}

/// A single key press
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Key press with no modifiers
    pub const fn key(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Key press producing a character
    pub const fn char(c: char) -> Self {
        Self::key(Key::Char(c))
    }

    /// Ctrl + character
    pub const fn ctrl(c: char) -> Self {
        Self::new(Key::Char(c), Modifiers::CTRL)
    }

    /// Parse a key script into events.
    ///
    /// Plain characters stand for themselves. Named keys and chords go in
    /// angle brackets: `<Enter>`, `<Tab>`, `<Space>`, `<BS>`, `<Del>`,
    /// `<Esc>`, `<Left>`, `<Home>`, `<F5>`, `<C-z>`, `<C-S-z>`, `<A-x>`,
    /// `<M-x>`. `<lt>` is a literal `<`.
    pub fn parse_script(script: &str) -> Result<Vec<KeyEvent>, KeyParseError> {
        let mut events = Vec::new();
        let mut chars = script.chars();

        while let Some(ch) = chars.next() {
            if ch != '<' {
                events.push(KeyEvent::char(ch));
                continue;
            }
            let mut token = String::new();
            let mut closed = false;
            for next in chars.by_ref() {
                if next == '>' {
                    closed = true;
                    break;
                }
                token.push(next);
            }
            if !closed {
                return Err(KeyParseError::Unterminated(token));
            }
            events.push(parse_token(&token)?);
        }

        Ok(events)
    }
}

fn parse_token(token: &str) -> Result<KeyEvent, KeyParseError> {
    if token.is_empty() {
        return Err(KeyParseError::InvalidKey(String::new()));
    }

    let parts: Vec<&str> = token.split('-').collect();
    let (key_part, mod_parts) = match parts.split_last() {
        // `<C-->` style: trailing empty part means the key is '-'
        Some((&"", rest)) if !rest.is_empty() => ("-", &rest[..rest.len() - 1]),
        Some((last, rest)) => (*last, rest),
        None => return Err(KeyParseError::InvalidKey(token.to_string())),
    };

    let mut modifiers = Modifiers::NONE;
    for part in mod_parts {
        modifiers = modifiers
            | match part.to_ascii_lowercase().as_str() {
                "c" | "ctrl" => Modifiers::CTRL,
                "s" | "shift" => Modifiers::SHIFT,
                "a" | "alt" => Modifiers::ALT,
                "m" | "meta" | "cmd" => Modifiers::META,
                other => return Err(KeyParseError::InvalidModifier(other.to_string())),
            };
    }

    Ok(KeyEvent::new(parse_key_name(key_part)?, modifiers))
}

fn parse_key_name(name: &str) -> Result<Key, KeyParseError> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(Key::Char(c));
    }

    let lower = name.to_ascii_lowercase();
    let key = match lower.as_str() {
        "enter" | "return" | "cr" => Key::Enter,
        "tab" => Key::Tab,
        "space" => Key::Space,
        "bs" | "backspace" => Key::Backspace,
        "del" | "delete" => Key::Delete,
        "esc" | "escape" => Key::Escape,
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" | "pgup" => Key::PageUp,
        "pagedown" | "pgdn" => Key::PageDown,
        "insert" | "ins" => Key::Insert,
        "lt" => Key::Char('<'),
        "gt" => Key::Char('>'),
        _ => match lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            Some(n) if (1..=24).contains(&n) => Key::F(n),
            _ => return Err(KeyParseError::InvalidKey(name.to_string())),
        },
    };
    Ok(key)
}

/// Errors from `KeyEvent::parse_script`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    InvalidKey(String),
    InvalidModifier(String),
    Unterminated(String),
}

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyParseError::InvalidKey(k) => write!(f, "Invalid key: <{}>", k),
            KeyParseError::InvalidModifier(m) => write!(f, "Invalid modifier: {}", m),
            KeyParseError::Unterminated(t) => write!(f, "Unterminated key token: <{}", t),
        }
    }
}

impl std::error::Error for KeyParseError {}
