//! Menu accelerators: a key plus a modifier mask
//!
//! Strokes are written the way they are shown in menus, e.g. `ctrl shift D`
//! or `alt+F4`. Modifiers are case-insensitive, the key comes last.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;
use thiserror::Error;

/// Modifier key mask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(1);
    pub const ALT: Modifiers = Modifiers(1 << 1);
    pub const SHIFT: Modifiers = Modifiers(1 << 2);
    pub const META: Modifiers = Modifiers(1 << 3);

    /// Display order
    const NAMED: [(Modifiers, &'static str); 4] = [
        (Modifiers::CTRL, "ctrl"),
        (Modifiers::ALT, "alt"),
        (Modifiers::SHIFT, "shift"),
        (Modifiers::META, "meta"),
    ];

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    fn parse_token(token: &str) -> Option<Modifiers> {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifiers::CTRL),
            "alt" | "option" => Some(Modifiers::ALT),
            "shift" => Some(Modifiers::SHIFT),
            "meta" | "cmd" | "super" => Some(Modifiers::META),
            _ => None,
        }
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMED
            .iter()
            .filter(|(m, _)| self.contains(*m))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join(" "))
    }
}

/// Key code of an accelerator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Letter or digit, stored uppercase
    Char(char),
    /// Function key F1..=F24
    Function(u8),
    Enter,
    Escape,
    Tab,
    Space,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// Function key, checked against F1..=F24
    pub fn function(n: u32) -> Result<Key, KeyStrokeError> {
        match u8::try_from(n) {
            Ok(n) if (1..=24).contains(&n) => Ok(Key::Function(n)),
            _ => Err(KeyStrokeError::FunctionKeyOutOfRange(n)),
        }
    }

    /// Canonical form of a key built by hand: letters uppercased, anything
    /// a parsed stroke could not hold rejected.
    pub fn normalized(self) -> Result<Key, KeyStrokeError> {
        match self {
            Key::Char(c) if c.is_ascii_alphanumeric() => Ok(Key::Char(c.to_ascii_uppercase())),
            Key::Char(c) => Err(KeyStrokeError::UnknownKey(c.to_string())),
            Key::Function(n) => Key::function(u32::from(n)),
            named => Ok(named),
        }
    }

    const NAMED: [(Key, &'static str); 15] = [
        (Key::Enter, "Enter"),
        (Key::Escape, "Escape"),
        (Key::Tab, "Tab"),
        (Key::Space, "Space"),
        (Key::Backspace, "Backspace"),
        (Key::Delete, "Delete"),
        (Key::Insert, "Insert"),
        (Key::Home, "Home"),
        (Key::End, "End"),
        (Key::PageUp, "PageUp"),
        (Key::PageDown, "PageDown"),
        (Key::Up, "Up"),
        (Key::Down, "Down"),
        (Key::Left, "Left"),
        (Key::Right, "Right"),
    ];
}

impl FromStr for Key {
    type Err = KeyStrokeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphanumeric() {
                return Ok(Key::Char(c.to_ascii_uppercase()));
            }
            return Err(KeyStrokeError::UnknownKey(s.to_string()));
        }

        if let Some(num) = s.strip_prefix(['F', 'f']) {
            if !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit()) {
                let n = num.parse::<u32>().unwrap_or(u32::MAX);
                return Key::function(n);
            }
        }

        match s.to_ascii_lowercase().as_str() {
            "esc" => return Ok(Key::Escape),
            "return" => return Ok(Key::Enter),
            "del" => return Ok(Key::Delete),
            _ => {}
        }

        Key::NAMED
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map(|(key, _)| *key)
            .ok_or_else(|| KeyStrokeError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            Key::Function(n) => write!(f, "F{}", n),
            named => {
                let name = Key::NAMED
                    .iter()
                    .find(|(key, _)| key == named)
                    .map(|(_, name)| *name)
                    .unwrap_or("?");
                f.write_str(name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyStrokeError {
    #[error("empty key stroke")]
    Empty,
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("key stroke `{0}` has modifiers but no key")]
    MissingKey(String),
    #[error("function key F{0} is out of range (F1-F24)")]
    FunctionKeyOutOfRange(u32),
}

/// Accelerator bound to a menu item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyStroke {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyStroke {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Key with no modifiers
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// The stroke as parsing its own display form would produce it
    pub fn normalized(self) -> Result<Self, KeyStrokeError> {
        Ok(Self::new(self.key.normalized()?, self.modifiers))
    }
}

impl FromStr for KeyStroke {
    type Err = KeyStrokeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == '+')
            .filter(|t| !t.is_empty())
            .collect();

        let (last, leading) = tokens.split_last().ok_or(KeyStrokeError::Empty)?;

        let mut modifiers = Modifiers::NONE;
        for token in leading {
            let modifier = Modifiers::parse_token(token)
                .ok_or_else(|| KeyStrokeError::UnknownModifier(token.to_string()))?;
            modifiers = modifiers | modifier;
        }

        if Modifiers::parse_token(last).is_some() {
            return Err(KeyStrokeError::MissingKey(s.trim().to_string()));
        }

        Ok(KeyStroke::new(last.parse()?, modifiers))
    }
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{} {}", self.modifiers, self.key)
        }
    }
}

impl TryFrom<String> for KeyStroke {
    type Error = KeyStrokeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyStroke> for String {
    fn from(stroke: KeyStroke) -> String {
        stroke.to_string()
    }
}
