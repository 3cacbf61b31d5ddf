//! Key bindings and the non-blocking input contract.

use std::collections::VecDeque;

/// Logical navigation actions a key can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    Select,
    Back,
    Home,
}

impl NavAction {
    pub fn as_str(self) -> &'static str {
        match self {
            NavAction::Up => "up",
            NavAction::Down => "down",
            NavAction::Select => "select",
            NavAction::Back => "back",
            NavAction::Home => "home",
        }
    }
}

/// One character code per logical action.
///
/// Bindings should be distinct; nothing enforces it. On a collision the
/// lookup order below decides: up, down, select, back, home, first match
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub up: char,
    pub down: char,
    pub select: char,
    pub back: char,
    pub home: char,
}

impl KeyBindings {
    pub const fn new(up: char, down: char, select: char, back: char, home: char) -> Self {
        Self {
            up,
            down,
            select,
            back,
            home,
        }
    }

    /// Resolve a key to its bound action, if any.
    pub fn action_for(&self, key: char) -> Option<NavAction> {
        if key == self.up {
            Some(NavAction::Up)
        } else if key == self.down {
            Some(NavAction::Down)
        } else if key == self.select {
            Some(NavAction::Select)
        } else if key == self.back {
            Some(NavAction::Back)
        } else if key == self.home {
            Some(NavAction::Home)
        } else {
            None
        }
    }
}

impl Default for KeyBindings {
    /// Left-hand cluster usable on a plain serial console.
    fn default() -> Self {
        Self::new('w', 's', 'd', 'a', 'q')
    }
}

/// Non-blocking character provider.
///
/// A poll yields at most one key; `None` means nothing arrived, which is a
/// distinguished outcome rather than an error.
pub trait InputSource {
    fn poll_key(&mut self) -> Option<char>;
}

/// Pre-recorded key sequence, mainly for tests and benches.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    keys: VecDeque<char>,
}

impl ScriptedInput {
    pub fn new(keys: impl IntoIterator<Item = char>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn push(&mut self, key: char) {
        self.keys.push_back(key);
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll_key(&mut self) -> Option<char> {
        self.keys.pop_front()
    }
}
