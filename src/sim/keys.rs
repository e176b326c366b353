//! Input alphabet and bounded held-key sets

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::consts::MAX_SIMULTANEOUS_KEYS;

/// Every key the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Key {
    Right,
    Left,
    Jump,
    Interact,
    TimeTravel,
    FinishLevel,
    ToggleGroup1,
    ToggleGroup2,
    Restart,
    Quit,
}

impl Key {
    pub const COUNT: usize = 10;

    pub const ALL: [Key; Key::COUNT] = [
        Key::Right,
        Key::Left,
        Key::Jump,
        Key::Interact,
        Key::TimeTravel,
        Key::FinishLevel,
        Key::ToggleGroup1,
        Key::ToggleGroup2,
        Key::Restart,
        Key::Quit,
    ];

    /// Keys an actor reads through its recording
    pub const MOVEMENT: [Key; 4] = [Key::Right, Key::Left, Key::Jump, Key::Interact];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Default keyboard binding (`'\r'` is return, `'\x1b'` escape)
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'd' => Some(Key::Right),
            'a' => Some(Key::Left),
            'w' => Some(Key::Jump),
            '.' => Some(Key::Interact),
            't' => Some(Key::TimeTravel),
            '\r' => Some(Key::FinishLevel),
            '1' => Some(Key::ToggleGroup1),
            '2' => Some(Key::ToggleGroup2),
            'r' => Some(Key::Restart),
            '\x1b' => Some(Key::Quit),
            _ => None,
        }
    }
}

/// Keys held during one tick, capped at `MAX_SIMULTANEOUS_KEYS`
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    keys: SmallVec<[Key; MAX_SIMULTANEOUS_KEYS]>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Add a key. Returns whether the key is in the set afterwards;
    /// a full set refuses new keys.
    pub fn insert(&mut self, key: Key) -> bool {
        if self.contains(key) {
            return true;
        }
        if self.keys.len() >= MAX_SIMULTANEOUS_KEYS {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys.iter().copied()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// Same keys, in any order
impl PartialEq for KeySet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl Eq for KeySet {}

impl FromIterator<Key> for KeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut set = KeySet::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}
