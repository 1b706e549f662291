use serde::Serialize;
use tracing::info;

use crate::defaults::store::ConfigStore;
use crate::error::Result;

pub const POMODORO_WORK_MINUTES: i64 = 25; // Default Pomodoro work time
pub const POMODORO_SHORT_BREAK_MINUTES: i64 = 5; // Default short break time
pub const POMODORO_LONG_BREAK_MINUTES: i64 = 20; // Default long break time

pub const POMODORO_ICON: &str = "🍅";
pub const SHORT_BREAK_ICON: &str = "⏸️";
pub const LONG_BREAK_ICON: &str = "☕";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalKind {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl IntervalKind {
    /// Catalog order, also the order of the selection buttons.
    pub const ALL: [IntervalKind; 3] = [
        IntervalKind::Pomodoro,
        IntervalKind::ShortBreak,
        IntervalKind::LongBreak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalKind::Pomodoro => "pomodoro",
            IntervalKind::ShortBreak => "shortBreak",
            IntervalKind::LongBreak => "longBreak",
        }
    }

    pub fn config_key(&self) -> &'static str {
        match self {
            IntervalKind::Pomodoro => "pomodoroInterval",
            IntervalKind::ShortBreak => "shortBreakInterval",
            IntervalKind::LongBreak => "longBreakInterval",
        }
    }

    pub fn default_minutes(&self) -> i64 {
        match self {
            IntervalKind::Pomodoro => POMODORO_WORK_MINUTES,
            IntervalKind::ShortBreak => POMODORO_SHORT_BREAK_MINUTES,
            IntervalKind::LongBreak => POMODORO_LONG_BREAK_MINUTES,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            IntervalKind::Pomodoro => POMODORO_ICON,
            IntervalKind::ShortBreak => SHORT_BREAK_ICON,
            IntervalKind::LongBreak => LONG_BREAK_ICON,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            IntervalKind::Pomodoro => "Start a new Pomodoro",
            IntervalKind::ShortBreak => "Take a short break",
            IntervalKind::LongBreak => "Take a long break",
        }
    }

    fn is_work(&self) -> bool {
        matches!(self, IntervalKind::Pomodoro)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntervalDefinition {
    pub description: String,
    pub duration_minutes: u64,
    pub glyph: String,
    pub is_work: bool,
}

impl IntervalDefinition {
    pub fn new(kind: IntervalKind, duration_minutes: u64) -> Self {
        Self {
            description: kind.description().to_string(),
            duration_minutes,
            glyph: kind.emoji().to_string(),
            is_work: kind.is_work(),
        }
    }
}

/// The intervals a user can pick from, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Catalog {
    // indexed by `IntervalKind as usize`, in `IntervalKind::ALL` order
    entries: [IntervalDefinition; 3],
}

impl Catalog {
    /// Reads the interval durations from `store`, seeding any value that is
    /// missing or not positive with its default.
    pub fn initialize(store: &mut dyn ConfigStore) -> Result<Self> {
        let entries = [
            Self::read_definition(store, IntervalKind::Pomodoro)?,
            Self::read_definition(store, IntervalKind::ShortBreak)?,
            Self::read_definition(store, IntervalKind::LongBreak)?,
        ];
        Ok(Self { entries })
    }

    fn read_definition(store: &mut dyn ConfigStore, kind: IntervalKind) -> Result<IntervalDefinition> {
        let mut minutes = store.integer(kind.config_key())?;
        if minutes <= 0 {
            minutes = kind.default_minutes();
            store.set_integer(kind.config_key(), minutes)?;
            info!(key = kind.config_key(), minutes, "seeded default interval");
        }
        Ok(IntervalDefinition::new(kind, minutes as u64))
    }

    pub fn lookup(&self, key: &str) -> Option<&IntervalDefinition> {
        IntervalKind::ALL
            .iter()
            .find(|kind| kind.as_str() == key)
            .map(|kind| self.get(*kind))
    }

    pub fn get(&self, kind: IntervalKind) -> &IntervalDefinition {
        &self.entries[kind as usize]
    }

    pub fn entries(&self) -> impl Iterator<Item = (IntervalKind, &IntervalDefinition)> {
        IntervalKind::ALL.into_iter().zip(self.entries.iter())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn nth(&self, index: usize) -> Option<&IntervalDefinition> {
        self.entries.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::store::MemoryStore;
    use crate::error::Error;

    struct UnreachableStore;

    impl ConfigStore for UnreachableStore {
        fn integer(&self, _key: &str) -> Result<i64> {
            Err(Error::msg("store unreachable"))
        }

        fn set_integer(&mut self, _key: &str, _value: i64) -> Result<()> {
            Err(Error::msg("store unreachable"))
        }
    }

    #[test]
    fn seeds_defaults_for_non_positive_values() {
        let mut store = MemoryStore::new()
            .with("pomodoroInterval", 0)
            .with("shortBreakInterval", -3);

        let catalog = Catalog::initialize(&mut store).unwrap();

        assert_eq!(catalog.get(IntervalKind::Pomodoro).duration_minutes, 25);
        assert_eq!(catalog.get(IntervalKind::ShortBreak).duration_minutes, 5);
        assert_eq!(catalog.get(IntervalKind::LongBreak).duration_minutes, 20);

        assert_eq!(store.integer("pomodoroInterval").unwrap(), 25);
        assert_eq!(store.integer("shortBreakInterval").unwrap(), 5);
        assert_eq!(store.integer("longBreakInterval").unwrap(), 20);
    }

    #[test]
    fn keeps_configured_durations() {
        let mut store = MemoryStore::new()
            .with("pomodoroInterval", 50)
            .with("shortBreakInterval", 10)
            .with("longBreakInterval", 30);

        let catalog = Catalog::initialize(&mut store).unwrap();

        assert_eq!(catalog.get(IntervalKind::Pomodoro).duration_minutes, 50);
        assert_eq!(catalog.get(IntervalKind::ShortBreak).duration_minutes, 10);
        assert_eq!(catalog.get(IntervalKind::LongBreak).duration_minutes, 30);
    }

    #[test]
    fn enumerates_in_stable_order() {
        let catalog = Catalog::initialize(&mut MemoryStore::new()).unwrap();
        let keys: Vec<_> = catalog.entries().map(|(kind, _)| kind.as_str()).collect();

        assert_eq!(keys, ["pomodoro", "shortBreak", "longBreak"]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.nth(1), catalog.lookup("shortBreak"));
        assert!(catalog.nth(3).is_none());
    }

    #[test]
    fn lookup_reports_unknown_keys() {
        let catalog = Catalog::initialize(&mut MemoryStore::new()).unwrap();

        let pomodoro = catalog.lookup("pomodoro").unwrap();
        assert_eq!(pomodoro.glyph, POMODORO_ICON);
        assert!(pomodoro.is_work);
        assert!(!catalog.lookup("longBreak").unwrap().is_work);

        assert!(catalog.lookup("lunchBreak").is_none());
    }

    #[test]
    fn unreachable_store_fails_initialization() {
        let err = Catalog::initialize(&mut UnreachableStore).unwrap_err();
        assert_eq!(err.to_string(), "store unreachable");
    }
}
