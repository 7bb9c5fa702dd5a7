use std::sync::atomic::{AtomicBool, Ordering};

/// How boards and pieces are printed to a terminal.
#[derive(Copy, Clone, Debug)]
pub struct DisplayFormat {
    /// Chinese glyphs instead of doubled fen letters.
    pub chinese: bool,
    /// ANSI colours and markers for the last move.
    pub effects: bool,
}

static DEFAULT_CHINESE: AtomicBool = AtomicBool::new(true);
static DEFAULT_EFFECTS: AtomicBool = AtomicBool::new(true);

impl DisplayFormat {
    pub fn pretty() -> Self {
        Self {
            chinese: DEFAULT_CHINESE.load(Ordering::Relaxed),
            effects: DEFAULT_EFFECTS.load(Ordering::Relaxed),
        }
    }

    /// Plain letters without escape codes, used by `Display` impls and in logs.
    pub fn string() -> Self {
        Self {
            chinese: false,
            effects: false,
        }
    }

    pub fn set_default_chinese(chinese: bool) {
        DEFAULT_CHINESE.store(chinese, Ordering::Relaxed);
    }

    pub fn set_default_effects(effects: bool) {
        DEFAULT_EFFECTS.store(effects, Ordering::Relaxed);
    }
}
