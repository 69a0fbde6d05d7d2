use serde::Serialize;

pub const GLASS_COUNT: usize = 8;
pub const GLASS_ML: u32 = 250;

/// The day's water glasses. Glasses fill left to right: only the next empty
/// glass can be filled and only the last full one can be emptied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WaterGlasses {
    filled: [bool; GLASS_COUNT],
}

impl WaterGlasses {
    pub fn filled_count(&self) -> usize {
        self.filled.iter().filter(|f| **f).count()
    }

    pub fn is_filled(&self, index: usize) -> bool {
        self.filled.get(index).copied().unwrap_or(false)
    }

    /// Index of the glass that can be filled next, if any.
    pub fn next_glass(&self) -> Option<usize> {
        let count = self.filled_count();
        (count < GLASS_COUNT).then_some(count)
    }

    pub fn consumed_ml(&self) -> u32 {
        self.filled_count() as u32 * GLASS_ML
    }

    pub fn target_ml(&self) -> u32 {
        GLASS_COUNT as u32 * GLASS_ML
    }

    /// Fills the next empty glass or empties the last full one. Any other
    /// index is ignored. Returns whether something changed.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= GLASS_COUNT {
            return false;
        }
        let previous_full = index == 0 || self.filled[index - 1];
        let next_empty = index + 1 == GLASS_COUNT || !self.filled[index + 1];

        if !self.filled[index] && previous_full {
            self.filled[index] = true;
            true
        } else if self.filled[index] && next_empty {
            self.filled[index] = false;
            true
        } else {
            false
        }
    }
}
