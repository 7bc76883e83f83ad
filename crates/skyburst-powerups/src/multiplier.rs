/// Score multiplier flag. 1 normally, the configured boost while active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreMultiplier {
    boosted: u32,
    current: u32,
}

impl ScoreMultiplier {
    pub fn new(boosted: u32) -> Self {
        Self {
            boosted: boosted.max(1),
            current: 1,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn is_boosted(&self) -> bool {
        self.current != 1
    }

    pub fn engage(&mut self) {
        self.current = self.boosted;
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Points actually awarded for `base` points.
    pub fn apply(&self, base: u64) -> u64 {
        base.saturating_mul(u64::from(self.current))
    }
}
