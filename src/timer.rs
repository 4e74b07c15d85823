/// The two 8-bit countdown timers. The host ticks them at 60 Hz on its
/// own schedule, never per executed instruction, instruction rate is an
/// emulation-speed knob and timer decay is wall-clock-bound.
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self { delay: 0, sound: 0 }
    }

    /// One 60 Hz tick: each timer drops by one, floored at zero.
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// The beep collaborator should be audible exactly while this holds.
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_floor_at_zero() {
        let mut timers = Timers::new();
        timers.delay = 3;
        for expected in [2, 1, 0, 0] {
            timers.tick();
            assert_eq!(timers.delay, expected);
        }
    }

    #[test]
    fn sound_active_tracks_counter() {
        let mut timers = Timers::new();
        assert!(!timers.sound_active());
        timers.sound = 2;
        assert!(timers.sound_active());
        timers.tick();
        timers.tick();
        assert!(!timers.sound_active());
    }
}
