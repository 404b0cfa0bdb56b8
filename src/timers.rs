/// The delay and sound timers, which both count down to zero. The CHIP-8 family convention is
/// that these decrement once per simulated video frame (60Hz) rather than on a wall-clock
/// schedule; the driving [Emulator](crate::Emulator) calls [Timers::tick_delay] and
/// [Timers::tick_sound] once each per call to `process_frame()` (the sound timer is ticked only
/// after the frame's sound callback has observed it as still active, per §4.7), so the decrement
/// rate tracks whatever cadence the host actually drives at. Keeping the timers free of
/// wall-clock state is also what makes a deep-copied [Timers] instance behave identically to the
/// original when stepped forward the same number of frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timers {
    /// Decrements by one per frame while non-zero. Readable/writable via FX07/FX15.
    pub delay: u8,
    /// Decrements by one per frame while non-zero; audio should play while this is non-zero.
    pub sound: u8,
}

impl Timers {
    /// Constructor that returns a [Timers] instance with both timers at zero.
    pub(crate) fn new() -> Self {
        Timers { delay: 0x0, sound: 0x0 }
    }

    /// Decrements the delay timer by one, saturating at zero. Called once per simulated frame.
    pub(crate) fn tick_delay(&mut self) {
        self.delay = self.delay.saturating_sub(1);
    }

    /// Decrements the sound timer by one, saturating at zero. Called once per simulated frame,
    /// after the frame's sound callback (if any) has run.
    pub(crate) fn tick_sound(&mut self) {
        self.sound = self.sound.saturating_sub(1);
    }

    /// Returns true if the sound timer is active, i.e. the host application should be
    /// playing the current audio pattern.
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}

impl Default for Timers {
    fn default() -> Self {
        Timers::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timers_are_zero() {
        let timers: Timers = Timers::new();
        assert_eq!(timers.delay, 0);
        assert_eq!(timers.sound, 0);
        assert!(!timers.sound_active());
    }

    #[test]
    fn test_tick_decrements_by_one() {
        let mut timers: Timers = Timers::new();
        timers.delay = 5;
        timers.sound = 3;
        timers.tick_delay();
        timers.tick_sound();
        assert_eq!(timers.delay, 4);
        assert_eq!(timers.sound, 2);
    }

    #[test]
    fn test_tick_saturates_at_zero() {
        let mut timers: Timers = Timers::new();
        timers.tick_delay();
        timers.tick_sound();
        assert_eq!(timers.delay, 0);
        assert_eq!(timers.sound, 0);
    }

    #[test]
    fn test_sound_active() {
        let mut timers: Timers = Timers::new();
        assert!(!timers.sound_active());
        timers.sound = 1;
        assert!(timers.sound_active());
    }
}
