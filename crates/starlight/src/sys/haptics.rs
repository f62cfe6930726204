use nightsky::widgets::Haptics;

/// Desktops have no vibration motor; pulses are only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHaptics;

impl Haptics for LogHaptics {
    fn vibrate(&self, pattern: &[u64]) {
        log::trace!("Vibrate {:?}", pattern);
    }
}
