/// Playback flag reported by an audio player so the sky can dim behind it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioStatus {
    playing: bool,
}

impl AudioStatus {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) -> bool {
        let changed = self.playing != playing;
        self.playing = playing;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_changes_only() {
        let mut status = AudioStatus::default();
        assert!(!status.set_playing(false));
        assert!(status.set_playing(true));
        assert!(status.is_playing());
        assert!(!status.set_playing(true));
        assert!(status.set_playing(false));
    }
}
