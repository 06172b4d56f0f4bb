//! Mirroring session options

/// Options translated into scrcpy command-line flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOptions {
    pub max_fps: Option<u32>,
    /// Bit rate with optional unit suffix, e.g. `8M`
    pub video_bit_rate: Option<String>,
    pub audio_bit_rate: Option<String>,
    pub rotate: bool,
    pub always_on_top: bool,
    pub disable_screensaver: bool,
    pub no_audio: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            max_fps: None,
            video_bit_rate: None,
            audio_bit_rate: None,
            rotate: false,
            always_on_top: true,
            disable_screensaver: true,
            no_audio: true,
        }
    }
}

impl StreamOptions {
    /// Create the default option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the frame rate
    pub fn with_max_fps(mut self, max_fps: u32) -> Self {
        self.max_fps = Some(max_fps);
        self
    }

    /// Set the video bit rate
    pub fn with_video_bit_rate(mut self, rate: impl Into<String>) -> Self {
        self.video_bit_rate = Some(rate.into());
        self
    }

    /// Set the audio bit rate
    pub fn with_audio_bit_rate(mut self, rate: impl Into<String>) -> Self {
        self.audio_bit_rate = Some(rate.into());
        self
    }

    pub fn with_rotate(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    pub fn with_always_on_top(mut self, always_on_top: bool) -> Self {
        self.always_on_top = always_on_top;
        self
    }

    pub fn with_disable_screensaver(mut self, disable_screensaver: bool) -> Self {
        self.disable_screensaver = disable_screensaver;
        self
    }

    pub fn with_no_audio(mut self, no_audio: bool) -> Self {
        self.no_audio = no_audio;
        self
    }

    /// Render the option set as scrcpy flags
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(fps) = self.max_fps {
            args.push(format!("--max-fps={}", fps));
        }
        if let Some(rate) = &self.video_bit_rate {
            args.push(format!("--video-bit-rate={}", rate));
        }
        if let Some(rate) = &self.audio_bit_rate {
            args.push(format!("--audio-bit-rate={}", rate));
        }
        if self.rotate {
            args.push("--rotate".to_string());
        }
        if self.always_on_top {
            args.push("--always-on-top".to_string());
        }
        if self.disable_screensaver {
            args.push("--disable-screensaver".to_string());
        }
        if self.no_audio {
            args.push("--no-audio".to_string());
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags() {
        assert_eq!(
            StreamOptions::default().to_args(),
            vec!["--always-on-top", "--disable-screensaver", "--no-audio"]
        );
    }

    #[test]
    fn test_full_flag_set() {
        let options = StreamOptions::new()
            .with_max_fps(30)
            .with_video_bit_rate("8M")
            .with_audio_bit_rate("128K")
            .with_rotate(true)
            .with_no_audio(false);

        assert_eq!(
            options.to_args(),
            vec![
                "--max-fps=30",
                "--video-bit-rate=8M",
                "--audio-bit-rate=128K",
                "--rotate",
                "--always-on-top",
                "--disable-screensaver",
            ]
        );
    }

    #[test]
    fn test_all_toggles_off() {
        let options = StreamOptions::new()
            .with_always_on_top(false)
            .with_disable_screensaver(false)
            .with_no_audio(false);
        assert!(options.to_args().is_empty());
    }
}
