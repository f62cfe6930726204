//! Input level capture for the voice diagnosis widget.

use nightsky::widgets::{DiagnosisError, LevelMeter, Microphone};

/// The default input device of the system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMicrophone;

impl Microphone for SystemMicrophone {
    fn open(&self) -> Result<Box<dyn LevelMeter>, DiagnosisError> {
        imp::open()
            .map(|meter| Box::new(meter) as Box<dyn LevelMeter>)
            .map_err(|e| {
                log::warn!("Microphone unavailable: {:#}", e);
                DiagnosisError::MicrophoneUnavailable(e.to_string())
            })
    }
}

/// Maps an RMS amplitude in `0..=1` onto the `0..=255` level scale.
/// Speech rarely goes past a quarter of full scale, hence the gain.
pub fn level_from_rms(rms: f32) -> f32 {
    const GAIN: f32 = 4.0;
    (rms * GAIN).clamp(0.0, 1.0) * 255.0
}

pub fn rms(samples: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = samples.fold((0.0f32, 0usize), |(s, n), x| (s + x * x, n + 1));
    if count == 0 {
        return 0.0;
    }
    (sum / count as f32).sqrt()
}

#[cfg(feature = "microphone")]
mod imp {
    use super::{level_from_rms, rms};
    use anyhow::{Context, anyhow};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{SampleFormat, Stream, StreamConfig};
    use nightsky::widgets::LevelMeter;
    use parking_lot::Mutex;
    use std::sync::Arc;

    pub struct CpalMeter {
        // Capture stops when the stream is dropped.
        _stream: Stream,
        level: Arc<Mutex<f32>>,
    }

    impl LevelMeter for CpalMeter {
        fn level(&self) -> f32 {
            *self.level.lock()
        }
    }

    pub fn open() -> anyhow::Result<CpalMeter> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow!("No input device available"))?;
        let supported = device
            .default_input_config()
            .context("Failed to get input config")?;
        let sample_format = supported.sample_format();
        let stream_config: StreamConfig = supported.into();

        let level = Arc::new(Mutex::new(0.0f32));
        let on_error = |e: cpal::StreamError| log::error!("Input stream error: {}", e);

        let stream = match sample_format {
            SampleFormat::F32 => {
                let level = level.clone();
                device.build_input_stream(
                    &stream_config,
                    move |data: &[f32], _| {
                        *level.lock() = level_from_rms(rms(data.iter().copied()));
                    },
                    on_error,
                    None,
                )
            }
            SampleFormat::I16 => {
                let level = level.clone();
                device.build_input_stream(
                    &stream_config,
                    move |data: &[i16], _| {
                        let samples = data.iter().map(|s| *s as f32 / i16::MAX as f32);
                        *level.lock() = level_from_rms(rms(samples));
                    },
                    on_error,
                    None,
                )
            }
            SampleFormat::U16 => {
                let level = level.clone();
                device.build_input_stream(
                    &stream_config,
                    move |data: &[u16], _| {
                        let samples = data
                            .iter()
                            .map(|s| (*s as f32 - 32768.0) / 32768.0);
                        *level.lock() = level_from_rms(rms(samples));
                    },
                    on_error,
                    None,
                )
            }
            other => return Err(anyhow!("Unsupported sample format {:?}", other)),
        }
        .context("Failed to build input stream")?;

        stream.play().context("Failed to start input stream")?;
        log::debug!("Microphone capture started");

        Ok(CpalMeter {
            _stream: stream,
            level,
        })
    }
}

#[cfg(not(feature = "microphone"))]
mod imp {
    use nightsky::widgets::LevelMeter;

    pub struct NoMeter;

    impl LevelMeter for NoMeter {
        fn level(&self) -> f32 {
            0.0
        }
    }

    pub fn open() -> anyhow::Result<NoMeter> {
        anyhow::bail!("built without microphone support")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_of_silence_and_tone() {
        assert_eq!(rms(std::iter::empty()), 0.0);
        assert_eq!(rms([0.0; 8].into_iter()), 0.0);
        assert!((rms([0.5, -0.5, 0.5, -0.5].into_iter()) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_level_scale_is_clamped() {
        assert_eq!(level_from_rms(0.0), 0.0);
        assert_eq!(level_from_rms(0.25), 255.0);
        assert_eq!(level_from_rms(3.0), 255.0);
        assert!((level_from_rms(0.125) - 127.5).abs() < 1e-3);
    }
}
