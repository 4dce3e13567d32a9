use crate::{Result, RunyoroError};

/// A finalized capture: mono samples plus the rate they were captured at.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Encode as 16-bit mono WAV in memory, ready for multipart upload.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = std::io::Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| RunyoroError::AudioEncodingError(e.to_string()))?;
        for &sample in &self.samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(value)
                .map_err(|e| RunyoroError::AudioEncodingError(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| RunyoroError::AudioEncodingError(e.to_string()))?;

        Ok(cursor.into_inner())
    }
}

/// Exclusive ownership of an audio input device between `start` and `stop`.
/// Only one capture is live at a time; the composer enforces that.
pub trait AudioCapture {
    /// Acquire the input device and begin capturing.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing, release the device, and return the finalized clip.
    fn stop(&mut self) -> Result<AudioClip>;
}

/// Capture that always refuses to start, for text-only builds.
#[derive(Debug, Default)]
pub struct NullCapture;

impl AudioCapture for NullCapture {
    fn start(&mut self) -> Result<()> {
        Err(RunyoroError::AudioDeviceError(
            "Audio input is disabled".into(),
        ))
    }

    fn stop(&mut self) -> Result<AudioClip> {
        Ok(AudioClip {
            samples: Vec::new(),
            sample_rate: 0,
        })
    }
}

#[cfg(feature = "audio-io")]
pub use cpal_capture::CpalCapture;

#[cfg(feature = "audio-io")]
mod cpal_capture {
    use super::{AudioCapture, AudioClip};
    use crate::{Result, RunyoroError};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::Stream;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tracing::{error, info};

    /// Microphone capture backed by the default cpal input device. The
    /// device is acquired on `start` and released when the stream drops
    /// on `stop`.
    #[derive(Default)]
    pub struct CpalCapture {
        stream: Option<Stream>,
        buffer: Arc<Mutex<Vec<f32>>>,
        sample_rate: u32,
    }

    impl CpalCapture {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl AudioCapture for CpalCapture {
        fn start(&mut self) -> Result<()> {
            let host = cpal::default_host();
            let device = host.default_input_device().ok_or_else(|| {
                RunyoroError::AudioDeviceError("No input device available".into())
            })?;

            info!(
                "Using input device: {}",
                device.name().unwrap_or_else(|_| "Unknown".to_string())
            );

            let config: cpal::StreamConfig = device
                .default_input_config()
                .map_err(|e| {
                    RunyoroError::AudioDeviceError(format!("Failed to get input config: {}", e))
                })?
                .into();

            self.sample_rate = config.sample_rate.0;
            let channels = config.channels as usize;
            self.buffer.lock().clear();
            let buffer = Arc::clone(&self.buffer);

            let err_fn = |err| {
                error!("Audio input stream error: {}", err);
            };

            let stream = device
                .build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let mut buffer = buffer.lock();
                        if channels == 1 {
                            buffer.extend_from_slice(data);
                        } else {
                            // Average all channels to create mono
                            buffer.extend(
                                data.chunks(channels)
                                    .map(|frame| frame.iter().sum::<f32>() / channels as f32),
                            );
                        }
                    },
                    err_fn,
                    None,
                )
                .map_err(|e| {
                    RunyoroError::AudioDeviceError(format!("Failed to build input stream: {}", e))
                })?;

            stream.play().map_err(|e| {
                RunyoroError::AudioDeviceError(format!("Failed to start input stream: {}", e))
            })?;

            self.stream = Some(stream);
            info!("Started audio capture");
            Ok(())
        }

        fn stop(&mut self) -> Result<AudioClip> {
            if let Some(stream) = self.stream.take() {
                drop(stream);
                info!("Stopped audio capture");
            }

            let samples = std::mem::take(&mut *self.buffer.lock());
            Ok(AudioClip {
                samples,
                sample_rate: self.sample_rate,
            })
        }
    }
}
