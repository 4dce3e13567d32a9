//! Draft text plus the speech-capture state machine that feeds it.
//!
//! Captures move `Idle -> Recording -> Processing -> Idle`; a failure at
//! any point records an inline error and returns to `Idle` without
//! touching the draft.

pub mod capture;

#[cfg(feature = "audio-io")]
pub use capture::CpalCapture;
pub use capture::{AudioCapture, AudioClip, NullCapture};

use crate::gateway::ModelBackend;
use tracing::{debug, warn};

/// Recording state for voice input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// Not recording
    Idle,
    /// Currently capturing audio
    Recording,
    /// Transcribing the captured audio
    Processing,
}

/// Per-conversation message composer: the draft text and the capture
/// machine that appends transcribed speech to it.
pub struct Composer<C: AudioCapture> {
    draft: String,
    state: RecordingState,
    capture: C,
    disabled: bool,
    last_error: Option<String>,
}

impl<C: AudioCapture> Composer<C> {
    pub fn new(capture: C) -> Self {
        Self {
            draft: String::new(),
            state: RecordingState::Idle,
            capture,
            disabled: false,
            last_error: None,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Take the draft for sending, leaving the composer empty.
    pub fn take_draft(&mut self) -> String {
        std::mem::take(&mut self.draft)
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Disable capture starts while a send is in flight.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Begin a capture. No-op while disabled or while a capture is already
    /// live; a device acquisition failure stays in `Idle` with the error
    /// recorded.
    pub fn start_recording(&mut self) {
        if self.disabled {
            debug!("start suppressed, composer disabled");
            return;
        }
        if self.state != RecordingState::Idle {
            debug!(state = ?self.state, "start ignored, capture already live");
            return;
        }

        self.last_error = None;
        match self.capture.start() {
            Ok(()) => {
                self.state = RecordingState::Recording;
                debug!("recording started");
            }
            Err(e) => {
                warn!("failed to acquire input device: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Finalize the capture and submit it for transcription. On success the
    /// transcript is appended to the draft, space-separated when the draft
    /// already has text. No-op unless currently `Recording`.
    pub async fn stop_recording<B: ModelBackend + ?Sized>(&mut self, backend: &B) {
        if self.state != RecordingState::Recording {
            debug!(state = ?self.state, "stop ignored");
            return;
        }

        self.last_error = None;
        let clip = match self.capture.stop() {
            Ok(clip) => clip,
            Err(e) => {
                warn!("failed to finalize capture: {}", e);
                self.last_error = Some(e.to_string());
                self.state = RecordingState::Idle;
                return;
            }
        };

        self.state = RecordingState::Processing;
        debug!(
            seconds = clip.duration_seconds() as f64,
            "capture finalized, transcribing"
        );

        let result = match clip.to_wav_bytes() {
            Ok(bytes) => backend.transcribe(bytes).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(transcript) => {
                if !self.draft.is_empty() {
                    self.draft.push(' ');
                }
                self.draft.push_str(&transcript);
                debug!("transcript appended to draft");
            }
            Err(e) => {
                warn!("transcription failed: {}", e);
                self.last_error = Some(e.to_string());
            }
        }

        self.state = RecordingState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{
        GenerateRequest, GenerateResponse, TranslateRequest, TranslateResponse,
    };
    use crate::{Result, RunyoroError};
    use async_trait::async_trait;

    /// Capture with scripted start/stop outcomes.
    struct FakeCapture {
        start_result: Result<()>,
        started: usize,
        stopped: usize,
    }

    impl FakeCapture {
        fn working() -> Self {
            Self {
                start_result: Ok(()),
                started: 0,
                stopped: 0,
            }
        }

        fn denied() -> Self {
            Self {
                start_result: Err(RunyoroError::AudioDeviceError(
                    "No input device available".into(),
                )),
                started: 0,
                stopped: 0,
            }
        }
    }

    impl AudioCapture for FakeCapture {
        fn start(&mut self) -> Result<()> {
            self.start_result.clone()?;
            self.started += 1;
            Ok(())
        }

        fn stop(&mut self) -> Result<AudioClip> {
            self.stopped += 1;
            Ok(AudioClip {
                samples: vec![0.0; 160],
                sample_rate: 16000,
            })
        }
    }

    /// Backend whose transcribe call is scripted; generate/translate are
    /// unreachable from the composer.
    struct FakeBackend {
        transcription: Result<String>,
    }

    #[async_trait]
    impl ModelBackend for FakeBackend {
        async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
            unreachable!("composer never generates")
        }

        async fn translate(&self, _request: TranslateRequest) -> Result<TranslateResponse> {
            unreachable!("composer never translates")
        }

        async fn transcribe(&self, _audio: Vec<u8>) -> Result<String> {
            self.transcription.clone()
        }
    }

    #[tokio::test]
    async fn test_success_path_appends_transcript() {
        let mut composer = Composer::new(FakeCapture::working());
        let backend = FakeBackend {
            transcription: Ok("mhoro shamwari".into()),
        };

        composer.start_recording();
        assert_eq!(composer.state(), RecordingState::Recording);

        composer.stop_recording(&backend).await;
        assert_eq!(composer.state(), RecordingState::Idle);
        assert_eq!(composer.draft(), "mhoro shamwari");
        assert!(composer.last_error().is_none());
    }

    #[tokio::test]
    async fn test_transcript_is_space_separated_from_existing_draft() {
        let mut composer = Composer::new(FakeCapture::working());
        composer.set_draft("Ndiri kuda");
        let backend = FakeBackend {
            transcription: Ok("kudzidza chiRungu".into()),
        };

        composer.start_recording();
        composer.stop_recording(&backend).await;
        assert_eq!(composer.draft(), "Ndiri kuda kudzidza chiRungu");
    }

    #[test]
    fn test_start_while_recording_is_noop() {
        let mut composer = Composer::new(FakeCapture::working());
        composer.start_recording();
        composer.start_recording();

        assert_eq!(composer.state(), RecordingState::Recording);
        assert_eq!(composer.capture.started, 1);
    }

    #[tokio::test]
    async fn test_stop_while_idle_is_noop() {
        let mut composer = Composer::new(FakeCapture::working());
        let backend = FakeBackend {
            transcription: Ok("never".into()),
        };

        composer.stop_recording(&backend).await;
        assert_eq!(composer.state(), RecordingState::Idle);
        assert_eq!(composer.capture.stopped, 0);
        assert_eq!(composer.draft(), "");
    }

    #[test]
    fn test_device_failure_stays_idle_with_error() {
        let mut composer = Composer::new(FakeCapture::denied());
        composer.start_recording();

        assert_eq!(composer.state(), RecordingState::Idle);
        assert!(composer
            .last_error()
            .unwrap()
            .contains("No input device available"));
    }

    #[tokio::test]
    async fn test_failed_transcription_leaves_draft_untouched() {
        let mut composer = Composer::new(FakeCapture::working());
        composer.set_draft("keep me");
        let backend = FakeBackend {
            transcription: Err(RunyoroError::TranscriptionError(
                "No transcription returned".into(),
            )),
        };

        composer.start_recording();
        composer.stop_recording(&backend).await;

        assert_eq!(composer.state(), RecordingState::Idle);
        assert_eq!(composer.draft(), "keep me");
        assert!(composer.last_error().is_some());
    }

    #[test]
    fn test_disabled_suppresses_start() {
        let mut composer = Composer::new(FakeCapture::working());
        composer.set_disabled(true);
        composer.start_recording();

        assert_eq!(composer.state(), RecordingState::Idle);
        assert_eq!(composer.capture.started, 0);
    }

    #[test]
    fn test_error_cleared_on_next_interaction() {
        let mut composer = Composer::new(FakeCapture::denied());
        composer.start_recording();
        assert!(composer.last_error().is_some());

        composer.capture.start_result = Ok(());
        composer.start_recording();
        assert!(composer.last_error().is_none());
        assert_eq!(composer.state(), RecordingState::Recording);
    }
}
