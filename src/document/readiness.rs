//! Content-readiness detection for loading documents.
//!
//! A document's load event only says the frame finished loading, not that
//! anything visible has been painted. After the load event the registry
//! polls the document's probe until its content looks real: a non-blank
//! background, or at least one child element taller than a floor. A hard
//! deadline forces readiness so a stubborn document is never hidden
//! forever, and any probe failure counts as ready for the same reason.

use std::sync::Arc;
use std::time::Duration;

use webdock_config::Config;

use super::host::{ProbeSample, ReadinessProbe};

/// Timing and thresholds for one readiness poll, derived from [`Config`].
#[derive(Debug, Clone)]
pub struct ReadinessSettings {
    pub poll_interval: Duration,
    pub timeout: Duration,
    pub min_content_height: f32,
}

impl ReadinessSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.ready_poll_interval_ms),
            timeout: Duration::from_millis(config.ready_timeout_ms),
            min_content_height: config.min_content_height,
        }
    }
}

impl Default for ReadinessSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Backgrounds that browsers report for an unstyled or empty document.
fn is_blank_background(background: &str) -> bool {
    matches!(
        background.trim().to_ascii_lowercase().as_str(),
        "" | "transparent"
            | "rgba(0, 0, 0, 0)"
            | "rgb(255, 255, 255)"
            | "#fff"
            | "#ffffff"
            | "white"
    )
}

/// Whether one observation shows painted content.
pub fn sample_is_ready(sample: &ProbeSample, min_content_height: f32) -> bool {
    if !is_blank_background(&sample.background) {
        return true;
    }
    sample.child_count >= 1 && sample.content_height > min_content_height
}

/// Poll `probe` until the document looks ready.
///
/// Resolves on the first ready sample, on any probe error, or at the hard
/// deadline. Every exit is "ready" from the caller's point of view.
pub async fn await_ready(probe: Arc<dyn ReadinessProbe>, settings: ReadinessSettings) {
    let poll = async {
        loop {
            match probe.sample() {
                Ok(sample) if sample_is_ready(&sample, settings.min_content_height) => return,
                Ok(_) => {}
                Err(e) => {
                    log::debug!("Readiness probe unavailable ({}), treating as ready", e);
                    return;
                }
            }
            tokio::time::sleep(settings.poll_interval).await;
        }
    };
    if tokio::time::timeout(settings.timeout, poll).await.is_err() {
        log::debug!(
            "Document not visibly ready after {:?}, showing it anyway",
            settings.timeout
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::host::ProbeError;
    use parking_lot::Mutex;
    use tokio::time::Instant;

    fn sample(background: &str, height: f32, children: u32) -> ProbeSample {
        ProbeSample {
            background: background.to_string(),
            content_height: height,
            child_count: children,
        }
    }

    struct ScriptedProbe {
        samples: Mutex<Vec<Result<ProbeSample, ProbeError>>>,
        last: Result<ProbeSample, ProbeError>,
    }

    impl ScriptedProbe {
        fn new(
            samples: Vec<Result<ProbeSample, ProbeError>>,
            last: Result<ProbeSample, ProbeError>,
        ) -> Self {
            Self {
                samples: Mutex::new(samples),
                last,
            }
        }
    }

    impl ReadinessProbe for ScriptedProbe {
        fn sample(&self) -> Result<ProbeSample, ProbeError> {
            let mut samples = self.samples.lock();
            if samples.is_empty() {
                self.last.clone()
            } else {
                samples.remove(0)
            }
        }
    }

    fn settings() -> ReadinessSettings {
        ReadinessSettings::default()
    }

    #[test]
    fn blank_backgrounds_are_not_ready() {
        for background in ["", "  ", "transparent", "rgba(0, 0, 0, 0)", "#FFF", "white"] {
            assert!(
                !sample_is_ready(&sample(background, 0.0, 0), 100.0),
                "{background:?} should read as blank"
            );
        }
    }

    #[test]
    fn styled_background_is_ready() {
        assert!(sample_is_ready(&sample("rgb(30, 30, 46)", 0.0, 0), 100.0));
    }

    #[test]
    fn tall_content_on_blank_background_is_ready() {
        assert!(sample_is_ready(&sample("white", 600.0, 3), 100.0));
        assert!(!sample_is_ready(&sample("white", 80.0, 3), 100.0));
        assert!(!sample_is_ready(&sample("white", 600.0, 0), 100.0));
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_once_content_appears() {
        let probe = Arc::new(ScriptedProbe::new(
            vec![Ok(sample("white", 0.0, 0)), Ok(sample("white", 0.0, 1))],
            Ok(sample("#1e1e2e", 600.0, 4)),
        ));
        let start = Instant::now();
        await_ready(probe, settings()).await;
        // Two blank samples, so two poll intervals elapsed.
        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn probe_error_resolves_immediately() {
        let probe = Arc::new(ScriptedProbe::new(vec![], Err(ProbeError::CrossOrigin)));
        let start = Instant::now();
        await_ready(probe, settings()).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_forces_resolution() {
        let probe = Arc::new(ScriptedProbe::new(vec![], Ok(sample("white", 0.0, 0))));
        let start = Instant::now();
        await_ready(probe, settings()).await;
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }
}
