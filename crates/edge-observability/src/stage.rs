//! Stage transition logging and timing.

use std::sync::Mutex;
use std::time::Duration;

use edge_core::{DeployStage, StageObserver};
use serde::Serialize;
use tracing::{error, info};

/// Time at which a stage was entered, relative to the start of composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageTiming {
    pub stage: DeployStage,
    /// Microseconds since composition started.
    pub elapsed_us: u64,
}

/// Observer that logs every stage transition and keeps the timings.
#[derive(Debug, Default)]
pub struct StageLogger {
    timings: Mutex<Vec<StageTiming>>,
    failed: Mutex<Option<(DeployStage, String)>>,
}

impl StageLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timings recorded so far, in stage order.
    pub fn timings(&self) -> Vec<StageTiming> {
        self.timings.lock().map(|t| t.clone()).unwrap_or_default()
    }

    /// The stage that failed, with its error.
    pub fn failure(&self) -> Option<(DeployStage, String)> {
        self.failed.lock().ok().and_then(|f| f.clone())
    }

    /// Time spent in each stage, derived from consecutive entry times.
    pub fn durations(&self) -> Vec<(DeployStage, Duration)> {
        let timings = self.timings();
        let mut previous = 0;
        timings
            .iter()
            .map(|t| {
                let spent = t.elapsed_us.saturating_sub(previous);
                previous = t.elapsed_us;
                (t.stage, Duration::from_micros(spent))
            })
            .collect()
    }
}

impl StageObserver for StageLogger {
    fn on_stage(&self, stage: DeployStage, elapsed: Duration) {
        let elapsed_us = elapsed.as_micros() as u64;
        info!(
            stage = %stage,
            step = stage.number(),
            elapsed_us,
            "entered stage"
        );
        if let Ok(mut timings) = self.timings.lock() {
            timings.push(StageTiming { stage, elapsed_us });
        }
    }

    fn on_failure(&self, stage: DeployStage, message: &str) {
        error!(stage = %stage, error = message, "stage failed");
        if let Ok(mut failed) = self.failed.lock() {
            *failed = Some((stage, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_timings() {
        let logger = StageLogger::new();
        logger.on_stage(DeployStage::RouterRegistered, Duration::from_micros(10));
        logger.on_stage(DeployStage::StoreReady, Duration::from_micros(35));

        let timings = logger.timings();
        assert_eq!(timings.len(), 2);
        assert_eq!(timings[1].stage, DeployStage::StoreReady);

        let durations = logger.durations();
        assert_eq!(durations[0].1, Duration::from_micros(10));
        assert_eq!(durations[1].1, Duration::from_micros(25));
        assert!(logger.failure().is_none());
    }

    #[test]
    fn test_records_failure() {
        let logger = StageLogger::new();
        logger.on_failure(DeployStage::StoreReady, "not a directory: dist");
        assert_eq!(
            logger.failure(),
            Some((DeployStage::StoreReady, "not a directory: dist".to_string()))
        );
    }
}
