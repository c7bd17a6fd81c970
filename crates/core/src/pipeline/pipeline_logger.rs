use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for streaming session events.
///
/// Keeps the frame loop independent of where its observations end up.
pub trait PipelineLogger: Send {
    /// Report how many frames the session has emitted so far.
    fn progress(&mut self, frames: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a per-frame metric (e.g. face count).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events. Used by tests.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _frames: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running aggregate of one stage or metric. Constant size however long
/// the stream runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Stats {
    fn first(value: f64) -> Self {
        Self {
            count: 1,
            sum: value,
            min: value,
            max: value,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Aggregates per-stage timings and metrics for a session and reports them
/// through the `log` facade.
///
/// Progress is logged every `throttle_frames` frames.
pub struct LogPipelineLogger {
    throttle_frames: usize,
    timings: HashMap<String, Stats>,
    metrics: HashMap<String, Stats>,
    start_time: Instant,
    total_frames: usize,
}

impl LogPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            total_frames: 0,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.total_frames;
        let mut lines = Vec::new();

        lines.push(format!(
            "Stream summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let stats = &self.timings[stage];
            lines.push(format!(
                "  {stage:10}: avg {:6.1}ms  max {:6.1}ms  total {:7.0}ms",
                stats.mean(),
                stats.max,
                stats.sum
            ));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            let stats = &self.metrics[name];
            lines.push(format!(
                "  {name}: avg {:.1}  sum {:.0}",
                stats.mean(),
                stats.sum
            ));
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<Stats> {
        self.timings.get(stage).copied()
    }

    pub fn metrics_for(&self, name: &str) -> Option<Stats> {
        self.metrics.get(name).copied()
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn progress(&mut self, frames: usize) {
        self.total_frames = frames;
        if frames > 0 && frames % self.throttle_frames == 0 {
            log::debug!("Streamed {frames} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        record(&mut self.timings, stage, duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        record(&mut self.metrics, name, value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

fn record(table: &mut HashMap<String, Stats>, key: &str, value: f64) {
    match table.get_mut(key) {
        Some(stats) => stats.add(value),
        None => {
            table.insert(key.to_string(), Stats::first(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(10);
        logger.timing("detect", 5.0);
        logger.metric("faces", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = LogPipelineLogger::new(10);
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("encode", 5.0);

        let detect = logger.timings_for("detect").unwrap();
        assert_eq!(
            detect,
            Stats {
                count: 2,
                sum: 50.0,
                min: 20.0,
                max: 30.0
            }
        );
        assert_eq!(detect.mean(), 25.0);
        assert_eq!(logger.timings_for("encode").unwrap().count, 1);
        assert!(logger.timings_for("capture").is_none());
    }

    #[test]
    fn test_endless_stream_keeps_one_aggregate_per_key() {
        let mut logger = LogPipelineLogger::new(100);
        // an hour at 10 fps
        for frame in 1..=36_000 {
            for stage in ["capture", "detect", "annotate", "encode"] {
                logger.timing(stage, 2.0);
            }
            logger.metric("faces", (frame % 3) as f64);
            logger.progress(frame);
        }

        assert_eq!(logger.timings.len(), 4);
        assert_eq!(logger.metrics.len(), 1);
        let faces = logger.metrics_for("faces").unwrap();
        assert_eq!(faces.count, 36_000);
        assert_eq!((faces.min, faces.max), (0.0, 2.0));
        assert_eq!(logger.timings_for("encode").unwrap().sum, 72_000.0);
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = LogPipelineLogger::new(10);
        logger.progress(2);
        logger.timing("capture", 10.0);
        logger.timing("detect", 20.0);
        logger.metric("faces", 1.0);
        logger.metric("faces", 2.0);
        logger.metric("admitted", 1.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Stream summary (2 frames"));
        assert!(summary.contains("capture"));
        assert!(summary.contains("detect"));
        assert!(summary.contains("faces: avg 1.5  sum 3"));
        assert!(summary.contains("admitted: avg 1.0  sum 1"));
    }

    #[test]
    fn test_summary_includes_fps() {
        let mut logger = LogPipelineLogger::new(10);
        logger.progress(100);
        logger.timing("detect", 10.0);
        assert!(logger.summary_string().unwrap().contains("fps"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogPipelineLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_latest_count() {
        let mut logger = LogPipelineLogger::new(10);
        for i in 1..=25 {
            logger.progress(i);
        }
        assert_eq!(logger.total_frames, 25);
    }

    #[test]
    fn test_zero_throttle_is_clamped() {
        assert_eq!(LogPipelineLogger::new(0).throttle_frames, 1);
    }
}
