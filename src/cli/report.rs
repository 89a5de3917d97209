//! Benchmark reporting: latency percentiles and the JSON report

use anyhow::Result;
use butterfly_closure::{EngineConfig, PhaseCounts};
use hdrhistogram::Histogram;
use serde::Serialize;

use super::RecurrenceKind;

/// Run-time percentiles in milliseconds
#[derive(Debug, Clone, Serialize)]
pub struct LatencySummary {
    pub runs: u64,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
}

impl LatencySummary {
    /// Summarize a histogram recorded in microseconds
    pub fn from_micros(hist: &Histogram<u64>) -> Self {
        let ms = |us: u64| us as f64 / 1000.0;
        Self {
            runs: hist.len(),
            mean_ms: hist.mean() / 1000.0,
            p50_ms: ms(hist.value_at_quantile(0.50)),
            p95_ms: ms(hist.value_at_quantile(0.95)),
            p99_ms: ms(hist.value_at_quantile(0.99)),
            max_ms: ms(hist.max()),
        }
    }
}

/// New histogram for run times in microseconds (1µs .. 1h, 3 significant digits)
pub fn latency_histogram() -> Result<Histogram<u64>> {
    Ok(Histogram::<u64>::new_with_bounds(1, 3_600_000_000, 3)?)
}

/// Everything `bench --json` prints
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub n: usize,
    pub density: f64,
    pub seed: u64,
    pub recurrence: RecurrenceKind,
    pub executor: &'static str,
    pub config: EngineConfig,
    pub base_cases: PhaseCounts,
    pub latency: LatencySummary,
    pub verified: Option<bool>,
    /// First differing cell when verification failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<String>,
}

impl BenchReport {
    /// Record the outcome of the reference cross-check, if one ran
    pub fn with_verification(mut self, outcome: Option<&Result<()>>) -> Self {
        self.verified = outcome.map(|r| r.is_ok());
        self.mismatch = outcome.and_then(|r| r.as_ref().err()).map(|e| format!("{e:#}"));
        self
    }

    /// Human-readable lines for stderr
    pub fn print(&self) {
        eprintln!(
            "📊 n={} density={} block={} executor={} recurrence={:?}",
            self.n, self.density, self.config.block, self.executor, self.recurrence
        );
        eprintln!(
            "   base cases: diagonal={} row={} column={} cross={}",
            self.base_cases.diagonal,
            self.base_cases.row,
            self.base_cases.column,
            self.base_cases.cross
        );
        eprintln!(
            "   runs={} mean={:.2}ms p50={:.2}ms p95={:.2}ms p99={:.2}ms max={:.2}ms",
            self.latency.runs,
            self.latency.mean_ms,
            self.latency.p50_ms,
            self.latency.p95_ms,
            self.latency.p99_ms,
            self.latency.max_ms
        );
        if let Some(verified) = self.verified {
            eprintln!("   verified against reference: {}", if verified { "✅" } else { "❌" });
        }
        if let Some(mismatch) = &self.mismatch {
            eprintln!("   {mismatch}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_summary() {
        let mut hist = latency_histogram().unwrap();
        for us in [1_000u64, 2_000, 3_000, 4_000] {
            hist.saturating_record(us);
        }
        let summary = LatencySummary::from_micros(&hist);
        assert_eq!(summary.runs, 4);
        assert!((summary.mean_ms - 2.5).abs() < 0.01);
        assert!((summary.max_ms - 4.0).abs() < 0.01);
        assert!(summary.p50_ms <= summary.p95_ms);
    }

    fn report(recurrence: RecurrenceKind) -> BenchReport {
        let hist = latency_histogram().unwrap();
        BenchReport {
            n: 8,
            density: 0.5,
            seed: 1,
            recurrence,
            executor: "rayon",
            config: EngineConfig::default(),
            base_cases: PhaseCounts::default(),
            latency: LatencySummary::from_micros(&hist),
            verified: None,
            mismatch: None,
        }
    }

    #[test]
    fn test_failed_verification_keeps_the_cell() {
        let outcome: Result<()> = Err(anyhow::anyhow!(
            "Verification failed at cell (5, 4): engine produced -100, reference produced 7"
        ));
        let report = report(RecurrenceKind::MinPlus).with_verification(Some(&outcome));
        assert_eq!(report.verified, Some(false));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["verified"], false);
        let mismatch = json["mismatch"].as_str().unwrap();
        assert!(mismatch.contains("(5, 4)"), "{mismatch}");
        assert!(mismatch.contains("-100"), "{mismatch}");
    }

    #[test]
    fn test_unverified_report_has_no_mismatch() {
        let report = report(RecurrenceKind::MinPlus).with_verification(None);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["verified"].is_null());
        assert!(json.get("mismatch").is_none());

        let report = report_ok();
        assert_eq!(report.verified, Some(true));
        assert!(report.mismatch.is_none());
    }

    fn report_ok() -> BenchReport {
        report(RecurrenceKind::MaxMin).with_verification(Some(&Ok(())))
    }

    #[test]
    fn test_report_json_fields() {
        let hist = latency_histogram().unwrap();
        let report = BenchReport {
            n: 8,
            density: 0.5,
            seed: 1,
            recurrence: RecurrenceKind::MaxMin,
            executor: "rayon",
            config: EngineConfig::default(),
            base_cases: PhaseCounts::default(),
            latency: LatencySummary::from_micros(&hist),
            verified: Some(true),
            mismatch: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["recurrence"], "max-min");
        assert_eq!(json["config"]["block"], 64);
        assert_eq!(json["verified"], true);
    }
}
