use crate::error::MetricsError;
use crate::ranks::RankConfig;
use crate::weights::WeightTable;
use hdrhistogram::serialization::Serializer;
use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Hit count for one rank, with observed vs configured share
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankHits {
    pub key: String,
    pub name: String,
    pub hits: u64,
    pub observed_pct: f64,
    pub configured_pct: f64,
}

/// Spin summary for JSON output (latencies in nanoseconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinSummary {
    pub count: u64,
    pub failed: u64,
    pub min: u64,
    pub max: u64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub p99_9: u64,
    pub throughput_avg: f64,
    pub ranks: Vec<RankHits>,
}

/// Spin metrics: draw latency histogram plus per-rank hit counters.
///
/// Safe to share between request handlers; counters are atomic and the
/// histogram sits behind a mutex.
pub struct SpinMetrics {
    histogram: Mutex<Histogram<u64>>,
    hits: Vec<AtomicU64>,
    failed: AtomicU64,
}

impl SpinMetrics {
    /// Create a collector for `num_ranks` ranks
    /// max_value: maximum latency in nanoseconds to track
    /// significant_figures: precision (3 = 0.1% precision)
    pub fn new(num_ranks: usize, max_value: u64, significant_figures: u8) -> Result<Self, MetricsError> {
        let histogram = Histogram::new_with_max(max_value, significant_figures)?;

        Ok(Self {
            histogram: Mutex::new(histogram),
            hits: (0..num_ranks).map(|_| AtomicU64::new(0)).collect(),
            failed: AtomicU64::new(0),
        })
    }

    /// Record a successful draw of the rank at `index`
    pub fn record_hit(&self, index: usize, latency_nanos: u64) {
        if let Some(counter) = self.hits.get(index) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
        // Clamp outliers instead of failing the request
        self.lock().saturating_record(latency_nanos);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get percentile value in nanoseconds
    pub fn percentile(&self, percentile: f64) -> u64 {
        self.lock().value_at_quantile(percentile)
    }

    /// Total successful draws
    pub fn count(&self) -> u64 {
        self.lock().len()
    }

    pub fn hits(&self, index: usize) -> u64 {
        self.hits
            .get(index)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Histogram<u64>> {
        self.histogram.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot the current state
    pub fn summary(&self, ranks: &RankConfig, weights: &WeightTable, duration_secs: f64) -> SpinSummary {
        let histogram = self.lock().clone();
        let count = histogram.len();

        let throughput_avg = if duration_secs > 0.0 {
            count as f64 / duration_secs
        } else {
            0.0
        };

        let ranks = ranks
            .iter()
            .enumerate()
            .map(|(idx, rank)| {
                let hits = self.hits(idx);
                let observed_pct = if count > 0 {
                    hits as f64 / count as f64 * 100.0
                } else {
                    0.0
                };
                RankHits {
                    key: rank.key.clone(),
                    name: rank.name.clone(),
                    hits,
                    observed_pct,
                    configured_pct: weights.at(idx).unwrap_or(0.0),
                }
            })
            .collect();

        SpinSummary {
            count,
            failed: self.failed.load(Ordering::Relaxed),
            min: histogram.min(),
            max: histogram.max(),
            p50: histogram.value_at_quantile(0.50),
            p95: histogram.value_at_quantile(0.95),
            p99: histogram.value_at_quantile(0.99),
            p99_9: histogram.value_at_quantile(0.999),
            throughput_avg,
            ranks,
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self, ranks: &RankConfig, weights: &WeightTable) {
        let summary = self.summary(ranks, weights, 0.0);

        println!("=== Spin Distribution ===");
        println!("{:<10} {:>8} {:>10} {:>10}", "rank", "hits", "observed", "expected");
        for r in &summary.ranks {
            println!(
                "{:<10} {:>8} {:>9.2}% {:>9.2}%",
                r.key, r.hits, r.observed_pct, r.configured_pct
            );
        }
        println!();
        println!("=== Draw Latency ===");
        println!("Total samples: {}", summary.count);
        println!("p50: {} ns", summary.p50);
        println!("p95: {} ns", summary.p95);
        println!("p99: {} ns", summary.p99);
        println!("p99.9: {} ns", summary.p99_9);
        println!("max: {} ns", summary.max);
        println!("min: {} ns", summary.min);
    }

    /// Write histogram to file in HDR histogram format
    pub fn write_histogram(&self, path: &Path) -> Result<(), MetricsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let histogram = self.lock().clone();
        let mut serializer = hdrhistogram::serialization::V2Serializer::new();
        let mut output = Vec::new();
        serializer.serialize(&histogram, &mut output)?;

        fs::write(path, output)?;
        Ok(())
    }

    /// Write summary to a JSON file
    pub fn write_summary_json(
        &self,
        path: &Path,
        ranks: &RankConfig,
        weights: &WeightTable,
        duration_secs: f64,
    ) -> Result<(), MetricsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let summary = self.summary(ranks, weights, duration_secs);
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json)?;
        Ok(())
    }
}
