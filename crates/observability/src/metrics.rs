//! Scanner metrics
//!
//! Thin wrappers over the `metrics` facade plus an in-memory aggregator for
//! the end-of-session summary.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use contracts::{CompassSector, CorrelatedRecord};
use metrics::{counter, gauge, histogram};

/// Accepted (allowlisted) detection
///
/// `sector` is `None` when no heading was available at arrival.
pub fn record_detection_accepted(device_id: &str, sector: Option<CompassSector>) {
    counter!(
        "beacon_scanner_detections_accepted_total",
        "device_id" => device_id.to_string()
    )
    .increment(1);

    let sector = sector.map(|s| s.label()).unwrap_or("unavailable");
    counter!("beacon_scanner_detections_by_sector_total", "sector" => sector).increment(1);
}

/// Detection dropped by the allowlist
pub fn record_detection_filtered() {
    counter!("beacon_scanner_detections_filtered_total").increment(1);
}

/// A fusion strategy published a new heading
pub fn record_heading_update(strategy: &'static str, degrees: f64) {
    counter!("beacon_scanner_heading_updates_total", "strategy" => strategy).increment(1);
    gauge!("beacon_scanner_heading_degrees").set(degrees);
}

/// A sample could not produce a rotation matrix
pub fn record_fusion_rejected(strategy: &'static str) {
    counter!("beacon_scanner_fusion_rejected_total", "strategy" => strategy).increment(1);
}

/// Final state of one report payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Delivered,
    Failed,
    /// Queue full, never sent
    Dropped,
}

impl ReportOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Dropped => "dropped",
        }
    }
}

pub fn record_report_outcome(transport: &str, outcome: ReportOutcome) {
    counter!(
        "beacon_scanner_reports_total",
        "transport" => transport.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_report_latency_ms(latency_ms: f64) {
    histogram!("beacon_scanner_report_latency_ms").record(latency_ms);
}

pub fn record_reporter_queue_depth(depth: usize) {
    gauge!("beacon_scanner_reporter_queue_depth").set(depth as f64);
}

/// Session written to disk
pub fn record_session_exported(records: usize, bytes: usize) {
    counter!("beacon_scanner_sessions_exported_total").increment(1);
    histogram!("beacon_scanner_session_records").record(records as f64);
    histogram!("beacon_scanner_session_bytes").record(bytes as f64);
}

/// In-memory statistics over one session's records
#[derive(Debug, Clone, Default)]
pub struct SessionStatsAggregator {
    pub total_records: u64,
    /// Records taken while no heading was available
    pub without_heading: u64,
    /// RSSI per device
    pub rssi_by_device: HashMap<String, RunningStats>,
    pub sector_counts: HashMap<CompassSector, u64>,
}

impl SessionStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, record: &CorrelatedRecord) {
        self.total_records += 1;

        self.rssi_by_device
            .entry(record.device_id.to_string())
            .or_default()
            .push(record.rssi as f64);

        match record.direction {
            Some(sector) => *self.sector_counts.entry(sector).or_insert(0) += 1,
            None => self.without_heading += 1,
        }
    }

    pub fn extend<'a>(&mut self, records: impl IntoIterator<Item = &'a CorrelatedRecord>) {
        for record in records {
            self.update(record);
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total_records: self.total_records,
            without_heading: self.without_heading,
            rssi_by_device: self
                .rssi_by_device
                .iter()
                .map(|(id, stats)| (id.clone(), StatsSummary::from(stats)))
                .collect(),
            sector_counts: CompassSector::ALL
                .iter()
                .filter_map(|s| self.sector_counts.get(s).map(|c| (*s, *c)))
                .collect(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Printable summary of a session
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    pub total_records: u64,
    pub without_heading: u64,
    /// Sorted by device id
    pub rssi_by_device: BTreeMap<String, StatsSummary>,
    /// In compass order, sectors with no records omitted
    pub sector_counts: Vec<(CompassSector, u64)>,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Session Summary ===")?;
        writeln!(f, "Records: {}", self.total_records)?;
        if self.without_heading > 0 {
            writeln!(f, "Records without heading: {}", self.without_heading)?;
        }

        if !self.rssi_by_device.is_empty() {
            writeln!(f, "RSSI (dBm) by device:")?;
            for (device, stats) in &self.rssi_by_device {
                writeln!(f, "  {device}: {stats}")?;
            }
        }

        if !self.sector_counts.is_empty() {
            let sectors: Vec<String> = self
                .sector_counts
                .iter()
                .map(|(sector, count)| format!("{sector}={count}"))
                .collect();
            writeln!(f, "Sectors: {}", sectors.join(" "))?;
        }

        Ok(())
    }
}

/// Summary of a RunningStats
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::RecordDraft;

    fn record(seq: u64, device: &str, rssi: i32, azimuth: Option<u16>) -> CorrelatedRecord {
        RecordDraft {
            timestamp_ms: 0,
            time_of_day: "00:00:00".to_string(),
            device_id: device.into(),
            rssi,
            azimuth,
            direction: azimuth.map(|a| if a < 23 { CompassSector::N } else { CompassSector::E }),
        }
        .into_record(seq)
    }

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [-60.0, -62.0, -64.0, -66.0, -68.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() + 64.0).abs() < 1e-10);
        assert!((stats.min() + 68.0).abs() < 1e-10);
        assert!((stats.max() + 60.0).abs() < 1e-10);
        assert!((stats.variance() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut agg = SessionStatsAggregator::new();
        agg.extend(&[
            record(1, "AA:AA", -60, Some(10)),
            record(2, "AA:AA", -70, Some(100)),
            record(3, "CC:CC", -80, None),
        ]);

        assert_eq!(agg.total_records, 3);
        assert_eq!(agg.without_heading, 1);
        assert_eq!(agg.rssi_by_device["AA:AA"].count(), 2);
        assert_eq!(agg.sector_counts.get(&CompassSector::N), Some(&1));
        assert_eq!(agg.sector_counts.get(&CompassSector::E), Some(&1));

        let summary = agg.summary();
        assert_eq!(
            summary.sector_counts,
            vec![(CompassSector::N, 1), (CompassSector::E, 1)]
        );
    }

    #[test]
    fn test_summary_display() {
        let mut agg = SessionStatsAggregator::new();
        agg.update(&record(1, "AA:AA", -60, Some(10)));
        agg.update(&record(2, "BB:BB", -75, None));

        let output = agg.summary().to_string();
        assert!(output.contains("Records: 2"));
        assert!(output.contains("Records without heading: 1"));
        assert!(output.contains("AA:AA: min=-60.0"));
        assert!(output.contains("Sectors: N=1"));

        agg.reset();
        assert_eq!(agg.total_records, 0);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_detection_accepted("AA:AA", Some(CompassSector::N));
        record_detection_filtered();
        record_heading_update("direct_vector", 12.5);
        record_report_outcome("http", ReportOutcome::Failed);
        record_session_exported(3, 128);
    }
}
