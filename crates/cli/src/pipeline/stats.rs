//! Run statistics and the end-of-run summary.

use std::path::PathBuf;
use std::time::Duration;

use observability::SessionSummary;
use reporter::ReporterSnapshot;

/// Statistics from one `run`
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub session_name: String,
    pub duration: Duration,
    /// Detections the scanner produced, allowlisted or not
    pub detections_heard: u64,
    /// Records stored in the session
    pub records: usize,
    /// Heading when the scan stopped, whole degrees
    pub last_heading: Option<u16>,
    pub export_path: Option<PathBuf>,
    pub export_error: Option<String>,
    pub session: SessionSummary,
    /// None when remote reporting is disabled
    pub reporter: Option<ReporterSnapshot>,
    pub dead_letters: usize,
}

impl RunStats {
    /// Detections dropped by the allowlist, as a percentage
    pub fn filtered_rate(&self) -> f64 {
        if self.detections_heard > 0 {
            let filtered = self.detections_heard.saturating_sub(self.records as u64);
            (filtered as f64 / self.detections_heard as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                      Scan Statistics                         ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Session: {}", self.session_name);
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Detections heard: {}", self.detections_heard);
        println!(
            "   ├─ Records: {} ({:.1}% filtered)",
            self.records,
            self.filtered_rate()
        );
        match self.last_heading {
            Some(heading) => println!("   └─ Last heading: {}°", heading),
            None => println!("   └─ Last heading: unavailable"),
        }

        println!("\n💾 Export");
        match (&self.export_path, &self.export_error) {
            (Some(path), _) => println!("   └─ Written: {}", path.display()),
            (None, Some(error)) => println!("   └─ Failed: {}", error),
            (None, None) => println!("   └─ Skipped"),
        }

        if let Some(ref reporter) = self.reporter {
            println!("\n📤 Reporter");
            println!("   ├─ Enqueued: {}", reporter.enqueued);
            println!("   ├─ Delivered: {}", reporter.delivered);
            println!("   ├─ Failed: {}", reporter.failed);
            println!("   ├─ Dropped (queue full): {}", reporter.dropped);
            println!("   └─ Dead letters: {}", self.dead_letters);
        }

        println!("\n{}", self.session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtered_rate() {
        let stats = RunStats {
            detections_heard: 8,
            records: 6,
            ..Default::default()
        };
        assert!((stats.filtered_rate() - 25.0).abs() < 1e-9);
        assert_eq!(RunStats::default().filtered_rate(), 0.0);
    }
}
