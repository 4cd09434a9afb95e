//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - configuration snapshot through the loader
//! - scan sessions driven by manual sources (no platform sensors needed)
//! - remote reporting through a capturing transport and a local HTTP collector

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ClockZone, FusionPreference, MotionSensorKind, ScanBlueprint};

    #[test]
    fn test_default_blueprint_survives_toml() {
        let text = ConfigLoader::to_toml(&ScanBlueprint::default()).unwrap();
        let loaded = ConfigLoader::load_from_str(&text, ConfigFormat::Toml).unwrap();

        assert_eq!(loaded.allowlist.devices, contracts::DEFAULT_ALLOWLIST.to_vec());
        assert_eq!(loaded.orientation.strategy, FusionPreference::Auto);
        assert_eq!(loaded.orientation.available_sensors, MotionSensorKind::ALL.to_vec());
        assert!(!loaded.reporter.enabled);
        assert_eq!(loaded.export.clock, ClockZone::Local);
    }

    #[test]
    fn test_sample_config_is_valid() {
        let text = include_str!("../../../scanner.toml");
        let blueprint = ConfigLoader::load_from_str(text, ConfigFormat::Toml).unwrap();
        assert_eq!(blueprint.allowlist.devices, contracts::DEFAULT_ALLOWLIST.to_vec());
        assert!(!blueprint.reporter.enabled);
    }

    #[test]
    fn test_full_config_file() {
        let text = r#"
            [allowlist]
            devices = ["AA:AA", "CC:CC"]

            [orientation]
            strategy = "composite"
            available_sensors = ["accelerometer", "magnetic_field"]

            [reporter]
            enabled = true
            endpoint = "http://collector.local:8080/api/current_rssi"
            local_device_id = "scanner-7"
            workers = 2

            [export]
            output_dir = "/tmp/beacon-sessions"
            clock = "utc"
        "#;
        let blueprint = ConfigLoader::load_from_str(text, ConfigFormat::Toml).unwrap();

        assert_eq!(blueprint.allowlist.devices.len(), 2);
        assert_eq!(blueprint.orientation.strategy, FusionPreference::Composite);
        assert_eq!(blueprint.reporter.local_device_id, "scanner-7");
        assert_eq!(blueprint.reporter.workers, 2);
        assert_eq!(blueprint.export.clock, ClockZone::Utc);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use contracts::{
        ClockZone, CompassSector, ContractError, DetectionEvent, DetectionSource, MotionSensorKind,
        MotionSource, RecordSubmitter, ReportPayload, ReportTransport, ScanBlueprint,
    };
    use ingestion::{ManualDetectionSource, ManualMotionSource};
    use reporter::{HttpTransport, ReporterHandle, ReporterOptions};
    use scanner::ScanController;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Transport that keeps every payload it is handed
    #[derive(Clone, Default)]
    struct CaptureTransport(Arc<Mutex<Vec<ReportPayload>>>);

    impl CaptureTransport {
        fn payloads(&self) -> Vec<ReportPayload> {
            self.0.lock().unwrap().clone()
        }
    }

    impl ReportTransport for CaptureTransport {
        fn name(&self) -> &str {
            "capture"
        }

        async fn deliver(&self, payload: &ReportPayload) -> Result<(), ContractError> {
            self.0.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    struct Bench {
        controller: ScanController,
        motion: Vec<Arc<ManualMotionSource>>,
        scanner: Arc<ManualDetectionSource>,
        dir: tempfile::TempDir,
    }

    impl Bench {
        fn new(
            devices: &[&str],
            available: &[MotionSensorKind],
            submitter: Option<Arc<dyn RecordSubmitter>>,
        ) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let mut blueprint = ScanBlueprint::default();
            blueprint.allowlist.devices = devices.iter().map(|d| d.to_string()).collect();
            blueprint.orientation.available_sensors = available.to_vec();
            blueprint.export.output_dir = dir.path().to_path_buf();
            blueprint.export.clock = ClockZone::Utc;

            let motion: Vec<Arc<ManualMotionSource>> = available
                .iter()
                .map(|kind| Arc::new(ManualMotionSource::new(*kind)))
                .collect();
            let scanner = Arc::new(ManualDetectionSource::new("bench"));

            let mut builder = ScanController::builder(&blueprint)
                .motion_sources(motion.iter().map(|m| Arc::clone(m) as Arc<dyn MotionSource>))
                .detection_source(Arc::clone(&scanner) as Arc<dyn DetectionSource>);
            if let Some(submitter) = submitter {
                builder = builder.submitter(submitter);
            }

            Self {
                controller: builder.build().unwrap(),
                motion,
                scanner,
                dir,
            }
        }

        /// Point every listening motion sensor at `heading`
        fn turn_to(&self, heading: f64) {
            for source in &self.motion {
                source.emit_heading(heading);
            }
        }

        fn hear(&self, device: &str, rssi: i32, timestamp_ms: i64) -> bool {
            self.scanner.emit(DetectionEvent::new(device, rssi, timestamp_ms))
        }
    }

    fn options() -> ReporterOptions {
        ReporterOptions {
            queue_capacity: 64,
            workers: 2,
            local_device_id: "scanner-7".to_string(),
        }
    }

    /// The walk-through scenario: one allowlisted beacon, one foreign one,
    /// three headings.
    #[tokio::test]
    async fn test_e2e_session_reports_and_exports() {
        let transport = CaptureTransport::default();
        let reporter = Arc::new(ReporterHandle::spawn(transport.clone(), options()));
        let bench = Bench::new(
            &["AA:AA"],
            &[MotionSensorKind::RotationVector],
            Some(Arc::clone(&reporter) as Arc<dyn RecordSubmitter>),
        );

        bench.controller.on_foreground();
        bench.controller.start_scan().unwrap();

        bench.turn_to(10.5);
        assert!(bench.hear("AA:AA", -60, 1_000));
        assert!(bench.hear("BB:BB", -70, 1_500));
        bench.turn_to(50.5);
        bench.hear("AA:AA", -61, 2_000);
        bench.turn_to(100.5);
        bench.hear("AA:AA", -62, 3_000);

        let exported = bench.controller.stop_scan("walk").unwrap();
        bench.controller.shutdown();

        assert_eq!(
            exported.document,
            "No.,TimeStamp,MAC Address,RSSI,Direction,Azimuth\n\
             1,00:00:01,AA:AA,-60,N,10\n\
             2,00:00:02,AA:AA,-61,NE,50\n\
             3,00:00:03,AA:AA,-62,E,100\n"
        );
        assert_eq!(exported.path, bench.dir.path().join("walk.csv"));
        assert_eq!(
            exporter::CsvExporter::export(&exported.records).unwrap(),
            exported.document
        );

        let mut stats = observability::SessionStatsAggregator::new();
        stats.extend(&exported.records);
        let summary = stats.summary();
        assert_eq!(summary.total_records, 3);
        assert_eq!(
            summary.sector_counts,
            vec![(CompassSector::N, 1), (CompassSector::NE, 1), (CompassSector::E, 1)]
        );
        assert_eq!(summary.rssi_by_device["AA:AA"].count, 3);

        let snapshot = reporter.shutdown().await;
        assert_eq!(snapshot.enqueued, 3);
        assert_eq!(snapshot.delivered, 3);
        assert!(snapshot.is_settled());

        let mut payloads = transport.payloads();
        payloads.sort_by_key(|p| p.rssi);
        let azimuths: Vec<Option<i32>> = payloads.iter().map(|p| p.azimuth).collect();
        assert_eq!(azimuths, vec![Some(100), Some(50), Some(10)]);
        assert!(payloads.iter().all(|p| p.mac_address == "AA:AA" && p.device_id == "scanner-7"));
    }

    #[test]
    fn test_e2e_heading_unavailable_before_first_sample() {
        let bench = Bench::new(&["AA:AA"], &[MotionSensorKind::RotationVector], None);
        bench.controller.on_foreground();
        bench.controller.start_scan().unwrap();

        bench.hear("AA:AA", -58, 0);
        bench.turn_to(200.5);
        bench.hear("AA:AA", -59, 1_000);

        let exported = bench.controller.stop_scan("cold-start").unwrap();
        let rows: Vec<&str> = exported.document.lines().skip(1).collect();
        assert_eq!(rows, vec!["1,00:00:00,AA:AA,-58,,", "2,00:00:01,AA:AA,-59,S,200"]);
    }

    #[test]
    fn test_e2e_composite_fallback() {
        let bench = Bench::new(
            &["AA:AA"],
            &[MotionSensorKind::Accelerometer, MotionSensorKind::MagneticField],
            None,
        );
        assert_eq!(
            bench.controller.active_strategy(),
            Some(orientation::StrategyKind::Composite)
        );
        bench.controller.on_foreground();
        bench.controller.start_scan().unwrap();

        bench.turn_to(270.5);
        bench.hear("AA:AA", -70, 0);

        let exported = bench.controller.stop_scan("composite").unwrap();
        assert_eq!(exported.records.len(), 1);
        assert_eq!(exported.records[0].direction, Some(CompassSector::W));
        assert_eq!(exported.records[0].azimuth, Some(270));
    }

    #[test]
    fn test_e2e_background_keeps_last_heading() {
        let bench = Bench::new(&["AA:AA"], &[MotionSensorKind::RotationVector], None);
        bench.controller.on_foreground();
        bench.controller.start_scan().unwrap();

        bench.turn_to(135.5);
        bench.controller.on_background();
        // Motion sensors are released; this sample never arrives
        bench.turn_to(300.5);
        bench.hear("AA:AA", -66, 0);

        let exported = bench.controller.stop_scan("pocket").unwrap();
        assert_eq!(exported.records[0].azimuth, Some(135));
        assert_eq!(exported.records[0].direction, Some(CompassSector::SE));
    }

    #[test]
    fn test_e2e_random_stream_is_consistent() {
        use rand::seq::IndexedRandom;
        use rand::Rng;

        let devices = ["AA:AA", "BB:BB", "CC:CC", "DD:DD"];
        let bench = Bench::new(&devices[..2], &[MotionSensorKind::RotationVector], None);
        bench.controller.on_foreground();
        bench.controller.start_scan().unwrap();

        let mut rng = rand::rng();
        let mut expected = 0;
        for i in 0..500 {
            bench.turn_to(rng.random_range(0.0..360.0));
            let device = *devices.choose(&mut rng).unwrap();
            if devices[..2].contains(&device) {
                expected += 1;
            }
            bench.hear(device, rng.random_range(-100..=-30), i);
        }

        let exported = bench.controller.stop_scan("random").unwrap();
        assert_eq!(exported.records.len(), expected);
        assert_eq!(exported.document.lines().count(), expected + 1);
        for (i, record) in exported.records.iter().enumerate() {
            assert_eq!(record.seq, i as u64 + 1);
            let azimuth = record.azimuth.unwrap();
            assert!(azimuth < 360);
            assert_eq!(record.direction, Some(correlator::classify(azimuth)));
        }
    }

    #[test]
    fn test_e2e_export_failure_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the export directory should be
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"").unwrap();

        let mut blueprint = ScanBlueprint::default();
        blueprint.allowlist.devices = vec!["AA:AA".into()];
        blueprint.export.output_dir = blocker.join("nested");
        let scanner = Arc::new(ManualDetectionSource::new("blocked"));
        let controller = ScanController::builder(&blueprint)
            .detection_source(Arc::clone(&scanner) as Arc<dyn DetectionSource>)
            .build()
            .unwrap();

        controller.start_scan().unwrap();
        scanner.emit(DetectionEvent::new("AA:AA", -60, 0));
        let err = controller.stop_scan("lost").unwrap_err();

        assert!(matches!(err, ContractError::Export { .. }), "{err}");
        assert!(!controller.is_scanning());
        assert_eq!(controller.session_records().len(), 1);
        assert!(!scanner.emit(DetectionEvent::new("AA:AA", -61, 1)));
    }

    /// Accept `count` requests, answering 200, and hand back their bodies
    async fn collector(count: usize) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/current_rssi", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let mut bodies = Vec::new();
            while bodies.len() < count {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut raw = Vec::new();
                let mut buf = [0u8; 1024];
                let body = loop {
                    let n = stream.read(&mut buf).await.unwrap();
                    raw.extend_from_slice(&buf[..n]);
                    if let Some(body) = complete_body(&raw) {
                        break body;
                    }
                    if n == 0 {
                        break String::new();
                    }
                };
                stream
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                    .await
                    .unwrap();
                bodies.push(body);
            }
            bodies
        });

        (url, server)
    }

    fn complete_body(raw: &[u8]) -> Option<String> {
        let text = String::from_utf8_lossy(raw);
        let header_end = text.find("\r\n\r\n")?;
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        let body_start = header_end + 4;
        (raw.len() >= body_start + content_length)
            .then(|| String::from_utf8_lossy(&raw[body_start..body_start + content_length]).into_owned())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_e2e_http_collector_receives_records() {
        let (url, server) = collector(2).await;
        let transport = HttpTransport::new(&url, Duration::from_secs(5)).unwrap();
        let reporter = Arc::new(ReporterHandle::spawn(
            transport,
            ReporterOptions {
                workers: 1,
                ..options()
            },
        ));
        let bench = Bench::new(
            &["AA:AA"],
            &[MotionSensorKind::RotationVector],
            Some(Arc::clone(&reporter) as Arc<dyn RecordSubmitter>),
        );

        bench.controller.on_foreground();
        bench.controller.start_scan().unwrap();
        bench.hear("AA:AA", -80, 0);
        bench.turn_to(45.5);
        bench.hear("AA:AA", -50, 1_000);
        bench.controller.stop_scan("http").unwrap();

        let snapshot = reporter.shutdown().await;
        assert_eq!(snapshot.delivered, 2, "{snapshot:?}");
        assert!(reporter.drain_dead_letters().is_empty());

        let bodies = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
        let mut json: Vec<serde_json::Value> = bodies
            .iter()
            .map(|b| serde_json::from_str(b).unwrap())
            .collect();
        json.sort_by_key(|v| v["rssi"].as_i64());

        assert_eq!(json[0]["macAddress"], "AA:AA");
        assert_eq!(json[0]["rssi"], -80);
        assert!(json[0]["azimuth"].is_null());
        assert_eq!(json[1]["azimuth"], 45);
        assert_eq!(json[1]["deviceId"], "scanner-7");
    }

    #[tokio::test]
    async fn test_e2e_unreachable_collector_dead_letters() {
        let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
        let transport =
            HttpTransport::new(format!("http://{addr}/api/current_rssi"), Duration::from_secs(2))
                .unwrap();
        let reporter = Arc::new(ReporterHandle::spawn(transport, options()));
        let bench = Bench::new(
            &["AA:AA"],
            &[MotionSensorKind::RotationVector],
            Some(Arc::clone(&reporter) as Arc<dyn RecordSubmitter>),
        );

        bench.controller.start_scan().unwrap();
        bench.hear("AA:AA", -60, 0);
        let exported = bench.controller.stop_scan("offline").unwrap();

        // Local export is unaffected by reporting failures
        assert_eq!(exported.records.len(), 1);

        let snapshot = reporter.shutdown().await;
        assert_eq!(snapshot.failed, 1);
        let dead = reporter.drain_dead_letters();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].payload.mac_address, "AA:AA");
    }

    #[test]
    fn test_e2e_auto_strategy_ignores_composite_sources() {
        let bench = Bench::new(&["AA:AA"], &MotionSensorKind::ALL, None);
        bench.controller.on_foreground();

        let listening: Vec<MotionSensorKind> = bench
            .motion
            .iter()
            .filter(|m| m.is_listening())
            .map(|m| m.kind())
            .collect();
        assert_eq!(listening, vec![MotionSensorKind::RotationVector]);
    }
}
