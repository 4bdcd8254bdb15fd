//! HttpEmitter against an in-process stub collector.

use fleet_model::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct CapturedRequest {
    head: String,
    body: Vec<u8>,
}

enum StubBehavior {
    Respond(u16),
    Hang,
}

struct StubCollector {
    endpoint: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubCollector {
    async fn start(behavior: StubBehavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let behavior = Arc::new(behavior);

        let captured = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let captured = captured.clone();
                let behavior = behavior.clone();
                tokio::spawn(async move {
                    handle_connection(stream, &behavior, &captured).await;
                });
            }
        });

        Self {
            endpoint: format!("http://{}/api/telemetry/batch", addr),
            requests,
        }
    }

    async fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().await.clone()
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    behavior: &StubBehavior,
    captured: &Mutex<Vec<CapturedRequest>>,
) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };
    captured.lock().await.push(request);

    match behavior {
        StubBehavior::Respond(status) => {
            let body = r#"{"success":true}"#;
            let response = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        StubBehavior::Hang => {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest {
        head,
        body: buf[header_end..].to_vec(),
    })
}

fn emitter_for(endpoint: &str, timeout: Duration) -> HttpEmitter {
    HttpEmitter::new(
        EmitterConfig::new()
            .with_endpoint(endpoint)
            .with_timeout(timeout),
    )
    .unwrap()
}

#[tokio::test]
async fn test_posts_snapshot_as_json_array() {
    let collector = StubCollector::start(StubBehavior::Respond(200)).await;
    let emitter = emitter_for(&collector.endpoint, Duration::from_secs(5));
    let snapshot = FleetSimulator::with_seed(5, 21).generate_fleet_data();

    let receipt = tokio_test::assert_ok!(emitter.emit(&snapshot).await);
    assert_eq!(receipt.readings, 5);
    assert_eq!(receipt.status, 200);

    let requests = collector.requests().await;
    assert_eq!(requests.len(), 1);
    let head = requests[0].head.to_ascii_lowercase();
    assert!(head.starts_with("post /api/telemetry/batch http/1.1"));
    assert!(head.contains("content-type: application/json"));

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let entries = body.as_array().expect("snapshot must be a JSON array");
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[0]["vehicle_id"], "VEH-001");
    assert_eq!(entries[4]["vehicle_id"], "VEH-005");

    let decoded: Vec<Reading> = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(decoded, snapshot);
}

#[tokio::test]
async fn test_non_200_status_is_rejected() {
    for status in [201, 400, 500, 503] {
        let collector = StubCollector::start(StubBehavior::Respond(status)).await;
        let emitter = emitter_for(&collector.endpoint, Duration::from_secs(5));
        let snapshot = FleetSimulator::with_seed(2, 1).generate_fleet_data();

        match emitter.emit(&snapshot).await {
            Err(TelemetryError::Rejected { status: got }) => assert_eq!(got, status),
            other => panic!("expected rejection for {}, got {:?}", status, other),
        }
    }
}

#[tokio::test]
async fn test_unreachable_collector_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let emitter = emitter_for(
        &format!("http://{}/api/telemetry/batch", addr),
        Duration::from_secs(5),
    );
    let snapshot = FleetSimulator::with_seed(1, 1).generate_fleet_data();

    let err = emitter.emit(&snapshot).await.unwrap_err();
    assert!(
        matches!(
            err,
            TelemetryError::Unreachable { .. } | TelemetryError::Network(_)
        ),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn test_slow_collector_times_out() {
    let collector = StubCollector::start(StubBehavior::Hang).await;
    let emitter = emitter_for(&collector.endpoint, Duration::from_millis(200));
    let snapshot = FleetSimulator::with_seed(1, 1).generate_fleet_data();

    let err = emitter.emit(&snapshot).await.unwrap_err();
    assert!(
        matches!(err, TelemetryError::Timeout),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn test_run_loop_survives_failed_deliveries() {
    let collector = StubCollector::start(StubBehavior::Respond(500)).await;
    let mut sink = EmitterSink::new(emitter_for(&collector.endpoint, Duration::from_secs(5)));
    let mut fleet = FleetSimulator::with_seed(3, 4);
    let options = RunOptions {
        interval: Duration::from_millis(10),
        duration: Duration::ZERO,
        max_iterations: Some(3),
    };

    let summary = fleet
        .run(&options, &mut sink, &CancellationToken::new())
        .await;

    assert_eq!(summary.iterations, 3);
    assert_eq!(summary.reason, StopReason::IterationLimit);
    assert_eq!(sink.stats().sent, 0);
    assert_eq!(sink.stats().failed, 3);
    assert_eq!(collector.requests().await.len(), 3);
}

#[tokio::test]
async fn test_run_loop_delivers_every_snapshot() {
    let collector = StubCollector::start(StubBehavior::Respond(200)).await;
    let mut sink = EmitterSink::new(emitter_for(&collector.endpoint, Duration::from_secs(5)));
    let mut fleet = FleetSimulator::with_seed(4, 4);
    let options = RunOptions {
        interval: Duration::from_millis(10),
        duration: Duration::ZERO,
        max_iterations: Some(2),
    };

    fleet
        .run(&options, &mut sink, &CancellationToken::new())
        .await;

    assert_eq!(sink.stats().sent, 2);
    assert_eq!(sink.stats().failed, 0);
    assert!(sink.stats().last_error.is_none());

    for request in collector.requests().await {
        let readings: Vec<Reading> = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(readings.len(), 4);
    }
}
