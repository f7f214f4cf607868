//! End-to-end tests of the `analyze` command against a mocked Earth Engine API.

use camino::Utf8PathBuf;
use nightglow_lib::Host;
use serde_json::json;
use std::fs;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPUTE_PATH: &str = "/v1/projects/test-project/value:compute";

/// Test host that captures output to in-memory buffers.
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
}

impl TestHost {
    const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
        }
    }

    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl std::io::Write {
        &mut self.error_buf
    }

    fn exit(&mut self, _code: i32) {}
}

fn result(value: f64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "result": value }))
}

/// Mount an Earth Engine stand-in: SOL = 100, population = 1000 for every disc, a
/// national mean radiance of 1 over 1000 reference pixels, and a failure for "Failland".
///
/// "Nullland" matches no boundary feature, which the real API answers with an empty
/// geometry: zero area and a `null` mean rather than an error.
async fn mock_earth_engine() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/test-project/algorithms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COMPUTE_PATH))
        .and(body_string_contains("Failland"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "Collection is empty.", "status": "INVALID_ARGUMENT" }
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COMPUTE_PATH))
        .and(body_string_contains("Nullland"))
        .and(body_string_contains("Geometry.area"))
        .respond_with(result(0.0))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COMPUTE_PATH))
        .and(body_string_contains("Nullland"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .with_priority(2)
        .mount(&server)
        .await;

    for (marker, value) in [
        ("Geometry.area", 250_000.0 * 1000.0),
        ("Reducer.mean", 1.0),
        ("Image.pixelArea", 2_500_000.0),
        ("ImageCollection.mosaic", 1000.0),
    ] {
        Mock::given(method("POST"))
            .and(path(COMPUTE_PATH))
            .and(body_string_contains(marker))
            .respond_with(result(value))
            .with_priority(3)
            .mount(&server)
            .await;
    }

    Mock::given(method("POST"))
        .and(path(COMPUTE_PATH))
        .respond_with(result(100.0))
        .mount(&server)
        .await;

    server
}

struct Workspace {
    _tmp: tempfile::TempDir,
    dir: Utf8PathBuf,
}

impl Workspace {
    fn new(targets: &str) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        fs::write(dir.join("targets.json"), targets).unwrap();
        Self { _tmp: tmp, dir }
    }

    fn args(&self, api_url: &str) -> Vec<String> {
        [
            "nightglow",
            "analyze",
            "--targets",
            self.dir.join("targets.json").as_str(),
            "--project",
            "test-project",
            "--access-token",
            "test-token",
            "--api-url",
            api_url,
            "--csv",
            self.dir.join("results.csv").as_str(),
            "--json",
            self.dir.join("results.json").as_str(),
            "--color",
            "never",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}

#[tokio::test]
async fn test_analyze_single_country() {
    let server = mock_earth_engine().await;
    let workspace = Workspace::new(
        r#"{ "Testland": { "Capital": [0, 0], "City_Name": "Metropolis", "City": [1, 1], "Radius": 50, "Cap_Radius": 50 } }"#,
    );

    let mut host = TestHost::new();
    nightglow_lib::run(&mut host, workspace.args(&server.uri())).await.expect("analyze should succeed");

    let output = host.output_str();
    assert!(output.contains("COUNTRY"), "got: {output}");
    assert!(output.contains("Metropolis"), "got: {output}");
    assert!(output.contains("0.100"), "got: {output}");
    assert!(output.contains("Results saved to"), "got: {output}");

    let csv = fs::read_to_string(workspace.dir.join("results.csv")).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 2, "got: {csv}");
    assert!(lines[0].starts_with("Country,City_Name,Capital_Name,City_SOL"));
    assert!(lines[1].starts_with("Testland,Metropolis,,100,1000,1000,2.5,100,"), "got: {}", lines[1]);
    assert!(lines[1].ends_with(",100.0,10.0,0.100"), "got: {}", lines[1]);

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(workspace.dir.join("results.json")).unwrap()).unwrap();
    let row = &doc["results"][0];
    assert_eq!(row["light_per_capita"], 0.1);
    let distance = row["distance_km"].as_f64().unwrap();
    assert!(distance.is_finite() && (distance - 157.25).abs() < 0.1);
}

#[tokio::test]
async fn test_analyze_skips_failing_country() {
    let server = mock_earth_engine().await;
    let workspace = Workspace::new(
        r#"{
            "Zedland": { "Capital": [0, 0], "City_Name": "Zed City", "City": [1, 1] },
            "Failland": { "Capital": [10, 10], "City_Name": "Nowhere", "City": [11, 11] },
            "Nullland": { "Capital": [15, 15], "City_Name": "Void", "City": [16, 16] },
            "Alphaland": { "Capital": [20, 20], "Capital_Name": "Alpha", "City_Name": "Beta", "City": [21, 21] }
        }"#,
    );

    let mut host = TestHost::new();
    nightglow_lib::run(&mut host, workspace.args(&server.uri())).await.expect("analyze should succeed");

    let csv = fs::read_to_string(workspace.dir.join("results.csv")).unwrap();
    let countries: Vec<_> = csv.lines().skip(1).map(|l| l.split(',').next().unwrap().to_string()).collect();
    assert_eq!(countries, vec!["Zedland", "Alphaland"]);

    let errors = host.error_str();
    assert!(errors.contains("Unable to analyze 2 country(ies)"), "got: {errors}");
    assert!(errors.contains("Failland"), "got: {errors}");
    assert!(errors.contains("Collection is empty"), "got: {errors}");
    assert!(errors.contains("no national boundary named 'Nullland'"), "got: {errors}");
    assert!(!host.output_str().contains("Void"));
}

#[tokio::test]
async fn test_analyze_stops_when_probe_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/test-project/algorithms"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "code": 401, "message": "Request had invalid authentication credentials.", "status": "UNAUTHENTICATED" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(result(1.0))
        .expect(0)
        .mount(&server)
        .await;

    let workspace = Workspace::new(r#"{ "Testland": { "Capital": [0, 0], "City_Name": "Metropolis", "City": [1, 1] } }"#);

    let mut host = TestHost::new();
    let err = nightglow_lib::run(&mut host, workspace.args(&server.uri())).await.expect_err("analyze should fail");

    assert!(err.to_string().contains("UNAUTHENTICATED"), "got: {err}");
    assert!(!workspace.dir.join("results.csv").exists());
}

#[tokio::test]
async fn test_analyze_rejects_malformed_targets_file() {
    let server = mock_earth_engine().await;
    let workspace = Workspace::new("[1, 2, 3]");

    let mut host = TestHost::new();
    let result = nightglow_lib::run(&mut host, workspace.args(&server.uri())).await;

    assert!(result.is_err());
    assert!(!workspace.dir.join("results.csv").exists());
}
