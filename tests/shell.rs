#![cfg(feature = "web")]

use axum::{Router, extract::Path, http::StatusCode, routing::get};
use exapp::shell::engine::{
    EngineError, IronCalcEngine, IronCalcModel, WorkbookEngine, WorkbookModel,
};
use exapp::shell::host::{Host, TimezoneError};
use exapp::shell::rpc::{HttpWorkbookSource, ProxyPath};
use exapp::shell::{AppShell, DEFAULT_TITLE, LOAD_FAILED_MESSAGE, SELECTED_KEY, TEMPLATE_NAME};
use tokio::net::TcpListener;

struct FakeHost {
    query: String,
    timezone: Result<String, TimezoneError>,
    removed: Vec<String>,
    alerts: Vec<String>,
    titles: Vec<String>,
}

impl FakeHost {
    fn new(query: &str) -> Self {
        FakeHost {
            query: query.to_string(),
            timezone: Ok("Europe/Berlin".to_string()),
            removed: Vec::new(),
            alerts: Vec::new(),
            titles: Vec::new(),
        }
    }

    fn title(&self) -> &str {
        self.titles.last().map(String::as_str).unwrap_or_default()
    }
}

impl Host for FakeHost {
    fn query_string(&self) -> String {
        self.query.clone()
    }

    fn remove_storage_item(&mut self, key: &str) {
        self.removed.push(key.to_string());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn set_title(&mut self, title: &str) {
        self.titles.push(title.to_string());
    }

    fn resolve_timezone(&self) -> Result<String, TimezoneError> {
        self.timezone.clone()
    }
}

/// Engine whose runtime never comes up
struct BrokenEngine;

impl WorkbookEngine for BrokenEngine {
    type Model = IronCalcModel;

    async fn init(&self) -> Result<(), EngineError> {
        Err(EngineError::Init("wasm module missing".to_string()))
    }

    fn new_model(&self, name: &str, locale: &str, tz: &str) -> Result<IronCalcModel, EngineError> {
        IronCalcEngine.new_model(name, locale, tz)
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<IronCalcModel, EngineError> {
        IronCalcEngine.from_bytes(bytes)
    }
}

fn workbook_bytes(name: &str) -> Vec<u8> {
    IronCalcEngine
        .new_model(name, "en", "UTC")
        .unwrap()
        .into_inner()
        .to_bytes()
}

/// Serves `/api/webdav/42` as a valid workbook named "Quarterly",
/// `/api/webdav/5` as a workbook with an empty name and `/api/webdav/13` as
/// bytes that are not a workbook
async fn spawn_proxy() -> String {
    let model_bytes = workbook_bytes("Quarterly");
    let unnamed_bytes = workbook_bytes("");

    let app = Router::new().route(
        "/api/webdav/:file_id",
        get(move |Path(file_id): Path<String>| {
            let model_bytes = model_bytes.clone();
            let unnamed_bytes = unnamed_bytes.clone();
            async move {
                match file_id.as_str() {
                    "42" => Ok(model_bytes),
                    "5" => Ok(unnamed_bytes),
                    "13" => Ok(b"<html>login required</html>".to_vec()),
                    _ => Err(StatusCode::NOT_FOUND),
                }
            }
        }),
    );

    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn shell(
    origin: &str,
    host: FakeHost,
) -> AppShell<IronCalcEngine, HttpWorkbookSource, FakeHost> {
    let source = HttpWorkbookSource::new(reqwest::Client::new(), origin, ProxyPath::Direct);
    AppShell::new(IronCalcEngine, source, host)
}

#[tokio::test]
async fn without_file_id_creates_template_in_host_timezone() {
    let mut shell = shell("http://127.0.0.1:1", FakeHost::new("?dir=/Documents"));
    shell.start().await;

    let model = shell.state().model().expect("template workbook");
    assert_eq!(model.name(), TEMPLATE_NAME);
    assert_eq!(model.model().workbook.settings.tz, "Europe/Berlin");
    assert_eq!(shell.host().title(), "template - IronCalc");
    assert!(shell.host().removed.is_empty());
    assert!(shell.host().alerts.is_empty());
}

#[tokio::test]
async fn unresolvable_timezone_falls_back_to_utc() {
    let mut host = FakeHost::new("");
    host.timezone = Err(TimezoneError("Intl unavailable".to_string()));
    let mut shell = shell("http://127.0.0.1:1", host);
    shell.start().await;

    let model = shell.state().model().expect("template workbook");
    assert_eq!(model.model().workbook.settings.tz, "UTC");
}

#[tokio::test]
async fn timezone_rejected_by_engine_falls_back_to_utc() {
    let mut host = FakeHost::new("");
    host.timezone = Ok("Mars/Olympus_Mons".to_string());
    let mut shell = shell("http://127.0.0.1:1", host);
    shell.start().await;

    let model = shell.state().model().expect("template workbook");
    assert_eq!(model.model().workbook.settings.tz, "UTC");
}

#[tokio::test]
async fn remote_workbook_is_loaded_and_selection_cleared() {
    let origin = spawn_proxy().await;
    let mut shell = shell(&origin, FakeHost::new("?fileIds=42,43"));
    shell.start().await;

    let model = shell.state().model().expect("remote workbook");
    assert_eq!(model.name(), "Quarterly");
    assert_eq!(shell.host().removed, [SELECTED_KEY]);
    assert_eq!(shell.host().title(), "Quarterly - IronCalc");
    assert!(shell.host().alerts.is_empty());
}

#[tokio::test]
async fn unnamed_remote_workbook_keeps_default_title() {
    let origin = spawn_proxy().await;
    let mut shell = shell(&origin, FakeHost::new("?fileIds=5"));
    shell.start().await;

    let model = shell.state().model().expect("remote workbook");
    assert_eq!(model.name(), "");
    assert_eq!(shell.host().title(), DEFAULT_TITLE);
}

#[tokio::test]
async fn missing_remote_file_alerts_and_keeps_loading() {
    let origin = spawn_proxy().await;
    let mut shell = shell(&origin, FakeHost::new("?fileIds=7"));
    shell.start().await;

    assert!(shell.state().is_loading());
    assert_eq!(shell.host().alerts, [LOAD_FAILED_MESSAGE]);
    assert!(shell.host().removed.is_empty());
    assert_eq!(shell.host().title(), DEFAULT_TITLE);
}

#[tokio::test]
async fn invalid_remote_bytes_alert_and_keep_loading() {
    let origin = spawn_proxy().await;
    let mut shell = shell(&origin, FakeHost::new("?fileIds=13"));
    shell.start().await;

    assert!(shell.state().is_loading());
    assert_eq!(shell.host().alerts, [LOAD_FAILED_MESSAGE]);
}

#[tokio::test]
async fn unreachable_proxy_alerts_and_keeps_loading() {
    // Nothing listens on port 1
    let mut shell = shell("http://127.0.0.1:1", FakeHost::new("?fileIds=42"));
    shell.start().await;

    assert!(shell.state().is_loading());
    assert_eq!(shell.host().alerts, [LOAD_FAILED_MESSAGE]);
    assert_eq!(shell.host().title(), DEFAULT_TITLE);
}

#[tokio::test]
async fn failed_engine_init_loads_nothing() {
    let source = HttpWorkbookSource::new(
        reqwest::Client::new(),
        "http://127.0.0.1:1",
        ProxyPath::Direct,
    );
    let mut shell = AppShell::new(BrokenEngine, source, FakeHost::new(""));
    shell.start().await;

    assert!(shell.state().is_loading());
    assert!(shell.host().alerts.is_empty());
    assert_eq!(shell.host().titles, [DEFAULT_TITLE]);
}
