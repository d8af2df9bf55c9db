//! Browser host
//!
//! Runs the shell inside the page Nextcloud renders for the app. The
//! front-end bundle awaits [`start`] and hands the returned bytes to the
//! workbook component, or keeps its loading screen when nothing is returned.

use js_sys::{Array, Intl, Object, Reflect};
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use super::engine::IronCalcEngine;
use super::host::{Host, TimezoneError};
use super::rpc::{HttpWorkbookSource, ProxyPath};
use super::{AppShell, ShellState};

/// [`Host`] backed by the current `window`
pub struct BrowserHost {
    window: Window,
}

impl BrowserHost {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        Ok(BrowserHost { window })
    }

    /// `location.origin`, used as the root for proxy requests
    pub fn origin(&self) -> Result<String, JsValue> {
        self.window.location().origin()
    }
}

impl Host for BrowserHost {
    fn query_string(&self) -> String {
        self.window.location().search().unwrap_or_default()
    }

    fn remove_storage_item(&mut self, key: &str) {
        match self.window.local_storage() {
            Ok(Some(storage)) => {
                if let Err(err) = storage.remove_item(key) {
                    warn!("Failed to remove {key} from local storage: {err:?}");
                }
            }
            Ok(None) => {}
            Err(err) => warn!("Local storage unavailable: {err:?}"),
        }
    }

    fn alert(&mut self, message: &str) {
        if let Err(err) = self.window.alert_with_message(message) {
            warn!("Failed to show alert: {err:?}");
        }
    }

    fn set_title(&mut self, title: &str) {
        if let Some(document) = self.window.document() {
            document.set_title(title);
        }
    }

    fn resolve_timezone(&self) -> Result<String, TimezoneError> {
        let options = Intl::DateTimeFormat::new(&Array::new(), &Object::new()).resolved_options();

        Reflect::get(&options, &JsValue::from_str("timeZone"))
            .ok()
            .and_then(|tz| tz.as_string())
            .filter(|tz| !tz.is_empty())
            .ok_or_else(|| TimezoneError("resolvedOptions() has no timeZone".to_string()))
    }
}

/// Mounts the shell in the current page
///
/// Returns the loaded workbook in IronCalc's binary format, or `undefined`
/// when the shell is still loading (a failed remote load has already alerted
/// the user by then).
#[wasm_bindgen]
pub async fn start() -> Result<Option<Vec<u8>>, JsValue> {
    let host = BrowserHost::new()?;
    let source = HttpWorkbookSource::new(
        reqwest::Client::new(),
        &host.origin()?,
        ProxyPath::default(),
    );

    let mut shell = AppShell::new(IronCalcEngine, source, host);
    shell.start().await;

    Ok(match shell.into_state() {
        ShellState::Ready(model) => Some(model.into_inner().to_bytes()),
        ShellState::Loading => None,
    })
}
