//! App shell
//!
//! Drives what the embedded spreadsheet shows when it is mounted: either the
//! workbook named by the `fileIds` query parameter, fetched through the
//! WebDAV proxy, or a fresh `template` workbook. The shell owns at most one
//! model and mirrors its name into the page title.

#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod engine;
pub mod host;
pub mod rpc;

use log::{error, warn};
use thiserror::Error;

use engine::{EngineError, WorkbookEngine, WorkbookModel};
use host::Host;
use rpc::{FetchError, WorkbookSource};

pub const DEFAULT_TITLE: &str = "IronCalc";
pub const TEMPLATE_NAME: &str = "template";
pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_TIMEZONE: &str = "UTC";
/// Local storage key cleared after a remote workbook is loaded
pub const SELECTED_KEY: &str = "selected";
pub const LOAD_FAILED_MESSAGE: &str = "Model not found, or failed to load";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// What the shell is currently showing
pub enum ShellState<M> {
    /// No workbook yet; the loading screen is shown
    Loading,
    Ready(M),
}

impl<M> ShellState<M> {
    pub fn model(&self) -> Option<&M> {
        match self {
            ShellState::Loading => None,
            ShellState::Ready(model) => Some(model),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ShellState::Loading)
    }
}

/// Title for the page given the loaded workbook, if any
///
/// # Examples
/// ```
/// use exapp::shell::engine::{IronCalcEngine, IronCalcModel, WorkbookEngine};
/// use exapp::shell::page_title;
///
/// let model = IronCalcEngine.new_model("Budget", "en", "UTC").unwrap();
/// assert_eq!(page_title(Some(&model)), "Budget - IronCalc");
/// assert_eq!(page_title::<IronCalcModel>(None), "IronCalc");
/// ```
pub fn page_title<M: WorkbookModel>(model: Option<&M>) -> String {
    match model.map(|m| m.name()) {
        Some(name) if !name.is_empty() => format!("{name} - {DEFAULT_TITLE}"),
        _ => DEFAULT_TITLE.to_string(),
    }
}

/// Builds an empty workbook in the host's timezone
///
/// If the timezone cannot be resolved, or the engine refuses it, the workbook
/// is built in [`DEFAULT_TIMEZONE`] instead.
pub fn create_model_with_safe_timezone<E, H>(
    engine: &E,
    host: &H,
    name: &str,
) -> Result<E::Model, EngineError>
where
    E: WorkbookEngine,
    H: Host,
{
    let localized = host
        .resolve_timezone()
        .map_err(|err| err.to_string())
        .and_then(|tz| {
            engine
                .new_model(name, DEFAULT_LOCALE, &tz)
                .map_err(|err| err.to_string())
        });

    match localized {
        Ok(model) => Ok(model),
        Err(err) => {
            warn!("Failed to get timezone, defaulting to {DEFAULT_TIMEZONE}: {err}");
            engine.new_model(name, DEFAULT_LOCALE, DEFAULT_TIMEZONE)
        }
    }
}

pub struct AppShell<E: WorkbookEngine, S, H> {
    engine: E,
    source: S,
    host: H,
    state: ShellState<E::Model>,
}

impl<E, S, H> AppShell<E, S, H>
where
    E: WorkbookEngine,
    S: WorkbookSource,
    H: Host,
{
    pub fn new(engine: E, source: S, host: H) -> Self {
        AppShell {
            engine,
            source,
            host,
            state: ShellState::Loading,
        }
    }

    pub fn state(&self) -> &ShellState<E::Model> {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_state(self) -> ShellState<E::Model> {
        self.state
    }

    /// Runs the mount sequence once
    ///
    /// Bootstraps the engine, then loads the workbook named by `fileIds` or
    /// creates the template workbook. A failed remote load alerts the user and
    /// leaves the shell in [`ShellState::Loading`]; no fallback workbook is
    /// created in that case.
    pub async fn start(&mut self) {
        self.refresh_title();

        if let Err(err) = self.engine.init().await {
            error!("{err}");
            return;
        }

        match host::first_file_id(&self.host.query_string()) {
            Some(file_id) => match self.load_remote(&file_id).await {
                Ok(model) => {
                    self.host.remove_storage_item(SELECTED_KEY);
                    self.set_model(model);
                }
                Err(err) => {
                    error!("Error loading workbook {file_id}: {err}");
                    self.host.alert(LOAD_FAILED_MESSAGE);
                }
            },
            None => {
                match create_model_with_safe_timezone(&self.engine, &self.host, TEMPLATE_NAME) {
                    Ok(model) => self.set_model(model),
                    Err(err) => error!("Error creating {TEMPLATE_NAME} workbook: {err}"),
                }
            }
        }
    }

    async fn load_remote(&self, file_id: &str) -> Result<E::Model, LoadError> {
        let bytes = self.source.get_webdav(file_id).await?;
        Ok(self.engine.from_bytes(&bytes)?)
    }

    fn set_model(&mut self, model: E::Model) {
        self.state = ShellState::Ready(model);
        self.refresh_title();
    }

    fn refresh_title(&mut self) {
        let title = page_title(self.state.model());
        self.host.set_title(&title);
    }
}
