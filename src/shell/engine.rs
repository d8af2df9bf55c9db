//! Workbook engine seam
//!
//! The shell never looks inside a workbook. It only needs to bootstrap the
//! engine, build an empty model, hydrate one from bytes and read its name.
//! [`IronCalcEngine`] is the production implementation backed by the
//! `ironcalc` crate.

use ironcalc::base::Model;
use thiserror::Error;

/// Failure reported by the workbook engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine failed to initialise: {0}")]
    Init(String),

    #[error("failed to create workbook: {0}")]
    Create(String),

    #[error("failed to load workbook from bytes: {0}")]
    Load(String),
}

/// An opaque, loaded workbook
pub trait WorkbookModel {
    /// Name stored in the workbook, possibly empty
    fn name(&self) -> String;
}

/// The operations the shell consumes from a spreadsheet engine
#[allow(async_fn_in_trait)]
pub trait WorkbookEngine {
    type Model: WorkbookModel;

    /// One-time engine bootstrap
    async fn init(&self) -> Result<(), EngineError>;

    /// Build a fresh empty workbook
    ///
    /// # Arguments
    /// * `name` - Workbook name
    /// * `locale` - Locale id, e.g. `"en"`
    /// * `timezone` - IANA timezone name, e.g. `"Europe/Berlin"`
    fn new_model(
        &self,
        name: &str,
        locale: &str,
        timezone: &str,
    ) -> Result<Self::Model, EngineError>;

    /// Deserialize a workbook from the engine's binary model format
    fn from_bytes(&self, bytes: &[u8]) -> Result<Self::Model, EngineError>;
}

/// IronCalc-backed engine
///
/// The native engine is statically linked, so `init` has nothing to load.
#[derive(Debug, Default, Clone, Copy)]
pub struct IronCalcEngine;

/// A workbook held by [`IronCalcEngine`]
pub struct IronCalcModel(Model);

impl IronCalcModel {
    pub fn model(&self) -> &Model {
        &self.0
    }

    pub fn into_inner(self) -> Model {
        self.0
    }
}

impl WorkbookModel for IronCalcModel {
    fn name(&self) -> String {
        self.0.workbook.name.clone()
    }
}

impl WorkbookEngine for IronCalcEngine {
    type Model = IronCalcModel;

    async fn init(&self) -> Result<(), EngineError> {
        Ok(())
    }

    fn new_model(
        &self,
        name: &str,
        locale: &str,
        timezone: &str,
    ) -> Result<IronCalcModel, EngineError> {
        Model::new_empty(name, locale, timezone)
            .map(IronCalcModel)
            .map_err(EngineError::Create)
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<IronCalcModel, EngineError> {
        Model::from_bytes(bytes)
            .map(IronCalcModel)
            .map_err(EngineError::Load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_model_keeps_name() {
        let model = IronCalcEngine
            .new_model("template", "en", "Europe/Berlin")
            .unwrap();
        assert_eq!(model.name(), "template");
    }

    #[test]
    fn new_model_rejects_unknown_timezone() {
        let result = IronCalcEngine.new_model("template", "en", "Not/AZone");
        assert!(matches!(result, Err(EngineError::Create(_))));
    }

    #[test]
    fn from_bytes_reads_serialized_model() {
        let bytes = IronCalcEngine
            .new_model("budget", "en", "UTC")
            .unwrap()
            .into_inner()
            .to_bytes();

        let loaded = IronCalcEngine.from_bytes(&bytes).unwrap();
        assert_eq!(loaded.name(), "budget");
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        let result = IronCalcEngine.from_bytes(b"definitely not a workbook");
        assert!(matches!(result, Err(EngineError::Load(_))));
    }
}
