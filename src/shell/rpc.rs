//! Fetch adapter for remote workbooks
//!
//! Workbook bytes are served by the ExApp server at `/api/webdav/{id}`. When
//! the shell runs inside Nextcloud the same route is reached through the
//! AppAPI proxy, so the path prefix depends on the deployment.

use thiserror::Error;

/// App id used in the AppAPI proxy path
pub const APP_ID: &str = "ironcalc";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for file {file_id} failed: {source}")]
    Http {
        file_id: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Where the workbook proxy route lives relative to the host origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyPath {
    /// Routed through the Nextcloud AppAPI proxy for the given app id
    AppApi { app_id: String },
    /// Served directly by the ExApp server
    Direct,
}

impl Default for ProxyPath {
    fn default() -> Self {
        ProxyPath::AppApi {
            app_id: APP_ID.to_string(),
        }
    }
}

impl ProxyPath {
    /// Path of the workbook route for `file_id`
    ///
    /// # Examples
    /// ```
    /// use exapp::shell::rpc::ProxyPath;
    ///
    /// assert_eq!(ProxyPath::Direct.file_path("42"), "/api/webdav/42");
    /// assert_eq!(
    ///     ProxyPath::default().file_path("42"),
    ///     "/index.php/apps/app_api/proxy/ironcalc/api/webdav/42"
    /// );
    /// ```
    pub fn file_path(&self, file_id: &str) -> String {
        match self {
            ProxyPath::AppApi { app_id } => {
                format!("/index.php/apps/app_api/proxy/{app_id}/api/webdav/{file_id}")
            }
            ProxyPath::Direct => format!("/api/webdav/{file_id}"),
        }
    }
}

/// Anything that can hand the shell the raw bytes of a workbook
#[allow(async_fn_in_trait)]
pub trait WorkbookSource {
    async fn get_webdav(&self, file_id: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetches workbooks over HTTP from `origin` + proxy path
#[derive(Debug, Clone)]
pub struct HttpWorkbookSource {
    client: reqwest::Client,
    origin: String,
    proxy: ProxyPath,
}

impl HttpWorkbookSource {
    pub fn new(client: reqwest::Client, origin: &str, proxy: ProxyPath) -> Self {
        HttpWorkbookSource {
            client,
            origin: origin.trim_end_matches('/').to_string(),
            proxy,
        }
    }

    pub fn url_for(&self, file_id: &str) -> String {
        format!("{}{}", self.origin, self.proxy.file_path(file_id))
    }
}

impl WorkbookSource for HttpWorkbookSource {
    async fn get_webdav(&self, file_id: &str) -> Result<Vec<u8>, FetchError> {
        let http = |source| FetchError::Http {
            file_id: file_id.to_string(),
            source,
        };

        let response = self
            .client
            .get(self.url_for(file_id))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(http)?;

        let bytes = response.bytes().await.map_err(http)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_trailing_slash_is_dropped() {
        let source = HttpWorkbookSource::new(
            reqwest::Client::new(),
            "http://cloud.example/",
            ProxyPath::Direct,
        );
        assert_eq!(source.url_for("7"), "http://cloud.example/api/webdav/7");
    }

    #[test]
    fn app_api_path_uses_app_id() {
        let proxy = ProxyPath::AppApi {
            app_id: "sheets".to_string(),
        };
        assert_eq!(
            proxy.file_path("9"),
            "/index.php/apps/app_api/proxy/sheets/api/webdav/9"
        );
    }
}
