use thiserror::Error;
use url::form_urlencoded;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("could not resolve host timezone: {0}")]
pub struct TimezoneError(pub String);

/// The page the shell is mounted in
///
/// In a browser these map onto `window.location.search`, `localStorage`,
/// `alert()`, `document.title` and `Intl.DateTimeFormat`.
pub trait Host {
    /// Raw query string of the page URL, with or without the leading `?`
    fn query_string(&self) -> String;

    fn remove_storage_item(&mut self, key: &str);

    /// Blocking user-visible message
    fn alert(&mut self, message: &str);

    fn set_title(&mut self, title: &str);

    /// IANA name of the host's local timezone
    fn resolve_timezone(&self) -> Result<String, TimezoneError>;
}

/// Returns the first value of the `fileIds` query parameter
///
/// The parameter holds a comma separated list; only its first entry is used.
/// An empty first entry is treated as absent.
///
/// # Examples
/// ```
/// use exapp::shell::host::first_file_id;
///
/// assert_eq!(first_file_id("?fileIds=42,43"), Some("42".to_string()));
/// assert_eq!(first_file_id("dir=/&fileIds=7"), Some("7".to_string()));
/// assert_eq!(first_file_id("?dir=/"), None);
/// ```
pub fn first_file_id(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);

    let (_, value) =
        form_urlencoded::parse(query.as_bytes()).find(|(key, _)| key == "fileIds")?;

    value
        .split(',')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
