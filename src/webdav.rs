//! Locating and downloading workbooks through Nextcloud WebDAV
//!
//! Nextcloud identifies files by numeric id, but WebDAV addresses them by
//! path. A DAV `SEARCH` on the user's files root resolves the id to an `href`
//! which is then downloaded with a plain `GET`.

use log::debug;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;

use crate::context::ExAppContext;
use crate::error::AppError;

pub const DAV_ROOT: &str = "/remote.php/dav/";

/// A file located by [`search_body`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Absolute DAV path of the file, e.g. `/remote.php/dav/files/alice/a.xlsx`
    pub href: String,
    pub displayname: String,
}

/// DAV basic search for the file with `file_id` among `user_id`'s files
pub fn search_body(user_id: &str, file_id: i32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<d:searchrequest xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">
    <d:basicsearch>
        <d:select><d:prop><d:displayname/></d:prop></d:select>
        <d:from>
            <d:scope>
                <d:href>/files/{user_id}</d:href>
                <d:depth>infinity</d:depth>
            </d:scope>
        </d:from>
        <d:where>
            <d:eq>
                <d:prop><oc:fileid/></d:prop>
                <d:literal>{file_id}</d:literal>
            </d:eq>
        </d:where>
        <d:orderby/>
    </d:basicsearch>
</d:searchrequest>"#
    )
}

/// Picks the first `href` and `displayname` out of a multistatus response
pub fn parse_search_response(xml: &str) -> Result<SearchHit, AppError> {
    let doc = roxmltree::Document::parse(xml)?;

    let first_text = |name: &str| {
        doc.descendants()
            .find(|n| n.tag_name().name() == name)
            .and_then(|n| n.text())
            .map(str::to_string)
    };

    Ok(SearchHit {
        href: first_text("href").ok_or(AppError::NotFound("href"))?,
        displayname: first_text("displayname").ok_or(AppError::NotFound("displayname"))?,
    })
}

/// Resolves `file_id` for the requesting user and downloads the file
///
/// # Returns
/// * `Result<(Vec<u8>, SearchHit), AppError>` - File contents and where they came from
pub async fn fetch_workbook(
    ctx: &ExAppContext,
    file_id: i32,
) -> Result<(Vec<u8>, SearchHit), AppError> {
    let search_response = ctx
        .request(Method::from_bytes(b"SEARCH")?, DAV_ROOT)
        .header(CONTENT_TYPE, "application/xml")
        .body(search_body(&ctx.user_id, file_id))
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(AppError::upstream("searching by file id"))?
        .text()
        .await
        .map_err(AppError::upstream("reading search results"))?;
    debug!("Search response: {search_response}");

    let hit = parse_search_response(&search_response)?;

    let bytes = ctx
        .request(Method::GET, &hit.href)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(AppError::upstream("downloading XLSX file"))?
        .bytes()
        .await
        .map_err(AppError::upstream("reading XLSX file"))?;
    debug!("Downloaded {} bytes from {}", bytes.len(), hit.href);

    Ok((bytes.to_vec(), hit))
}
