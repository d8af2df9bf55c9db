/*!
# IronCalc ExApp

Runs the IronCalc spreadsheet engine as an external app inside Nextcloud.

## Overview

Nextcloud's AppAPI proxies requests from the browser to this server and
authenticates them with a set of identity headers. The server finds the
requested `.xlsx` file through WebDAV, converts it to IronCalc's binary model
format and hands it to the embedded spreadsheet. The app shell decides, once
per mount, whether to load that remote workbook or start from an empty
template.

## Architecture

### App shell
- **shell**: load-or-create decision, page title, loading state
- **shell::engine**: the workbook engine seam, backed by `ironcalc`
- **shell::rpc**: fetch adapter for `/api/webdav/{id}` behind the proxy path
- **shell::host**: the page the shell runs in (URL, storage, alerts, title, timezone)
- **shell::browser**: `wasm32` host over `window`, and the exported `start`

### ExApp server
- **app**: routing, shared state and the `no-store` caching header
- **context**: AppAPI identity headers, outbound request builder
- **webdav**: file id to path resolution with DAV `SEARCH`, file download
- **convert**: xlsx to IronCalc model bytes
- **registration**: top-menu, script and file action registration
- **config**: command line and environment configuration

## REST API Endpoints

- `GET /heartbeat` - Liveness check
- `PUT /enabled?enabled=<0|1>` - Enable or disable the app's UI
- `GET /api/webdav/{file_id}` - Workbook bytes for a Nextcloud file id
- `POST /files_action_handler` - Redirect target for the file action
- `/assets/*` - Icons and the development bootstrap script
*/

pub mod shell;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod config;
#[cfg(feature = "web")]
pub mod context;
#[cfg(feature = "web")]
pub mod convert;
#[cfg(feature = "web")]
pub mod error;
#[cfg(feature = "web")]
pub mod registration;
#[cfg(feature = "web")]
pub mod webdav;

#[cfg(feature = "web")]
pub use app::{AppState, router, run};
#[cfg(feature = "web")]
pub use config::Config;
#[cfg(feature = "web")]
pub use error::AppError;
