//! UI registration with the AppAPI
//!
//! When Nextcloud enables the app it gets a top-menu entry, the script that
//! boots the spreadsheet inside that entry, and an "Open with IronCalc" file
//! action for xlsx files. Disabling removes all three.

use log::{debug, info};
use reqwest::Method;
use serde_json::{Value, json};

use crate::context::ExAppContext;
use crate::error::AppError;

pub const APP_NAME: &str = "ironcalc";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const TOP_MENU: &str = "/ocs/v2.php/apps/app_api/api/v1/ui/top-menu";
const SCRIPT: &str = "/ocs/v2.php/apps/app_api/api/v1/ui/script";
const FILES_ACTIONS_MENU: &str = "/ocs/v2.php/apps/app_api/api/v2/ui/files-actions-menu?format=json";

/// One AppAPI call made while enabling or disabling the app
#[derive(Debug, Clone)]
pub struct UiCall {
    pub method: Method,
    pub endpoint: &'static str,
    pub payload: Value,
    /// Used in error messages
    pub action: &'static str,
}

pub fn enable_calls() -> Vec<UiCall> {
    vec![
        UiCall {
            method: Method::POST,
            endpoint: TOP_MENU,
            payload: json!({
                "name": APP_NAME,
                "displayName": "IronCalc",
                "icon": "assets/ironcalc-white.svg",
                "adminRequired": "0"
            }),
            action: "creating top-menu",
        },
        UiCall {
            method: Method::POST,
            endpoint: SCRIPT,
            payload: json!({
                "type": "top_menu",
                "name": APP_NAME,
                "path": "assets/dev"
            }),
            action: "adding script",
        },
        UiCall {
            method: Method::POST,
            endpoint: FILES_ACTIONS_MENU,
            payload: json!({
                "name": APP_NAME,
                "displayName": "Open with IronCalc",
                "icon": "assets/ironcalc-black.svg",
                "order": -1000,
                "actionHandler": "/files_action_handler",
                "mime": XLSX_MIME
            }),
            action: "adding files actions menu",
        },
    ]
}

pub fn disable_calls() -> Vec<UiCall> {
    vec![
        UiCall {
            method: Method::DELETE,
            endpoint: SCRIPT,
            payload: json!({ "type": "top_menu", "name": APP_NAME }),
            action: "deleting script",
        },
        UiCall {
            method: Method::DELETE,
            endpoint: TOP_MENU,
            payload: json!({ "name": APP_NAME }),
            action: "deleting top-menu",
        },
        UiCall {
            method: Method::DELETE,
            endpoint: FILES_ACTIONS_MENU,
            payload: json!({ "name": APP_NAME }),
            action: "deleting files actions menu",
        },
    ]
}

/// Registers or unregisters the app's UI, stopping at the first failure
pub async fn set_enabled(ctx: &ExAppContext, enabled: bool) -> Result<(), AppError> {
    let calls = if enabled {
        enable_calls()
    } else {
        disable_calls()
    };

    for call in calls {
        let response = ctx
            .request(call.method, call.endpoint)
            .json(&call.payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(AppError::upstream(call.action))?;
        debug!("Response: {response:?}");
    }

    info!(
        "{} {APP_NAME} for {}",
        if enabled { "Enabled" } else { "Disabled" },
        ctx.user_id
    );
    Ok(())
}
