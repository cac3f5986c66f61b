//! Device / environment fingerprint attached to each complaint

use chrono::Local;
use serde::Serialize;
use sysinfo::System;

use intake_core::DeviceInfo;

use crate::constants::{APP_NAME, APP_VERSION};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFingerprint {
    pub user_agent: String,
    pub platform: String,
    pub hostname: String,
    pub os_name: String,
    pub os_version: String,
    pub kernel_version: String,
    pub language: String,
    pub languages: Vec<String>,
    pub timezone: String,
    /// Minutes to add to local time to get UTC (same sign as JS getTimezoneOffset)
    pub timezone_offset: i32,
    pub hardware_concurrency: usize,
}

impl DeviceFingerprint {
    pub fn collect() -> Self {
        let os_name = System::name().unwrap_or_else(|| "unknown".to_string());
        let platform = format!("{} {}", std::env::consts::OS, std::env::consts::ARCH);

        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let language = std::env::var("LANG")
            .ok()
            .and_then(|l| locale_to_language(&l))
            .unwrap_or_else(|| "en-US".to_string());

        let languages = std::env::var("LANGUAGE")
            .ok()
            .map(|l| l.split(':').filter_map(locale_to_language).collect::<Vec<_>>())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| vec![language.clone()]);

        let offset_secs = Local::now().offset().local_minus_utc();

        Self {
            user_agent: format!("{}/{} ({})", APP_NAME, APP_VERSION, platform),
            platform,
            hostname,
            os_name,
            os_version: System::os_version().unwrap_or_else(|| "unknown".to_string()),
            kernel_version: System::kernel_version().unwrap_or_else(|| "unknown".to_string()),
            language,
            languages,
            timezone: std::env::var("TZ").unwrap_or_else(|_| "unknown".to_string()),
            timezone_offset: -offset_secs / 60,
            hardware_concurrency: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(0),
        }
    }

    pub fn into_device_info(self) -> DeviceInfo {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => DeviceInfo::new(),
        }
    }
}

/// `en_IN.UTF-8` -> `en-IN`; `C` / `POSIX` carry no language.
fn locale_to_language(locale: &str) -> Option<String> {
    let base = locale.split(['.', '@']).next()?.trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}
