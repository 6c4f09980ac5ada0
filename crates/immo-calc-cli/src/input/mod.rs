pub mod file;
pub mod stdin;

use immo_calc_core::settings::Settings;
use serde::de::DeserializeOwned;

/// Load the command's main document from `--input` or, failing that, stdin.
pub fn read_document<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_file(path, what);
    }
    match stdin::read_piped()? {
        Some(text) => serde_json::from_str(&text)
            .map_err(|e| format!("{what} on stdin is not valid JSON: {e}").into()),
        None => Err(format!("{what} required: pass --input <file.json> or pipe JSON on stdin").into()),
    }
}

/// Auto-fill settings from `--settings`, or the built-in defaults.
pub fn read_settings(path: Option<&str>) -> Result<Settings, Box<dyn std::error::Error>> {
    match path {
        Some(path) => file::read_file(path, "settings"),
        None => Ok(Settings::default()),
    }
}
