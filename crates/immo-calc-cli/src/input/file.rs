use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Load `path` and deserialise it as `what`.
///
/// `.yaml` / `.yml` files are read as YAML (settings are usually kept that
/// way); anything else must be JSON.
pub fn read_file<T: DeserializeOwned>(
    path: &str,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    let location = locate(path)?;
    let contents = fs::read_to_string(&location)
        .map_err(|e| format!("Cannot read {what} from '{}': {e}", location.display()))?;
    parse_document(&location, &contents, what)
}

fn parse_document<T: DeserializeOwned>(
    location: &Path,
    contents: &str,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    let parsed = match location.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
        _ => serde_json::from_str(contents).map_err(|e| e.to_string()),
    };
    parsed.map_err(|e| format!("'{}' is not a valid {what}: {e}", location.display()).into())
}

fn locate(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let location = std::env::current_dir()?.join(path);
    if !location.is_file() {
        return Err(format!("No such file: {}", location.display()).into());
    }
    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use immo_calc_core::settings::Settings;
    use rust_decimal::Decimal;

    #[test]
    fn test_yaml_settings_by_extension() {
        let s: Settings =
            parse_document(Path::new("swiss.yaml"), "equity_pct: 20\n", "settings").unwrap();
        assert_eq!(s.equity_pct, Decimal::from(20));
    }

    #[test]
    fn test_other_extensions_are_json() {
        let s: Settings =
            parse_document(Path::new("swiss.json"), r#"{"equity_pct": 30}"#, "settings").unwrap();
        assert_eq!(s.equity_pct, Decimal::from(30));

        let err = parse_document::<Settings>(Path::new("swiss.json"), "equity_pct: 20", "settings")
            .unwrap_err();
        assert!(err.to_string().contains("not a valid settings"));
    }
}
