//! Target-case JSON.
//!
//! Format:
//!
//! ```json
//! { "label": "HSU", "features": { "SAT": 1100, "PHD": 95, ... }, "actual": 16000 }
//! ```
//!
//! `actual` is optional; without it the report omits the comparison.

use std::fs;
use std::path::Path;

use crate::domain::TargetCase;
use crate::error::AppError;

pub fn read_target_json(path: &Path) -> Result<TargetCase, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::input(format!("Failed to read target JSON '{}': {e}", path.display())))?;
    parse_target(&text)
        .map_err(|e| AppError::input(format!("{} ('{}')", e.message(), path.display())))
}

pub fn parse_target(text: &str) -> Result<TargetCase, AppError> {
    let target: TargetCase =
        serde_json::from_str(text).map_err(|e| AppError::input(format!("Invalid target JSON: {e}")))?;
    if let Some((name, _)) = target.features.iter().find(|(_, v)| !v.is_finite()) {
        return Err(AppError::input(format!("Target feature `{name}` is not finite.")));
    }
    if target.actual.is_some_and(|v| !v.is_finite()) {
        return Err(AppError::input("Target actual value is not finite."));
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_features_and_optional_actual() {
        let t = parse_target(r#"{"label":"X","features":{"SAT":1000,"PHD":80.5}}"#).unwrap();
        assert_eq!(t.label, "X");
        assert_eq!(t.features["PHD"], 80.5);
        assert!(t.actual.is_none());
    }

    #[test]
    fn malformed_json_is_an_input_error() {
        let err = parse_target("{ not json").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn file_round_trip_matches_builtin_case() {
        let path = std::env::temp_dir().join(format!("spend_target_{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&TargetCase::hsu()).unwrap()).unwrap();
        assert_eq!(read_target_json(&path).unwrap(), TargetCase::hsu());
        let _ = std::fs::remove_file(&path);
    }
}
