use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Generates a human-facing reference with the given prefix, e.g. `IMF-1A2B3C4D`.
///
/// References are unique per table (backed by a unique index); collisions are
/// practically impossible given the uuid source.
pub(crate) fn new_reference(prefix: &str) -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", raw[..8].to_uppercase())
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn parse_id(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::NotFound(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_carries_prefix_and_eight_chars() {
        let reference = new_reference("IMF");
        assert!(reference.starts_with("IMF-"));
        assert_eq!(reference.len(), "IMF-".len() + 8);
    }

    #[test]
    fn normalize_rejects_blank() {
        assert!(normalize_required_text("  ", "account holder").is_err());
        assert_eq!(
            normalize_required_text(" Rossi ", "account holder").unwrap(),
            "Rossi"
        );
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(Some(" x ")), Some("x".to_string()));
    }
}
