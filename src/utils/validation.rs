use crate::utils::error::{NormalizeError, Result};
use regex::Regex;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let display = path.to_string_lossy();

    if path.as_os_str().is_empty() {
        return Err(NormalizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if display.contains('\0') {
        return Err(NormalizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_paths(field_name: &str, paths: &[impl AsRef<Path>]) -> Result<()> {
    if paths.is_empty() {
        return Err(NormalizeError::MissingInputError);
    }

    for path in paths {
        validate_path(field_name, path.as_ref())?;
    }
    Ok(())
}

pub fn validate_pattern(field_name: &str, pattern: &str) -> Result<Regex> {
    if pattern.trim().is_empty() {
        return Err(NormalizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: pattern.to_string(),
            reason: "Pattern cannot be empty or whitespace-only".to_string(),
        });
    }

    Regex::new(pattern).map_err(|e| NormalizeError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: pattern.to_string(),
        reason: format!("Invalid regular expression: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_paths() {
        let none: Vec<PathBuf> = vec![];
        assert!(matches!(
            validate_paths("paths", &none),
            Err(NormalizeError::MissingInputError)
        ));
        assert!(validate_paths("paths", &[PathBuf::from("notes.txt")]).is_ok());
        assert!(validate_paths("paths", &[PathBuf::from("")]).is_err());
        assert!(validate_path("paths", Path::new("bad\0name")).is_err());
    }

    #[test]
    fn test_validate_pattern() {
        assert!(validate_pattern("exclude", r"\.git/").is_ok());
        assert!(validate_pattern("exclude", "   ").is_err());
        assert!(validate_pattern("exclude", "([unclosed").is_err());
    }
}
