//! Plugin options and the include/exclude file filter.

#[cfg(feature = "napi")]
use napi_derive::napi;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::transform::clean_id;

pub const DEFAULT_INCLUDE: &str = r"\.(js|jsx|cjs|cjsx|mjs|mjsx|tsx|ctsx|mtsx)$";
pub const NODE_MODULES: &str = r"node_modules";

/// Options as passed by the host bundler. Patterns are regular expressions
/// matched against the module id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl TransformOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }
}

/// Compiled filter: an id passes if it matches some include pattern and no
/// exclude pattern. `node_modules` is always excluded.
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl FileFilter {
    pub fn new(options: &TransformOptions) -> Result<Self, TransformError> {
        let include = if options.include.is_empty() {
            vec![compile(DEFAULT_INCLUDE)?]
        } else {
            options
                .include
                .iter()
                .map(|pattern| compile(pattern))
                .collect::<Result<_, _>>()?
        };

        let mut exclude = vec![compile(NODE_MODULES)?];
        for pattern in &options.exclude {
            exclude.push(compile(pattern)?);
        }

        Ok(Self { include, exclude })
    }

    pub fn matches(&self, id: &str) -> bool {
        let id = clean_id(id);
        self.include.iter().any(|re| re.is_match(id)) && !self.exclude.iter().any(|re| re.is_match(id))
    }
}

fn compile(pattern: &str) -> Result<Regex, TransformError> {
    Regex::new(pattern).map_err(|source| TransformError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = FileFilter::new(&TransformOptions::default()).unwrap();
        assert!(filter.matches("/app/src/Card.jsx"));
        assert!(filter.matches("/app/src/Card.tsx?v=42"));
        assert!(filter.matches("/app/src/index.mjs"));
        assert!(!filter.matches("/app/src/types.ts"));
        assert!(!filter.matches("/app/src/styles.css"));
        assert!(!filter.matches("/app/node_modules/lib/index.js"));
    }

    #[test]
    fn test_user_patterns_extend_exclude() {
        let options = TransformOptions {
            include: vec![r"\.jsx$".to_string()],
            exclude: vec![r"legacy/".to_string()],
        };
        let filter = FileFilter::new(&options).unwrap();
        assert!(filter.matches("/app/src/Card.jsx"));
        assert!(!filter.matches("/app/src/Card.tsx"));
        assert!(!filter.matches("/app/legacy/Card.jsx"));
        assert!(!filter.matches("/app/node_modules/x/Card.jsx"));
    }

    #[test]
    fn test_options_from_json() {
        let options = TransformOptions::from_json(r#"{"exclude": ["stories"]}"#).unwrap();
        assert!(options.include.is_empty());
        assert_eq!(options.exclude, vec!["stories".to_string()]);
        assert_eq!(TransformOptions::from_json("").unwrap(), TransformOptions::default());
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let options = TransformOptions {
            include: vec!["(".to_string()],
            exclude: Vec::new(),
        };
        let err = FileFilter::new(&options).unwrap_err();
        assert!(matches!(err, TransformError::InvalidPattern { ref pattern, .. } if pattern == "("));
    }
}
