//! # Schema Validation
//!
//! Validates parsed balance-sheet documents against the embedded
//! `balance-sheet.schema.json` (Draft 2020-12) using the `jsonschema` crate.
//!
//! Rejections carry structured violations: the instance path, the schema
//! path, the message, and the offending section key when one can be named.

use std::fmt;

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;
use tracing::Span;

/// Top-level schema for balance-sheet documents.
const BALANCE_SHEET_SCHEMA: &str = include_str!("../schemas/balance-sheet.schema.json");

/// Section keys the schema requires, used to name the offending property.
const SECTION_KEYS: [&str; 3] = ["assets", "liabilities", "equity"];

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document did not conform to the schema.
    #[error("balance sheet schema validation failed:\n{violations}")]
    ValidationFailed {
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The schema itself could not be parsed or compiled.
    #[error("schema build error: {reason}")]
    SchemaBuildError {
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
    /// The top-level property that is missing or mistyped, when known.
    pub property: Option<String>,
}

impl Violation {
    fn from_error(error: &jsonschema::ValidationError<'_>) -> Self {
        let instance_path = error.instance_path.to_string();
        let message = error.to_string();
        let property = offending_property(&instance_path, &message);
        Self {
            instance_path,
            schema_path: error.schema_path.to_string(),
            message,
            property,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Names of the offending top-level properties, in report order.
    pub fn properties(&self) -> Vec<&str> {
        self.violations
            .iter()
            .filter_map(|v| v.property.as_deref())
            .collect()
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Compiled top-level schema check.
///
/// `SchemaChecker` is `Send + Sync`; compile once and reuse.
pub struct SchemaChecker {
    validator: Validator,
    span: Span,
}

impl fmt::Debug for SchemaChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaChecker").finish_non_exhaustive()
    }
}

impl SchemaChecker {
    /// Compile the embedded balance-sheet schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaBuildError` if the embedded schema fails to compile.
    pub fn new() -> Result<Self, SchemaValidationError> {
        let schema: Value = serde_json::from_str(BALANCE_SHEET_SCHEMA).map_err(|e| {
            SchemaValidationError::SchemaBuildError {
                reason: format!("invalid embedded schema JSON: {e}"),
            }
        })?;
        Self::from_schema(&schema)
    }

    /// Compile a caller-supplied schema in place of the embedded one.
    pub fn from_schema(schema: &Value) -> Result<Self, SchemaValidationError> {
        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .build(schema)
            .map_err(|e| SchemaValidationError::SchemaBuildError {
                reason: e.to_string(),
            })?;
        Ok(Self {
            validator,
            span: tracing::info_span!("schema_checker"),
        })
    }

    /// Emit all events under `span` instead of the default one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Validate a parsed document.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidationFailed` listing every
    /// violation when the document is not an object or a section is missing
    /// or not an object.
    pub fn check(&self, document: &Value) -> Result<(), SchemaValidationError> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(document)
            .map(|e| Violation::from_error(&e))
            .collect();

        if violations.is_empty() {
            tracing::info!(parent: &self.span, "balance sheet json schema validation passed");
            return Ok(());
        }

        for v in &violations {
            tracing::error!(
                parent: &self.span,
                property = v.property.as_deref().unwrap_or("(root)"),
                instance_path = %v.instance_path,
                "{}",
                v.message
            );
        }
        Err(SchemaValidationError::ValidationFailed {
            violations: ValidationViolations { violations },
        })
    }
}

/// Name the section a violation is about: the first instance-path segment
/// for type errors, or the quoted key in a `required` message.
fn offending_property(instance_path: &str, message: &str) -> Option<String> {
    if let Some(segment) = instance_path
        .strip_prefix('/')
        .and_then(|p| p.split('/').next())
        .filter(|s| !s.is_empty())
    {
        return Some(segment.to_string());
    }
    SECTION_KEYS
        .iter()
        .find(|key| message.contains(&format!("\"{key}\"")))
        .map(|key| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section(name: &str) -> Value {
        json!({"name": name, "value": 0})
    }

    fn valid_document() -> Value {
        json!({
            "assets": section("assets"),
            "liabilities": section("liabilities"),
            "equity": section("equity"),
        })
    }

    fn violations_of(doc: &Value) -> ValidationViolations {
        match SchemaChecker::new().unwrap().check(doc).unwrap_err() {
            SchemaValidationError::ValidationFailed { violations } => violations,
            other => panic!("Expected ValidationFailed, got: {other}"),
        }
    }

    #[test]
    fn embedded_schema_compiles() {
        assert!(SchemaChecker::new().is_ok());
    }

    #[test]
    fn valid_document_passes() {
        SchemaChecker::new().unwrap().check(&valid_document()).unwrap();
    }

    #[test]
    fn extra_top_level_keys_are_allowed() {
        let mut doc = valid_document();
        doc["currency"] = json!("USD");
        SchemaChecker::new().unwrap().check(&doc).unwrap();
    }

    #[test]
    fn nested_content_is_not_checked() {
        let doc = json!({"assets": {}, "liabilities": {"x": [1, 2]}, "equity": {"value": "n/a"}});
        SchemaChecker::new().unwrap().check(&doc).unwrap();
    }

    #[test]
    fn missing_section_is_named() {
        let doc = json!({"assets": section("assets"), "liabilities": section("liabilities")});
        let violations = violations_of(&doc);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations.properties(), ["equity"]);
        assert!(violations.violations()[0].message.contains("equity"));
    }

    #[test]
    fn mistyped_section_is_named() {
        let mut doc = valid_document();
        doc["liabilities"] = json!([1, 2, 3]);
        let violations = violations_of(&doc);
        assert_eq!(violations.properties(), ["liabilities"]);
        assert_eq!(violations.violations()[0].instance_path, "/liabilities");
    }

    #[test]
    fn all_violations_are_reported() {
        let doc = json!({"assets": 5});
        let violations = violations_of(&doc);
        let mut props = violations.properties();
        props.sort_unstable();
        assert_eq!(props, ["assets", "equity", "liabilities"]);
    }

    #[test]
    fn non_object_document_is_rejected() {
        let violations = violations_of(&json!([]));
        assert!(!violations.is_empty());
        assert!(violations.properties().is_empty());
    }

    #[test]
    fn custom_schema_replaces_embedded_one() {
        let checker = SchemaChecker::from_schema(&json!({"type": "array"})).unwrap();
        assert!(checker.check(&json!([])).is_ok());
        assert!(checker.check(&valid_document()).is_err());
    }

    #[test]
    fn invalid_schema_fails_to_build() {
        let err = SchemaChecker::from_schema(&json!({"type": 12})).unwrap_err();
        assert!(matches!(err, SchemaValidationError::SchemaBuildError { .. }));
    }

    #[test]
    fn violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            message: r#""assets" is a required property"#.to_string(),
            property: Some("assets".to_string()),
        };
        assert!(v.to_string().contains("(root)"));
    }

    #[test]
    fn offending_property_prefers_instance_path() {
        assert_eq!(
            offending_property("/equity", r#"[] is not of type "object""#),
            Some("equity".to_string())
        );
        assert_eq!(
            offending_property("", r#""liabilities" is a required property"#),
            Some("liabilities".to_string())
        );
        assert_eq!(offending_property("", "something else"), None);
    }
}
