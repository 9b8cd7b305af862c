//! Field schemas: ordered fields, each with ordered regex alternatives.

use std::collections::HashSet;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::patterns::TRANSFER_ORDER_FIELDS;
use crate::error::SchemaError;

/// One compiled pattern alternative.
///
/// Patterns compile in multi-line mode so `^`/`$` anchor at line
/// boundaries; `[\s\S]` spans lines where an alternative needs it.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    regex: Regex,
}

impl FieldPattern {
    /// Compile a pattern alternative.
    pub fn new(pattern: &str) -> std::result::Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).multi_line(true).build()?;
        Ok(Self { regex })
    }

    /// Source text of the pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Find the value this alternative captures in `text`.
    ///
    /// Takes the first capturing group when the pattern has one and it
    /// participated in the match, otherwise the whole match. The value is
    /// trimmed.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        let caps = self.regex.captures(text)?;
        let matched = caps.get(1).or_else(|| caps.get(0))?;
        Some(matched.as_str().trim())
    }
}

/// A named field and its prioritized alternatives.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    patterns: Vec<FieldPattern>,
}

impl FieldSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn patterns(&self) -> &[FieldPattern] {
        &self.patterns
    }

    /// Value of the first alternative that matches, in priority order.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.patterns.iter().find_map(|p| p.capture(text))
    }
}

/// Serializable form of a field definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub patterns: Vec<String>,
}

/// Serializable form of a schema: a JSON array of field definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDefinition {
    pub fields: Vec<FieldDefinition>,
}

impl SchemaDefinition {
    /// Definition of the built-in transfer-order schema.
    pub fn transfer_order() -> Self {
        let fields = TRANSFER_ORDER_FIELDS
            .iter()
            .map(|(name, patterns)| FieldDefinition {
                name: (*name).to_string(),
                patterns: patterns.iter().map(|p| (*p).to_string()).collect(),
            })
            .collect();
        Self { fields }
    }

    /// Parse a definition from JSON text.
    pub fn from_json(json: &str) -> std::result::Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Compiled, ordered field schema.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    /// Compile and validate a schema definition.
    pub fn compile(definition: &SchemaDefinition) -> std::result::Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(definition.fields.len());

        for (position, def) in definition.fields.iter().enumerate() {
            let name = def.name.trim();
            if name.is_empty() {
                return Err(SchemaError::EmptyName(position));
            }
            if !seen.insert(name.to_string()) {
                return Err(SchemaError::DuplicateField(name.to_string()));
            }
            if def.patterns.is_empty() {
                return Err(SchemaError::NoPatterns(name.to_string()));
            }

            let patterns = def
                .patterns
                .iter()
                .enumerate()
                .map(|(index, p)| {
                    FieldPattern::new(p).map_err(|source| SchemaError::InvalidPattern {
                        field: name.to_string(),
                        index,
                        source,
                    })
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;

            fields.push(FieldSpec {
                name: name.to_string(),
                patterns,
            });
        }

        Ok(Self { fields })
    }

    /// The built-in transfer-order schema.
    pub fn transfer_order() -> Self {
        Self::compile(&SchemaDefinition::transfer_order())
            .expect("built-in transfer-order schema must compile")
    }

    /// Load and compile a schema from a JSON file.
    pub fn from_json_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let definition = SchemaDefinition::from_json(&content)?;
        Ok(Self::compile(&definition)?)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Field names in schema order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str, patterns: &[&str]) -> FieldDefinition {
        FieldDefinition {
            name: name.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_builtin_schema_compiles() {
        let schema = FieldSchema::transfer_order();
        assert_eq!(schema.len(), 24);
        assert_eq!(schema.fields()[0].name(), "Entité");
        assert_eq!(schema.fields()[23].name(), "Signataire2");
    }

    #[test]
    fn test_capture_without_group_uses_whole_match() {
        let pattern = FieldPattern::new(r"Transfer id[^\n]*").unwrap();
        assert_eq!(
            pattern.capture("x\nTransfer id 42 done  \ny"),
            Some("Transfer id 42 done")
        );
    }

    #[test]
    fn test_capture_non_participating_group_uses_whole_match() {
        let pattern = FieldPattern::new(r"Ref(?:: (\d+))?").unwrap();
        assert_eq!(pattern.capture("Ref"), Some("Ref"));
        assert_eq!(pattern.capture("Ref: 12"), Some("12"));
    }

    #[test]
    fn test_multiline_anchors() {
        let pattern = FieldPattern::new(r"^Total (\d+)$").unwrap();
        assert_eq!(pattern.capture("header\nTotal 7\nfooter"), Some("7"));
    }

    #[test]
    fn test_first_matching_alternative_wins() {
        let schema = FieldSchema::compile(&SchemaDefinition {
            fields: vec![def("Amount", &[r"EUR (\d+)", r"USD (\d+)", r"(\d+)"])],
        })
        .unwrap();
        let field = schema.field("Amount").unwrap();
        assert_eq!(field.find("USD 10 EUR 20"), Some("20"));
        assert_eq!(field.find("USD 10"), Some("10"));
        assert_eq!(field.find("n 3"), Some("3"));
        assert_eq!(field.find("none"), None);
    }

    #[test]
    fn test_compile_rejects_duplicates() {
        let err = FieldSchema::compile(&SchemaDefinition {
            fields: vec![def("A", &["a"]), def("A", &["b"])],
        })
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField(name) if name == "A"));
    }

    #[test]
    fn test_compile_rejects_empty_fields() {
        let err = FieldSchema::compile(&SchemaDefinition {
            fields: vec![def("A", &[])],
        })
        .unwrap_err();
        assert!(matches!(err, SchemaError::NoPatterns(_)));

        let err = FieldSchema::compile(&SchemaDefinition {
            fields: vec![def("  ", &["a"])],
        })
        .unwrap_err();
        assert!(matches!(err, SchemaError::EmptyName(0)));
    }

    #[test]
    fn test_compile_reports_invalid_pattern() {
        let err = FieldSchema::compile(&SchemaDefinition {
            fields: vec![def("A", &["ok", "(unclosed"])],
        })
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { index: 1, .. }));
    }

    #[test]
    fn test_definition_json_roundtrip_shape() {
        let json = r#"[{"name": "SWIFT", "patterns": ["Swift:\\s*([A-Z0-9]+)"]}]"#;
        let definition = SchemaDefinition::from_json(json).unwrap();
        assert_eq!(definition.fields.len(), 1);
        let schema = FieldSchema::compile(&definition).unwrap();
        assert_eq!(schema.field("SWIFT").unwrap().find("Swift: AB12"), Some("AB12"));
    }
}
