//! Feature schema declarations.
//!
//! Each scoring module owns one immutable `FeatureSpec` declaring its raw
//! fields in the exact order the fitted preprocessing artifacts expect.
//! Categorical fields expand to one-hot columns over a fixed category order
//! with a designated baseline dropped; reordering either list silently
//! corrupts every downstream score, so both are declared here once and
//! version-tagged.

use serde::{Deserialize, Serialize};

/// Semantic type of a raw input field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Numeric,
    Boolean,
    /// Fixed category enumeration. `categories` is the declared order used
    /// for one-hot expansion; `baseline` must be a member and is dropped
    /// from the encoded columns.
    Categorical {
        categories: Vec<String>,
        baseline: String,
    },
}

/// One declared raw input field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Documented valid range. Informational only — out-of-range values are
    /// passed through; the fitted model is the source of truth on
    /// extrapolation.
    #[serde(default)]
    pub range: Option<(f64, f64)>,
}

fn default_required() -> bool {
    true
}

impl FieldSpec {
    pub fn numeric(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Numeric,
            required: true,
            range: None,
        }
    }

    pub fn boolean(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Boolean,
            required: true,
            range: None,
        }
    }

    pub fn categorical(name: &str, categories: &[&str], baseline: &str) -> Self {
        debug_assert!(categories.contains(&baseline));
        Self {
            name: name.to_string(),
            kind: FieldKind::Categorical {
                categories: categories.iter().map(|c| c.to_string()).collect(),
                baseline: baseline.to_string(),
            },
            required: true,
            range: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_range(mut self, lo: f64, hi: f64) -> Self {
        self.range = Some((lo, hi));
        self
    }

    /// Number of encoded columns this field contributes.
    pub fn width(&self) -> usize {
        match &self.kind {
            FieldKind::Numeric | FieldKind::Boolean => 1,
            FieldKind::Categorical { categories, .. } => categories.len() - 1,
        }
    }

    /// Encoded column names, in declared order. Categorical fields yield
    /// `{name}_{category}` for every non-baseline category.
    pub fn encoded_columns(&self) -> Vec<String> {
        match &self.kind {
            FieldKind::Numeric | FieldKind::Boolean => vec![self.name.clone()],
            FieldKind::Categorical {
                categories,
                baseline,
            } => categories
                .iter()
                .filter(|c| *c != baseline)
                .map(|c| format!("{}_{}", self.name, c))
                .collect(),
        }
    }

    /// Recover the original category from this field's one-hot slice.
    /// All-zero resolves to the baseline category.
    pub fn decode_one_hot(&self, columns: &[f64]) -> Option<&str> {
        let FieldKind::Categorical {
            categories,
            baseline,
        } = &self.kind
        else {
            return None;
        };
        let encoded: Vec<&String> = categories.iter().filter(|c| *c != baseline).collect();
        if columns.len() != encoded.len() {
            return None;
        }
        match columns.iter().position(|&v| v == 1.0) {
            Some(i) => Some(encoded[i].as_str()),
            None => Some(baseline.as_str()),
        }
    }
}

/// Ordered, immutable feature schema for one scoring module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Schema version; bumped whenever field order or categories change so
    /// artifact drift is caught at load instead of at scoring time.
    pub version: String,
    pub fields: Vec<FieldSpec>,
}

impl FeatureSpec {
    pub fn new(version: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            version: version.to_string(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Raw field names in declared order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Encoded column names after one-hot expansion, in declared order.
    pub fn encoded_columns(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|f| f.encoded_columns())
            .collect()
    }

    /// Total encoded vector width.
    pub fn width(&self) -> usize {
        self.fields.iter().map(|f| f.width()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race_field() -> FieldSpec {
        FieldSpec::categorical(
            "Race Category",
            &[
                "American Indian or Alaska Native",
                "Asian",
                "Black or African American",
                "Native Hawaiian or Other Pacific Islander",
                "White",
            ],
            "American Indian or Alaska Native",
        )
    }

    #[test]
    fn test_one_hot_columns_drop_baseline() {
        let field = race_field();
        let cols = field.encoded_columns();
        assert_eq!(cols.len(), 4);
        assert_eq!(cols[0], "Race Category_Asian");
        assert!(!cols.iter().any(|c| c.contains("American Indian")));
    }

    #[test]
    fn test_decode_one_hot_roundtrip() {
        let field = race_field();
        assert_eq!(field.decode_one_hot(&[0.0, 1.0, 0.0, 0.0]), Some("Black or African American"));
        // all-zero encodes the dropped baseline
        assert_eq!(
            field.decode_one_hot(&[0.0, 0.0, 0.0, 0.0]),
            Some("American Indian or Alaska Native")
        );
    }

    #[test]
    fn test_spec_width_counts_expansion() {
        let spec = FeatureSpec::new(
            "test-1",
            vec![
                FieldSpec::numeric("Age"),
                FieldSpec::boolean("Smokes"),
                race_field(),
            ],
        );
        assert_eq!(spec.width(), 6);
        assert_eq!(spec.encoded_columns().len(), 6);
    }
}
