//! Feature schema and request validation
//!
//! The artifact's metadata declares an ordered feature schema; incoming
//! `/predict` payloads are checked against it here. Validation output is a
//! `PredictionRequest` whose field order always matches the schema, so the
//! estimator sees a deterministic feature vector regardless of how the
//! client ordered its JSON keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Declared kind of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Accepts JSON numbers only
    Numeric,
    /// Accepts any JSON scalar, canonicalized to a string level
    Categorical,
}

/// One entry of the artifact's feature contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Feature name as it appears in payloads
    pub name: String,
    /// Declared kind
    pub kind: FeatureKind,
    /// Whether the feature must be present and non-null
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

/// A validated feature value, resolved against the declared kind
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(String),
    /// Absent optional feature; the estimator treats it as imputed at
    /// training time (zero contribution)
    Missing,
}

/// One validated inference input, ordered to match the feature schema
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    fields: Vec<(String, FeatureValue)>,
}

impl PredictionRequest {
    /// Iterate features in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of features in the vector
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the vector is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Validate a raw JSON payload against the feature schema.
///
/// Checks run in order: payload shape, required presence, value/kind
/// compatibility. Unknown extra fields are ignored so newer clients can send
/// features an older artifact does not know about.
pub fn validate(raw: &Value, schema: &[FeatureSpec]) -> Result<PredictionRequest, ValidationError> {
    let map = raw.as_object().ok_or(ValidationError::MalformedPayload)?;

    if map.values().any(|v| v.is_array() || v.is_object()) {
        return Err(ValidationError::MalformedPayload);
    }

    let mut fields = Vec::with_capacity(schema.len());
    for spec in schema {
        let value = match map.get(&spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(ValidationError::MissingFeature {
                        feature: spec.name.clone(),
                    });
                }
                FeatureValue::Missing
            }
            Some(value) => coerce(value, spec)?,
        };
        fields.push((spec.name.clone(), value));
    }

    Ok(PredictionRequest { fields })
}

/// Resolve a present scalar against the declared feature kind
fn coerce(value: &Value, spec: &FeatureSpec) -> Result<FeatureValue, ValidationError> {
    match spec.kind {
        FeatureKind::Numeric => match value.as_f64() {
            Some(n) => Ok(FeatureValue::Numeric(n)),
            None => Err(ValidationError::TypeMismatch {
                feature: spec.name.clone(),
            }),
        },
        FeatureKind::Categorical => match value {
            Value::String(s) => Ok(FeatureValue::Categorical(s.clone())),
            // Numeric and boolean levels are canonicalized to strings so the
            // estimator's level table needs only one representation
            Value::Number(n) => {
                let level = match n.as_i64() {
                    Some(i) => i.to_string(),
                    None => n.to_string(),
                };
                Ok(FeatureValue::Categorical(level))
            }
            Value::Bool(b) => Ok(FeatureValue::Categorical(b.to_string())),
            _ => Err(ValidationError::TypeMismatch {
                feature: spec.name.clone(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_schema() -> Vec<FeatureSpec> {
        vec![
            FeatureSpec {
                name: "age".to_string(),
                kind: FeatureKind::Numeric,
                required: true,
            },
            FeatureSpec {
                name: "chol".to_string(),
                kind: FeatureKind::Numeric,
                required: false,
            },
            FeatureSpec {
                name: "thal".to_string(),
                kind: FeatureKind::Categorical,
                required: true,
            },
        ]
    }

    #[test]
    fn test_valid_payload_follows_schema_order() {
        // Keys deliberately out of schema order
        let payload = json!({"thal": "3", "age": 54, "chol": 246});
        let request = validate(&payload, &test_schema()).unwrap();

        let names: Vec<&str> = request.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["age", "chol", "thal"]);
    }

    #[test]
    fn test_missing_required_feature_reports_first_in_schema_order() {
        let payload = json!({});
        let err = validate(&payload, &test_schema()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFeature {
                feature: "age".to_string()
            }
        );
    }

    #[test]
    fn test_null_required_feature_is_missing() {
        let payload = json!({"age": null, "chol": 246, "thal": "3"});
        let err = validate(&payload, &test_schema()).unwrap_err();
        assert_eq!(err.kind(), "MissingFeature");
        assert_eq!(err.feature(), Some("age"));
    }

    #[test]
    fn test_absent_optional_feature_becomes_missing() {
        let payload = json!({"age": 54, "thal": "3"});
        let request = validate(&payload, &test_schema()).unwrap();
        let chol = request.iter().find(|(name, _)| *name == "chol").unwrap().1;
        assert_eq!(*chol, FeatureValue::Missing);
    }

    #[test]
    fn test_string_for_numeric_is_type_mismatch() {
        let payload = json!({"age": "fifty-four", "thal": "3"});
        let err = validate(&payload, &test_schema()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                feature: "age".to_string()
            }
        );
    }

    #[test]
    fn test_categorical_accepts_number_and_bool_scalars() {
        let payload = json!({"age": 54, "thal": 3});
        let request = validate(&payload, &test_schema()).unwrap();
        let thal = request.iter().find(|(name, _)| *name == "thal").unwrap().1;
        assert_eq!(*thal, FeatureValue::Categorical("3".to_string()));

        let payload = json!({"age": 54, "thal": true});
        let request = validate(&payload, &test_schema()).unwrap();
        let thal = request.iter().find(|(name, _)| *name == "thal").unwrap().1;
        assert_eq!(*thal, FeatureValue::Categorical("true".to_string()));
    }

    #[test]
    fn test_non_object_payload_is_malformed() {
        for payload in [json!([1, 2, 3]), json!("age"), json!(42), json!(null)] {
            let err = validate(&payload, &test_schema()).unwrap_err();
            assert_eq!(err, ValidationError::MalformedPayload);
        }
    }

    #[test]
    fn test_nested_value_is_malformed() {
        let payload = json!({"age": 54, "thal": "3", "extra": {"nested": 1}});
        let err = validate(&payload, &test_schema()).unwrap_err();
        assert_eq!(err, ValidationError::MalformedPayload);
    }

    #[test]
    fn test_unknown_flat_fields_are_ignored() {
        let payload = json!({"age": 54, "chol": 246, "thal": "3", "future_feature": 1});
        let request = validate(&payload, &test_schema()).unwrap();
        assert_eq!(request.len(), 3);
    }

    #[test]
    fn test_feature_spec_required_defaults_to_true() {
        let spec: FeatureSpec =
            serde_json::from_str(r#"{"name": "age", "kind": "numeric"}"#).unwrap();
        assert!(spec.required);
        assert_eq!(spec.kind, FeatureKind::Numeric);
    }
}
