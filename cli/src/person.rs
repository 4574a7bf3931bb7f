//! The person record managed by this CLI.

use recorder_core::{Record, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub hair_color: Option<String>,
}

impl Record for Person {
    const LABEL: &'static str = "Person";

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::field("name", "must not be empty"));
        }
        if self.age > 150 {
            return Err(ValidationError::field("age", "must be at most 150"));
        }
        Ok(())
    }
}

/// Fields to change on update; unset fields are carried forward.
#[derive(Debug, Default, Serialize)]
pub struct PersonPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use recorder_core::{to_field_set, validate_fields};

    #[test]
    fn test_patch_skips_unset_fields() {
        let patch = PersonPatch {
            age: Some(31),
            ..Default::default()
        };
        let fields = to_field_set(&patch).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["age"], 31);
    }

    #[test]
    fn test_person_rules() {
        let fields = to_field_set(serde_json::json!({"name": "Ada", "age": 200})).unwrap();
        assert!(matches!(
            validate_fields::<Person>(fields),
            Err(ValidationError::Field { field, .. }) if field == "age"
        ));
    }
}
