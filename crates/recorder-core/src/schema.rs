//! Schema contract between callers and the versioning engine.
//!
//! A [`Record`] is the statically known business field set of one entity
//! kind. Raw payloads are validated against it before anything is written;
//! after validation the engine only ever handles the normalised [`FieldSet`]
//! and copies it verbatim between snapshots.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::FieldSet;

/// Errors raised while validating a payload. No writes happen before
/// validation succeeds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The payload did not serialize to a JSON object.
    #[error("payload must be an object of fields")]
    NotAnObject,

    /// The payload does not match the record's field types.
    #[error("payload does not match schema: {0}")]
    Schema(String),

    /// A domain rule on a single field failed.
    #[error("invalid field `{field}`: {reason}")]
    Field { field: String, reason: String },
}

impl ValidationError {
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// The business field set of one entity kind.
///
/// ```rust,ignore
/// #[derive(Clone, Serialize, Deserialize)]
/// struct Person { name: String, age: u32 }
///
/// impl Record for Person {
///     const LABEL: &'static str = "Person";
/// }
/// ```
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Label stamped on entity nodes of this kind.
    const LABEL: &'static str;

    /// Label stamped on version record nodes of this kind.
    fn record_label() -> String {
        format!("{}Record", Self::LABEL)
    }

    /// Domain rules beyond what the field types already enforce.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Serialize a caller payload into a field set.
pub fn to_field_set(payload: impl Serialize) -> Result<FieldSet, ValidationError> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(ValidationError::NotAnObject),
        Err(e) => Err(ValidationError::Schema(e.to_string())),
    }
}

/// Validate a complete field set against `T`.
///
/// Returns the typed value together with its normalised serialization,
/// which is what gets persisted.
pub fn validate_fields<T: Record>(fields: FieldSet) -> Result<(T, FieldSet), ValidationError> {
    let typed: T = serde_json::from_value(Value::Object(fields))
        .map_err(|e| ValidationError::Schema(e.to_string()))?;
    typed.validate()?;
    let normalised = to_field_set(&typed)?;
    Ok((typed, normalised))
}

/// Overlay `patch` on `base` field by field. Patch values always win and
/// fields absent from the patch are carried forward unchanged.
pub fn merge_fields(base: &FieldSet, patch: FieldSet) -> FieldSet {
    let mut merged = base.clone();
    for (name, value) in patch {
        merged.insert(name, value);
    }
    merged
}
