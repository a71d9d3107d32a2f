//! Superficial input validation against a stored JSON schema.

use serde_json::{Map, Value};

/// Returns the first field named in the schema's `required` list that is
/// absent from `inputs`.
///
/// Only schemas that declare both `properties` and `required` are checked;
/// anything else accepts every input map. Types, formats, and nested schemas
/// are not validated.
#[must_use]
pub fn first_missing_required_field<'a>(
    schema: &'a Value,
    inputs: &Map<String, Value>,
) -> Option<&'a str> {
    let object = schema.as_object()?;
    if !object.contains_key("properties") {
        return None;
    }

    object
        .get("required")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .find(|field| !inputs.contains_key(*field))
}
