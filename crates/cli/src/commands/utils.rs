use serde::Serialize;
use serde_json::Value;

/// Serialize `item` and add a string field to it.
pub(crate) fn with_field(
    item: impl Serialize,
    key: &str,
    value: impl ToString,
) -> eyre::Result<Value> {
    let mut item = serde_json::to_value(item)?;
    let Some(object) = item.as_object_mut() else {
        eyre::bail!("expecting an object");
    };
    object.insert(key.to_string(), Value::String(value.to_string()));
    Ok(item)
}
