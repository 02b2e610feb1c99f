use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Plaintext view of a configured device an app instance operates against.
///
/// Credential storage and field decryption belong to the device store; by
/// the time a context reaches an app instance the fields are already plain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceContext {
    #[serde(default)]
    pub device_id: Option<i64>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl DeviceContext {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
