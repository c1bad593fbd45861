use crate::json::{string_array, string_field};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Bound services keyed by service instance name.
pub type Services = HashMap<String, Service>;

/// One bound backing service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub label: Option<String>,
    pub plan: Option<String>,

    /// Tags in document order.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Credentials passed through as-is; their shape depends on the service.
    pub credentials: Option<Value>,
}

impl Service {
    /// Build from one service entry. `None` when the entry has no string
    /// `name`, since the name is the lookup key.
    pub fn from_json(json: &Value) -> Option<Self> {
        let name = string_field(json, "name")?;
        Some(Self {
            name,
            label: string_field(json, "label"),
            plan: string_field(json, "plan"),
            tags: string_array(json, "tags"),
            credentials: json.get("credentials").filter(|v| !v.is_null()).cloned(),
        })
    }

    /// `credentials[key]` when it is a string, e.g. `url` or `uri`.
    pub fn credential_str(&self, key: &str) -> Option<&str> {
        self.credentials.as_ref()?.get(key)?.as_str()
    }
}

/// Flatten the `services` section (`{label: [entry, ...]}`) into a map keyed
/// by service name. A later entry with an already-seen name replaces the
/// earlier one.
pub fn build_services(json: &Value) -> Services {
    let mut services = Services::new();
    let Some(labels) = json.as_object() else {
        return services;
    };

    for (label, entries) in labels {
        let Some(entries) = entries.as_array() else {
            debug!(label = %label, "services label is not an array, skipping");
            continue;
        };
        for entry in entries {
            match Service::from_json(entry) {
                Some(service) => {
                    if services.contains_key(&service.name) {
                        debug!(name = %service.name, label = %label, "duplicate service name, replacing");
                    }
                    services.insert(service.name.clone(), service);
                }
                None => debug!(label = %label, "service entry without a name, skipping"),
            }
        }
    }

    debug!(count = services.len(), "services built");
    services
}

/// Names of every service entry in document order (label order, then entry
/// order). Entries without a name are left out.
pub fn service_names(json: &Value) -> Vec<String> {
    json.as_object()
        .into_iter()
        .flat_map(|labels| labels.values())
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|entry| string_field(entry, "name"))
        .collect()
}
