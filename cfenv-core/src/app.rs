use crate::date::DateCodec;
use crate::json::{int_field, string_array, string_field};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Runtime limits assigned to the instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Memory quota in MB (`limits.mem`).
    pub memory: Option<i64>,
    /// Disk quota in MB.
    pub disk: Option<i64>,
    /// File descriptor limit.
    pub fds: Option<i64>,
}

/// Identity and runtime facts about one running application instance,
/// read from the `application` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub id: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub host: Option<String>,
    pub port: Option<i64>,
    pub instance_id: Option<String>,
    pub instance_index: Option<i64>,
    pub space_id: Option<String>,

    #[serde(default)]
    pub users: Vec<String>,

    /// External routes bound to the application.
    #[serde(default)]
    pub uris: Vec<String>,

    /// Serialized in the platform layout, like `started_at_raw`.
    #[serde(default, with = "crate::date::platform_format")]
    pub started_at: Option<DateTime<Utc>>,

    /// `started_at` exactly as the platform wrote it.
    pub started_at_raw: Option<String>,

    /// `started_at_timestamp`, epoch seconds.
    pub started_at_ts: Option<i64>,

    pub limits: Option<Limits>,
}

impl Limits {
    pub fn from_json(json: &Value) -> Self {
        Self {
            memory: int_field(json, "mem"),
            disk: int_field(json, "disk"),
            fds: int_field(json, "fds"),
        }
    }
}

impl App {
    /// Build from the `application` object. Never fails; absent or
    /// mis-typed fields come out as `None` or empty.
    pub fn from_json(json: &Value) -> Self {
        let codec = DateCodec::new();

        let uris = if json.get("application_uris").is_some_and(Value::is_array) {
            string_array(json, "application_uris")
        } else {
            string_array(json, "uris")
        };

        let started_at_raw = string_field(json, "started_at");

        Self {
            id: string_field(json, "application_id"),
            name: string_field(json, "name").or_else(|| string_field(json, "application_name")),
            version: string_field(json, "application_version")
                .or_else(|| string_field(json, "version")),
            host: string_field(json, "host"),
            port: int_field(json, "port"),
            instance_id: string_field(json, "instance_id"),
            instance_index: int_field(json, "instance_index"),
            space_id: string_field(json, "space_id"),
            users: string_array(json, "users"),
            uris,
            started_at: codec.parse(started_at_raw.as_deref()),
            started_at_raw,
            started_at_ts: int_field(json, "started_at_timestamp"),
            limits: json
                .get("limits")
                .filter(|v| v.is_object())
                .map(Limits::from_json),
        }
    }
}
