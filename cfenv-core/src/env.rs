use crate::app::App;
use crate::config::EnvConfig;
use crate::error::CfEnvError;
use crate::json::{int_field, string_array, string_field};
use crate::service::{Service, Services, build_services, service_names};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

/// Application environment derived from the platform metadata.
///
/// Built from an options object shaped
/// `{ "vcap": { "application": {...}, "services": {...} }, "name"?, "port"?, "protocol"? }`.
/// The raw `application` and `services` sections are kept so descriptors can
/// be built on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct AppEnv {
    /// True when no application section is present, i.e. running off-platform.
    pub is_local: bool,
    pub port: u16,
    pub name: Option<String>,
    /// Address the application should listen on.
    pub bind: String,
    /// Public URLs, scheme included.
    pub urls: Vec<String>,
    /// First entry of `urls`.
    pub url: String,
    pub app: Value,
    pub services: Value,
}

/// Build an [`AppEnv`] with default settings.
///
/// Fails only when `options` is not an object or its `vcap` key is present
/// but not an object. Missing sections degrade to empty results.
pub fn get_app_env(options: &Value) -> Result<AppEnv, CfEnvError> {
    AppEnv::with_config(options, &EnvConfig::default())
}

impl AppEnv {
    pub fn with_config(options: &Value, config: &EnvConfig) -> Result<Self, CfEnvError> {
        if !options.is_object() {
            return Err(CfEnvError::Parse("options must be a JSON object".into()));
        }

        let empty = Map::new();
        let vcap = match options.get("vcap") {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(vcap)) => vcap,
            Some(_) => return Err(CfEnvError::Parse("vcap must be a JSON object".into())),
        };

        let app = section(vcap, "application");
        let services = section(vcap, "services");

        let is_local = app.as_object().is_none_or(Map::is_empty);

        let port = port_from(if is_local { options } else { &app })
            .unwrap_or(config.default_port);

        let name = string_field(options, "name")
            .or_else(|| string_field(&app, "name"))
            .or_else(|| string_field(&app, "application_name"));

        let bind = string_field(&app, "host").unwrap_or_else(|| config.default_bind.clone());

        let urls = build_urls(is_local, &app, port, options, config);
        let url = urls.first().cloned().unwrap_or_default();

        debug!(is_local, port, url = %url, "application environment resolved");

        Ok(Self {
            is_local,
            port,
            name,
            bind,
            urls,
            url,
            app,
            services,
        })
    }

    /// Parse raw JSON text and build the environment from it.
    pub fn from_json_str(raw: &str) -> Result<Self, CfEnvError> {
        let options: Value = serde_json::from_str(raw)?;
        get_app_env(&options)
    }

    pub fn get_app(&self) -> App {
        App::from_json(&self.app)
    }

    pub fn get_services(&self) -> Services {
        build_services(&self.services)
    }

    /// Look up a service by exact name, falling back to the first name (in
    /// document order) matched by `query` as a regular expression.
    pub fn get_service(&self, query: &str) -> Option<Service> {
        let mut services = self.get_services();
        if let Some(service) = services.remove(query) {
            return Some(service);
        }

        let pattern = match Regex::new(query) {
            Ok(pattern) => pattern,
            Err(e) => {
                debug!(query, error = %e, "service query is not a valid pattern");
                return None;
            }
        };

        service_names(&self.services)
            .into_iter()
            .find(|name| pattern.is_match(name))
            .and_then(|name| services.remove(&name))
    }

    pub fn get_service_creds(&self, query: &str) -> Option<Value> {
        self.get_service(query)?.credentials
    }

    /// The service's `url` (or `uri`) credential, with URL components
    /// optionally replaced.
    ///
    /// Recognised replacement keys: `scheme`/`protocol`, `user`/`username`,
    /// `password`, `host`/`hostname`, `port`, `path`/`pathname`, `query`,
    /// `fragment`/`hash`. Returns `None` when the credential is missing, the
    /// URL does not parse, or a replacement is rejected.
    pub fn get_service_url(&self, query: &str, replacements: Option<&Value>) -> Option<String> {
        let service = self.get_service(query)?;
        let raw = service
            .credential_str("url")
            .or_else(|| service.credential_str("uri"))?;

        let Some(replacements) = replacements.and_then(Value::as_object) else {
            return Some(raw.to_owned());
        };

        let mut url = match Url::parse(raw) {
            Ok(url) => url,
            Err(e) => {
                debug!(service = %service.name, error = %e, "service url does not parse");
                return None;
            }
        };
        apply_replacements(&mut url, replacements)?;
        Some(url.to_string())
    }
}

/// `vcap[key]` as an object, or an empty object when missing or mis-typed.
fn section(vcap: &Map<String, Value>, key: &str) -> Value {
    match vcap.get(key) {
        Some(value @ Value::Object(_)) => value.clone(),
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(_) => {
            debug!(section = key, "vcap section is not an object, ignoring");
            Value::Object(Map::new())
        }
    }
}

fn port_from(json: &Value) -> Option<u16> {
    int_field(json, "port").and_then(|p| u16::try_from(p).ok())
}

fn build_urls(
    is_local: bool,
    app: &Value,
    port: u16,
    options: &Value,
    config: &EnvConfig,
) -> Vec<String> {
    let uris = if is_local {
        vec![format!("localhost:{port}")]
    } else {
        let mut uris = string_array(app, "uris");
        if uris.is_empty() {
            uris = string_array(app, "application_uris");
        }
        if uris.is_empty() {
            uris.push("localhost".into());
        }
        uris
    };

    let protocol = string_field(options, "protocol")
        .or_else(|| config.protocol.clone())
        .unwrap_or_else(|| (if is_local { "http" } else { "https" }).to_owned());

    uris.into_iter()
        .map(|uri| format!("{protocol}://{uri}"))
        .collect()
}

fn apply_replacements(url: &mut Url, replacements: &Map<String, Value>) -> Option<()> {
    for (key, value) in replacements {
        match key.as_str() {
            "scheme" | "protocol" => {
                let scheme = value.as_str()?.trim_end_matches(':');
                url.set_scheme(scheme).ok()?;
            }
            "user" | "username" => url.set_username(value.as_str()?).ok()?,
            "password" => url.set_password(Some(value.as_str()?)).ok()?,
            "host" | "hostname" => url.set_host(Some(value.as_str()?)).ok()?,
            "port" => {
                let port = match value {
                    Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
                    Value::String(s) => s.parse().ok(),
                    _ => None,
                }?;
                url.set_port(Some(port)).ok()?;
            }
            "path" | "pathname" => url.set_path(value.as_str()?),
            "query" => url.set_query(Some(value.as_str()?.trim_start_matches('?'))),
            "fragment" | "hash" => url.set_fragment(Some(value.as_str()?.trim_start_matches('#'))),
            other => debug!(key = other, "unknown url replacement, ignoring"),
        }
    }
    Some(())
}
