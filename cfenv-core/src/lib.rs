pub mod app;
pub mod config;
pub mod date;
pub mod env;
pub mod error;
pub mod json;
pub mod service;

pub use app::{App, Limits};
pub use config::EnvConfig;
pub use date::DateCodec;
pub use env::{AppEnv, get_app_env};
pub use error::CfEnvError;
pub use service::{Service, Services};
