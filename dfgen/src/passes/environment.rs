//! Environment block.

use serde_json::{Map, Value};

use super::{Pass, PassContext};
use crate::config::ImageConfig;
use crate::error::DfgenError;

pub fn apply(config: &mut ImageConfig, ctx: &mut PassContext<'_>) -> Result<(), DfgenError> {
    config.derived.environment_block = match config.environment.as_ref() {
        None => {
            ctx.warn(Pass::Environment, "No environment variables declared");
            None
        }
        Some(vars) if vars.is_empty() => {
            ctx.warn(Pass::Environment, "Environment is empty, no ENV directive emitted");
            None
        }
        Some(vars) => Some(env_directive(vars)),
    };
    Ok(())
}

/// `ENV k1=v1 k2=v2` with a trailing newline, in document order.
pub fn env_directive(vars: &Map<String, Value>) -> String {
    let pairs = vars
        .iter()
        .map(|(key, value)| format!("{}={}", key, env_value(value)))
        .collect::<Vec<_>>()
        .join(" ");
    format!("ENV {}\n", pairs)
}

fn env_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
