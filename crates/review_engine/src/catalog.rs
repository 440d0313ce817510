use serde_json::Value;

use crate::dispatch::{map_reqwest_error, upstream_error, DispatchSettings, ReqwestClassifier};
use crate::DispatchError;

/// Read-only client for the system-model catalog.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    settings: DispatchSettings,
}

impl ModelCatalog {
    pub fn new(settings: DispatchSettings) -> Self {
        Self { settings }
    }

    /// Lists the available system model identifiers. An empty or
    /// unexpected body means zero models, not a failure.
    pub async fn fetch(&self, token: &str) -> Result<Vec<String>, DispatchError> {
        let client = ReqwestClassifier::build_client(&self.settings)?;
        let mut builder = client.get(format!(
            "{}/api/ml/models",
            self.settings.endpoints.system_base
        ));
        if !token.is_empty() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(upstream_error(status, &body));
        }

        let value: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        Ok(model_names(&value))
    }
}

/// The catalog answers either with a bare array of identifiers or with
/// a `{"models": [...]}` wrapper whose entries may be objects.
fn model_names(value: &Value) -> Vec<String> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        _ => match value.get("models").and_then(Value::as_array) {
            Some(items) => items.as_slice(),
            None => return Vec::new(),
        },
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(name.clone()),
            Value::Object(_) => item
                .get("name")
                .or_else(|| item.get("id"))
                .and_then(Value::as_str)
                .map(String::from),
            _ => None,
        })
        .filter(|name| !name.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::model_names;
    use serde_json::json;

    #[test]
    fn bare_array_of_strings() {
        let value = json!(["org/base", "org/large"]);
        assert_eq!(model_names(&value), vec!["org/base", "org/large"]);
    }

    #[test]
    fn wrapped_object_entries() {
        let value = json!({
            "models": [
                {"id": "1", "name": "org/base"},
                {"id": "org/large"},
                {"huggingfaceUrl": "ignored-without-name-or-id"},
            ]
        });
        assert_eq!(model_names(&value), vec!["org/base", "org/large"]);
    }

    #[test]
    fn non_sequence_means_zero_models() {
        assert!(model_names(&json!({"status": "ok"})).is_empty());
        assert!(model_names(&json!("weird")).is_empty());
        assert!(model_names(&serde_json::Value::Null).is_empty());
    }

    #[test]
    fn blank_identifiers_are_dropped() {
        let value = json!(["org/base", "", "   "]);
        assert_eq!(model_names(&value), vec!["org/base"]);
    }
}
