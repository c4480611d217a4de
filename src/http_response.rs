use serde_json::Value;

/// A backend response body. `data` is set only for a JSON content type whose
/// text actually parses.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResponseBody {
    pub(crate) data: Option<Value>,
    pub(crate) text: String,
}

impl ResponseBody {
    pub(crate) fn read(content_type: Option<&str>, text: String) -> Self {
        let is_json = content_type
            .map(|value| value.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false);
        let data = if is_json {
            serde_json::from_str(&text).ok()
        } else {
            None
        };
        Self { data, text }
    }

    fn error_field(&self) -> Option<String> {
        match self.data.as_ref()?.get("error")? {
            Value::Null | Value::Bool(false) => None,
            Value::String(message) if message.is_empty() => None,
            Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }

    pub(crate) fn failure_message(&self, label: &str, status: u16) -> String {
        if let Some(message) = self.error_field() {
            return message;
        }
        if !self.text.is_empty() {
            return self.text.clone();
        }
        format!("{label} ({status})")
    }
}
