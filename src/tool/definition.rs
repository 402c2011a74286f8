// ABOUTME: Declarative tool metadata - parameters, definitions, and the
// ABOUTME: JSON Schema document presented to the remote agent service.

use serde::{Deserialize, Serialize};

/// Declared type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
    Object,
    Array,
}

impl ParamKind {
    fn as_str(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
            ParamKind::Object => "object",
            ParamKind::Array => "array",
        }
    }
}

/// A single named parameter of a tool.
///
/// Parameters start out required. Attaching a default through
/// [`default_value`](Self::default_value) makes the parameter optional;
/// a required parameter never carries a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ToolParameter {
    /// Create a required parameter.
    pub fn new(name: impl Into<String>, kind: ParamKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: true,
            allowed_values: None,
            default: None,
        }
    }

    /// Mark the parameter as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Restrict the parameter to an enumerated set of values.
    pub fn allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a default. This also makes the parameter optional.
    pub fn default_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }

    /// Render the parameter as a JSON Schema property.
    pub fn to_schema(&self) -> serde_json::Value {
        let mut schema = serde_json::json!({
            "type": self.kind.as_str(),
            "description": self.description,
        });

        if let Some(values) = &self.allowed_values {
            schema["enum"] = serde_json::json!(values);
        }

        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }

        schema
    }
}

/// Declared shape of a tool: name, description, and ordered parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    /// Create a definition with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a parameter.
    pub fn parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Render the parameter list as a JSON Schema object document.
    pub fn parameters_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            properties.insert(param.name.clone(), param.to_schema());
            if param.required {
                required.push(param.name.clone());
            }
        }

        let mut schema = serde_json::json!({
            "type": "object",
            "properties": properties,
        });

        if !required.is_empty() {
            schema["required"] = serde_json::json!(required);
        }

        schema
    }
}
