//! Tool System
//!
//! Extensible tool framework for agent capabilities.
//! Tools are registered once and invoked by whatever agent framework binds
//! to the registry (HTTP surface, LLM function calling, tests).

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Tool call request from an agent
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    #[serde(alias = "tool")]
    pub name: String,

    /// Arguments as key-value pairs
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,

    /// Optional call ID for tracking
    #[serde(default)]
    pub id: Option<String>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: HashMap::new(),
            id: None,
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.arguments.insert(key.into(), value);
        self
    }

    /// Read a string argument
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Read a numeric argument, accepting numeric strings
    pub fn f64_arg(&self, key: &str) -> Option<f64> {
        match self.arguments.get(key)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Read an integer argument, accepting integral floats and numeric strings
    pub fn i64_arg(&self, key: &str) -> Option<i64> {
        match self.arguments.get(key)? {
            serde_json::Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            }),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Call ID (if provided in request)
    pub id: Option<String>,

    /// Whether execution succeeded
    pub success: bool,

    /// Output (success message or error)
    pub output: String,

    /// Structured data (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: true,
            output: output.into(),
            data: None,
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: false,
            output: error.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, integer, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Default value if not provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Enum of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

impl ParameterSchema {
    /// Required parameter with no default
    pub fn required(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            required: true,
            default: None,
            enum_values: None,
        }
    }

    /// Make the parameter optional, falling back to `value`
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    /// Restrict the parameter to a fixed set of values
    pub fn with_enum(mut self, values: Vec<serde_json::Value>) -> Self {
        self.enum_values = Some(values);
        self
    }
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,

    /// Category for grouping
    #[serde(default)]
    pub category: Option<String>,

    /// Whether tool has side effects
    #[serde(default)]
    pub has_side_effects: bool,
}

impl ToolSchema {
    /// Render the parameters as a JSON Schema object, the shape function-calling
    /// APIs expect under `parameters`.
    pub fn to_json_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut prop = serde_json::Map::new();
            prop.insert("type".into(), param.param_type.clone().into());
            prop.insert("description".into(), param.description.clone().into());
            if let Some(default) = &param.default {
                prop.insert("default".into(), default.clone());
            }
            if let Some(values) = &param.enum_values {
                prop.insert("enum".into(), serde_json::Value::Array(values.clone()));
            }
            properties.insert(param.name.clone(), serde_json::Value::Object(prop));

            if param.required {
                required.push(serde_json::Value::String(param.name.clone()));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult>;

    /// Validate arguments before execution (optional)
    fn validate(&self, call: &ToolCall) -> Result<()> {
        let schema = self.schema();

        for param in &schema.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(AgentError::ToolValidation(format!(
                    "Missing required parameter: {}",
                    param.name
                )));
            }
        }

        Ok(())
    }
}

/// Boxed async handler backing a closure-registered tool
pub type ToolHandler = Arc<dyn Fn(ToolCall) -> BoxFuture<'static, Result<ToolResult>> + Send + Sync>;

/// Tool built from a schema and an async closure
pub struct FnTool {
    schema: ToolSchema,
    handler: ToolHandler,
}

impl FnTool {
    pub fn new<F, Fut>(schema: ToolSchema, handler: F) -> Self
    where
        F: Fn(ToolCall) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolResult>> + Send + 'static,
    {
        Self {
            schema,
            handler: Arc::new(move |call: ToolCall| -> BoxFuture<'static, Result<ToolResult>> {
                Box::pin(handler(call))
            }),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn schema(&self) -> ToolSchema {
        self.schema.clone()
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        (self.handler)(call.clone()).await
    }
}

/// Registry for available tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub const fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_boxed(Arc::new(tool));
    }

    /// Register a boxed tool
    pub fn register_boxed(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        if self.tools.insert(schema.name.clone(), tool).is_some() {
            tracing::warn!(tool = %schema.name, "Tool re-registered, previous definition replaced");
        }
    }

    /// Register an async closure under the given schema
    pub fn register_fn<F, Fut>(&mut self, schema: ToolSchema, handler: F)
    where
        F: Fn(ToolCall) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolResult>> + Send + 'static,
    {
        self.register(FnTool::new(schema, handler));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Execute a tool call
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;

        tool.validate(call)?;

        tracing::debug!(tool = %call.name, "Executing tool");
        let result = tool.execute(call).await?;
        Ok(match (&result.id, &call.id) {
            (None, Some(id)) => result.with_id(id.clone()),
            _ => result,
        })
    }

    /// Get all tool schemas, ordered by name
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// ============================================================================
// Built-in Tools
// ============================================================================

fn operand_schema() -> Vec<ParameterSchema> {
    vec![
        ParameterSchema::required("a", "number", "First operand"),
        ParameterSchema::required("b", "number", "Second operand"),
    ]
}

fn operands(call: &ToolCall) -> Result<(f64, f64)> {
    let a = call
        .f64_arg("a")
        .ok_or_else(|| AgentError::ToolValidation("'a' must be a number".into()))?;
    let b = call
        .f64_arg("b")
        .ok_or_else(|| AgentError::ToolValidation("'b' must be a number".into()))?;
    Ok((a, b))
}

/// Add tool - sums two numbers
pub struct AddTool;

#[async_trait]
impl Tool for AddTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "add".into(),
            description: "Add two numbers.".into(),
            parameters: operand_schema(),
            category: Some("math".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let (a, b) = operands(call)?;
        let sum = a + b;
        Ok(ToolResult::success("add", format!("{a} + {b} = {sum}")).with_data(serde_json::json!(sum)))
    }
}

/// Subtract tool - subtracts b from a
pub struct SubtractTool;

#[async_trait]
impl Tool for SubtractTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "subtract".into(),
            description: "Subtract b from a.".into(),
            parameters: operand_schema(),
            category: Some("math".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let (a, b) = operands(call)?;
        let difference = a - b;
        Ok(ToolResult::success("subtract", format!("{a} - {b} = {difference}"))
            .with_data(serde_json::json!(difference)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_add_and_subtract() {
        let mut registry = ToolRegistry::new();
        registry.register(AddTool);
        registry.register(SubtractTool);

        let call = ToolCall::new("add").with_arg("a", json!(15)).with_arg("b", json!(5));
        let result = registry.execute(&call).await.unwrap();
        assert!(result.success);
        assert_eq!(result.data, Some(json!(20.0)));

        let call = ToolCall::new("subtract").with_arg("a", json!(15)).with_arg("b", json!("5"));
        let result = registry.execute(&call).await.unwrap();
        assert_eq!(result.data, Some(json!(10.0)));
        assert_eq!(result.output, "15 - 5 = 10");
    }

    #[tokio::test]
    async fn test_missing_parameter_fails_validation() {
        let mut registry = ToolRegistry::new();
        registry.register(AddTool);

        let call = ToolCall::new("add").with_arg("a", json!(1));
        let err = registry.execute(&call).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolValidation(_)));
    }

    #[tokio::test]
    async fn test_non_numeric_operand() {
        let call = ToolCall::new("add").with_arg("a", json!("one")).with_arg("b", json!(2));
        let err = AddTool.execute(&call).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolValidation(_)));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.execute(&ToolCall::new("nope")).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolNotFound(name) if name == "nope"));
    }

    #[tokio::test]
    async fn test_register_fn_and_call_id() {
        let mut registry = ToolRegistry::new();
        registry.register_fn(
            ToolSchema {
                name: "echo".into(),
                description: "Echo the input".into(),
                parameters: vec![ParameterSchema::required("text", "string", "Text to echo")],
                category: None,
                has_side_effects: false,
            },
            |call: ToolCall| async move {
                let text = call.str_arg("text").unwrap_or_default().to_string();
                Ok::<_, AgentError>(ToolResult::success("echo", text))
            },
        );

        let mut call = ToolCall::new("echo").with_arg("text", json!("hi"));
        call.id = Some("call-1".into());
        let result = registry.execute(&call).await.unwrap();
        assert_eq!(result.output, "hi");
        assert_eq!(result.id.as_deref(), Some("call-1"));
        assert_eq!(registry.names(), vec!["echo"]);
    }

    #[test]
    fn test_json_schema_rendering() {
        let schema = AddTool.schema().to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["a"]["type"], "number");
        assert_eq!(schema["required"], json!(["a", "b"]));
    }

    #[test]
    fn test_json_schema_default_and_enum() {
        let schema = ToolSchema {
            name: "quote".into(),
            description: "Quote a price".into(),
            parameters: vec![
                ParameterSchema::required("coin", "string", "Coin name"),
                ParameterSchema::required("currency", "string", "Quote currency")
                    .with_default(json!("USD"))
                    .with_enum(vec![json!("USD"), json!("EUR")]),
            ],
            category: None,
            has_side_effects: false,
        }
        .to_json_schema();

        assert_eq!(schema["properties"]["currency"]["default"], "USD");
        assert_eq!(schema["properties"]["currency"]["enum"], json!(["USD", "EUR"]));
        assert!(schema["properties"]["coin"].get("default").is_none());
        assert_eq!(schema["required"], json!(["coin"]));
    }

    #[tokio::test]
    async fn test_tool_supplied_id_is_kept() {
        let mut registry = ToolRegistry::new();
        registry.register_fn(
            ToolSchema {
                name: "tagged".into(),
                description: "Returns its own id".into(),
                parameters: Vec::new(),
                category: None,
                has_side_effects: false,
            },
            |_call: ToolCall| async move {
                Ok::<_, AgentError>(ToolResult::success("tagged", "ok").with_id("inner"))
            },
        );

        let mut call = ToolCall::new("tagged");
        call.id = Some("outer".into());
        let result = registry.execute(&call).await.unwrap();
        assert_eq!(result.id.as_deref(), Some("inner"));
    }

    #[test]
    fn test_tool_call_accepts_tool_alias() {
        let call: ToolCall =
            serde_json::from_str(r#"{"tool": "add", "arguments": {"a": 1, "b": 2}}"#).unwrap();
        assert_eq!(call.name, "add");
        assert_eq!(call.i64_arg("a"), Some(1));
    }

    #[test]
    fn test_integer_argument_coercion() {
        let call = ToolCall::new("x")
            .with_arg("whole", json!(7.0))
            .with_arg("frac", json!(7.5))
            .with_arg("text", json!(" 30 "));
        assert_eq!(call.i64_arg("whole"), Some(7));
        assert_eq!(call.i64_arg("frac"), None);
        assert_eq!(call.i64_arg("text"), Some(30));
        assert_eq!(call.i64_arg("missing"), None);
    }
}
