//! Tool trait, execution context and registry for JSON dispatch.

use std::collections::{BTreeMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

use futures::future::BoxFuture;
use schemars::{JsonSchema, Schema};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::fmt::TextFormat;

/// Context passed to tool executions.
#[derive(Clone, Default, Debug)]
pub struct ToolContext {
    cancel: CancellationToken,
}

impl ToolContext {
    /// Create a context with a fresh, never-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context bound to the caller's cancellation token.
    #[must_use]
    pub const fn with_cancellation(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// The cancellation token for this call.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether the caller has cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// A callable tool with typed input and output.
pub trait Tool: Send + Sync + 'static {
    /// Input type for the tool.
    type Input: Send + 'static;

    /// Output type for the tool.
    type Output: Send + 'static;

    /// Unique name identifying the tool.
    const NAME: &'static str;

    /// Human-readable description of what the tool does.
    const DESCRIPTION: &'static str;

    /// Execute the tool with the given input and context.
    fn call(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>>;
}

/// Result of [`ToolRegistry::dispatch_json_formatted`].
#[derive(Debug, Clone)]
pub struct FormattedResult {
    /// The JSON-serialized output data.
    pub data: Value,
    /// Human-readable text representation.
    pub text: String,
}

/// Type-erased tool for dynamic dispatch.
pub trait ErasedTool: Send + Sync {
    /// Get the tool's name.
    fn name(&self) -> &'static str;

    /// Get the tool's description.
    fn description(&self) -> &'static str;

    /// Get the input JSON schema.
    fn input_schema(&self) -> Schema;

    /// Get the output JSON schema.
    fn output_schema(&self) -> Schema;

    /// Call the tool with JSON arguments, returning JSON data and formatted text.
    fn call_json_formatted(
        &self,
        args: Value,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<FormattedResult, ToolError>>;
}

/// Registry of tools, keyed by name.
pub struct ToolRegistry {
    map: BTreeMap<String, Arc<dyn ErasedTool>>,
}

impl ToolRegistry {
    /// Create a new registry builder.
    #[must_use]
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// All tool names, sorted.
    #[must_use]
    pub fn list_names(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    /// Get a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ErasedTool>> {
        self.map.get(name)
    }

    /// Create a subset registry containing only the specified tools.
    ///
    /// Tools not found in the registry are silently ignored.
    #[must_use]
    pub fn subset<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let allowed: HashSet<&str> = names.into_iter().collect();
        let map = self
            .map
            .iter()
            .filter(|(k, _)| allowed.contains(k.as_str()))
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect();
        Self { map }
    }

    /// Dispatch a tool call using JSON arguments.
    pub async fn dispatch_json_formatted(
        &self,
        name: &str,
        args: Value,
        ctx: &ToolContext,
    ) -> Result<FormattedResult, ToolError> {
        let entry = self
            .map
            .get(name)
            .ok_or_else(|| ToolError::validation("name", format!("Unknown tool: {name}")))?;
        entry.call_json_formatted(args, ctx).await
    }

    /// Check if a tool is registered by name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Get the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Builder for constructing a [`ToolRegistry`].
#[derive(Default)]
pub struct ToolRegistryBuilder {
    items: Vec<Arc<dyn ErasedTool>>,
}

impl ToolRegistryBuilder {
    /// Register a tool whose input is deserializable and whose output is
    /// serializable and formattable.
    #[must_use]
    pub fn register<T>(mut self, tool: T) -> Self
    where
        T: Tool + Clone,
        T::Input: DeserializeOwned + JsonSchema,
        T::Output: Serialize + JsonSchema + TextFormat,
    {
        struct Impl<T: Tool> {
            tool: T,
            _marker: PhantomData<fn() -> T>,
        }

        impl<T> ErasedTool for Impl<T>
        where
            T: Tool + Clone,
            T::Input: DeserializeOwned + JsonSchema,
            T::Output: Serialize + JsonSchema + TextFormat,
        {
            fn name(&self) -> &'static str {
                T::NAME
            }

            fn description(&self) -> &'static str {
                T::DESCRIPTION
            }

            fn input_schema(&self) -> Schema {
                schemars::schema_for!(T::Input)
            }

            fn output_schema(&self) -> Schema {
                schemars::schema_for!(T::Output)
            }

            fn call_json_formatted(
                &self,
                args: Value,
                ctx: &ToolContext,
            ) -> BoxFuture<'static, Result<FormattedResult, ToolError>> {
                let input: T::Input = match serde_json::from_value(args) {
                    Ok(input) => input,
                    Err(e) => {
                        let err = decode_error(&e);
                        return Box::pin(async move { Err(err) });
                    }
                };
                let fut = self.tool.call(input, ctx);
                Box::pin(async move {
                    let out = fut.await?;
                    let text = out.fmt_text();
                    let data =
                        serde_json::to_value(&out).map_err(|e| ToolError::internal(e.to_string()))?;
                    Ok(FormattedResult { data, text })
                })
            }
        }

        self.items.push(Arc::new(Impl {
            tool,
            _marker: PhantomData,
        }));
        self
    }

    /// Build the registry from registered tools.
    #[must_use]
    pub fn finish(self) -> ToolRegistry {
        let map = self
            .items
            .into_iter()
            .map(|erased| (erased.name().to_string(), erased))
            .collect();
        ToolRegistry { map }
    }
}

/// Turn a serde decode failure into a field-level validation error.
fn decode_error(e: &serde_json::Error) -> ToolError {
    let msg = e.to_string();
    let field = msg
        .split('`')
        .nth(1)
        .filter(|_| msg.starts_with("missing field") || msg.starts_with("unknown field"))
        .unwrap_or("arguments");
    ToolError::validation(field, msg.clone())
}
