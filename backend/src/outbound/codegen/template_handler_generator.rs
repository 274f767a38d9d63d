//! Local handler generator rendering a TypeScript skeleton.
//!
//! The skeleton switches on the distinct `type` fields found in the selected
//! JSON bodies. Output is deterministic: cases are sorted and string literals
//! are JSON-escaped.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::Webhook;
use crate::domain::ports::{GeneratedHandler, HandlerCodeGenerator, HandlerGeneratorError};

/// Renders handler code without calling out to any service.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateHandlerGenerator;

impl TemplateHandlerGenerator {
    /// Create the generator.
    pub const fn new() -> Self {
        Self
    }

    fn render(webhooks: &[Webhook]) -> Result<String, HandlerGeneratorError> {
        let event_types = event_types(webhooks);
        let mut code = String::new();
        let write_error = |err: std::fmt::Error| HandlerGeneratorError::failed(err.to_string());

        writeln!(
            code,
            "// Generated from {} captured webhook(s).",
            webhooks.len()
        )
        .map_err(write_error)?;
        code.push_str("export async function handleWebhook(request: Request): Promise<Response> {\n");
        code.push_str("  const event = await request.json();\n\n");
        code.push_str("  switch (event.type) {\n");
        for event_type in &event_types {
            let literal = serde_json::to_string(event_type)
                .map_err(|err| HandlerGeneratorError::failed(err.to_string()))?;
            writeln!(code, "    case {literal}: {{").map_err(write_error)?;
            writeln!(code, "      // Handle {event_type} here.").map_err(write_error)?;
            code.push_str("      break;\n");
            code.push_str("    }\n");
        }
        code.push_str("    default:\n");
        code.push_str("      console.warn(`Unhandled event type: ${event.type}`);\n");
        code.push_str("  }\n\n");
        code.push_str("  return new Response(null, { status: 200 });\n");
        code.push_str("}\n");
        Ok(code)
    }
}

/// Distinct string `type` fields of the JSON bodies, sorted.
fn event_types(webhooks: &[Webhook]) -> BTreeSet<String> {
    webhooks
        .iter()
        .filter_map(|webhook| webhook.body.as_deref())
        .filter_map(|body| serde_json::from_str::<Value>(body).ok())
        .filter_map(|value| match value.get("type") {
            Some(Value::String(kind)) => Some(kind.clone()),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl HandlerCodeGenerator for TemplateHandlerGenerator {
    async fn generate(
        &self,
        webhooks: &[Webhook],
    ) -> Result<GeneratedHandler, HandlerGeneratorError> {
        if webhooks.is_empty() {
            return Err(HandlerGeneratorError::failed("no webhooks selected"));
        }
        let code = Self::render(webhooks)?;
        debug!(
            webhooks = webhooks.len(),
            bytes = code.len(),
            "rendered handler template"
        );
        Ok(GeneratedHandler { code })
    }
}
