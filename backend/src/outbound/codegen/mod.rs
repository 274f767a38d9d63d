//! Handler code generator adapters.

mod template_handler_generator;

pub use template_handler_generator::TemplateHandlerGenerator;
