use tracing::debug;

use crate::error::Result;
use crate::parser::Document;
use crate::renderer::components::remove_redundant_line_breaks;
use crate::renderer::traits::*;
use crate::resolver::TypeResolver;

/// Converts one parsed documentation file into Markdown.
pub struct MarkdownRenderer<'r> {
    options: ConvertOptions,
    resolver: &'r dyn TypeResolver,
    warnings: &'r dyn WarningSink,
}

impl<'r> MarkdownRenderer<'r> {
    pub fn new(
        options: ConvertOptions,
        resolver: &'r dyn TypeResolver,
        warnings: &'r dyn WarningSink,
    ) -> Self {
        Self {
            options,
            resolver,
            warnings,
        }
    }

    pub fn render(&self, document: &Document) -> Result<String> {
        let members = MemberIndex::new(document);
        let context = RenderContext::new(self.options, self.resolver, self.warnings, &members);

        debug!(
            assembly = document.assembly_name().as_deref().unwrap_or("<unnamed>"),
            mode = ?self.options.mode,
            "rendering document"
        );

        let markdown = document.render(&context)?;
        Ok(remove_redundant_line_breaks(&markdown))
    }
}
