//! # xmldocmd
//!
//! Renders compiler-generated XML API documentation (the `<doc>` files
//! produced next to .NET assemblies) as Markdown.
//!
//! ```no_run
//! use xmldocmd::{xml_to_markdown, ConvertOptions};
//!
//! let xml = std::fs::read_to_string("Acme.Widgets.xml").unwrap();
//! let markdown = xml_to_markdown(&xml, ConvertOptions::default()).unwrap();
//! println!("{}", markdown);
//! ```

pub mod error;
pub mod parser;
pub mod preprocess;
pub mod renderer;
pub mod resolver;
pub mod settings;

pub use error::{ConvertError, Result};
pub use parser::{parse_document, Document, DocumentNode, Element, MemberId, MemberKind};
pub use renderer::{
    CollectedWarnings, ConvertOptions, MarkdownRenderer, PresentationMode, TracingWarnings,
    UnexpectedTagAction, WarningSink,
};
pub use resolver::{MetadataTable, OpenResolver, TypeDescriptor, TypeResolver};
pub use settings::Settings;

/// Appended by the command line tool to every generated file.
pub const FOOTER: &str = "\n\n---\n\nGenerated by xmldocmd";

/// Parse and render one documentation file.
pub fn convert(
    xml: &str,
    options: ConvertOptions,
    resolver: &dyn TypeResolver,
    warnings: &dyn WarningSink,
) -> Result<String> {
    let document = parse_document(xml)?;
    MarkdownRenderer::new(options, resolver, warnings).render(&document)
}

/// Render a documentation file without type metadata, logging warnings
/// through `tracing`.
pub fn xml_to_markdown(xml: &str, options: ConvertOptions) -> Result<String> {
    convert(xml, options, &OpenResolver, &TracingWarnings)
}

#[cfg(test)]
mod tests;
