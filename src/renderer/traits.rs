use std::cell::RefCell;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::Result;
use crate::parser::{Document, Element};
use crate::resolver::TypeResolver;

/// How to treat element names without a rendering rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnexpectedTagAction {
    /// Abort the conversion, reporting the tag and its position
    #[default]
    Error,
    /// Log through the warning sink and render nothing
    Warn,
    /// Render nothing
    Accept,
}

impl FromStr for UnexpectedTagAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(UnexpectedTagAction::Error),
            "warn" => Ok(UnexpectedTagAction::Warn),
            "accept" => Ok(UnexpectedTagAction::Accept),
            other => Err(format!("unknown unexpected-tag action '{}'", other)),
        }
    }
}

/// Link rendering for cross-references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationMode {
    /// One page per assembly, links of the form `../Assembly/#anchor`
    #[default]
    SameSite,
    /// Everything on one page, links are bare `#anchor`s
    SinglePage,
}

/// Receives non-fatal conversion warnings.
pub trait WarningSink {
    fn warn(&self, message: &str);
}

/// Forwards warnings to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarnings;

impl WarningSink for TracingWarnings {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Keeps warnings in memory.
#[derive(Debug, Default)]
pub struct CollectedWarnings {
    messages: RefCell<Vec<String>>,
}

impl CollectedWarnings {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl WarningSink for CollectedWarnings {
    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Per-document settings for a conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub unexpected_tags: UnexpectedTagAction,
    pub mode: PresentationMode,
}

/// `member` elements of one document, keyed by their raw identifier.
#[derive(Debug, Default)]
pub struct MemberIndex<'a> {
    by_id: HashMap<&'a str, &'a Element>,
}

impl<'a> MemberIndex<'a> {
    pub fn new(document: &'a Document) -> Self {
        let by_id = document
            .members()
            .filter_map(|member| member.attr("name").map(|name| (name, member)))
            .collect();
        Self { by_id }
    }

    pub fn get(&self, identifier: &str) -> Option<&'a Element> {
        self.by_id.get(identifier).copied()
    }
}

/// State threaded through one document conversion.
///
/// Derived copies (`with_assembly_name`, `with_member`) carry changes down a
/// branch of the walk without leaking them to siblings.
#[derive(Clone)]
pub struct RenderContext<'a> {
    pub assembly_name: String,
    pub options: ConvertOptions,
    pub resolver: &'a dyn TypeResolver,
    pub warnings: &'a dyn WarningSink,
    pub members: &'a MemberIndex<'a>,
    /// The `member` element currently being rendered, if any
    pub member: Option<&'a Element>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        options: ConvertOptions,
        resolver: &'a dyn TypeResolver,
        warnings: &'a dyn WarningSink,
        members: &'a MemberIndex<'a>,
    ) -> Self {
        Self {
            assembly_name: String::new(),
            options,
            resolver,
            warnings,
            members,
            member: None,
        }
    }

    pub fn with_assembly_name(&self, assembly_name: &str) -> Self {
        Self {
            assembly_name: assembly_name.to_string(),
            ..self.clone()
        }
    }

    pub fn with_member(&self, member: &'a Element) -> Self {
        Self {
            member: Some(member),
            ..self.clone()
        }
    }

    pub fn single_page(&self) -> bool {
        self.options.mode == PresentationMode::SinglePage
    }
}

/// Core rendering trait for documentation nodes
pub trait Render {
    fn render<'a>(&'a self, context: &RenderContext<'a>) -> Result<String>;
}
