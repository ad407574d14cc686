//! The tree walker: classifies each node into a rendering rule and applies it.

use crate::error::{ConvertError, Result};
use crate::parser::{Document, DocumentNode, Element, MemberId, MemberKind, CONSTRUCTOR_MARKER};
use crate::renderer::components::collapse_whitespace;
use crate::renderer::registry::SemanticKey;
use crate::renderer::traits::{Render, RenderContext, UnexpectedTagAction};

/// Sentinel `cref` prefix of a link to an anchor on the same page.
const ANCHOR_PREFIX: &str = "!:#";

/// Kind of the last visible member seen among a run of siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    kind: MemberKind,
    constructor: bool,
}

impl Run {
    /// Kind of a member identifier. A malformed identifier still counts when
    /// its `K:` prefix is readable.
    fn of(raw: &str) -> Option<Self> {
        match MemberId::parse(raw) {
            Some(id) => Some(Run {
                kind: id.kind,
                constructor: id.is_constructor(),
            }),
            None => MemberKind::from_prefix(raw).map(|kind| Run {
                kind,
                constructor: raw.contains(CONSTRUCTOR_MARKER),
            }),
        }
    }
}

/// What the walker knows about the siblings preceding a node.
#[derive(Debug, Clone, Copy, Default)]
struct Siblings<'a> {
    parent: Option<&'a Element>,
    /// Name of the previous sibling element, visible or not
    previous: Option<&'a str>,
    last_member: Option<Run>,
}

impl<'a> Siblings<'a> {
    fn under(parent: &'a Element) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    fn advance(self, element: &'a Element, context: &RenderContext<'a>) -> Self {
        let visible = element.attr("name").and_then(|raw| match MemberId::parse(raw) {
            Some(id) if !is_visible(&id, context) => None,
            _ => Run::of(raw),
        });
        let last_member = visible.or(self.last_member);
        Self {
            parent: self.parent,
            previous: Some(element.name.as_str()),
            last_member,
        }
    }
}

/// Render all children of `parent` in order.
pub fn render_children<'a>(parent: &'a Element, context: &RenderContext<'a>) -> Result<String> {
    render_sequence(Siblings::under(parent), parent.children.iter(), context)
}

/// Render only the `member` elements under `members`; the text between
/// them is layout.
pub fn render_members<'a>(members: &'a Element, context: &RenderContext<'a>) -> Result<String> {
    let nodes = members
        .children
        .iter()
        .filter(|node| matches!(node, DocumentNode::Element(el) if el.name == "member"));
    render_sequence(Siblings::under(members), nodes, context)
}

fn render_sequence<'a>(
    start: Siblings<'a>,
    nodes: impl IntoIterator<Item = &'a DocumentNode>,
    context: &RenderContext<'a>,
) -> Result<String> {
    let (output, _) = nodes.into_iter().try_fold(
        (String::new(), start),
        |(mut output, siblings), node| -> Result<_> {
            match node {
                DocumentNode::Text(text) => {
                    output.push_str(&collapse_whitespace(text));
                    Ok((output, siblings))
                }
                DocumentNode::Element(element) => {
                    output.push_str(&render_element(element, &siblings, context)?);
                    Ok((output, siblings.advance(element, context)))
                }
            }
        },
    )?;
    Ok(output)
}

fn render_element<'a>(
    element: &'a Element,
    siblings: &Siblings<'a>,
    context: &RenderContext<'a>,
) -> Result<String> {
    if element.name == "member" {
        if let Some(id) = element.attr("name").and_then(MemberId::parse) {
            if !is_visible(&id, context) {
                return Ok(String::new());
            }
        }
    }

    let Some(key) = semantic_key(element, siblings, context) else {
        return unexpected(element, context);
    };

    let rule = key.rule();
    if key.is_member() {
        rule.apply(element, &context.with_member(element))
    } else {
        rule.apply(element, context)
    }
}

/// Constructors are always documented; everything else asks the resolver.
fn is_visible(id: &MemberId, context: &RenderContext<'_>) -> bool {
    id.is_constructor() || context.resolver.is_public(id)
}

fn semantic_key(
    element: &Element,
    siblings: &Siblings<'_>,
    context: &RenderContext<'_>,
) -> Option<SemanticKey> {
    let previous = siblings.previous;
    let key = match element.name.as_str() {
        "member" => return Some(member_key(element, siblings.last_member)),
        "see" => match element.attr("cref") {
            Some(cref) if cref.starts_with(ANCHOR_PREFIX) => SemanticKey::SeeAnchor,
            Some(_) => SemanticKey::SeePage,
            None if element.attr("langword").is_some() => SemanticKey::SeeLangword,
            None => SemanticKey::SeePage,
        },
        "param" if previous != Some("param") => SemanticKey::FirstParam,
        "typeparam" if previous != Some("typeparam") => SemanticKey::FirstTypeParam,
        "seealso" if previous != Some("seealso") => SemanticKey::FirstSeeAlso,
        "summary" if owner_kind(siblings, context) == Some(MemberKind::Field) => {
            SemanticKey::FieldSummary
        }
        "remarks" if element.text_content().is_empty() => SemanticKey::NameRemarks,
        name => SemanticKey::parse(name)?,
    };
    Some(key)
}

// Kind of the member a node belongs to: its parent when the walker knows it,
// the member being rendered otherwise.
fn owner_kind(siblings: &Siblings<'_>, context: &RenderContext<'_>) -> Option<MemberKind> {
    siblings
        .parent
        .or(context.member)
        .and_then(|owner| owner.attr("name"))
        .and_then(MemberKind::from_prefix)
}

// Malformed identifiers render under their prefix's kind with the raw
// string as display name. An unknown `K:` letter renders nothing; no prefix
// at all gives a type section.
fn member_key(element: &Element, last: Option<Run>) -> SemanticKey {
    let Some(raw) = element.attr("name") else {
        return SemanticKey::None;
    };
    let Some(current) = Run::of(raw) else {
        return if raw.chars().nth(1) == Some(':') {
            SemanticKey::None
        } else {
            SemanticKey::Type
        };
    };

    let starts_run = |same_run: fn(Run) -> bool| !last.is_some_and(same_run);

    match current.kind {
        MemberKind::Type => SemanticKey::Type,
        MemberKind::Method if current.constructor => {
            if starts_run(|run| run.constructor) {
                SemanticKey::FirstConstructor
            } else {
                SemanticKey::Constructor
            }
        }
        MemberKind::Method => {
            if starts_run(|run| run.kind == MemberKind::Method && !run.constructor) {
                SemanticKey::FirstMethod
            } else {
                SemanticKey::Method
            }
        }
        MemberKind::Property => {
            if starts_run(|run| run.kind == MemberKind::Property) {
                SemanticKey::FirstProperty
            } else {
                SemanticKey::Property
            }
        }
        MemberKind::Field => {
            if starts_run(|run| run.kind == MemberKind::Field) {
                SemanticKey::FirstField
            } else {
                SemanticKey::Field
            }
        }
        MemberKind::Event => {
            if starts_run(|run| run.kind == MemberKind::Event) {
                SemanticKey::FirstEvent
            } else {
                SemanticKey::Event
            }
        }
        MemberKind::Namespace => SemanticKey::None,
    }
}

fn unexpected(element: &Element, context: &RenderContext<'_>) -> Result<String> {
    let error = ConvertError::UnrecognizedTag {
        tag: element.name.clone(),
        line: element.position.line,
        column: element.position.column,
    };

    match context.options.unexpected_tags {
        UnexpectedTagAction::Error => Err(error),
        UnexpectedTagAction::Warn => {
            context.warnings.warn(&error.to_string());
            Ok(String::new())
        }
        UnexpectedTagAction::Accept => Ok(String::new()),
    }
}

impl Render for Element {
    fn render<'a>(&'a self, context: &RenderContext<'a>) -> Result<String> {
        render_element(self, &Siblings::default(), context)
    }
}

impl Render for DocumentNode {
    fn render<'a>(&'a self, context: &RenderContext<'a>) -> Result<String> {
        match self {
            DocumentNode::Element(element) => element.render(context),
            DocumentNode::Text(text) => Ok(collapse_whitespace(text)),
        }
    }
}

impl Render for [DocumentNode] {
    fn render<'a>(&'a self, context: &RenderContext<'a>) -> Result<String> {
        render_sequence(Siblings::default(), self, context)
    }
}

impl Render for Document {
    fn render<'a>(&'a self, context: &RenderContext<'a>) -> Result<String> {
        self.root.render(context)
    }
}
