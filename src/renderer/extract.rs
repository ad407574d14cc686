//! Value extractors for the rendering rules.
//!
//! Each extractor returns the positional values for its rule's template.
//! Content is rendered by recursing into the walker; the walker never visits
//! children on its own.

use crate::error::Result;
use crate::parser::{Element, MemberId, MemberKind};
use crate::renderer::components::{
    capitalize, collapse_whitespace, remove_redundant_line_breaks, to_code_block,
};
use crate::renderer::links::{self, cross_reference as reference, page_anchor};
use crate::renderer::signature::{display_name, last_segment, simple_name, strip_arity, strip_namespace};
use crate::renderer::traits::{Render, RenderContext};
use crate::renderer::walker::{render_children, render_members};

/// `doc`: assembly name, rendered `assembly` element, rendered members.
pub fn document<'a>(element: &'a Element, context: &RenderContext<'a>) -> Result<Vec<String>> {
    let assembly = element.child("assembly");
    let name = assembly
        .and_then(|assembly| assembly.child("name"))
        .map(|name| name.text_content().trim().to_string())
        .unwrap_or_default();
    let context = context.with_assembly_name(&name);

    let header = match assembly {
        Some(assembly) => assembly.render(&context)?,
        None => String::new(),
    };
    let members = match element.child("members") {
        Some(members) => render_members(members, &context)?,
        None => String::new(),
    };

    Ok(vec![name, header, members])
}

/// Display name from the `name` attribute, then the rendered children.
pub fn name_and_body<'a>(element: &'a Element, context: &RenderContext<'a>) -> Result<Vec<String>> {
    Ok(vec![
        display_name(element, &context.assembly_name),
        render_children(element, context)?,
    ])
}

pub fn nothing<'a>(_element: &'a Element, _context: &RenderContext<'a>) -> Result<Vec<String>> {
    Ok(Vec::new())
}

pub fn content<'a>(element: &'a Element, context: &RenderContext<'a>) -> Result<Vec<String>> {
    Ok(vec![render_children(element, context)?])
}

/// Field and property table rows: name, description, type cell.
pub fn member_row<'a>(element: &'a Element, context: &RenderContext<'a>) -> Result<Vec<String>> {
    let raw = element.attr("name").unwrap_or_default();
    let id = MemberId::parse(raw);

    let name = display_name(element, &context.assembly_name);
    let mut body = render_children(element, context)?;
    if id.as_ref().is_some_and(|id| id.kind != MemberKind::Field) {
        // Property descriptions sit in a table cell
        body = remove_redundant_line_breaks(body.trim_end());
    }

    let cell = match &id {
        Some(id) => match context
            .resolver
            .resolve_type(id.declaring_type(), id.kind, &id.member_signature())
        {
            Some(ty) => links::type_cell(&ty, context),
            None => id.kind.letter().to_string(),
        },
        None => raw.split(':').next().unwrap_or_default().to_string(),
    };

    Ok(vec![name, body, cell])
}

/// `nameremarks`: the enclosing member's bare name.
pub fn member_simple_name<'a>(
    _element: &'a Element,
    context: &RenderContext<'a>,
) -> Result<Vec<String>> {
    let name = context
        .member
        .and_then(|member| member.attr("name"))
        .map(simple_name)
        .unwrap_or_default();
    Ok(vec![name])
}

pub fn code<'a>(element: &'a Element, _context: &RenderContext<'a>) -> Result<Vec<String>> {
    let lang = element.attr("lang").unwrap_or("cs").to_string();
    Ok(vec![lang, to_code_block(&element.text_content())])
}

/// `see`, `seealso` and `exception`: link text and target for the `cref`.
pub fn cross_reference<'a>(element: &'a Element, context: &RenderContext<'a>) -> Result<Vec<String>> {
    match element.attr("cref") {
        Some(cref) => Ok(reference(cref, context).into_values()),
        None => Ok(vec![inline_text(element)]),
    }
}

/// `see` pointing at an anchor of the current page.
pub fn anchor<'a>(element: &'a Element, _context: &RenderContext<'a>) -> Result<Vec<String>> {
    let target = element.attr("cref").and_then(page_anchor).unwrap_or_default();
    let text = inline_text(element);
    let text = if text.is_empty() { target.to_string() } else { text };
    Ok(vec![text, format!("#{}", target)])
}

/// `see langword="null"`
pub fn keyword<'a>(element: &'a Element, _context: &RenderContext<'a>) -> Result<Vec<String>> {
    let word = match element.attr("langword") {
        Some(word) => word.to_string(),
        None => inline_text(element),
    };
    Ok(vec![word])
}

/// `param` and `paramref`: the name, then the description or, when there
/// is none, the capitalized name.
pub fn parameter<'a>(element: &'a Element, context: &RenderContext<'a>) -> Result<Vec<String>> {
    let name = strip_namespace(element.attr("name").unwrap_or_default(), &context.assembly_name)
        .to_string();
    let mut body = render_children(element, context)?;
    if body.trim().is_empty() {
        body = capitalize(&name);
    }
    Ok(vec![name, body])
}

/// `returns`: the declared return type of the enclosing method, or the
/// element's text when the type cannot be resolved.
pub fn return_type<'a>(element: &'a Element, context: &RenderContext<'a>) -> Result<Vec<String>> {
    let fallback = || inline_text(element);

    let Some(id) = context
        .member
        .and_then(|member| member.attr("name"))
        .and_then(MemberId::parse)
    else {
        return Ok(vec![fallback()]);
    };

    if id.is_constructor() {
        let type_name = strip_arity(last_segment(id.declaring_type()));
        return Ok(vec![type_name]);
    }

    let name = match context
        .resolver
        .resolve_type(id.declaring_type(), id.kind, &id.member_signature())
    {
        Some(ty) => {
            let suffix = if ty.is_array() { "[]" } else { "" };
            let name = links::keyword(&ty).unwrap_or(ty.simple_name());
            format!("{}{}", name, suffix)
        }
        None => fallback(),
    };
    Ok(vec![name])
}

/// `list`: a bold caption when the list is named, then its items.
pub fn list<'a>(element: &'a Element, context: &RenderContext<'a>) -> Result<Vec<String>> {
    let mut values = name_and_body(element, context)?;
    if !values[0].trim().is_empty() {
        values[0] = format!("\n\n**{}:**", values[0]);
    }
    Ok(values)
}

pub fn description<'a>(element: &'a Element, context: &RenderContext<'a>) -> Result<Vec<String>> {
    let mut values = name_and_body(element, context)?;
    if !values[0].trim().is_empty() {
        values[0] = format!("**{}:**", values[0]);
    }
    Ok(values)
}

/// `a href`: link text and target.
pub fn hyperlink<'a>(element: &'a Element, _context: &RenderContext<'a>) -> Result<Vec<String>> {
    let mut values = vec![inline_text(element)];
    if let Some(href) = element.attr("href") {
        values.push(href.to_string());
    }
    Ok(values)
}

fn inline_text(element: &Element) -> String {
    collapse_whitespace(&element.text_content()).trim().to_string()
}
