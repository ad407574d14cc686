//! Tree preparation before rendering.
//!
//! The walker treats the tree as read-only; everything that reshapes a
//! document happens here, on the owned tree, in a fixed order.

use tracing::debug;

use crate::parser::{Document, DocumentNode, Element, MemberKind};

/// Marker class whose documentation describes the assembly itself.
pub const ASSEMBLY_DOC_MARKER: &str = "AssemblyDoc";

/// Apply every preparation step: assembly docs, namespace removal, returns.
pub fn prepare(document: &mut Document, namespaces_to_remove: &[String]) {
    merge_assembly_doc(document);
    remove_namespaces(document, namespaces_to_remove);
    add_missing_returns(document);
}

/// Move the content of `AssemblyDoc` members into the `assembly` element
/// and drop the members.
pub fn merge_assembly_doc(document: &mut Document) {
    let Some(members) = members_mut(&mut document.root) else {
        return;
    };

    let mut moved = Vec::new();
    members.children.retain_mut(|node| {
        let DocumentNode::Element(member) = node else {
            return true;
        };
        if !is_member_named(member, |name| name.contains(ASSEMBLY_DOC_MARKER)) {
            return true;
        }
        moved.append(&mut member.children);
        false
    });

    if moved.is_empty() {
        return;
    }
    debug!(nodes = moved.len(), "merging assembly documentation");

    if let Some(assembly) = child_mut(&mut document.root, "assembly") {
        assembly.children.extend(moved);
    }
}

/// Remove members whose identifier contains any of the given namespaces.
pub fn remove_namespaces(document: &mut Document, namespaces: &[String]) {
    if namespaces.is_empty() {
        return;
    }
    let Some(members) = members_mut(&mut document.root) else {
        return;
    };

    let before = members.children.len();
    members.children.retain(|node| match node {
        DocumentNode::Element(member) => !is_member_named(member, |name| {
            namespaces.iter().any(|ns| name.contains(ns.as_str()))
        }),
        DocumentNode::Text(_) => true,
    });
    debug!(removed = before - members.children.len(), "removed members by namespace");
}

/// Give every method without a `returns` element an empty one.
pub fn add_missing_returns(document: &mut Document) {
    let Some(members) = members_mut(&mut document.root) else {
        return;
    };

    for node in &mut members.children {
        let DocumentNode::Element(member) = node else {
            continue;
        };
        let is_method = is_member_named(member, |name| {
            MemberKind::from_prefix(name) == Some(MemberKind::Method)
        });
        if is_method && member.child("returns").is_none() {
            let mut returns = Element::new("returns");
            returns.position = member.position;
            member.children.push(DocumentNode::Element(returns));
        }
    }
}

fn is_member_named(element: &Element, predicate: impl Fn(&str) -> bool) -> bool {
    element.name == "member" && element.attr("name").is_some_and(predicate)
}

fn members_mut(root: &mut Element) -> Option<&mut Element> {
    child_mut(root, "members")
}

fn child_mut<'a>(parent: &'a mut Element, name: &str) -> Option<&'a mut Element> {
    parent.children.iter_mut().find_map(|node| match node {
        DocumentNode::Element(el) if el.name == name => Some(el),
        _ => None,
    })
}
