//! Display names for member identifiers.
//!
//! `M:Acme.Widget.Resize(System.Int32,System.String)` with `param` children
//! `width` and `label` becomes `Resize(int width, String label)`. The output
//! depends only on the identifier, the parameter names and the assembly name,
//! so generated anchors stay stable between runs.

use crate::parser::{split_params, Element, MemberId, MemberKind, CONSTRUCTOR_MARKER};

/// C# keyword for a well-known runtime type, looked up case-insensitively.
pub fn primitive_alias(type_name: &str) -> Option<&'static str> {
    let alias = match type_name.to_ascii_lowercase().as_str() {
        "string" => "string",
        "object" => "object",
        "int32" => "int",
        "int64" => "long",
        "boolean" => "bool",
        "decimal" => "decimal",
        "void" => "void",
        "double" => "double",
        "byte" => "byte",
        _ => return None,
    };
    Some(alias)
}

/// Drop generic arity markers (`` `1 ``, ``` ``2 ```) wherever they occur.
pub fn strip_arity(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '`' {
            while chars.next_if(|&next| next == '`').is_some() {}
            while chars.next_if(char::is_ascii_digit).is_some() {}
        } else {
            out.push(c);
        }
    }
    out
}

/// Final segment after the last namespace separator.
pub fn last_segment(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) => &name[dot + 1..],
        None => name,
    }
}

/// Remove the documented assembly's namespace and `System.` from a name.
pub fn strip_namespace<'a>(name: &'a str, assembly_name: &str) -> &'a str {
    let name = if assembly_name.is_empty() {
        name
    } else {
        name.strip_prefix(assembly_name)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(name)
    };
    name.strip_prefix("System.").unwrap_or(name)
}

/// Render one raw parameter type from an identifier's parameter list.
///
/// Value-type primitives get their keyword (`System.Int32` -> `int`);
/// reference types keep their type name (`System.String` -> `String`).
/// Generic arguments render as `List‹Item›`, `System.Nullable{T}` as `T?`.
pub fn parameter_type(raw: &str, assembly_name: &str) -> String {
    let raw = raw.trim();

    if let Some(inner) = raw.strip_suffix('@') {
        return format!("{}@", parameter_type(inner, assembly_name));
    }

    if raw.ends_with(']') {
        if let Some(open) = raw.rfind('[') {
            if !raw[open..].contains('}') {
                return format!("{}[]", parameter_type(&raw[..open], assembly_name));
            }
        }
    }

    if let Some(open) = raw.find('{') {
        if let Some(arguments) = raw[open + 1..].strip_suffix('}') {
            let generic = &raw[..open];
            let arguments: Vec<String> = split_params(arguments)
                .iter()
                .map(|argument| parameter_type(argument, assembly_name))
                .collect();

            if generic == "System.Nullable" && arguments.len() == 1 {
                return format!("{}?", arguments[0]);
            }
            return format!("{}‹{}›", last_segment(generic), arguments.join(", "));
        }
    }

    let simple = last_segment(strip_namespace(raw, assembly_name));
    match primitive_alias(simple) {
        Some(alias) if !matches!(alias, "string" | "object") => alias.to_string(),
        _ => simple.to_string(),
    }
}

/// `Type name, Type name` for the given raw types and parameter names.
/// Names without a matching type render alone.
pub fn format_parameters(types: &[String], names: &[&str], assembly_name: &str) -> String {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| match types.get(i) {
            Some(raw) => format!("{} {}", parameter_type(raw, assembly_name), name),
            None => name.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Names of the `param` children of a member element, in order.
pub fn parameter_names(element: &Element) -> Vec<&str> {
    element
        .children_named("param")
        .map(|param| param.attr("name").unwrap_or_default())
        .collect()
}

/// Display name of an element's `name` attribute.
///
/// For `member` elements the identifier is decoded: prefix stripped,
/// constructors named after their type, methods shortened to their own name
/// plus parameter list, properties and fields to their final segment.
/// Malformed identifiers pass through unchanged.
pub fn display_name(element: &Element, assembly_name: &str) -> String {
    let Some(raw) = element.attr("name") else {
        return String::new();
    };

    let Some(id) = MemberId::parse(raw) else {
        return raw.to_string();
    };

    let is_member = element.name == "member";
    let mut name = id.name.replace(&format!(".{}", CONSTRUCTOR_MARKER), "");
    if is_member && id.kind == MemberKind::Method {
        name = last_segment(&name).to_string();
    }
    name = strip_arity(&name);

    let names = parameter_names(element);
    if !names.is_empty() {
        let types = id.params.clone().unwrap_or_default();
        name = format!("{}({})", name, format_parameters(&types, &names, assembly_name));
    } else if is_member && id.kind == MemberKind::Method {
        name.push_str("()");
    }

    if is_member && matches!(id.kind, MemberKind::Property | MemberKind::Field) {
        name = property_segment(&name).to_string();
    }
    name
}

/// Bare member name without parameters: constructors give their type's name.
pub fn simple_name(raw: &str) -> String {
    match MemberId::parse(raw) {
        Some(id) if id.is_constructor() => strip_arity(last_segment(id.declaring_type())),
        Some(id) => strip_arity(id.member_name()),
        None => raw.to_string(),
    }
}

// Final segment of a property/field name whose indexer parameters may
// already be rendered; dots inside the parameter list are not separators.
fn property_segment(name: &str) -> &str {
    let head = name.find('(').map_or(name, |open| &name[..open]);
    match head.rfind('.') {
        Some(dot) => &name[dot + 1..],
        None => name,
    }
}
