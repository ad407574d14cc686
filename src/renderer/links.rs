//! Cross-reference links and type cells.
//!
//! Same-site mode links to the page of the owning assembly
//! (`../Acme/#widgetresizeint-width`), single-page mode to an anchor on the
//! current page.

use crate::parser::{MemberId, MemberKind};
use crate::renderer::components::slugify;
use crate::renderer::signature::{
    display_name, last_segment, parameter_type, primitive_alias, strip_arity, strip_namespace,
};
use crate::renderer::traits::RenderContext;
use crate::resolver::TypeDescriptor;

/// Prefix of `cref`s the compiler could not resolve.
const UNRESOLVED_PREFIX: &str = "!:";

/// A rendered cross-reference: link text and target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub display: String,
    pub target: String,
}

impl Reference {
    pub fn into_values(self) -> Vec<String> {
        vec![self.display, self.target]
    }
}

/// Build the link for a `cref` such as `M:Acme.Widget.Resize(System.Int32)`.
pub fn cross_reference(cref: &str, context: &RenderContext<'_>) -> Reference {
    let Some(id) = MemberId::parse(cref) else {
        let name = cref.strip_prefix(UNRESOLVED_PREFIX).unwrap_or(cref);
        let display = strip_arity(last_segment(name));
        let anchor = slugify(&display);
        return Reference {
            target: target(&context.assembly_name, &anchor, context),
            display,
        };
    };

    let display = reference_display(&id, context);

    let anchor = if id.kind == MemberKind::Method {
        slugify(&display)
    } else {
        let name = strip_arity(&id.name);
        let name = if context.single_page() {
            name.as_str()
        } else {
            strip_namespace(&name, &context.assembly_name)
        };
        name.replace('.', "").to_lowercase()
    };

    let assembly = reference_assembly(&id, context);
    Reference {
        target: target(&assembly, &anchor, context),
        display,
    }
}

// Methods documented in the same file reuse their `param` names; anything
// else shows its parameter types only.
fn reference_display(id: &MemberId, context: &RenderContext<'_>) -> String {
    if id.kind != MemberKind::Method {
        return strip_arity(id.member_name());
    }

    if let Some(member) = context.members.get(&id.raw) {
        return display_name(member, &context.assembly_name);
    }

    let name = if id.is_constructor() {
        last_segment(id.declaring_type())
    } else {
        id.member_name()
    };
    let params = id
        .params
        .iter()
        .flatten()
        .map(|raw| parameter_type(raw, &context.assembly_name))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}({})", strip_arity(name), params)
}

// Types outside the current assembly are assumed to live in an assembly
// named after their namespace.
fn reference_assembly(id: &MemberId, context: &RenderContext<'_>) -> String {
    let current = &context.assembly_name;
    if id.kind == MemberKind::Type && !current.is_empty() && !id.name.contains(current.as_str()) {
        let namespace = id.declaring_type();
        if !namespace.is_empty() {
            return namespace.to_string();
        }
    }
    current.clone()
}

fn target(assembly: &str, anchor: &str, context: &RenderContext<'_>) -> String {
    if context.single_page() {
        format!("#{}", anchor)
    } else {
        format!("../{}/#{}", assembly, anchor)
    }
}

/// Link for a `cref="!:#anchor"` pointing into the current page.
pub fn page_anchor(cref: &str) -> Option<&str> {
    cref.strip_prefix(UNRESOLVED_PREFIX)?.strip_prefix('#')
}

/// Markdown for the type column of a field/property table or a return type.
///
/// Primitives collapse to their keyword and generics render as plain text;
/// any other type links to its own section.
pub fn type_cell(ty: &TypeDescriptor, context: &RenderContext<'_>) -> String {
    let suffix = if ty.is_array() { "[]" } else { "" };

    if let Some(alias) = keyword(ty) {
        return format!("{}{}", alias, suffix);
    }

    if ty.is_generic() {
        let arguments = ty
            .type_arguments
            .iter()
            .map(|argument| keyword(argument).unwrap_or(argument.simple_name()))
            .collect::<Vec<_>>()
            .join(", ");
        return format!("{}‹{}›{}", ty.simple_name(), arguments, suffix);
    }

    let name = ty.simple_name();
    if context.single_page() {
        return format!("[{}](#{}){}", name, name.to_lowercase(), suffix);
    }

    let assembly = ty.assembly.as_deref().unwrap_or(&context.assembly_name);
    let anchor = strip_namespace(&ty.full_name(), assembly)
        .replace('.', "")
        .to_lowercase();
    format!("[{}](../{}/#{}){}", name, assembly, anchor, suffix)
}

/// C# keyword of a `System` primitive.
pub fn keyword(ty: &TypeDescriptor) -> Option<&'static str> {
    if ty.namespace == "System" {
        primitive_alias(ty.simple_name())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_document, Document};
    use crate::renderer::traits::{
        CollectedWarnings, ConvertOptions, MemberIndex, PresentationMode,
    };
    use crate::resolver::OpenResolver;

    const XML: &str = r#"<doc>
        <assembly><name>Foo</name></assembly>
        <members>
            <member name="M:Foo.Bar.Baz(System.Int32,System.String)">
                <param name="x">first</param>
                <param name="y">second</param>
            </member>
        </members>
    </doc>"#;

    fn with_context<R>(mode: PresentationMode, f: impl FnOnce(&RenderContext<'_>) -> R) -> R {
        let document: Document = parse_document(XML).unwrap();
        let members = MemberIndex::new(&document);
        let warnings = CollectedWarnings::default();
        let options = ConvertOptions {
            mode,
            ..ConvertOptions::default()
        };
        let context =
            RenderContext::new(options, &OpenResolver, &warnings, &members).with_assembly_name("Foo");
        f(&context)
    }

    #[test]
    fn method_reference_uses_documented_parameter_names() {
        let reference = with_context(PresentationMode::SameSite, |ctx| {
            cross_reference("M:Foo.Bar.Baz(System.Int32,System.String)", ctx)
        });
        assert_eq!(reference.display, "Baz(int x, String y)");
        assert_eq!(reference.target, "../Foo/#bazint-x-string-y");
    }

    #[test]
    fn undocumented_method_reference_shows_types() {
        let reference = with_context(PresentationMode::SameSite, |ctx| {
            cross_reference("M:Foo.Bar.Spin(System.Double)", ctx)
        });
        assert_eq!(reference.display, "Spin(double)");
        assert_eq!(reference.target, "../Foo/#spindouble");
    }

    #[test]
    fn type_reference_targets() {
        let same_site = with_context(PresentationMode::SameSite, |ctx| {
            cross_reference("T:Foo.Models.Item", ctx)
        });
        assert_eq!(same_site.display, "Item");
        assert_eq!(same_site.target, "../Foo/#modelsitem");

        let single = with_context(PresentationMode::SinglePage, |ctx| {
            cross_reference("T:Foo.Models.Item", ctx)
        });
        assert_eq!(single.target, "#foomodelsitem");
    }

    #[test]
    fn external_type_infers_assembly_from_namespace() {
        let reference = with_context(PresentationMode::SameSite, |ctx| {
            cross_reference("T:Other.Lib.Thing", ctx)
        });
        assert_eq!(reference.display, "Thing");
        assert_eq!(reference.target, "../Other.Lib/#otherlibthing");
    }

    #[test]
    fn unresolved_reference_keeps_its_name() {
        let reference = with_context(PresentationMode::SinglePage, |ctx| {
            cross_reference("!:Missing.Thing", ctx)
        });
        assert_eq!(reference.display, "Thing");
        assert_eq!(reference.target, "#thing");
    }

    #[test]
    fn type_cells() {
        with_context(PresentationMode::SameSite, |ctx| {
            let int = TypeDescriptor::new("System", "Int32");
            assert_eq!(type_cell(&int, ctx), "int");

            let bytes = TypeDescriptor::new("System", "Byte[]");
            assert_eq!(type_cell(&bytes, ctx), "byte[]");

            let list = TypeDescriptor::new("System.Collections.Generic", "List`1")
                .with_arguments(vec![TypeDescriptor::new("Foo.Models", "Item")]);
            assert_eq!(type_cell(&list, ctx), "List‹Item›");

            let item = TypeDescriptor::new("Foo.Models", "Item").in_assembly("Foo");
            assert_eq!(type_cell(&item, ctx), "[Item](../Foo/#modelsitem)");
        });

        with_context(PresentationMode::SinglePage, |ctx| {
            let items = TypeDescriptor::new("Foo.Models", "Item[]");
            assert_eq!(type_cell(&items, ctx), "[Item](#item)[]");
        });
    }

    #[test]
    fn page_anchors() {
        assert_eq!(page_anchor("!:#installation"), Some("installation"));
        assert_eq!(page_anchor("T:Foo.Bar"), None);
    }
}
