//! The fixed table of rendering rules.
//!
//! Every recognized element kind maps to a format template with positional
//! placeholders (`{0}`, `{1}`, ...) and an extractor that produces the values
//! for those placeholders, recursing into the walker where content is needed.

use crate::error::Result;
use crate::parser::Element;
use crate::renderer::extract;
use crate::renderer::traits::RenderContext;

pub type Extractor = for<'a> fn(&'a Element, &RenderContext<'a>) -> Result<Vec<String>>;

#[derive(Clone, Copy)]
pub struct RenderRule {
    pub template: &'static str,
    pub extract: Extractor,
}

impl RenderRule {
    const fn new(template: &'static str, extract: Extractor) -> Self {
        Self { template, extract }
    }

    pub fn apply<'a>(&self, element: &'a Element, context: &RenderContext<'a>) -> Result<String> {
        let values = (self.extract)(element, context)?;
        Ok(fill(self.template, &values))
    }
}

/// Semantic rendering keys, derived from element names by the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticKey {
    Doc,
    Assembly,
    Name,
    None,
    Type,
    Field,
    FirstField,
    Property,
    FirstProperty,
    Method,
    FirstMethod,
    Constructor,
    FirstConstructor,
    Event,
    FirstEvent,
    Summary,
    FieldSummary,
    Value,
    NameRemarks,
    Remarks,
    Example,
    Para,
    Code,
    SeePage,
    SeeAnchor,
    SeeLangword,
    SeeAlso,
    FirstSeeAlso,
    TypeParam,
    FirstTypeParam,
    Param,
    FirstParam,
    ParamRef,
    TypeParamRef,
    Exception,
    Returns,
    C,
    List,
    Item,
    Description,
    B,
    Br,
    A,
    H1,
    H2,
    H3,
    H4,
}

impl SemanticKey {
    pub fn parse(tag: &str) -> Option<Self> {
        let key = match tag {
            "doc" => SemanticKey::Doc,
            "assembly" => SemanticKey::Assembly,
            "name" => SemanticKey::Name,
            "none" => SemanticKey::None,
            "type" => SemanticKey::Type,
            "field" => SemanticKey::Field,
            "firstfield" => SemanticKey::FirstField,
            "property" => SemanticKey::Property,
            "firstproperty" => SemanticKey::FirstProperty,
            "method" => SemanticKey::Method,
            "firstmethod" => SemanticKey::FirstMethod,
            "constructor" => SemanticKey::Constructor,
            "firstconstructor" => SemanticKey::FirstConstructor,
            "event" => SemanticKey::Event,
            "firstevent" => SemanticKey::FirstEvent,
            "summary" => SemanticKey::Summary,
            "fieldsummary" => SemanticKey::FieldSummary,
            "value" => SemanticKey::Value,
            "nameremarks" => SemanticKey::NameRemarks,
            "remarks" => SemanticKey::Remarks,
            "example" => SemanticKey::Example,
            "para" => SemanticKey::Para,
            "code" => SemanticKey::Code,
            "seePage" => SemanticKey::SeePage,
            "seeAnchor" => SemanticKey::SeeAnchor,
            "seeLangword" => SemanticKey::SeeLangword,
            "seealso" => SemanticKey::SeeAlso,
            "firstseealso" => SemanticKey::FirstSeeAlso,
            "typeparam" => SemanticKey::TypeParam,
            "firsttypeparam" => SemanticKey::FirstTypeParam,
            "param" => SemanticKey::Param,
            "firstparam" => SemanticKey::FirstParam,
            "paramref" => SemanticKey::ParamRef,
            "typeparamref" => SemanticKey::TypeParamRef,
            "exception" => SemanticKey::Exception,
            "returns" => SemanticKey::Returns,
            "c" => SemanticKey::C,
            "list" => SemanticKey::List,
            "item" => SemanticKey::Item,
            "description" => SemanticKey::Description,
            "b" => SemanticKey::B,
            "br" => SemanticKey::Br,
            "a" => SemanticKey::A,
            "h1" => SemanticKey::H1,
            "h2" => SemanticKey::H2,
            "h3" => SemanticKey::H3,
            "h4" => SemanticKey::H4,
            _ => return Option::None,
        };
        Some(key)
    }

    /// Keys whose extractors read the enclosing member from the context.
    pub fn is_member(self) -> bool {
        use SemanticKey::*;

        matches!(
            self,
            Type | Field
                | FirstField
                | Property
                | FirstProperty
                | Method
                | FirstMethod
                | Constructor
                | FirstConstructor
                | Event
                | FirstEvent
                | None
        )
    }

    pub fn rule(self) -> RenderRule {
        use SemanticKey::*;

        match self {
            Doc => RenderRule::new("# {0}\n{1}\n\n{2}\n\n", extract::document),
            Assembly => RenderRule::new("{1}\n", extract::name_and_body),
            Name | None => RenderRule::new("", extract::nothing),
            Type => RenderRule::new("\n---\n## {0}\n\n{1}\n", extract::name_and_body),
            FirstField => RenderRule::new(
                "\n#### Fields:\n|Name | Type | Description |\n|-----|------|------|\n|{0}|{2}|{1}|\n",
                extract::member_row,
            ),
            Field | Property => RenderRule::new("|{0}|{2}|{1}|\n", extract::member_row),
            FirstProperty => RenderRule::new(
                "\n#### Properties:\n|Name | Type | Description |\n|-----|------|------|\n|{0}|{2}|{1}|\n",
                extract::member_row,
            ),
            FirstMethod => RenderRule::new("\n#### Methods:\n\n##### {0}\n{1}\n", extract::name_and_body),
            Method | Constructor => RenderRule::new("\n##### {0}\n{1}\n", extract::name_and_body),
            FirstConstructor => {
                RenderRule::new("\n#### Constructors:\n\n##### {0}\n{1}\n", extract::name_and_body)
            }
            FirstEvent => RenderRule::new("\n#### Events:\n##### {0}\n{1}\n", extract::name_and_body),
            Event => RenderRule::new("##### {0}\n{1}\n", extract::name_and_body),
            Summary => RenderRule::new("{0}\n\n", extract::content),
            FieldSummary => RenderRule::new("{0}", extract::content),
            Value => RenderRule::new("**Value**: {0}\n\n", extract::content),
            NameRemarks => RenderRule::new("{0}", extract::member_simple_name),
            Remarks => RenderRule::new("\n{0}\n", extract::content),
            Example => RenderRule::new("\n##### Example\n{0}\n\n", extract::content),
            Para => RenderRule::new("  \n {0}  ", extract::content),
            Code => RenderRule::new("\n```{0}\n{1}\n```\n", extract::code),
            SeePage => RenderRule::new("[{0}]({1})", extract::cross_reference),
            SeeAnchor => RenderRule::new("[{0}]({1})", extract::anchor),
            SeeLangword => RenderRule::new(" `{0}` ", extract::keyword),
            FirstSeeAlso => RenderRule::new("\n\nSee also:\n\n- [{0}]({1})\n\n", extract::cross_reference),
            SeeAlso => RenderRule::new("- [{0}]({1})\n\n", extract::cross_reference),
            FirstTypeParam => RenderRule::new(
                "\n#### Generics:\n\n|Name | Description |\n|-----|------|\n|{0}: |{1}|\n",
                extract::name_and_body,
            ),
            TypeParam => RenderRule::new("|{0}: |{1}|\n", extract::name_and_body),
            FirstParam => RenderRule::new(
                "\n|Name | Description |\n|-----|------|\n|{0}|{1}|\n",
                extract::parameter,
            ),
            Param => RenderRule::new("|{0}|{1}|\n", extract::parameter),
            ParamRef => RenderRule::new("`{0}`", extract::parameter),
            TypeParamRef => RenderRule::new("`{0}`", extract::name_and_body),
            Exception => RenderRule::new("**Throws:** [{0}]({1})\n\n", extract::cross_reference),
            Returns => RenderRule::new("\n**Returns:** {0}\n\n", extract::return_type),
            C => RenderRule::new(" `{0}` ", extract::content),
            List => RenderRule::new("{0}{1}", extract::list),
            Item => RenderRule::new("\n- {0}{1}  ", extract::name_and_body),
            Description => RenderRule::new("{0} {1}", extract::description),
            B => RenderRule::new("**{0}**", extract::content),
            Br => RenderRule::new("{0}  \n\n", extract::content),
            A => RenderRule::new("[{0}]({1})", extract::hyperlink),
            H1 => RenderRule::new("# {0}\n\n", extract::content),
            H2 => RenderRule::new("## {0}\n\n", extract::content),
            H3 => RenderRule::new("### {0}\n\n", extract::content),
            H4 => RenderRule::new("#### {0}\n\n", extract::content),
        }
    }
}

/// Look up the rendering rule for a semantic tag name.
pub fn lookup(tag: &str) -> Option<RenderRule> {
    SemanticKey::parse(tag).map(SemanticKey::rule)
}

/// Substitute `{n}` placeholders with `values[n]`. Placeholders without a
/// value render empty; any other brace is kept literally.
pub fn fill(template: &str, values: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + values.iter().map(String::len).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();

        if digits > 0 && after[digits..].starts_with('}') {
            let index: usize = after[..digits].parse().unwrap_or(usize::MAX);
            if let Some(value) = values.get(index) {
                out.push_str(value);
            }
            rest = &after[digits + 1..];
        } else {
            out.push('{');
            rest = after;
        }
    }

    out.push_str(rest);
    out
}
