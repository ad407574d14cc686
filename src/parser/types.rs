/// 1-based location of an element's start tag in the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, pos {}", self.line, self.column)
    }
}

/// A node of the documentation tree: an element or a run of text.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentNode {
    Element(Element),
    Text(String),
}

impl DocumentNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            DocumentNode::Element(el) => Some(el),
            DocumentNode::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    /// Attributes in source order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<DocumentNode>,
    pub position: Position,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(DocumentNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(DocumentNode::Text(text.into()));
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(DocumentNode::as_element)
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.name == name)
    }

    /// Concatenated text of all descendants, exactly as it appears in the source.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                DocumentNode::Text(text) => out.push_str(text),
                DocumentNode::Element(el) => el.collect_text(out),
            }
        }
    }
}

/// A parsed documentation file
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    /// The `member` elements under `members`, in document order.
    pub fn members(&self) -> impl Iterator<Item = &Element> {
        self.root
            .child("members")
            .into_iter()
            .flat_map(|members| members.children_named("member"))
    }

    pub fn assembly_name(&self) -> Option<String> {
        self.root
            .child("assembly")
            .and_then(|assembly| assembly.child("name"))
            .map(|name| name.text_content().trim().to_string())
    }
}
