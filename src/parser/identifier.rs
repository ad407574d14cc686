use serde::{Deserialize, Serialize};

/// Marker the compiler uses for instance constructors in member identifiers.
pub const CONSTRUCTOR_MARKER: &str = "#ctor";

/// One-letter member identifier kind (`T:`, `M:`, `P:`, `F:`, `E:`, `N:`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    #[serde(rename = "T")]
    Type,
    #[serde(rename = "M")]
    Method,
    #[serde(rename = "P")]
    Property,
    #[serde(rename = "F")]
    Field,
    #[serde(rename = "E")]
    Event,
    #[serde(rename = "N")]
    Namespace,
}

impl MemberKind {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'T' => Some(MemberKind::Type),
            'M' => Some(MemberKind::Method),
            'P' => Some(MemberKind::Property),
            'F' => Some(MemberKind::Field),
            'E' => Some(MemberKind::Event),
            'N' => Some(MemberKind::Namespace),
            _ => None,
        }
    }

    /// Kind of a raw identifier, read from its two-character `K:` prefix.
    pub fn from_prefix(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), Some(':')) => Self::from_letter(letter),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            MemberKind::Type => 'T',
            MemberKind::Method => 'M',
            MemberKind::Property => 'P',
            MemberKind::Field => 'F',
            MemberKind::Event => 'E',
            MemberKind::Namespace => 'N',
        }
    }
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A parsed `K:Fully.Qualified.Name(ParamType,ParamType)` identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberId {
    pub kind: MemberKind,
    /// Qualified name without prefix and parameter list
    pub name: String,
    /// Raw parameter types, `None` when the identifier has no parenthesized suffix
    pub params: Option<Vec<String>>,
    pub raw: String,
}

impl MemberId {
    /// Returns `None` for malformed identifiers (missing `K:` prefix or an
    /// unbalanced parameter list); callers fall back to the raw string.
    pub fn parse(raw: &str) -> Option<Self> {
        let kind = MemberKind::from_prefix(raw)?;
        let body = &raw[2..];

        let (name, params) = match body.find('(') {
            Some(open) => {
                let close = body.rfind(')').filter(|&close| close > open)?;
                // Conversion operators carry their return type after `~`
                let trailing = &body[close + 1..];
                if !trailing.is_empty() && !trailing.starts_with('~') {
                    return None;
                }
                (&body[..open], Some(split_params(&body[open + 1..close])))
            }
            None if body.contains(')') => return None,
            None => (body, None),
        };

        if name.is_empty() {
            return None;
        }

        Some(Self {
            kind,
            name: name.to_string(),
            params,
            raw: raw.to_string(),
        })
    }

    pub fn is_constructor(&self) -> bool {
        self.name.contains(CONSTRUCTOR_MARKER)
    }

    /// Everything before the last namespace separator, e.g. the declaring
    /// class of a method. Types return their own namespace.
    pub fn declaring_type(&self) -> &str {
        match self.name.rfind('.') {
            Some(dot) => &self.name[..dot],
            None => "",
        }
    }

    /// The final segment of the qualified name.
    pub fn member_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(dot) => &self.name[dot + 1..],
            None => &self.name,
        }
    }

    /// Member name followed by the raw parameter list, as metadata lookups expect.
    pub fn member_signature(&self) -> String {
        match &self.params {
            Some(params) => format!("{}({})", self.member_name(), params.join(",")),
            None => self.member_name().to_string(),
        }
    }
}

/// Split a parameter list on top-level commas, keeping generic argument
/// lists like `Dictionary{String,Int32}` intact.
pub fn split_params(list: &str) -> Vec<String> {
    if list.trim().is_empty() {
        return Vec::new();
    }

    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for c in list.chars() {
        match c {
            '{' | '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            '}' | ']' | ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => params.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    params.push(current);
    params
}
