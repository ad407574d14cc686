use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::parser::{MemberId, MemberKind};
use crate::resolver::{TypeDescriptor, TypeResolver};

#[derive(Debug, Deserialize)]
struct RawTable {
    #[serde(default)]
    assembly: Option<String>,
    #[serde(default)]
    types: Vec<TypeEntry>,
}

/// One type of the metadata sidecar
#[derive(Debug, Clone, Deserialize)]
pub struct TypeEntry {
    /// Fully qualified name, nested types written `Outer+Inner`
    pub name: String,
    #[serde(default = "default_public")]
    pub public: bool,
    #[serde(default)]
    pub members: Vec<MemberEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberEntry {
    pub kind: MemberKind,
    /// Member name, optionally followed by the raw parameter list
    pub name: String,
    #[serde(default = "default_public")]
    pub public: bool,
    #[serde(rename = "type", default)]
    pub type_: Option<TypeDescriptor>,
}

impl MemberEntry {
    fn base_name(&self) -> &str {
        self.name.split('(').next().unwrap_or(&self.name)
    }
}

fn default_public() -> bool {
    true
}

/// Precomputed assembly metadata, loaded from a `<Assembly>.types.json`
/// file that sits next to the documentation XML.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    assembly: Option<String>,
    types: HashMap<String, TypeEntry>,
}

impl MetadataTable {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawTable = serde_json::from_str(json)?;
        let types = raw
            .types
            .into_iter()
            .map(|entry| (entry.name.clone(), entry))
            .collect();
        Ok(Self {
            assembly: raw.assembly,
            types,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// `Acme.Widgets.xml` -> `Acme.Widgets.types.json`
    pub fn sidecar_path(xml_path: &Path) -> PathBuf {
        xml_path.with_extension("types.json")
    }

    pub fn assembly(&self) -> Option<&str> {
        self.assembly.as_deref()
    }

    /// Find a type by name, falling back to the nested spelling of the last
    /// separator (`Outer.Inner` -> `Outer+Inner`).
    fn find_type(&self, class_name: &str) -> Option<&TypeEntry> {
        if let Some(entry) = self.types.get(class_name) {
            return Some(entry);
        }
        let dot = class_name.rfind('.')?;
        let nested = format!("{}+{}", &class_name[..dot], &class_name[dot + 1..]);
        self.types.get(&nested)
    }

    /// Exact signature match first, then the first member with the same name.
    fn find_member(&self, class_name: &str, kind: MemberKind, member: &str) -> Option<&MemberEntry> {
        let entry = self.find_type(class_name)?;
        let base = member.split('(').next().unwrap_or(member);
        let candidates = || entry.members.iter().filter(move |m| m.kind == kind);

        candidates()
            .find(|m| m.name == member)
            .or_else(|| candidates().find(|m| m.base_name() == base))
    }
}

impl TypeResolver for MetadataTable {
    fn is_public(&self, id: &MemberId) -> bool {
        let visible = match id.kind {
            MemberKind::Type => self.find_type(&id.name).map(|entry| entry.public),
            MemberKind::Namespace => None,
            kind => self
                .find_member(id.declaring_type(), kind, &id.member_signature())
                .map(|member| member.public),
        };

        visible.unwrap_or_else(|| {
            debug!(member = %id.raw, "no visibility metadata, treating as public");
            true
        })
    }

    fn resolve_type(&self, class_name: &str, kind: MemberKind, member: &str) -> Option<TypeDescriptor> {
        let resolved = self
            .find_member(class_name, kind, member)
            .and_then(|entry| entry.type_.clone());
        if resolved.is_none() {
            debug!(class = class_name, member, "type not found in metadata");
        }
        resolved
    }
}
