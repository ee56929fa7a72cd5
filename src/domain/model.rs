use crate::domain::mapping::FieldMapping;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A struct member: `float capacity[2];` → name `capacity`, type `float`, dims `[2]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: String,
    pub dims: Vec<usize>,
}

impl Field {
    pub fn scalar(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
            dims: Vec::new(),
        }
    }

    pub fn array(name: &str, ty: &str, dims: &[usize]) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
            dims: dims.to_vec(),
        }
    }

    pub fn is_array(&self) -> bool {
        !self.dims.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<Field>,
}

/// All `typedef struct` definitions found in one header, keyed by typedef name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructSet {
    structs: BTreeMap<String, StructDef>,
}

impl StructSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, def: StructDef) {
        self.structs.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.structs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.structs.keys().map(String::as_str)
    }
}

/// Nested shape of the target view struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewNode {
    Scalar(String),
    Struct(Vec<(String, ViewNode)>),
    Array { len: usize, element: Box<ViewNode> },
}

/// One scalar leaf of the full struct after flattening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatField {
    pub source_path: String,
    pub output_name: String,
}

/// A brace initializer; scalars keep their verbatim source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitValue {
    Scalar(String),
    List(Vec<InitValue>),
}

impl InitValue {
    pub fn scalar(text: impl Into<String>) -> Self {
        Self::Scalar(text.into())
    }

    pub fn as_list(&self) -> Option<&[InitValue]> {
        match self {
            Self::List(items) => Some(items),
            Self::Scalar(_) => None,
        }
    }

    /// Leaf values, depth-first.
    pub fn flatten(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Scalar(s) => out.push(s),
            Self::List(items) => items.iter().for_each(|item| item.collect_leaves(out)),
        }
    }
}

impl fmt::Display for InitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArraySize {
    /// `[N]`, kept as written.
    Sized(String),
    /// `[]`
    Unsized,
}

impl fmt::Display for ArraySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sized(n) => write!(f, "[{}]", n),
            Self::Unsized => f.write_str("[]"),
        }
    }
}

/// `static const unit units[2] PROGMEM = { ... };`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub specifiers: Vec<String>,
    pub type_name: String,
    pub var_name: String,
    pub array_size: Option<ArraySize>,
    pub attributes: Vec<String>,
    pub init_block: String,
    /// Byte range of the whole statement, specifiers through `;`.
    pub span: (usize, usize),
}

impl Declaration {
    pub fn is_array(&self) -> bool {
        self.array_size.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDeclaration {
    pub var_name: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReshapeReport {
    pub declarations: Vec<RenderedDeclaration>,
    pub skipped: Vec<String>,
}

/// Everything the transform step needs, loaded once by extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBundle {
    pub full_structs: StructSet,
    pub view_structs: StructSet,
    pub view_tree: ViewNode,
    pub mapping: FieldMapping,
    pub init_text: String,
}
