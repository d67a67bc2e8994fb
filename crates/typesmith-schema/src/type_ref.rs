//! Type references as they appear in decoded field metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::primitive::Primitive;

/// A field's type: either a wire primitive or a named composite type.
///
/// On the wire a type reference is a bare string. Reserved tokens map to
/// [`Primitive`] kinds; any other string is the name of a composite type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeRef {
    Primitive(Primitive),
    Named(String),
}

impl TypeRef {
    /// Parse a descriptor string into a type reference.
    pub fn parse(s: &str) -> TypeRef {
        match Primitive::parse_token(s) {
            Some(p) => TypeRef::Primitive(p),
            None => TypeRef::Named(s.to_string()),
        }
    }

    /// The canonical descriptor string for this reference.
    ///
    /// Primitives render as their reserved token, named types as the bare
    /// type name. Descriptor equality is the only structural comparison the
    /// engine performs on field types.
    pub fn descriptor(&self) -> &str {
        match self {
            TypeRef::Primitive(p) => p.token(),
            TypeRef::Named(name) => name,
        }
    }

    /// The referenced type name, if this is a named reference.
    pub fn named(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) => Some(name.as_str()),
            TypeRef::Primitive(_) => None,
        }
    }
}

impl From<String> for TypeRef {
    fn from(s: String) -> Self {
        TypeRef::parse(&s)
    }
}

impl From<&str> for TypeRef {
    fn from(s: &str) -> Self {
        TypeRef::parse(s)
    }
}

impl From<Primitive> for TypeRef {
    fn from(p: Primitive) -> Self {
        TypeRef::Primitive(p)
    }
}

impl From<TypeRef> for String {
    fn from(r: TypeRef) -> Self {
        r.descriptor().to_string()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor())
    }
}
