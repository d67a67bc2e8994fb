//! Wire primitive kinds and their reserved descriptor tokens.

use std::fmt;

/// Primitive value kinds the wire format carries directly.
///
/// Each kind has a reserved descriptor token. The decoder guarantees that
/// composite type names never collide with a reserved token, so a token
/// unambiguously identifies a primitive and any other string is a named
/// type reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    Str,
    Bytes,
}

impl Primitive {
    /// Every primitive kind, in token order.
    pub const ALL: [Primitive; 14] = [
        Primitive::Bool,
        Primitive::I8,
        Primitive::I16,
        Primitive::I32,
        Primitive::I64,
        Primitive::U8,
        Primitive::U16,
        Primitive::U32,
        Primitive::U64,
        Primitive::F32,
        Primitive::F64,
        Primitive::Char,
        Primitive::Str,
        Primitive::Bytes,
    ];

    /// The reserved descriptor token for this primitive.
    pub fn token(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::I8 => "i8",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::U8 => "u8",
            Primitive::U16 => "u16",
            Primitive::U32 => "u32",
            Primitive::U64 => "u64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
            Primitive::Char => "char",
            Primitive::Str => "string",
            Primitive::Bytes => "bytes",
        }
    }

    /// Parse a reserved token back into its primitive kind.
    ///
    /// Returns `None` for anything that is not a reserved token; callers
    /// treat that as a named type reference.
    pub fn parse_token(token: &str) -> Option<Primitive> {
        Primitive::ALL.iter().copied().find(|p| p.token() == token)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
