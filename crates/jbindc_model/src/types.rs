use std::fmt;

use anyhow::{Result, anyhow};

/// A reference to a Java type as it appears in a member signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
    /// A declared class or interface type, by qualified name.
    Declared(String),
    /// An array type with the given component type.
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// Parse a type from Java source syntax: `int`, `java.lang.String`,
    /// `byte[]`, `java.lang.String[][]`.
    pub fn parse(text: &str) -> Result<TypeRef> {
        let text = text.trim();
        if let Some(inner) = text.strip_suffix("[]") {
            return Ok(TypeRef::Array(Box::new(TypeRef::parse(inner)?)));
        }

        match text {
            "boolean" => Ok(TypeRef::Boolean),
            "byte" => Ok(TypeRef::Byte),
            "char" => Ok(TypeRef::Char),
            "short" => Ok(TypeRef::Short),
            "int" => Ok(TypeRef::Int),
            "long" => Ok(TypeRef::Long),
            "float" => Ok(TypeRef::Float),
            "double" => Ok(TypeRef::Double),
            "void" => Ok(TypeRef::Void),
            "" => Err(anyhow!("empty type reference")),
            name => {
                if name
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '.' || c == '_' || c == '$')
                {
                    Ok(TypeRef::Declared(name.to_string()))
                } else {
                    Err(anyhow!("malformed type reference `{name}`"))
                }
            }
        }
    }

    /// True for the eight Java primitive types; `void` is not one of them.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeRef::Boolean
                | TypeRef::Byte
                | TypeRef::Char
                | TypeRef::Short
                | TypeRef::Int
                | TypeRef::Long
                | TypeRef::Float
                | TypeRef::Double
        )
    }

    pub fn declared_name(&self) -> Option<&str> {
        match self {
            TypeRef::Declared(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Boolean => f.write_str("boolean"),
            TypeRef::Byte => f.write_str("byte"),
            TypeRef::Char => f.write_str("char"),
            TypeRef::Short => f.write_str("short"),
            TypeRef::Int => f.write_str("int"),
            TypeRef::Long => f.write_str("long"),
            TypeRef::Float => f.write_str("float"),
            TypeRef::Double => f.write_str("double"),
            TypeRef::Void => f.write_str("void"),
            TypeRef::Declared(name) => f.write_str(name),
            TypeRef::Array(item) => write!(f, "{item}[]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_primitives_and_declared_types() -> Result<()> {
        assert_eq!(TypeRef::parse("int")?, TypeRef::Int);
        assert_eq!(TypeRef::parse(" void ")?, TypeRef::Void);
        assert_eq!(
            TypeRef::parse("java.lang.String")?,
            TypeRef::Declared("java.lang.String".to_string())
        );
        Ok(())
    }

    #[test]
    fn parses_nested_arrays() -> Result<()> {
        let parsed = TypeRef::parse("byte[][]")?;
        assert_eq!(
            parsed,
            TypeRef::Array(Box::new(TypeRef::Array(Box::new(TypeRef::Byte))))
        );
        assert_eq!(parsed.to_string(), "byte[][]");
        Ok(())
    }

    #[test]
    fn rejects_malformed_references() {
        assert!(TypeRef::parse("").is_err());
        assert!(TypeRef::parse("int)").is_err());
    }
}
