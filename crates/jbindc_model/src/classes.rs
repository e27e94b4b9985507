use std::collections::HashMap;

use anyhow::{Result, bail};

use crate::types::TypeRef;

/// The flavour of a declared Java type.
///
/// Only classes, interfaces and enums may be exposed to native code; the
/// remaining kinds are carried so the generator can report them precisely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

impl ClassKind {
    pub fn is_exposable(self) -> bool {
        matches!(self, ClassKind::Class | ClassKind::Interface | ClassKind::Enum)
    }
}

/// Resolved arguments of the expose-to-native annotation, defaults applied.
///
/// Empty strings mean "derive": the generator computes the effective stem and
/// the C++ names from the class's position under its package.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExposeArgs {
    pub stem: String,
    pub type_name: String,
    pub class_name: String,
    pub header: String,
}

/// Resolved arguments of the called-by-native annotation, defaults applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CalledByNativeArgs {
    pub allow_non_virtual_call: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub is_static: bool,
    pub is_final: bool,
    pub is_native: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

/// One declared member, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberModel {
    Method {
        name: String,
        return_type: TypeRef,
        params: Vec<Param>,
        modifiers: Modifiers,
        called_by_native: Option<CalledByNativeArgs>,
    },
    Field {
        name: String,
        field_type: TypeRef,
        modifiers: Modifiers,
        called_by_native: Option<CalledByNativeArgs>,
    },
    Constructor {
        params: Vec<Param>,
        called_by_native: Option<CalledByNativeArgs>,
    },
}

impl MemberModel {
    /// Short human-readable label used to anchor diagnostics.
    pub fn describe(&self) -> String {
        match self {
            MemberModel::Method { name, .. } => format!("method {name}"),
            MemberModel::Field { name, .. } => format!("field {name}"),
            MemberModel::Constructor { .. } => "constructor".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClassModel {
    pub qualified_name: String,
    /// Runtime binary name, nested classes separated with `$`.
    pub binary_name: String,
    /// The enclosing package; distinct from a qualified-name prefix only for
    /// nested classes.
    pub package: String,
    pub kind: ClassKind,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub members: Vec<MemberModel>,
    pub exposed: Option<ExposeArgs>,
}

impl ClassModel {
    /// The class's position under its package with dots flattened to
    /// underscores: `com.example.Outer.Inner` under `com.example` becomes
    /// `Outer_Inner`.
    pub fn stem_under_package(&self) -> String {
        if self.package.is_empty() {
            return self.qualified_name.replace('.', "_");
        }

        self.qualified_name
            .strip_prefix(&format!("{}.", self.package))
            .unwrap_or(&self.qualified_name)
            .replace('.', "_")
    }
}

/// The full set of classes under processing, in declaration order.
pub struct TypeModel {
    classes: Vec<ClassModel>,
    index: HashMap<String, usize>,
}

impl TypeModel {
    pub fn new(classes: Vec<ClassModel>) -> Result<Self> {
        let mut index = HashMap::with_capacity(classes.len());
        for (position, class) in classes.iter().enumerate() {
            if index
                .insert(class.qualified_name.clone(), position)
                .is_some()
            {
                bail!("class {} is declared twice in the model", class.qualified_name);
            }
        }
        Ok(Self { classes, index })
    }

    pub fn class_named(&self, qualified_name: &str) -> Option<&ClassModel> {
        self.index
            .get(qualified_name)
            .map(|&position| &self.classes[position])
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassModel> {
        self.classes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(qualified_name: &str, package: &str) -> ClassModel {
        ClassModel {
            qualified_name: qualified_name.to_string(),
            binary_name: qualified_name.to_string(),
            package: package.to_string(),
            kind: ClassKind::Class,
            superclass: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            exposed: None,
        }
    }

    #[test]
    fn stem_flattens_nested_names() {
        let nested = class("com.example.Outer.Inner", "com.example");
        assert_eq!(nested.stem_under_package(), "Outer_Inner");

        let unpackaged = class("Standalone", "");
        assert_eq!(unpackaged.stem_under_package(), "Standalone");
    }

    #[test]
    fn duplicate_classes_are_rejected() {
        let result = TypeModel::new(vec![class("a.B", "a"), class("a.B", "a")]);
        assert!(result.is_err());
    }
}
