use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::classes::{
    CalledByNativeArgs, ClassKind, ClassModel, ExposeArgs, MemberModel, Modifiers, Param,
    TypeModel,
};
use crate::types::TypeRef;

#[derive(Clone, Debug, Deserialize)]
struct RawModel {
    #[serde(default)]
    classes: Vec<RawClass>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawClass {
    /// Qualified source name (e.g. "com.example.Outer.Inner").
    name: String,
    /// Enclosing package. Defaults to everything before the last dot.
    #[serde(default)]
    package: Option<String>,
    /// Runtime binary name. Derived from package and name when absent.
    #[serde(default)]
    binary_name: Option<String>,
    #[serde(default)]
    kind: RawKind,
    #[serde(default)]
    superclass: Option<String>,
    #[serde(default)]
    interfaces: Vec<String>,
    /// Presence marks the class exposed-to-native; arguments default to "".
    #[serde(default)]
    exposed: Option<RawExpose>,
    #[serde(default)]
    members: Vec<RawMember>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct RawExpose {
    stem: String,
    type_name: String,
    class_name: String,
    header: String,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawMemberKind {
    #[default]
    Method,
    Field,
    Constructor,
}

#[derive(Clone, Debug, Deserialize)]
struct RawMember {
    #[serde(default)]
    kind: RawMemberKind,
    /// Required for methods and fields, ignored for constructors.
    #[serde(default)]
    name: Option<String>,
    /// Method return type. Defaults to void.
    #[serde(default)]
    returns: Option<String>,
    /// Field type.
    #[serde(default, rename = "type")]
    field_type: Option<String>,
    #[serde(default)]
    params: Vec<RawParam>,
    #[serde(default, rename = "static")]
    is_static: bool,
    #[serde(default, rename = "final")]
    is_final: bool,
    #[serde(default, rename = "native")]
    is_native: bool,
    #[serde(default)]
    called_by_native: Option<RawCalledByNative>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawParam {
    name: String,
    #[serde(rename = "type")]
    param_type: String,
}

/// Accepts both the shorthand `called_by_native: true` and the full
/// `called_by_native: { allow_non_virtual_call: true }` spelling.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(untagged)]
enum RawCalledByNative {
    Flag(bool),
    Args {
        #[serde(default)]
        allow_non_virtual_call: bool,
    },
}

impl RawCalledByNative {
    fn into_args(self) -> Option<CalledByNativeArgs> {
        match self {
            RawCalledByNative::Flag(false) => None,
            RawCalledByNative::Flag(true) => Some(CalledByNativeArgs::default()),
            RawCalledByNative::Args {
                allow_non_virtual_call,
            } => Some(CalledByNativeArgs {
                allow_non_virtual_call,
            }),
        }
    }
}

impl RawClass {
    fn try_into_model(self) -> Result<ClassModel> {
        let package = self.package.unwrap_or_else(|| default_package(&self.name));
        let binary_name = self
            .binary_name
            .unwrap_or_else(|| default_binary_name(&self.name, &package));

        let members = self
            .members
            .into_iter()
            .map(|member| {
                let label = member.describe();
                member
                    .try_into_model()
                    .with_context(|| format!("in {} of class {}", label, self.name))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ClassModel {
            qualified_name: self.name,
            binary_name,
            package,
            kind: self.kind.into_model(),
            superclass: self.superclass,
            interfaces: self.interfaces,
            members,
            exposed: self.exposed.map(|raw| ExposeArgs {
                stem: raw.stem,
                type_name: raw.type_name,
                class_name: raw.class_name,
                header: raw.header,
            }),
        })
    }
}

impl RawKind {
    fn into_model(self) -> ClassKind {
        match self {
            RawKind::Class => ClassKind::Class,
            RawKind::Interface => ClassKind::Interface,
            RawKind::Enum => ClassKind::Enum,
            RawKind::Annotation => ClassKind::Annotation,
            RawKind::Record => ClassKind::Record,
        }
    }
}

impl RawMember {
    fn describe(&self) -> String {
        match (self.kind, &self.name) {
            (RawMemberKind::Constructor, _) => "constructor".to_string(),
            (RawMemberKind::Method, Some(name)) => format!("method {name}"),
            (RawMemberKind::Field, Some(name)) => format!("field {name}"),
            (RawMemberKind::Method, None) => "unnamed method".to_string(),
            (RawMemberKind::Field, None) => "unnamed field".to_string(),
        }
    }

    fn try_into_model(self) -> Result<MemberModel> {
        let modifiers = Modifiers {
            is_static: self.is_static,
            is_final: self.is_final,
            is_native: self.is_native,
        };
        let called_by_native = self.called_by_native.and_then(RawCalledByNative::into_args);

        match self.kind {
            RawMemberKind::Method => {
                let Some(name) = self.name else {
                    bail!("method entry is missing a name");
                };
                let return_type = match self.returns {
                    Some(text) => TypeRef::parse(&text)?,
                    None => TypeRef::Void,
                };
                Ok(MemberModel::Method {
                    name,
                    return_type,
                    params: parse_params(self.params)?,
                    modifiers,
                    called_by_native,
                })
            }
            RawMemberKind::Field => {
                let Some(name) = self.name else {
                    bail!("field entry is missing a name");
                };
                let Some(field_type) = self.field_type else {
                    bail!("field entry is missing a type");
                };
                Ok(MemberModel::Field {
                    name,
                    field_type: TypeRef::parse(&field_type)?,
                    modifiers,
                    called_by_native,
                })
            }
            RawMemberKind::Constructor => Ok(MemberModel::Constructor {
                params: parse_params(self.params)?,
                called_by_native,
            }),
        }
    }
}

fn parse_params(params: Vec<RawParam>) -> Result<Vec<Param>> {
    params
        .into_iter()
        .map(|raw| {
            let ty = TypeRef::parse(&raw.param_type)
                .with_context(|| format!("in parameter {}", raw.name))?;
            Ok(Param { name: raw.name, ty })
        })
        .collect()
}

fn default_package(qualified_name: &str) -> String {
    match qualified_name.rfind('.') {
        Some(position) => qualified_name[..position].to_string(),
        None => String::new(),
    }
}

/// Runtime binary name: the part of the qualified name below the package
/// joins with `$` instead of `.`.
fn default_binary_name(qualified_name: &str, package: &str) -> String {
    if package.is_empty() {
        return qualified_name.replace('.', "$");
    }

    match qualified_name.strip_prefix(&format!("{package}.")) {
        Some(remainder) => format!("{package}.{}", remainder.replace('.', "$")),
        None => qualified_name.to_string(),
    }
}

/// Load a type model from a file, choosing the format by extension
/// (`.json` is JSON, everything else parses as YAML).
pub fn load_model(path: &Path) -> Result<TypeModel> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read class model {}", path.display()))?;

    let model = if path.extension().is_some_and(|ext| ext == "json") {
        model_from_json(&text)
    } else {
        model_from_yaml(&text)
    };

    model.with_context(|| format!("failed to parse class model {}", path.display()))
}

pub fn model_from_yaml(text: &str) -> Result<TypeModel> {
    let raw: RawModel = serde_yaml::from_str(text).context("malformed YAML class model")?;
    finish(raw)
}

pub fn model_from_json(text: &str) -> Result<TypeModel> {
    let raw: RawModel = serde_json::from_str(text).context("malformed JSON class model")?;
    finish(raw)
}

fn finish(raw: RawModel) -> Result<TypeModel> {
    let classes = raw
        .classes
        .into_iter()
        .map(RawClass::try_into_model)
        .collect::<Result<Vec<_>>>()?;
    TypeModel::new(classes)
}
