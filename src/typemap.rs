use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use jbindc_model::{ClassModel, ExposeArgs, TypeModel, TypeRef};
use jbindc_utils::{Diagnostic, Reporter};
use tracing::info;

use crate::config::Config;
use crate::error::BindError;

/// A class registered for native exposure. Immutable once discovery ends.
#[derive(Clone, Debug)]
pub struct ExposedClass {
    pub qualified_name: String,
    pub binary_name: String,
    /// C++ strong type representing instances, e.g. `jFoo`.
    pub cpp_name: String,
    /// C++ class used to access the Java class, e.g. `Foo_class`.
    pub cpp_class_name: String,
    /// Header file the class definition is grouped into.
    pub header: String,
    /// Java qualified names of exposed ancestors, transitively closed.
    pub converts_to: BTreeSet<String>,
}

struct Naming {
    cpp_name: String,
    cpp_class_name: String,
    header: String,
}

/// Process-wide registry mapping Java types to their C++ names.
///
/// Populated in two ordered phases (command-line declarations, then
/// annotated classes) and read-only afterwards, except for the array
/// element set which fills up while signatures are being shaped.
pub struct TypeMap {
    java_to_cpp: HashMap<String, String>,
    classes: Vec<ExposedClass>,
    index: HashMap<String, usize>,
    exposed_arrays: BTreeSet<String>,
    by_header: BTreeMap<String, Vec<String>>,
}

fn builtin_types() -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert("java.lang.Object".to_string(), "jobject".to_string());
    map.insert("java.lang.String".to_string(), "jstring".to_string());
    map.insert("java.lang.Throwable".to_string(), "jthrowable".to_string());
    map.insert("java.lang.Class".to_string(), "jclass".to_string());
    map.insert("java.nio.ByteBuffer".to_string(), "jByteBuffer".to_string());
    map
}

fn is_cpp_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn derive_naming(class: &ClassModel, args: &ExposeArgs, config: &Config) -> Result<Naming, BindError> {
    let stem = if args.stem.is_empty() {
        class.stem_under_package()
    } else {
        args.stem.clone()
    };

    let cpp_name = if args.type_name.is_empty() {
        format!("j{stem}")
    } else {
        args.type_name.clone()
    };

    let cpp_class_name = if args.class_name.is_empty() {
        format!("{stem}_class")
    } else {
        args.class_name.clone()
    };

    for name in [&cpp_name, &cpp_class_name] {
        if !is_cpp_identifier(name) {
            return Err(BindError::MisconfiguredAnnotation {
                annotation: config.expose_annotation.clone(),
                detail: format!("`{name}` is not a valid C++ identifier"),
            });
        }
    }

    let header = if args.header.is_empty() {
        format!("{cpp_class_name}.h")
    } else {
        args.header.clone()
    };

    Ok(Naming {
        cpp_name,
        cpp_class_name,
        header,
    })
}

impl TypeMap {
    /// Run the two-phase discovery pass over the model. Classes that fail to
    /// register are reported and skipped; discovery always continues.
    pub fn discover(model: &TypeModel, config: &Config, reporter: &Reporter) -> TypeMap {
        let mut map = TypeMap {
            java_to_cpp: builtin_types(),
            classes: Vec::new(),
            index: HashMap::new(),
            exposed_arrays: BTreeSet::new(),
            by_header: BTreeMap::new(),
        };

        let mut cpp_names: HashMap<String, String> = HashMap::new();
        let mut cpp_class_names: HashMap<String, String> = HashMap::new();

        for (java_name, stem) in &config.expose_extra {
            let Some(class) = model.class_named(java_name) else {
                reporter.report(Diagnostic::error(
                    BindError::UnknownClass(java_name.clone()).to_string(),
                ));
                continue;
            };
            if !class.kind.is_exposable() {
                reporter.error(
                    java_name,
                    BindError::NotAClass(config.expose_annotation.clone()).to_string(),
                );
                continue;
            }

            let args = ExposeArgs {
                stem: stem.clone(),
                ..ExposeArgs::default()
            };
            let registered = derive_naming(class, &args, config).and_then(|naming| {
                map.register(&mut cpp_names, &mut cpp_class_names, class, naming, false)
            });
            match registered {
                Ok(()) => info!("discovered (command line) {java_name}"),
                Err(error) => reporter.error(java_name, error.to_string()),
            }
        }

        for class in model.classes() {
            let Some(args) = &class.exposed else {
                continue;
            };
            if !class.kind.is_exposable() {
                reporter.error(
                    &class.qualified_name,
                    BindError::NotAClass(config.expose_annotation.clone()).to_string(),
                );
                continue;
            }

            let registered = derive_naming(class, args, config).and_then(|naming| {
                map.register(&mut cpp_names, &mut cpp_class_names, class, naming, true)
            });
            match registered {
                Ok(()) => info!("discovered {}", class.qualified_name),
                Err(error) => reporter.error(&class.qualified_name, error.to_string()),
            }
        }

        map.compute_conversions(model);
        map
    }

    fn register(
        &mut self,
        cpp_names: &mut HashMap<String, String>,
        cpp_class_names: &mut HashMap<String, String>,
        class: &ClassModel,
        naming: Naming,
        grouped: bool,
    ) -> Result<(), BindError> {
        if let Some(owner) = cpp_names.get(&naming.cpp_name) {
            return Err(BindError::DuplicateNativeName {
                name: naming.cpp_name,
                owner: owner.clone(),
            });
        }
        if let Some(owner) = cpp_class_names.get(&naming.cpp_class_name) {
            return Err(BindError::DuplicateClassName {
                name: naming.cpp_class_name,
                owner: owner.clone(),
            });
        }

        cpp_names.insert(naming.cpp_name.clone(), class.qualified_name.clone());
        cpp_class_names.insert(naming.cpp_class_name.clone(), class.qualified_name.clone());
        self.java_to_cpp
            .insert(class.qualified_name.clone(), naming.cpp_name.clone());

        if grouped {
            self.by_header
                .entry(naming.header.clone())
                .or_default()
                .push(class.qualified_name.clone());
        }

        self.index
            .insert(class.qualified_name.clone(), self.classes.len());
        self.classes.push(ExposedClass {
            qualified_name: class.qualified_name.clone(),
            binary_name: class.binary_name.clone(),
            cpp_name: naming.cpp_name,
            cpp_class_name: naming.cpp_class_name,
            header: naming.header,
            converts_to: BTreeSet::new(),
        });
        Ok(())
    }

    fn compute_conversions(&mut self, model: &TypeModel) {
        for position in 0..self.classes.len() {
            let qualified_name = self.classes[position].qualified_name.clone();
            let Some(class) = model.class_named(&qualified_name) else {
                continue;
            };

            let mut converts_to = BTreeSet::new();
            let mut visited = HashSet::new();
            visited.insert(qualified_name.clone());
            self.collect_converts_to(model, class, &mut converts_to, &mut visited);
            converts_to.remove(&qualified_name);

            self.classes[position].converts_to = converts_to;
        }
    }

    /// Walk the superclass chain and all interfaces, recursively. An ancestor
    /// contributes an entry when it is registered in the type map; the walk
    /// continues past unregistered ancestors, and the visited set bounds
    /// diamond-shaped interface graphs.
    fn collect_converts_to(
        &self,
        model: &TypeModel,
        class: &ClassModel,
        converts_to: &mut BTreeSet<String>,
        visited: &mut HashSet<String>,
    ) {
        if let Some(super_name) = &class.superclass {
            if super_name != "java.lang.Object" && self.java_to_cpp.contains_key(super_name) {
                converts_to.insert(super_name.clone());
            }
            if visited.insert(super_name.clone()) {
                if let Some(super_class) = model.class_named(super_name) {
                    self.collect_converts_to(model, super_class, converts_to, visited);
                }
            }
        }

        for interface_name in &class.interfaces {
            if self.java_to_cpp.contains_key(interface_name) {
                converts_to.insert(interface_name.clone());
            }
            if visited.insert(interface_name.clone()) {
                if let Some(interface) = model.class_named(interface_name) {
                    self.collect_converts_to(model, interface, converts_to, visited);
                }
            }
        }
    }

    /// The C++ token for a type reference. Primitive mappings are fixed and
    /// independent of registry state; declared types must be registered.
    /// Array components that are neither primitive nor plain `jobject` are
    /// recorded for auxiliary array-type declarations.
    pub fn native_name_of(&mut self, ty: &TypeRef) -> Result<String, BindError> {
        match ty {
            TypeRef::Boolean => Ok("jboolean".to_string()),
            TypeRef::Byte => Ok("jbyte".to_string()),
            TypeRef::Char => Ok("jchar".to_string()),
            TypeRef::Short => Ok("jshort".to_string()),
            TypeRef::Int => Ok("jint".to_string()),
            TypeRef::Long => Ok("jlong".to_string()),
            TypeRef::Float => Ok("jfloat".to_string()),
            TypeRef::Double => Ok("jdouble".to_string()),
            TypeRef::Void => Ok("void".to_string()),
            TypeRef::Declared(name) => self
                .java_to_cpp
                .get(name)
                .cloned()
                .ok_or_else(|| BindError::UnexposedType(name.clone())),
            TypeRef::Array(item) => {
                let item_name = self.native_name_of(item)?;
                let array_name = format!("{item_name}Array");
                if !item.is_primitive() && item_name != "jobject" {
                    self.exposed_arrays.insert(item_name);
                }
                Ok(array_name)
            }
        }
    }

    /// The C++ type used at call boundaries: by-value for primitives and
    /// void; for reference types a borrowed `auto_java_ref` in argument
    /// position and an owned `local_java_ref` in return position.
    pub fn wrapper_name_of(&mut self, ty: &TypeRef, is_argument: bool) -> Result<String, BindError> {
        let raw = self.native_name_of(ty)?;
        let wrapper = match raw.as_str() {
            "jboolean" => "bool".to_string(),
            "jbyte" => "int8_t".to_string(),
            "jchar" => "char16_t".to_string(),
            "jshort" => "int16_t".to_string(),
            "jint" => "int32_t".to_string(),
            "jlong" => "int64_t".to_string(),
            "jfloat" => "float".to_string(),
            "jdouble" => "double".to_string(),
            "void" => "void".to_string(),
            _ => {
                if is_argument {
                    format!("const smjni::auto_java_ref<{raw}> &")
                } else {
                    format!("smjni::local_java_ref<{raw}>")
                }
            }
        };
        Ok(wrapper)
    }

    /// Registered C++ name for a Java qualified name, built-ins included.
    pub fn cpp_name_of(&self, java_name: &str) -> Option<&str> {
        self.java_to_cpp.get(java_name).map(String::as_str)
    }

    pub fn exposed_class(&self, qualified_name: &str) -> Option<&ExposedClass> {
        self.index
            .get(qualified_name)
            .map(|&position| &self.classes[position])
    }

    /// Every registered class, in discovery order.
    pub fn exposed_classes(&self) -> impl Iterator<Item = &ExposedClass> {
        self.classes.iter()
    }

    /// Array element C++ names recorded while shaping signatures.
    pub fn exposed_arrays(&self) -> &BTreeSet<String> {
        &self.exposed_arrays
    }

    /// Output group keys in sorted order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.by_header.keys().map(String::as_str)
    }

    /// Qualified names grouped under one header, in discovery order.
    pub fn classes_in_header(&self, header: &str) -> &[String] {
        self.by_header.get(header).map(Vec::as_slice).unwrap_or(&[])
    }
}
