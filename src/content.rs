use std::collections::BTreeSet;
use std::collections::HashMap;

use jbindc_model::{ClassModel, MemberModel, Param, TypeRef};

use crate::config::Config;
use crate::error::{BindError, ContentError};
use crate::names::{NameTable, UniqueName};
use crate::typemap::{ExposedClass, TypeMap};

/// A Java method declared `native`, to be implemented in C++.
#[derive(Clone, Debug)]
pub struct NativeMethod {
    pub is_static: bool,
    /// True when at least one other native method of the class shares the
    /// raw Java name; the registration then needs a disambiguating cast.
    pub is_name_non_unique: bool,
    pub return_type: String,
    pub name: String,
    /// C++ parameter list: type token plus the Java parameter name where one
    /// exists (the leading env and receiver slots have none).
    pub arguments: Vec<(String, Option<String>)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Constructor,
    Method,
    StaticMethod,
    Field,
    StaticField,
}

/// A constructor, method or field that native code gets a typed accessor for.
#[derive(Clone, Debug)]
pub struct JavaEntity {
    pub kind: EntityKind,
    pub is_final: bool,
    pub allow_non_virt: bool,
    pub name: UniqueName,
    /// Template arguments of the typed accessor member.
    pub template_arguments: Vec<String>,
    /// Wrapper type handed back to the caller.
    pub return_type: String,
    pub arg_types: Vec<String>,
    pub arg_names: Vec<String>,
}

/// Everything extracted from one exposed class, in declaration order.
#[derive(Clone, Debug)]
pub struct ClassContent {
    pub qualified_name: String,
    pub binary_name: String,
    pub cpp_name: String,
    pub cpp_class_name: String,
    pub converts_to: BTreeSet<String>,
    pub native_methods: Vec<NativeMethod>,
    pub java_entities: Vec<JavaEntity>,
}

impl ClassContent {
    /// A C++ access class is only worth emitting when something is in it.
    pub fn has_cpp_class(&self) -> bool {
        !self.java_entities.is_empty() || !self.native_methods.is_empty()
    }

    /// Single order-preserving pass over the class's members. The first
    /// member-level failure aborts the class: no partial content survives.
    pub fn extract(
        class: &ClassModel,
        exposed: &ExposedClass,
        typemap: &mut TypeMap,
        config: &Config,
    ) -> Result<ClassContent, ContentError> {
        let mut content = ClassContent {
            qualified_name: exposed.qualified_name.clone(),
            binary_name: exposed.binary_name.clone(),
            cpp_name: exposed.cpp_name.clone(),
            cpp_class_name: exposed.cpp_class_name.clone(),
            converts_to: exposed.converts_to.clone(),
            native_methods: Vec::new(),
            java_entities: Vec::new(),
        };

        let mut previous_native_users: HashMap<String, usize> = HashMap::new();
        let mut names = NameTable::new();

        for member in &class.members {
            let result = match member {
                MemberModel::Method {
                    name,
                    return_type,
                    params,
                    modifiers,
                    called_by_native,
                } => {
                    let mut result = Ok(());
                    if modifiers.is_native {
                        result = content.add_native_method(
                            name,
                            return_type,
                            params,
                            modifiers.is_static,
                            &mut previous_native_users,
                            typemap,
                        );
                    }
                    if result.is_ok() {
                        if let Some(args) = called_by_native {
                            result = content.add_java_method(
                                class,
                                name,
                                return_type,
                                params,
                                modifiers.is_static,
                                modifiers.is_final,
                                args.allow_non_virtual_call,
                                &mut names,
                                typemap,
                            );
                        }
                    }
                    result
                }
                MemberModel::Field {
                    name,
                    field_type,
                    modifiers,
                    called_by_native,
                } => {
                    if called_by_native.is_some() {
                        content.add_java_field(
                            class,
                            name,
                            field_type,
                            modifiers.is_static,
                            modifiers.is_final,
                            &mut names,
                            typemap,
                        )
                    } else {
                        Ok(())
                    }
                }
                MemberModel::Constructor {
                    params,
                    called_by_native,
                } => {
                    if called_by_native.is_some() {
                        content.add_java_constructor(params, &mut names, typemap, config)
                    } else {
                        Ok(())
                    }
                }
            };

            if let Err(error) = result {
                return Err(ContentError::new(member.describe(), error));
            }
        }

        Ok(content)
    }

    fn add_native_method(
        &mut self,
        name: &str,
        return_type: &TypeRef,
        params: &[Param],
        is_static: bool,
        previous_users: &mut HashMap<String, usize>,
        typemap: &mut TypeMap,
    ) -> Result<(), BindError> {
        let return_type = typemap.native_name_of(return_type)?;

        let is_name_non_unique = match previous_users.get(name) {
            Some(&previous) => {
                self.native_methods[previous].is_name_non_unique = true;
                true
            }
            None => false,
        };

        let mut arguments: Vec<(String, Option<String>)> =
            vec![("JNIEnv *".to_string(), None)];
        if is_static {
            arguments.push(("jclass".to_string(), None));
        } else {
            arguments.push((self.cpp_name.clone(), None));
        }
        for param in params {
            arguments.push((typemap.native_name_of(&param.ty)?, Some(param.name.clone())));
        }

        previous_users.insert(name.to_string(), self.native_methods.len());
        self.native_methods.push(NativeMethod {
            is_static,
            is_name_non_unique,
            return_type,
            name: name.to_string(),
            arguments,
        });
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn add_java_method(
        &mut self,
        class: &ClassModel,
        name: &str,
        return_type: &TypeRef,
        params: &[Param],
        is_static: bool,
        is_final: bool,
        allow_non_virt: bool,
        names: &mut NameTable,
        typemap: &mut TypeMap,
    ) -> Result<(), BindError> {
        let allocated = names.allocate(name);
        let class_type = TypeRef::Declared(class.qualified_name.clone());

        let mut template_arguments = vec![typemap.native_name_of(return_type)?];
        let wrapper_return = typemap.wrapper_name_of(return_type, false)?;
        template_arguments.push(self.cpp_name.clone());

        let mut arg_types = Vec::new();
        let mut arg_names = Vec::new();
        if !is_static {
            arg_types.push(typemap.wrapper_name_of(&class_type, true)?);
            arg_names.push("self".to_string());
        }
        for param in params {
            template_arguments.push(typemap.native_name_of(&param.ty)?);
            arg_types.push(typemap.wrapper_name_of(&param.ty, true)?);
            arg_names.push(param.name.clone());
        }

        self.java_entities.push(JavaEntity {
            kind: if is_static {
                EntityKind::StaticMethod
            } else {
                EntityKind::Method
            },
            is_final,
            allow_non_virt: if is_static { false } else { allow_non_virt },
            name: allocated,
            template_arguments,
            return_type: wrapper_return,
            arg_types,
            arg_names,
        });
        Ok(())
    }

    fn add_java_field(
        &mut self,
        class: &ClassModel,
        name: &str,
        field_type: &TypeRef,
        is_static: bool,
        is_final: bool,
        names: &mut NameTable,
        typemap: &mut TypeMap,
    ) -> Result<(), BindError> {
        let allocated = names.allocate(name);
        let class_type = TypeRef::Declared(class.qualified_name.clone());

        let mut template_arguments = vec![typemap.native_name_of(field_type)?];
        let wrapper_return = typemap.wrapper_name_of(field_type, false)?;
        template_arguments.push(self.cpp_name.clone());

        let mut arg_types = Vec::new();
        let mut arg_names = Vec::new();
        if !is_static {
            arg_types.push(typemap.wrapper_name_of(&class_type, true)?);
            arg_names.push("self".to_string());
        }
        arg_types.push(typemap.wrapper_name_of(field_type, true)?);

        self.java_entities.push(JavaEntity {
            kind: if is_static {
                EntityKind::StaticField
            } else {
                EntityKind::Field
            },
            is_final,
            allow_non_virt: false,
            name: allocated,
            template_arguments,
            return_type: wrapper_return,
            arg_types,
            arg_names,
        });
        Ok(())
    }

    fn add_java_constructor(
        &mut self,
        params: &[Param],
        names: &mut NameTable,
        typemap: &mut TypeMap,
        config: &Config,
    ) -> Result<(), BindError> {
        let allocated = names.allocate(&config.ctor_name);

        let mut template_arguments = vec![self.cpp_name.clone()];
        let return_type = format!("smjni::local_java_ref<{}>", self.cpp_name);

        let mut arg_types = Vec::new();
        let mut arg_names = Vec::new();
        for param in params {
            template_arguments.push(typemap.native_name_of(&param.ty)?);
            arg_types.push(typemap.wrapper_name_of(&param.ty, true)?);
            arg_names.push(param.name.clone());
        }

        self.java_entities.push(JavaEntity {
            kind: EntityKind::Constructor,
            is_final: false,
            allow_non_virt: false,
            name: allocated,
            template_arguments,
            return_type,
            arg_types,
            arg_names,
        });
        Ok(())
    }
}
