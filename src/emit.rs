use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use sha1::{Digest, Sha1};
use tracing::info;

use crate::config::Config;
use crate::content::{ClassContent, EntityKind, JavaEntity, NativeMethod};
use crate::names::NameTable;
use crate::typemap::TypeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactStatus {
    Written,
    Unchanged,
}

/// Per-artifact outcome of one emission run, in emission order.
#[derive(Debug, Default)]
pub struct EmitSummary {
    artifacts: Vec<(String, ArtifactStatus)>,
}

impl EmitSummary {
    pub fn artifacts(&self) -> &[(String, ArtifactStatus)] {
        &self.artifacts
    }

    pub fn all_unchanged(&self) -> bool {
        self.artifacts
            .iter()
            .all(|(_, status)| *status == ArtifactStatus::Unchanged)
    }

    fn record(&mut self, name: &str, status: ArtifactStatus) {
        let state = match status {
            ArtifactStatus::Written => "written",
            ArtifactStatus::Unchanged => "up-to-date",
        };
        info!("{name}: {state}");
        self.artifacts.push((name.to_string(), status));
    }
}

/// Renders the in-memory model into header files.
///
/// Every artifact goes through the same write-if-changed protocol, so an
/// unchanged model leaves file timestamps untouched and downstream builds
/// see no spurious rebuilds.
pub struct Generator<'a> {
    config: &'a Config,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Emit all artifacts for the given registry and per-class contents.
    /// Classes missing from `contents` (dropped by earlier errors) are
    /// silently excluded from every artifact.
    pub fn generate(
        &self,
        typemap: &TypeMap,
        contents: &HashMap<String, ClassContent>,
    ) -> Result<EmitSummary> {
        let mut summary = EmitSummary::default();

        let mut sorted_classes: Vec<&ClassContent> = typemap
            .exposed_classes()
            .filter_map(|class| contents.get(&class.qualified_name))
            .collect();
        sorted_classes.sort_by(|a, b| a.cpp_name.cmp(&b.cpp_name));

        let type_header = self.render_type_header(typemap, &sorted_classes)?;
        let status = self.write_if_changed(&self.config.type_header_name, &type_header)?;
        summary.record(&self.config.type_header_name, status);

        let mut emitted_headers: Vec<&str> = Vec::new();
        let mut emitted_class_names: Vec<&str> = Vec::new();
        for header in typemap.headers() {
            let classes: Vec<&ClassContent> = typemap
                .classes_in_header(header)
                .iter()
                .filter_map(|name| contents.get(name))
                .collect();
            if !classes.iter().any(|class| class.has_cpp_class()) {
                continue;
            }

            let rendered = self.render_class_header(header, &classes)?;
            let status = self.write_if_changed(header, &rendered)?;
            summary.record(header, status);

            emitted_headers.push(header);
            emitted_class_names.extend(
                classes
                    .iter()
                    .filter(|class| class.has_cpp_class())
                    .map(|class| class.cpp_class_name.as_str()),
            );
        }

        let all_header = self.render_all_classes_header(&emitted_headers, &emitted_class_names)?;
        let status = self.write_if_changed(&self.config.all_header_name, &all_header)?;
        summary.record(&self.config.all_header_name, status);

        let output_list = self.render_output_list(&emitted_headers)?;
        let status = self.write_if_changed(&self.config.output_list_name, &output_list)?;
        summary.record(&self.config.output_list_name, status);

        Ok(summary)
    }

    fn render_type_header(
        &self,
        typemap: &TypeMap,
        sorted_classes: &[&ClassContent],
    ) -> Result<String> {
        let mut out = String::new();
        let guard = guard_name(&self.config.type_header_name);
        writeln!(out, "#ifndef {guard}")?;
        writeln!(out, "#define {guard}\n\n")?;
        writeln!(out, "//THIS FILE IS AUTO-GENERATED. DO NOT EDIT\n")?;
        writeln!(out, "#include <smjni/smjni.h>\n")?;

        for class in sorted_classes {
            writeln!(
                out,
                "DEFINE_JAVA_TYPE({},  \"{}\")",
                class.cpp_name, class.binary_name
            )?;
        }
        writeln!(out)?;

        for array_type in typemap.exposed_arrays() {
            writeln!(out, "DEFINE_ARRAY_JAVA_TYPE({array_type})")?;
        }
        writeln!(out)?;

        for class in sorted_classes {
            for target in &class.converts_to {
                let Some(target_cpp) = typemap.cpp_name_of(target) else {
                    continue;
                };
                writeln!(
                    out,
                    "DEFINE_JAVA_CONVERSION({target_cpp}, {})",
                    class.cpp_name
                )?;
            }
        }

        writeln!(out, "\n#endif")?;
        Ok(out)
    }

    fn render_class_header(&self, header: &str, classes: &[&ClassContent]) -> Result<String> {
        let mut out = String::new();
        let guard = guard_name(header);
        writeln!(out, "#ifndef {guard}")?;
        writeln!(out, "#define {guard}\n\n")?;
        writeln!(out, "//THIS FILE IS AUTO-GENERATED. DO NOT EDIT\n")?;
        writeln!(out, "#include \"{}\"\n", self.config.type_header_name)?;

        for class in classes {
            if class.has_cpp_class() {
                render_class_def(&mut out, class)?;
            }
        }

        writeln!(out, "#endif")?;
        Ok(out)
    }

    fn render_all_classes_header(
        &self,
        headers: &[&str],
        class_names: &[&str],
    ) -> Result<String> {
        let mut out = String::new();
        let guard = guard_name(&self.config.all_header_name);
        writeln!(out, "#ifndef {guard}")?;
        writeln!(out, "#define {guard}\n\n")?;
        writeln!(out, "//THIS FILE IS AUTO-GENERATED. DO NOT EDIT\n")?;

        for header in headers {
            writeln!(out, "#include \"{header}\"")?;
        }

        write!(out, "\n#define JNIGEN_ALL_GENERATED_CLASSES \\\n    ")?;
        write!(out, "{}", class_names.join(", \\\n    "))?;
        writeln!(out, "\n\n#endif")?;
        Ok(out)
    }

    fn render_output_list(&self, headers: &[&str]) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "{}", self.config.type_header_name)?;
        writeln!(out, "{}", self.config.all_header_name)?;
        for header in headers {
            writeln!(out, "{header}")?;
        }
        Ok(out)
    }

    /// Render into a temporary file next to the destination, then replace
    /// the destination only when the content digest differs. The temporary
    /// file is removed on every exit path.
    fn write_if_changed(&self, name: &str, contents: &str) -> Result<ArtifactStatus> {
        let dest = self.config.dest_path.join(name);
        let dir = dest.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;

        let mut temp = tempfile::Builder::new()
            .prefix(".jbind-")
            .tempfile_in(dir)
            .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
        temp.write_all(contents.as_bytes())
            .with_context(|| format!("failed to render {}", dest.display()))?;

        if dest.exists() {
            let existing = fs::read(&dest)
                .with_context(|| format!("failed to read existing {}", dest.display()))?;
            if Sha1::digest(&existing) == Sha1::digest(contents.as_bytes()) {
                return Ok(ArtifactStatus::Unchanged);
            }
        }

        temp.persist(&dest)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to replace {}", dest.display()))?;
        Ok(ArtifactStatus::Written)
    }
}

/// Non-identifier characters become underscores, the rest is upper-cased:
/// `Foo_class.h` guards as `HEADER_FOO_CLASS_H_INCLUDED`.
fn guard_name(file_name: &str) -> String {
    let mangled: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("HEADER_{mangled}_INCLUDED")
}

fn render_class_def(out: &mut String, content: &ClassContent) -> Result<()> {
    write!(
        out,
        "class {} : public smjni::java_runtime::simple_java_class<{}>\n{{\npublic:\n    {}(JNIEnv * env);\n\n",
        content.cpp_class_name, content.cpp_name, content.cpp_class_name
    )?;

    if !content.native_methods.is_empty() {
        write!(out, "    void register_methods(JNIEnv * env) const;\n\n")?;
    }

    render_entity_accessors(out, &content.java_entities)?;

    writeln!(out, "private:")?;
    render_native_method_declarations(out, &content.native_methods)?;
    render_entity_members(out, &content.java_entities)?;

    write!(out, "}};\n\n\n")?;

    render_constructor_implementation(out, content)?;
    render_registration_implementation(out, content)?;
    Ok(())
}

fn render_entity_accessors(out: &mut String, entities: &[JavaEntity]) -> Result<()> {
    for entity in entities {
        // Per-accessor scope: entity argument names must not collide with
        // env or classForNonVirtualCall.
        let mut arg_table = NameTable::new();
        let mut arg_names = vec![arg_table.allocate("env")];
        if entity.allow_non_virt {
            arg_table.allocate("classForNonVirtualCall");
        }
        for name in &entity.arg_names {
            arg_names.push(arg_table.allocate(name));
        }

        let member_name = format!("m_{}", entity.name);
        match entity.kind {
            EntityKind::Method | EntityKind::StaticMethod | EntityKind::Constructor => {
                write!(out, "    {} {}(JNIEnv * env", entity.return_type, entity.name)?;
                for (position, arg_type) in entity.arg_types.iter().enumerate() {
                    write!(out, ", {} {}", arg_type, arg_names[position + 1])?;
                }
                write!(out, ") const\n        {{ ")?;
                if entity.return_type != "void" {
                    write!(out, "return ")?;
                }
                write!(out, "{member_name}(env")?;
                if matches!(
                    entity.kind,
                    EntityKind::StaticMethod | EntityKind::Constructor
                ) {
                    write!(out, ", *this")?;
                }
                for position in 0..entity.arg_types.len() {
                    write!(out, ", {}", arg_names[position + 1])?;
                }
                write!(out, "); }}\n")?;

                if entity.allow_non_virt {
                    write!(
                        out,
                        "    template<typename ClassType> {} {}(JNIEnv * env",
                        entity.return_type, entity.name
                    )?;
                    write!(out, ", {} {}", entity.arg_types[0], arg_names[1])?;
                    write!(out, ", const java_class<ClassType> & classForNonVirtualCall")?;
                    for position in 1..entity.arg_types.len() {
                        write!(out, ", {} {}", entity.arg_types[position], arg_names[position + 1])?;
                    }
                    write!(out, ") const\n        {{ ")?;
                    if entity.return_type != "void" {
                        write!(out, "return ")?;
                    }
                    write!(out, "{member_name}.call_non_virtual(env")?;
                    write!(out, ", {}, classForNonVirtualCall", arg_names[1])?;
                    for position in 1..entity.arg_types.len() {
                        write!(out, ", {}", arg_names[position + 1])?;
                    }
                    write!(out, "); }}\n")?;
                }
            }
            EntityKind::Field | EntityKind::StaticField => {
                write!(out, "    {} get_{}(JNIEnv * env", entity.return_type, entity.name)?;
                if entity.arg_types.len() == 2 {
                    write!(out, ", {} {}", entity.arg_types[0], arg_names[1])?;
                }
                write!(out, ") const\n        {{ return {member_name}.get(env")?;
                if entity.kind == EntityKind::StaticField {
                    write!(out, ", *this")?;
                }
                if entity.arg_types.len() == 2 {
                    write!(out, ", {}", arg_names[1])?;
                }
                write!(out, "); }}\n")?;

                if !entity.is_final {
                    write!(out, "    void set_{}(JNIEnv * env", entity.name)?;
                    if entity.arg_types.len() == 2 {
                        write!(out, ", {} {}", entity.arg_types[0], arg_names[1])?;
                        write!(out, ", {} value", entity.arg_types[1])?;
                    } else {
                        write!(out, ", {} value", entity.arg_types[0])?;
                    }
                    write!(out, ") const\n        {{ {member_name}.set(env")?;
                    if entity.kind == EntityKind::StaticField {
                        write!(out, ", *this")?;
                    }
                    if entity.arg_types.len() == 2 {
                        write!(out, ", {}", arg_names[1])?;
                    }
                    write!(out, ", value); }}\n")?;
                }
            }
        }
    }
    Ok(())
}

fn render_entity_members(out: &mut String, entities: &[JavaEntity]) -> Result<()> {
    if entities.is_empty() {
        return Ok(());
    }

    for entity in entities {
        let accessor_type = match entity.kind {
            EntityKind::Method => "smjni::java_method",
            EntityKind::StaticMethod => "smjni::java_static_method",
            EntityKind::Field => "smjni::java_field",
            EntityKind::StaticField => "smjni::java_static_field",
            EntityKind::Constructor => "smjni::java_constructor",
        };
        writeln!(
            out,
            "    const {}<{}> m_{};",
            accessor_type,
            entity.template_arguments.join(", "),
            entity.name
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn render_native_method_declarations(out: &mut String, methods: &[NativeMethod]) -> Result<()> {
    if methods.is_empty() {
        return Ok(());
    }

    for method in methods {
        let args = method
            .arguments
            .iter()
            .map(|(arg_type, arg_name)| match arg_name {
                Some(name) => format!("{arg_type} {name}"),
                None => arg_type.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "    static {} JNICALL {}({});",
            method.return_type, method.name, args
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn render_constructor_implementation(out: &mut String, content: &ClassContent) -> Result<()> {
    write!(
        out,
        "inline {}::{}(JNIEnv * env):\n    simple_java_class(env)",
        content.cpp_class_name, content.cpp_class_name
    )?;

    for entity in &content.java_entities {
        match entity.kind {
            EntityKind::Constructor => {
                write!(out, ",\n    m_{}(env, *this)", entity.name)?;
            }
            _ => {
                write!(out, ",\n    m_{}(env, *this, \"{}\")", entity.name, entity.name)?;
            }
        }
    }
    write!(out, "\n{{}}\n\n")?;
    Ok(())
}

fn render_registration_implementation(out: &mut String, content: &ClassContent) -> Result<()> {
    if content.native_methods.is_empty() {
        return Ok(());
    }

    write!(
        out,
        "inline void {}::register_methods(JNIEnv * env) const\n{{\n    register_natives(env, {{\n",
        content.cpp_class_name
    )?;

    for method in &content.native_methods {
        let mut target = String::new();
        if method.is_name_non_unique {
            let arg_types = method
                .arguments
                .iter()
                .map(|(arg_type, _)| arg_type.clone())
                .collect::<Vec<_>>()
                .join(", ");
            write!(target, "({} (JNICALL *)({}))", method.return_type, arg_types)?;
        }
        target.push_str(&method.name);

        writeln!(out, "        bind_native(\"{}\", {target}),", method.name)?;
    }

    write!(out, "    }});\n}}\n\n")?;
    Ok(())
}
