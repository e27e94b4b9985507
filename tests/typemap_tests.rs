use anyhow::Result;
use jbind::{BindError, Config, TypeMap};
use jbindc_model::{TypeRef, model_from_yaml};
use jbindc_utils::Reporter;

fn discover(yaml: &str, config: &Config) -> Result<(TypeMap, Reporter)> {
    let model = model_from_yaml(yaml)?;
    let reporter = Reporter::new();
    let typemap = TypeMap::discover(&model, config, &reporter);
    Ok((typemap, reporter))
}

#[test]
fn primitive_mappings_are_fixed() -> Result<()> {
    let (mut typemap, _) = discover("classes: []", &Config::default())?;

    let expectations = [
        (TypeRef::Boolean, "jboolean"),
        (TypeRef::Byte, "jbyte"),
        (TypeRef::Char, "jchar"),
        (TypeRef::Short, "jshort"),
        (TypeRef::Int, "jint"),
        (TypeRef::Long, "jlong"),
        (TypeRef::Float, "jfloat"),
        (TypeRef::Double, "jdouble"),
        (TypeRef::Void, "void"),
    ];
    for (ty, expected) in expectations {
        assert_eq!(typemap.native_name_of(&ty)?, expected);
    }
    Ok(())
}

#[test]
fn duplicate_native_name_keeps_the_first_registrant() -> Result<()> {
    let (mut typemap, reporter) = discover(
        r#"
classes:
  - name: a.First
    exposed: { type_name: jSame }
  - name: b.Second
    exposed: { type_name: jSame }
"#,
        &Config::default(),
    )?;

    assert!(reporter.has_errors());
    assert!(typemap.exposed_class("a.First").is_some());
    assert!(typemap.exposed_class("b.Second").is_none());

    // The first registration stays fully usable.
    let resolved = typemap.native_name_of(&TypeRef::Declared("a.First".to_string()))?;
    assert_eq!(resolved, "jSame");

    let second = typemap.native_name_of(&TypeRef::Declared("b.Second".to_string()));
    assert!(matches!(second, Err(BindError::UnexposedType(_))));
    Ok(())
}

#[test]
fn duplicate_class_name_is_rejected() -> Result<()> {
    let (typemap, reporter) = discover(
        r#"
classes:
  - name: a.First
    exposed: { class_name: Shared_class }
  - name: b.Second
    exposed: { class_name: Shared_class, type_name: jSecond }
"#,
        &Config::default(),
    )?;

    assert!(reporter.has_errors());
    assert!(typemap.exposed_class("a.First").is_some());
    assert!(typemap.exposed_class("b.Second").is_none());
    Ok(())
}

#[test]
fn default_naming_derives_from_package_position() -> Result<()> {
    let (typemap, _) = discover(
        r#"
classes:
  - name: com.example.Outer.Inner
    package: com.example
    exposed: {}
"#,
        &Config::default(),
    )?;

    let class = typemap
        .exposed_class("com.example.Outer.Inner")
        .expect("registered");
    assert_eq!(class.cpp_name, "jOuter_Inner");
    assert_eq!(class.cpp_class_name, "Outer_Inner_class");
    assert_eq!(class.header, "Outer_Inner_class.h");
    assert_eq!(class.binary_name, "com.example.Outer$Inner");
    Ok(())
}

#[test]
fn explicit_stem_overrides_derivation() -> Result<()> {
    let (typemap, _) = discover(
        r#"
classes:
  - name: com.example.Widget
    exposed: { stem: Gadget }
"#,
        &Config::default(),
    )?;

    let class = typemap.exposed_class("com.example.Widget").expect("registered");
    assert_eq!(class.cpp_name, "jGadget");
    assert_eq!(class.cpp_class_name, "Gadget_class");
    assert_eq!(class.header, "Gadget_class.h");
    Ok(())
}

#[test]
fn converts_to_collects_only_exposed_ancestors() -> Result<()> {
    let (typemap, _) = discover(
        r#"
classes:
  - name: x.A
    exposed: {}
  - name: x.B
    superclass: x.A
    exposed: {}
  - name: x.I
    kind: interface
  - name: x.C
    superclass: x.B
    interfaces: [x.I]
    exposed: {}
"#,
        &Config::default(),
    )?;

    let c = typemap.exposed_class("x.C").expect("registered");
    let converts: Vec<&str> = c.converts_to.iter().map(String::as_str).collect();
    assert_eq!(converts, vec!["x.A", "x.B"]);

    let a = typemap.exposed_class("x.A").expect("registered");
    assert!(a.converts_to.is_empty());
    Ok(())
}

#[test]
fn converts_to_walks_through_unexposed_ancestors() -> Result<()> {
    // x.Mid is not exposed; x.Bottom still converts to x.Top through it.
    let (typemap, _) = discover(
        r#"
classes:
  - name: x.Top
    exposed: {}
  - name: x.Mid
    superclass: x.Top
  - name: x.Bottom
    superclass: x.Mid
    exposed: {}
"#,
        &Config::default(),
    )?;

    let bottom = typemap.exposed_class("x.Bottom").expect("registered");
    let converts: Vec<&str> = bottom.converts_to.iter().map(String::as_str).collect();
    assert_eq!(converts, vec!["x.Top"]);
    Ok(())
}

#[test]
fn unexposed_declared_type_fails() -> Result<()> {
    let (mut typemap, _) = discover("classes: []", &Config::default())?;
    let result = typemap.native_name_of(&TypeRef::Declared("x.Missing".to_string()));
    assert!(matches!(result, Err(BindError::UnexposedType(name)) if name == "x.Missing"));
    Ok(())
}

#[test]
fn array_mapping_records_reference_elements() -> Result<()> {
    let (mut typemap, _) = discover("classes: []", &Config::default())?;

    assert_eq!(
        typemap.native_name_of(&TypeRef::Array(Box::new(TypeRef::Int)))?,
        "jintArray"
    );
    assert_eq!(
        typemap.native_name_of(&TypeRef::Array(Box::new(TypeRef::Declared(
            "java.lang.String".to_string()
        ))))?,
        "jstringArray"
    );
    assert_eq!(
        typemap.native_name_of(&TypeRef::Array(Box::new(TypeRef::Declared(
            "java.lang.Object".to_string()
        ))))?,
        "jobjectArray"
    );

    let arrays: Vec<&str> = typemap.exposed_arrays().iter().map(String::as_str).collect();
    assert_eq!(arrays, vec!["jstring"]);
    Ok(())
}

#[test]
fn wrapper_types_distinguish_ownership() -> Result<()> {
    let (mut typemap, _) = discover("classes: []", &Config::default())?;
    let string_type = TypeRef::Declared("java.lang.String".to_string());

    assert_eq!(
        typemap.wrapper_name_of(&string_type, true)?,
        "const smjni::auto_java_ref<jstring> &"
    );
    assert_eq!(
        typemap.wrapper_name_of(&string_type, false)?,
        "smjni::local_java_ref<jstring>"
    );
    assert_eq!(typemap.wrapper_name_of(&TypeRef::Int, true)?, "int32_t");
    assert_eq!(typemap.wrapper_name_of(&TypeRef::Void, false)?, "void");
    Ok(())
}

#[test]
fn command_line_classes_register_without_a_group() -> Result<()> {
    let config = Config {
        expose_extra: vec![
            ("com.example.Extra".to_string(), String::new()),
            ("com.example.Missing".to_string(), String::new()),
        ],
        ..Config::default()
    };
    let (typemap, reporter) = discover(
        r#"
classes:
  - name: com.example.Extra
"#,
        &config,
    )?;

    // The unknown class produced a diagnostic, the known one registered.
    assert!(reporter.has_errors());
    let extra = typemap.exposed_class("com.example.Extra").expect("registered");
    assert_eq!(extra.cpp_name, "jExtra");
    assert_eq!(typemap.headers().count(), 0);
    Ok(())
}

#[test]
fn invalid_cpp_names_are_rejected_as_misconfigured() -> Result<()> {
    let (typemap, reporter) = discover(
        r#"
classes:
  - name: x.Bad
    exposed: { type_name: 1jBad }
  - name: x.Good
    exposed: {}
"#,
        &Config::default(),
    )?;

    assert!(reporter.has_errors());
    assert!(typemap.exposed_class("x.Bad").is_none());
    assert!(typemap.exposed_class("x.Good").is_some());

    let diagnostics = reporter.diagnostics();
    let anchored = diagnostics.iter().any(|d| {
        d.element() == Some("x.Bad") && d.message().contains("not configured correctly")
    });
    assert!(anchored, "diagnostic should name the misconfigured class");
    Ok(())
}

#[test]
fn non_class_kinds_are_rejected() -> Result<()> {
    let (typemap, reporter) = discover(
        r#"
classes:
  - name: x.Marker
    kind: annotation
    exposed: {}
  - name: x.Shape
    kind: interface
    exposed: {}
  - name: x.Color
    kind: enum
    exposed: {}
"#,
        &Config::default(),
    )?;

    assert!(reporter.has_errors());
    assert!(typemap.exposed_class("x.Marker").is_none());
    assert!(typemap.exposed_class("x.Shape").is_some());
    assert!(typemap.exposed_class("x.Color").is_some());
    Ok(())
}
