use anyhow::Result;
use jbind::content::EntityKind;
use jbind::{Config, build_model};
use jbindc_model::model_from_yaml;
use jbindc_utils::Reporter;

fn extract(yaml: &str) -> Result<(jbind::GeneratedModel, Reporter)> {
    let model = model_from_yaml(yaml)?;
    let reporter = Reporter::new();
    let generated = build_model(&model, &Config::default(), &reporter);
    Ok((generated, reporter))
}

#[test]
fn overloaded_native_names_are_marked_non_unique() -> Result<()> {
    let (generated, reporter) = extract(
        r#"
classes:
  - name: com.example.Calc
    exposed: {}
    members:
      - kind: method
        name: foo
        native: true
        params: [{ name: a, type: int }]
      - kind: method
        name: foo
        native: true
        params: [{ name: a, type: int }, { name: b, type: int }]
      - kind: method
        name: bar
        native: true
        params: [{ name: a, type: int }]
"#,
    )?;

    assert!(!reporter.has_errors());
    let content = &generated.contents["com.example.Calc"];
    let by_name: Vec<(&str, bool)> = content
        .native_methods
        .iter()
        .map(|m| (m.name.as_str(), m.is_name_non_unique))
        .collect();
    assert_eq!(
        by_name,
        vec![("foo", true), ("foo", true), ("bar", false)]
    );
    Ok(())
}

#[test]
fn native_method_arguments_start_with_env_and_receiver() -> Result<()> {
    let (generated, _) = extract(
        r#"
classes:
  - name: com.example.Calc
    exposed: {}
    members:
      - kind: method
        name: add
        returns: int
        static: true
        native: true
        params: [{ name: a, type: int }, { name: b, type: int }]
      - kind: method
        name: reset
        native: true
"#,
    )?;

    let content = &generated.contents["com.example.Calc"];

    let add = &content.native_methods[0];
    assert!(add.is_static);
    assert_eq!(add.return_type, "jint");
    assert_eq!(
        add.arguments,
        vec![
            ("JNIEnv *".to_string(), None),
            ("jclass".to_string(), None),
            ("jint".to_string(), Some("a".to_string())),
            ("jint".to_string(), Some("b".to_string())),
        ]
    );

    let reset = &content.native_methods[1];
    assert!(!reset.is_static);
    assert_eq!(
        reset.arguments,
        vec![
            ("JNIEnv *".to_string(), None),
            ("jCalc".to_string(), None),
        ]
    );
    Ok(())
}

#[test]
fn instance_method_entity_gets_a_borrowed_self() -> Result<()> {
    let (generated, _) = extract(
        r#"
classes:
  - name: com.example.Person
    exposed: {}
    members:
      - kind: method
        name: rename
        called_by_native: true
        params: [{ name: newName, type: java.lang.String }]
"#,
    )?;

    let content = &generated.contents["com.example.Person"];
    let entity = &content.java_entities[0];

    assert_eq!(entity.kind, EntityKind::Method);
    assert_eq!(entity.name.as_str(), "rename");
    assert_eq!(entity.template_arguments, vec!["void", "jPerson", "jstring"]);
    assert_eq!(entity.return_type, "void");
    assert_eq!(
        entity.arg_types,
        vec![
            "const smjni::auto_java_ref<jPerson> &".to_string(),
            "const smjni::auto_java_ref<jstring> &".to_string(),
        ]
    );
    assert_eq!(entity.arg_names, vec!["self", "newName"]);
    Ok(())
}

#[test]
fn static_method_entity_has_no_self_and_owned_return() -> Result<()> {
    let (generated, _) = extract(
        r#"
classes:
  - name: com.example.Person
    exposed: {}
    members:
      - kind: method
        name: describe
        returns: java.lang.String
        static: true
        called_by_native: { allow_non_virtual_call: true }
"#,
    )?;

    let content = &generated.contents["com.example.Person"];
    let entity = &content.java_entities[0];

    assert_eq!(entity.kind, EntityKind::StaticMethod);
    assert_eq!(entity.template_arguments, vec!["jstring", "jPerson"]);
    assert_eq!(entity.return_type, "smjni::local_java_ref<jstring>");
    assert!(entity.arg_types.is_empty());
    // Non-virtual dispatch never applies to static methods.
    assert!(!entity.allow_non_virt);
    Ok(())
}

#[test]
fn field_entities_shape_getter_and_value_slot() -> Result<()> {
    let (generated, _) = extract(
        r#"
classes:
  - name: com.example.Person
    exposed: {}
    members:
      - kind: field
        name: age
        type: int
        called_by_native: true
      - kind: field
        name: ID
        type: long
        static: true
        final: true
        called_by_native: true
"#,
    )?;

    let content = &generated.contents["com.example.Person"];

    let age = &content.java_entities[0];
    assert_eq!(age.kind, EntityKind::Field);
    assert!(!age.is_final);
    assert_eq!(age.template_arguments, vec!["jint", "jPerson"]);
    assert_eq!(age.return_type, "int32_t");
    assert_eq!(
        age.arg_types,
        vec![
            "const smjni::auto_java_ref<jPerson> &".to_string(),
            "int32_t".to_string(),
        ]
    );
    assert_eq!(age.arg_names, vec!["self"]);

    let id = &content.java_entities[1];
    assert_eq!(id.kind, EntityKind::StaticField);
    assert!(id.is_final);
    assert_eq!(id.arg_types, vec!["int64_t".to_string()]);
    assert!(id.arg_names.is_empty());
    Ok(())
}

#[test]
fn constructor_entity_uses_the_configured_token() -> Result<()> {
    let (generated, _) = extract(
        r#"
classes:
  - name: com.example.Person
    exposed: {}
    members:
      - kind: constructor
        called_by_native: true
        params: [{ name: name, type: java.lang.String }]
      - kind: constructor
        called_by_native: true
"#,
    )?;

    let content = &generated.contents["com.example.Person"];

    let first = &content.java_entities[0];
    assert_eq!(first.kind, EntityKind::Constructor);
    assert_eq!(first.name.as_str(), "ctor");
    assert_eq!(first.template_arguments, vec!["jPerson", "jstring"]);
    assert_eq!(first.return_type, "smjni::local_java_ref<jPerson>");
    assert_eq!(first.arg_names, vec!["name"]);

    // Both constructors share the naming scope.
    let second = &content.java_entities[1];
    assert_eq!(second.name.as_str(), "ctor1");
    Ok(())
}

#[test]
fn methods_fields_and_constructors_share_one_naming_scope() -> Result<()> {
    let (generated, _) = extract(
        r#"
classes:
  - name: com.example.Person
    exposed: {}
    members:
      - kind: method
        name: value
        returns: int
        called_by_native: true
      - kind: field
        name: value
        type: int
        called_by_native: true
      - kind: field
        name: delete
        type: boolean
        called_by_native: true
"#,
    )?;

    let content = &generated.contents["com.example.Person"];
    let names: Vec<&str> = content
        .java_entities
        .iter()
        .map(|entity| entity.name.as_str())
        .collect();
    assert_eq!(names, vec!["value", "value1", "delete1"]);
    Ok(())
}

#[test]
fn a_broken_member_drops_the_whole_class() -> Result<()> {
    let (generated, reporter) = extract(
        r#"
classes:
  - name: com.example.Broken
    exposed: {}
    members:
      - kind: method
        name: ok
        called_by_native: true
      - kind: method
        name: bad
        returns: com.example.NotExposed
        called_by_native: true
  - name: com.example.Fine
    exposed: {}
    members:
      - kind: method
        name: ping
        called_by_native: true
"#,
    )?;

    assert!(reporter.has_errors());
    assert!(!generated.contents.contains_key("com.example.Broken"));
    assert!(generated.contents.contains_key("com.example.Fine"));

    let diagnostics = reporter.diagnostics();
    let anchored = diagnostics
        .iter()
        .any(|d| d.element().is_some_and(|e| e.contains("method bad")));
    assert!(anchored, "diagnostic should name the offending member");
    Ok(())
}
