use std::path::PathBuf;

/// Everything the generator needs to know about one invocation.
///
/// Defaults mirror the annotation-processor options of the original tooling
/// so existing build integrations keep their file names.
#[derive(Clone, Debug)]
pub struct Config {
    /// Destination directory for every artifact.
    pub dest_path: PathBuf,
    /// File name of the shared type-mapping header.
    pub type_header_name: String,
    /// File name of the aggregate header including all class headers.
    pub all_header_name: String,
    /// File name of the generated-files manifest.
    pub output_list_name: String,
    /// Qualified name of the expose-to-native annotation, used in messages.
    pub expose_annotation: String,
    /// Qualified name of the called-by-native annotation, used in messages.
    pub called_annotation: String,
    /// Accessor name allocated for exposed constructors.
    pub ctor_name: String,
    /// Classes declared on the command line, each with an optional stem.
    pub expose_extra: Vec<(String, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dest_path: PathBuf::from("."),
            type_header_name: "type_mapping.h".to_string(),
            all_header_name: "all_classes.h".to_string(),
            output_list_name: "outputs.txt".to_string(),
            expose_annotation: "smjni.jnigen.ExposeToNative".to_string(),
            called_annotation: "smjni.jnigen.CalledByNative".to_string(),
            ctor_name: "ctor".to_string(),
            expose_extra: Vec::new(),
        }
    }
}

/// Parse one extra-exposure entry: `com.example.Foo` or
/// `com.example.Foo(Stem)`. Entries that match neither shape are skipped.
pub fn parse_expose_entry(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    match text.split_once('(') {
        None => Some((text.to_string(), String::new())),
        Some((name, rest)) => {
            let stem = rest.strip_suffix(')')?;
            if name.is_empty() || stem.is_empty() {
                return None;
            }
            Some((name.trim().to_string(), stem.trim().to_string()))
        }
    }
}

/// Split a `;`-separated option string into exposure entries.
pub fn parse_expose_list(text: &str) -> Vec<(String, String)> {
    text.split(';').filter_map(parse_expose_entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_with_and_without_stems() {
        assert_eq!(
            parse_expose_entry("com.example.Foo"),
            Some(("com.example.Foo".to_string(), String::new()))
        );
        assert_eq!(
            parse_expose_entry("com.example.Foo(Bar)"),
            Some(("com.example.Foo".to_string(), "Bar".to_string()))
        );
        assert_eq!(parse_expose_entry("  "), None);
        assert_eq!(parse_expose_entry("Foo("), None);
    }

    #[test]
    fn splits_semicolon_lists() {
        let entries = parse_expose_list("a.B;c.D(Stem); ;");
        assert_eq!(
            entries,
            vec![
                ("a.B".to_string(), String::new()),
                ("c.D".to_string(), "Stem".to_string()),
            ]
        );
    }
}
