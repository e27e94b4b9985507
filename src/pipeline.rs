use std::collections::HashMap;

use anyhow::Result;
use jbindc_model::TypeModel;
use jbindc_utils::Reporter;
use tracing::debug;

use crate::config::Config;
use crate::content::ClassContent;
use crate::emit::{EmitSummary, Generator};
use crate::typemap::TypeMap;

/// The fully discovered and extracted model, ready for emission.
pub struct GeneratedModel {
    pub typemap: TypeMap,
    /// Per-class content keyed by qualified name. Classes whose extraction
    /// failed are absent and take no part in emission.
    pub contents: HashMap<String, ClassContent>,
}

/// Discovery plus extraction. Failures stay scoped to their class: the
/// offending unit is reported, dropped, and the pass continues.
pub fn build_model(model: &TypeModel, config: &Config, reporter: &Reporter) -> GeneratedModel {
    let mut typemap = TypeMap::discover(model, config, reporter);

    let registered: Vec<String> = typemap
        .exposed_classes()
        .map(|class| class.qualified_name.clone())
        .collect();

    let mut contents = HashMap::with_capacity(registered.len());
    for qualified_name in registered {
        let Some(class) = model.class_named(&qualified_name) else {
            continue;
        };
        let Some(exposed) = typemap.exposed_class(&qualified_name).cloned() else {
            continue;
        };

        match ClassContent::extract(class, &exposed, &mut typemap, config) {
            Ok(content) => {
                debug!(
                    "extracted {qualified_name}: {} native methods, {} entities",
                    content.native_methods.len(),
                    content.java_entities.len()
                );
                contents.insert(qualified_name, content);
            }
            Err(error) => {
                reporter.error(
                    format!("{qualified_name} ({})", error.member),
                    error.to_string(),
                );
            }
        }
    }

    GeneratedModel { typemap, contents }
}

/// The whole run: discover, extract, emit. The returned summary covers every
/// artifact; whether anything failed is tracked by the reporter.
pub fn run(model: &TypeModel, config: &Config, reporter: &Reporter) -> Result<EmitSummary> {
    let generated = build_model(model, config, reporter);
    Generator::new(config).generate(&generated.typemap, &generated.contents)
}
