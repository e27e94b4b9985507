use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use jbindc_utils::{Reporter, init_logging};

use crate::config::{self, Config};
use crate::emit::ArtifactStatus;
use crate::pipeline;
use crate::version::VERSION;

#[derive(Parser, Debug)]
#[command(name = "jbind", version = VERSION, about = "JNI binding generator CLI")]
pub struct JbindCli {
    #[command(subcommand)]
    command: Command,
}

impl JbindCli {
    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generates C++ binding headers from a Java class model.
    Generate {
        /// Path to the class model file (YAML, or JSON by extension).
        model: PathBuf,

        #[arg(long, default_value = ".")]
        /// Destination directory for generated files.
        dest: PathBuf,

        #[arg(long, default_value = "type_mapping.h")]
        /// File name of the shared type-mapping header.
        type_header: String,

        #[arg(long, default_value = "all_classes.h")]
        /// File name of the aggregate header.
        all_header: String,

        #[arg(long, default_value = "outputs.txt")]
        /// File name of the generated-files manifest.
        output_list: String,

        #[arg(long, default_value = "ctor")]
        /// Accessor name generated for exposed constructors.
        ctor_name: String,

        #[arg(long = "expose", value_name = "CLASS[(STEM)]")]
        /// Additional class to expose; repeatable, entries may also be
        /// separated with semicolons.
        expose: Vec<String>,

        #[arg(long, default_value = "smjni.jnigen.ExposeToNative")]
        /// Qualified name of the expose annotation, used in messages.
        expose_annotation: String,

        #[arg(long, default_value = "smjni.jnigen.CalledByNative")]
        /// Qualified name of the called-by-native annotation, used in
        /// messages.
        called_annotation: String,
    },
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = JbindCli::parse();
    match &cli.command {
        Command::Generate {
            model,
            dest,
            type_header,
            all_header,
            output_list,
            ctor_name,
            expose,
            expose_annotation,
            called_annotation,
        } => {
            let config = Config {
                dest_path: dest.clone(),
                type_header_name: type_header.clone(),
                all_header_name: all_header.clone(),
                output_list_name: output_list.clone(),
                expose_annotation: expose_annotation.clone(),
                called_annotation: called_annotation.clone(),
                ctor_name: ctor_name.clone(),
                expose_extra: expose
                    .iter()
                    .flat_map(|entry| config::parse_expose_list(entry))
                    .collect(),
            };
            handle_generate(model, &config)
        }
    }
}

fn handle_generate(model_path: &PathBuf, config: &Config) -> Result<()> {
    let model = jbindc_model::load_model(model_path)
        .with_context(|| format!("failed to load {}", model_path.display()))?;

    let reporter = Reporter::new();
    let summary = pipeline::run(&model, config, &reporter)?;

    for (name, status) in summary.artifacts() {
        match status {
            ArtifactStatus::Written => {
                println!("{} {}", "written".green().bold(), name);
            }
            ArtifactStatus::Unchanged => {
                println!("{} {}", "up-to-date".dimmed(), name);
            }
        }
    }

    if reporter.has_errors() {
        bail!("generation failed with {} error(s)", reporter.error_count());
    }
    Ok(())
}
