use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use hr_core::constants::{MAX_DOCUMENT_BYTES_ENV, STRICT_TYPE_NAMES_ENV, XML_INDENT_ENV};
use hr_core::{CoreConfig, ExportFormat, ThingService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hr")]
#[command(about = "Health record thing document tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered thing types
    Types {
        /// Show only the type with this GUID or payload root element
        name: Option<String>,
    },
    /// Parse and validate a <thing> document
    Validate {
        /// Path to the XML document
        file: PathBuf,
    },
    /// Print a <thing> document as YAML or JSON
    Show {
        /// Path to the XML document
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
    /// Re-write a <thing> document in canonical form
    Normalise {
        /// Path to the XML document
        file: PathBuf,
        /// Write to this file instead of standard output
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(value: Format) -> Self {
        match value {
            Format::Yaml => ExportFormat::Yaml,
            Format::Json => ExportFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hr=info".parse()?)
                .add_directive("hr_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = CoreConfig::from_env_values(
        std::env::var(MAX_DOCUMENT_BYTES_ENV).ok(),
        std::env::var(XML_INDENT_ENV).ok(),
        std::env::var(STRICT_TYPE_NAMES_ENV).ok(),
    )
    .context("invalid configuration")?;
    tracing::debug!("configuration: {:?}", cfg);
    let service = ThingService::new(Arc::new(cfg));

    match cli.command {
        Some(Commands::Types { name }) => {
            let types: Vec<_> = match name {
                Some(name) => vec![service
                    .find_type(&name)
                    .with_context(|| format!("no registered thing type matches '{name}'"))?],
                None => service.registered_types().iter().collect(),
            };
            for info in types {
                println!("{}  {:<22} {}", info.id, info.root_element, info.name);
            }
        }
        Some(Commands::Validate { file }) => {
            let summary = service
                .read_thing_file(&file)
                .map(|thing| service.summarise(&thing))
                .with_context(|| format!("{} is not a valid thing document", file.display()))?;
            println!("valid: {}", summary);
        }
        Some(Commands::Show { file, format }) => {
            let thing = service
                .read_thing_file(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            print!("{}", service.export(&thing, format.into())?);
        }
        Some(Commands::Normalise { file, output }) => {
            let thing = service
                .read_thing_file(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            match output {
                Some(path) => service
                    .write_thing_file(&path, &thing)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{}", service.render_thing(&thing)?),
            }
        }
        None => {
            println!("Use 'hr --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_defaults_to_yaml() {
        let cli = Cli::try_parse_from(["hr", "show", "thing.xml"]).expect("parse args");
        match cli.command {
            Some(Commands::Show { file, format }) => {
                assert_eq!(file, PathBuf::from("thing.xml"));
                assert_eq!(format, Format::Yaml);
            }
            _ => panic!("expected show command"),
        }
    }

    #[test]
    fn normalise_accepts_output_path() {
        let cli = Cli::try_parse_from(["hr", "normalise", "in.xml", "--output", "out.xml"])
            .expect("parse args");
        match cli.command {
            Some(Commands::Normalise { output, .. }) => {
                assert_eq!(output, Some(PathBuf::from("out.xml")));
            }
            _ => panic!("expected normalise command"),
        }
    }

    #[test]
    fn types_takes_optional_name() {
        let cli = Cli::try_parse_from(["hr", "types"]).expect("parse args");
        assert!(matches!(cli.command, Some(Commands::Types { name: None })));

        let cli = Cli::try_parse_from(["hr", "types", "heart-rate"]).expect("parse args");
        match cli.command {
            Some(Commands::Types { name }) => assert_eq!(name.as_deref(), Some("heart-rate")),
            _ => panic!("expected types command"),
        }
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["hr", "show", "thing.xml", "--format", "toml"]).is_err());
    }
}
