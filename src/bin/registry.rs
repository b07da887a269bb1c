//! Converter Registry CLI
//!
//! Inspects the bootstrapped registry and tries conversions from the shell.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use familiar_converters::{
    BuiltinCatalog, ConverterConfig, ConverterRegistry, EnumValue, TypeDescriptor, Value,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "converter-registry")]
#[command(about = "Inspect type converters and try conversions")]
struct Cli {
    /// Path to a converters.toml config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered converters
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show which converter a type resolves to
    Resolve {
        /// Type name (e.g. Integer, i32, Number, or a configured enum)
        r#type: String,
    },

    /// Convert text to a type
    Convert {
        /// Type name
        r#type: String,
        /// Text to convert
        text: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ConverterConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    let (registry, report) =
        ConverterRegistry::bootstrap_with_report(&BuiltinCatalog, config.registry_options())?;

    for missing in &report.missing_aliases {
        eprintln!("⚠️  no converter for {} (alias {})", missing.reference, missing.primitive);
    }

    match cli.command {
        Commands::List { json } => {
            let entries = registry.entries();
            if json {
                let rows: Vec<_> = entries
                    .iter()
                    .map(|(ty, converter)| {
                        serde_json::json!({
                            "type": ty,
                            "converter": converter.name(),
                        })
                    })
                    .collect();
                let output = serde_json::json!({
                    "entries": rows,
                    "bootstrap": report,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("📋 {} converters registered", entries.len());
                for (ty, converter) in &entries {
                    println!("  {:<16} {}", ty.name(), converter.name());
                }
                if !report.ignored.is_empty() {
                    println!("  ignored: {}", report.ignored.join(", "));
                }
            }
            Ok(())
        }

        Commands::Resolve { r#type } => {
            let ty = lookup(&config, &r#type)?;
            let converter = registry.find_compatible_converter(&ty)?;
            println!("✅ {} -> {}", ty, converter.name());
            Ok(())
        }

        Commands::Convert { r#type, text } => {
            let ty = lookup(&config, &r#type)?;
            let value = registry.convert(&ty, &text)?;
            println!("✅ {}", render(&value));
            Ok(())
        }
    }
}

fn lookup(config: &ConverterConfig, name: &str) -> anyhow::Result<TypeDescriptor> {
    config
        .resolve_type(name)
        .ok_or_else(|| anyhow!("unknown type name '{}'", name))
}

fn render(value: &Value) -> String {
    macro_rules! try_display {
        ($($t:ty),*) => {
            $(if let Some(v) = value.downcast_ref::<$t>() {
                return v.to_string();
            })*
        };
    }
    try_display!(
        bool,
        i8,
        i16,
        i32,
        i64,
        f32,
        f64,
        char,
        String,
        EnumValue,
        regex::Regex,
        semver::Version,
        chrono::DateTime<chrono::Utc>
    );
    if let Some(chars) = value.downcast_ref::<Vec<char>>() {
        return format!("{:?}", chars);
    }
    if let Some(path) = value.downcast_ref::<std::path::PathBuf>() {
        return path.display().to_string();
    }
    format!("<{}>", value.type_name())
}
