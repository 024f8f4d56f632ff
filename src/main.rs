//! Command-line interface for xmlschema-config

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use xmlschema_config::{LocationResolver, Manifest, Session};

#[cfg(feature = "cli")]
use xmlschema_config::locations::Location;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xmlschema-config")]
#[command(author, version, about = "Schema binding configuration tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the dependency-first load order of a manifest
    Order {
        /// Path to the JSON manifest
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Root namespace (defaults to every declared configuration)
        #[arg(short, long)]
        root: Option<String>,
    },

    /// Resolve the schema location of an import
    Resolve {
        /// Path to the JSON manifest
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Namespace of the import
        #[arg(value_name = "NAMESPACE")]
        namespace: String,

        /// Location hint carried by the import
        #[arg(value_name = "HINT", default_value = "")]
        hint: String,

        /// Location of the importing document; relative hints are joined against it
        #[arg(short, long)]
        base: Option<String>,
    },

    /// Summarise the session a manifest produces
    Inspect {
        /// Path to the JSON manifest
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Root namespace (defaults to every declared configuration)
        #[arg(short, long)]
        root: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Order { manifest, root } => cmd_order(manifest, root),
        Commands::Resolve {
            manifest,
            namespace,
            hint,
            base,
        } => cmd_resolve(manifest, namespace, hint, base),
        Commands::Inspect {
            manifest,
            root,
            json,
        } => cmd_inspect(manifest, root, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn load_session(path: &Path, root: Option<&str>) -> Result<Session, Box<dyn std::error::Error>> {
    let manifest = Manifest::from_file(path)?;
    Ok(manifest.session(root)?)
}

#[cfg(feature = "cli")]
fn cmd_order(manifest: PathBuf, root: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let session = load_session(&manifest, root.as_deref())?;
    for configuration in session.load_order() {
        println!(
            "{}\t{}",
            configuration.namespace_uri(),
            configuration.schema_location()
        );
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_resolve(
    manifest: PathBuf,
    namespace: String,
    hint: String,
    base: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = load_session(&manifest, None)?;
    let resolver = session.resolver();
    if resolver.resolve(&namespace, &hint).is_none() && !hint.is_empty() {
        eprintln!("no configuration governs '{}'; using hint", namespace);
    }
    let base = base.as_deref().map(Location::parse);
    let location = resolver.resolve_or_hint(&namespace, &hint, base.as_ref())?;
    println!("{}", location);
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_inspect(
    manifest: PathBuf,
    root: Option<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = load_session(&manifest, root.as_deref())?;

    if json_output {
        print_session_json(&session)?;
        return Ok(());
    }

    println!("xmlschema-config v{}", xmlschema_config::VERSION);
    println!();
    println!("Statistics:");
    println!("  Configurations: {}", session.load_order().len());
    println!("  Capabilities: {}", session.context().len());
    println!("  Bindings: {}", session.bindings().len());

    println!("\n=== Load Order ===");
    for configuration in session.load_order() {
        let deps: Vec<&str> = configuration
            .dependencies()
            .iter()
            .map(|d| d.namespace_uri())
            .collect();
        println!(
            "  {} -> {}{}",
            configuration.namespace_uri(),
            configuration.schema_location(),
            if deps.is_empty() {
                String::new()
            } else {
                format!(" (after {})", deps.join(", "))
            }
        );
    }

    println!("\n=== Capabilities ===");
    for key in session.context().keys() {
        println!(
            "  {} (from {})",
            key,
            session.context().provider(key).unwrap_or("?")
        );
    }

    println!("\n=== Bindings ===");
    for (name, binding) in session.bindings().iter() {
        println!("  {} {} : {}", binding.kind, name, binding.strategy);
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_session_json(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    use serde_json::{json, Value};

    let configurations: Vec<Value> = session
        .load_order()
        .iter()
        .map(|c| {
            json!({
                "namespace": c.namespace_uri(),
                "schemaLocation": c.schema_location(),
                "dependencies": c.dependencies().iter().map(|d| d.namespace_uri()).collect::<Vec<_>>(),
            })
        })
        .collect();
    let capabilities: Vec<Value> = session
        .context()
        .keys()
        .map(|key| json!({ "key": key, "provider": session.context().provider(key) }))
        .collect();
    let bindings: Vec<Value> = session
        .bindings()
        .iter()
        .map(|(name, binding)| {
            json!({
                "name": name.to_string(),
                "kind": binding.kind,
                "strategy": binding.strategy,
            })
        })
        .collect();

    let output = json!({
        "version": xmlschema_config::VERSION,
        "configurations": configurations,
        "capabilities": capabilities,
        "bindings": bindings,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
