//! matbind CLI - Inspect scene files and resolve material bindings.

use std::env;

use anyhow::{bail, Context};
use matbind::material::{Binding, BindingResolver, MaterialBindingApi, Purpose, ResolverSettings};
use matbind::prelude::{Prim, ScenePath, SceneReader, Stage};
use tracing_subscriber::EnvFilter;

/// Default log filter per verbosity flag.
const LOG_QUIET: &str = "off";
const LOG_DEFAULT: &str = "warn";
const LOG_DEBUG: &str = "matbind=debug";
const LOG_TRACE: &str = "matbind=trace";

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut log_filter = LOG_DEFAULT;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => log_filter = LOG_DEBUG,
            "-vv" | "--trace" => log_filter = LOG_TRACE,
            "-q" | "--quiet" => log_filter = LOG_QUIET,
            _ => filtered_args.push(arg),
        }
    }
    init_tracing(log_filter);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        "tree" | "t" => cmd_tree(&filtered_args[1..]),
        "bindings" | "b" => cmd_bindings(&filtered_args[1..]),
        "resolve" | "r" => cmd_resolve(&filtered_args[1..]),
        "resolve-all" | "ra" => cmd_resolve_all(&filtered_args[1..]),
        "-V" | "--version" | "version" => {
            print_version();
            Ok(())
        }
        "h" | "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Install the fmt subscriber. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_version() {
    println!(
        "matbind {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        env!("MATBIND_BUILD_DATE"),
        env!("MATBIND_BUILD_TIME")
    );
}

fn print_help() {
    println!("matbind - Material binding resolver");
    println!();
    println!("USAGE:");
    println!("    matbind [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    t, tree        <scene>               Show prim hierarchy");
    println!("    b, bindings    <scene> <prim>        List authored bindings per purpose");
    println!("    r, resolve     <scene> <prim>        Resolve the bound material of a prim");
    println!("    ra, resolve-all <scene>              Resolve every prim in the scene");
    println!("    -V, --version                        Show version and build date");
    println!("    h, help                              Show this help");
    println!();
    println!("RESOLVE OPTIONS:");
    println!("    --purpose <p>       full, preview or allPurpose (default)");
    println!("    --collection <c>    Only consider collection bindings of this collection");
    println!("    --settings <file>   Resolver settings (JSON)");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Suppress log output");
    println!();
    println!("EXAMPLES:");
    println!("    matbind tree office_set.json");
    println!("    matbind resolve office_set.json /Office_set/Desk_Assembly/Cup_grp --purpose full");
    println!("    matbind resolve-all office_set.json --collection Erasers");
    println!();
    println!("NOTES:");
    println!("    - RUST_LOG overrides -v / -vv / -q");
}

/// Command arguments split into positionals and `--name value` options.
struct CommandArgs<'a> {
    positional: Vec<&'a str>,
    purpose: &'a str,
    collection: &'a str,
    settings: Option<&'a str>,
}

impl<'a> CommandArgs<'a> {
    fn parse(args: &[&'a str]) -> anyhow::Result<Self> {
        let mut parsed = Self {
            positional: Vec::new(),
            purpose: "",
            collection: "",
            settings: None,
        };

        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            let slot = match arg {
                "--purpose" | "-p" => &mut parsed.purpose,
                "--collection" | "-c" => &mut parsed.collection,
                "--settings" | "-s" => {
                    let value = iter.next().with_context(|| format!("missing value for {arg}"))?;
                    parsed.settings = Some(value);
                    continue;
                }
                _ if arg.starts_with("--") => bail!("unknown option {arg}"),
                _ => {
                    parsed.positional.push(arg);
                    continue;
                }
            };
            *slot = iter.next().with_context(|| format!("missing value for {arg}"))?;
        }
        Ok(parsed)
    }

    fn positional(&self, index: usize, usage: &str) -> anyhow::Result<&'a str> {
        match self.positional.get(index) {
            Some(&value) => Ok(value),
            None => bail!("missing argument\nUsage: {usage}"),
        }
    }

    fn resolver(&self) -> anyhow::Result<BindingResolver> {
        let settings = match self.settings {
            Some(path) => ResolverSettings::load(path)
                .with_context(|| format!("failed to load settings {path}"))?,
            None => ResolverSettings::default(),
        };
        Ok(BindingResolver::new(settings))
    }
}

fn open_stage(path: &str) -> anyhow::Result<Stage> {
    tracing::info!("Opening scene: {}", path);
    Stage::open(path).with_context(|| format!("failed to open {path}"))
}

fn parse_prim_path(text: &str) -> anyhow::Result<ScenePath> {
    text.parse::<ScenePath>()
        .with_context(|| format!("bad prim path {text}"))
}

fn cmd_tree(args: &[&str]) -> anyhow::Result<()> {
    let args = CommandArgs::parse(args)?;
    let path = args.positional(0, "matbind tree <scene>")?;
    let stage = open_stage(path)?;

    println!("Scene: {}", stage.name());
    println!();
    print_tree(&stage.pseudo_root(), 0);
    Ok(())
}

fn print_tree(prim: &Prim<'_>, depth: usize) {
    for child in prim.children() {
        let indent = "  ".repeat(depth);
        let mut notes = Vec::new();
        if !child.relationships().is_empty() {
            notes.push(format!("{} rel", child.relationships().len()));
        }
        if !child.collections().is_empty() {
            let names: Vec<&str> = child.collections().iter().map(|c| c.name()).collect();
            notes.push(format!("collections: {}", names.join(", ")));
        }

        if notes.is_empty() {
            println!("{}{}", indent, child.name());
        } else {
            println!("{}{}  [{}]", indent, child.name(), notes.join("; "));
        }
        print_tree(&child, depth + 1);
    }
}

fn cmd_bindings(args: &[&str]) -> anyhow::Result<()> {
    let args = CommandArgs::parse(args)?;
    let usage = "matbind bindings <scene> <prim>";
    let scene = args.positional(0, usage)?;
    let prim_path = parse_prim_path(args.positional(1, usage)?)?;

    let stage = open_stage(scene)?;
    let prim = stage.prim_at_path(&prim_path);
    if !prim.is_valid() {
        bail!("prim {} not found", prim_path);
    }

    let api = MaterialBindingApi::new(prim);
    for purpose in Purpose::ALL {
        let bindings = api.bindings(purpose);
        if bindings.is_empty() {
            continue;
        }
        println!("{}:", purpose);
        for binding in &bindings {
            let target = binding
                .material_path()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "<no target>".to_string());
            match binding {
                Binding::Direct(_) => {
                    println!("  direct -> {} ({})", target, binding.strength());
                }
                Binding::Collection(c) => {
                    println!(
                        "  collection {} [{}] -> {} ({})",
                        c.binding_name(),
                        c.collection_path(),
                        target,
                        binding.strength()
                    );
                }
            }
        }
    }
    Ok(())
}

fn cmd_resolve(args: &[&str]) -> anyhow::Result<()> {
    let args = CommandArgs::parse(args)?;
    let usage = "matbind resolve <scene> <prim> [--purpose P] [--collection C] [--settings F]";
    let scene = args.positional(0, usage)?;
    let prim_path = parse_prim_path(args.positional(1, usage)?)?;
    let resolver = args.resolver()?;

    let stage = open_stage(scene)?;
    let prim = stage.prim_at_path(&prim_path);

    match resolver.resolve_token(&prim, args.purpose, args.collection)? {
        Some(material) => println!("{}", material.path()),
        None => println!("<none>"),
    }
    Ok(())
}

fn cmd_resolve_all(args: &[&str]) -> anyhow::Result<()> {
    let args = CommandArgs::parse(args)?;
    let scene = args.positional(0, "matbind resolve-all <scene> [--purpose P] [--collection C] [--settings F]")?;
    let resolver = args.resolver()?;
    let purpose: Purpose = args.purpose.parse()?;

    let stage = open_stage(scene)?;
    let prims: Vec<Prim<'_>> = stage
        .traverse()
        .iter()
        .map(|path| stage.prim_at_path(path))
        .collect();

    let width = prims.iter().map(|p| p.path().as_str().len()).max().unwrap_or(0);
    for (prim, result) in prims.iter().zip(resolver.resolve_many(&prims, purpose, args.collection)) {
        let material = match result? {
            Some(material) => material.path().to_string(),
            None => "<none>".to_string(),
        };
        println!("{:width$}  {}", prim.path().as_str(), material, width = width);
    }
    Ok(())
}
