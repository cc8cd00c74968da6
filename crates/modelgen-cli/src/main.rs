//! Modelgen CLI.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use modelgen_compiler::{
    CompileResult, Compiler, CompilerConfig, CompilerError, GeneratedOutput, GeneratorSettings,
};

mod ui;

#[derive(Parser)]
#[command(name = "modelgen")]
#[command(about = "Modelgen - implementation classes and TypeScript definitions from annotated models")]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by every command.
#[derive(Args)]
struct InputArgs {
    /// Directory with the host's metadata documents
    #[arg(short, long, default_value = "build/modelgen/metadata")]
    metadata: PathBuf,

    /// Generator settings file
    #[arg(short, long, default_value = "modelgen.toml")]
    config: PathBuf,

    /// Metadata format
    #[arg(short, long, default_value = "json")]
    language: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate class descriptions and TypeScript definitions
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory
        #[arg(short, long, default_value = "build/modelgen/generated")]
        output: PathBuf,
    },

    /// Run the whole pass without writing anything
    Check {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print (or write) the TypeScript definitions only
    Types {
        #[command(flatten)]
        input: InputArgs,

        /// Output file; stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate { input, output } => generate(&input, &output)?,
        Commands::Check { input } => check(&input)?,
        Commands::Types { input, output } => types(&input, output.as_deref())?,
    }

    Ok(())
}

/// `MODELGEN_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("MODELGEN_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn compiler(input: &InputArgs, out_dir: &Path) -> Result<Compiler, CompilerError> {
    let settings = GeneratorSettings::load_or_default(&input.config)?;
    Ok(Compiler::new(CompilerConfig {
        metadata_dir: input.metadata.clone(),
        out_dir: out_dir.to_path_buf(),
        language: input.language.clone(),
        settings,
    }))
}

fn generate(input: &InputArgs, output: &Path) -> miette::Result<()> {
    let start = Instant::now();
    let spinner = ui::spinner("Generating...");

    let compiler = compiler(input, output)?;
    let generated = match compiler.generate().and_then(|g| compiler.write_output(&g).map(|_| g)) {
        Ok(generated) => generated,
        Err(e) => {
            spinner.finish_and_clear();
            ui::nope_header();
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();

    let result = CompileResult::of(&generated);
    ui::success(&format!("Wrote {}", output.display()));
    println!();
    print_classes(&generated);
    ui::summary(result.models, result.classes, result.type_definitions);
    println!();
    ui::timing("Done", start.elapsed().as_millis());
    Ok(())
}

fn check(input: &InputArgs) -> miette::Result<()> {
    let spinner = ui::spinner("Checking models...");
    let compiler = compiler(input, Path::new(""))?;
    match compiler.check() {
        Ok(result) => {
            spinner.finish_and_clear();
            ui::looking_good();
            println!();
            ui::summary(result.models, result.classes, result.type_definitions);
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            ui::nope_header();
            Err(e.into())
        }
    }
}

fn types(input: &InputArgs, output: Option<&Path>) -> miette::Result<()> {
    let compiler = compiler(input, Path::new(""))?;
    let declarations = compiler.project_types()?;
    let rendered = declarations.render();

    match output {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|e| CompilerError::io(path, e.to_string()))?;
            ui::success(&format!("{} definitions written to {}", declarations.len(), path.display()));
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Lists every generated class in a box.
fn print_classes(generated: &GeneratedOutput) {
    if generated.classes.is_empty() {
        ui::info("No annotated models found.");
        println!();
        return;
    }

    ui::box_header("CLASSES");
    ui::box_line("");
    for class in &generated.classes {
        ui::box_line(&ui::class_line(&class.name, &class.target, class.properties.len(), class.methods.len()));
    }
    ui::box_line("");
    ui::box_footer();
    for class in &generated.classes {
        for note in &class.notes {
            ui::dim(&format!("{}: {}", class.name, note));
        }
    }
    println!();
}
