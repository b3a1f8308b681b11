use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use typed_env::util::format_doc;
use typed_env::{
    Descriptor, Environment, GenerateOptions, RenderMode, ScalarKind, Schema, TypedEnvError,
    check, is_public, load_schema, with_typed_env_in,
};

#[derive(Parser)]
#[command(name = "typed-env")]
#[command(about = "Validate environment variables and generate typed env modules", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the environment and write env.client.ts / env.server.ts
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory (defaults to <project-dir>/env)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Emit `string` instead of literal unions
        #[arg(long)]
        strip_literals: bool,
    },

    /// Validate the environment without writing anything
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Schema file (.toml, .yaml, .yml or .json)
    #[arg(short, long, env = "TYPED_ENV_SCHEMA")]
    schema: PathBuf,

    /// Project root; dotenv files are read from here
    #[arg(short, long, default_value = ".")]
    project_dir: PathBuf,

    /// Do not read .env files
    #[arg(long)]
    no_dotenv: bool,
}

impl SourceArgs {
    fn load(&self) -> Result<(Schema, Environment), TypedEnvError> {
        let schema = load_schema(&self.schema)?;
        let mut env = Environment::from_process();
        if !self.no_dotenv {
            env = env.with_dotenv_dir(&self.project_dir)?;
        }
        Ok((schema, env))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug {
        LevelFilter::DEBUG
    } else if cli.verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), TypedEnvError> {
    match command {
        Commands::Generate {
            source,
            out_dir,
            strip_literals,
        } => {
            let (schema, env) = source.load()?;
            let mut options = GenerateOptions::in_dir(&source.project_dir);
            if let Some(dir) = out_dir {
                options.out_dir = dir;
            }
            if strip_literals {
                options = options.with_mode(RenderMode::Generic);
            }
            with_typed_env_in((), &schema, &env, &options)?;
            println!(
                "wrote {} and {}",
                options.client_path().display(),
                options.server_path().display()
            );
            Ok(())
        }
        Commands::Check { source } => {
            let (schema, env) = source.load()?;
            check(&schema, &env)?;
            for spec in schema.fields() {
                let ty = match &spec.descriptor {
                    Descriptor::Scalar(ScalarKind::String) => "string".to_string(),
                    Descriptor::Scalar(ScalarKind::Number) => "number".to_string(),
                    Descriptor::Enumeration(members) => members.join(" | "),
                };
                let scope = if is_public(&spec.name) { "client" } else { "server" };
                let line = format!("  {:<32} {:<7} {}", spec.name, scope, ty);
                match format_doc(spec.doc.as_deref()) {
                    Some(doc) => println!("{line}  # {doc}"),
                    None => println!("{line}"),
                }
            }
            println!("ok: {} variables match the schema", schema.len());
            Ok(())
        }
    }
}
