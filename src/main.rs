use clap::{Parser as ClapParser, Subcommand};
use mustache_resolver::cli::{
    self, CliError, CompoundOptions, CompoundOutcome, TemporalOptions, TranslateOptions,
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "mustache")]
#[command(about = "Resolve {{mustache}} templates, temporal rules and USE expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a template against JSON data
    Translate {
        /// The template, e.g. "Hello {{User.name}}"
        template: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Variable as key=value; repeatable
        #[arg(long = "var")]
        vars: Vec<String>,

        /// Blank unresolved placeholders instead of failing
        #[arg(long)]
        lenient: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a temporal expression such as "weekday && 08:00-18:00"
    Temporal {
        expression: String,

        /// Instant to evaluate at (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Evaluate an arithmetic expression
    Math { expression: String },

    /// Resolve a USE ... && ... template
    Compound {
        template: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Only validate syntax and declarations
        #[arg(long)]
        validate: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Translate {
            template,
            input,
            vars,
            lenient,
            json,
        } => run_translate(template, input, vars, lenient, json),
        Commands::Temporal { expression, at } => {
            cli::execute_temporal(&TemporalOptions { expression, at }).map(|holds| {
                println!("{}", holds);
            })
        }
        Commands::Math { expression } => cli::execute_math(&expression).map(|value| {
            println!("{}", value);
        }),
        Commands::Compound {
            template,
            input,
            validate,
        } => run_compound(template, input, validate),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Ok((!buffer.trim().is_empty()).then_some(buffer))
        }
        None => Ok(None),
    }
}

fn run_translate(
    template: String,
    input: Option<String>,
    vars: Vec<String>,
    lenient: bool,
    json: bool,
) -> Result<(), CliError> {
    let options = TranslateOptions {
        template,
        input: read_input(input)?,
        vars,
        lenient,
    };

    let result = cli::execute_translate(&options)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result.to_json())?);
        return Ok(());
    }

    for warning in result.warnings() {
        eprintln!("warning: {}", warning);
    }
    match result.translated() {
        Some(text) => {
            println!("{}", text);
            Ok(())
        }
        None => {
            eprintln!("{}", result.failure_reason().unwrap_or_default());
            for error in result.errors() {
                eprintln!("  {}", error);
            }
            std::process::exit(1);
        }
    }
}

fn run_compound(template: String, input: Option<String>, validate: bool) -> Result<(), CliError> {
    let options = CompoundOptions {
        template,
        input: if validate { None } else { read_input(input)? },
        validate_only: validate,
    };

    match cli::execute_compound(&options)? {
        CompoundOutcome::Statement(statement) => println!("{}", statement),
        CompoundOutcome::ConditionNotMet => {
            eprintln!("condition not met");
            std::process::exit(2);
        }
        CompoundOutcome::Validation(report) if report.valid => println!("valid"),
        CompoundOutcome::Validation(report) => {
            for error in &report.errors {
                eprintln!("{}", error);
            }
            std::process::exit(1);
        }
    }
    Ok(())
}
