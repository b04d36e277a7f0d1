use clap::{Parser as ClapParser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zinc_haystack::cli::{
    self, CheckOptions, CliError, ConvertOptions, Format, QueryOptions,
};

#[derive(ClapParser)]
#[command(name = "zinc")]
#[command(about = "zinc - Haystack filters and Zinc grids on the command line")]
#[command(version)]
struct Cli {
    /// Log parsing and evaluation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a filter and print its canonical form
    Check {
        /// The filter to validate
        filter: String,
    },

    /// Print the rows of a Zinc grid that match a filter
    Query {
        /// The filter to run
        filter: String,

        /// Zinc file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write Haystack JSON instead of Zinc
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Attach display names to references found in the input
        #[arg(long)]
        fill_dis: bool,
    },

    /// Convert Zinc to Haystack JSON, or back with --from-json
    Convert {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Read Haystack JSON and write Zinc
        #[arg(long)]
        from_json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check { filter } => run_check(filter),
        Commands::Query {
            filter,
            input,
            json,
            pretty,
            fill_dis,
        } => read_input(input).and_then(|input| {
            let options = QueryOptions {
                filter,
                input,
                format: Format::from_flags(json, pretty),
                fill_dis,
            };
            print_output(cli::execute_query(&options))
        }),
        Commands::Convert {
            input,
            from_json,
            pretty,
        } => read_input(input).and_then(|input| {
            let options = ConvertOptions {
                input,
                from_json,
                pretty,
            };
            print_output(cli::execute_convert(&options))
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "zinc_haystack=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_check(filter: String) -> Result<(), CliError> {
    let result = cli::execute_check(&CheckOptions { filter })?;
    println!("{}", result.canonical);
    Ok(())
}

fn read_input(input: Option<PathBuf>) -> Result<Option<String>, CliError> {
    match input {
        Some(path) => Ok(Some(fs::read_to_string(path)?)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn print_output(output: Result<String, CliError>) -> Result<(), CliError> {
    let output = output?;
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
    Ok(())
}
