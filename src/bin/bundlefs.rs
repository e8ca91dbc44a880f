//! bundlefs command-line packer

use bundlefs::exit_codes::{EXIT_INVALID_ARGS, EXIT_PANIC, EXIT_SUCCESS, exit_code_for};
use bundlefs::{ArtifactFormat, PackOptions, build_bundle};
use clap::Parser;
use std::{env, panic, path::PathBuf, process};

const VERSION: &str = bundlefs::version::VERSION;

#[derive(Parser, Debug)]
#[command(
    version = VERSION,
    about = "Embed a file tree into generated source as a read-only filesystem"
)]
struct Args {
    /// Files or directories to pack
    #[arg(required = true)]
    roots: Vec<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name of the generated module
    #[arg(long, default_value = "main")]
    pkg: String,

    /// Leading path to strip from every packed file
    #[arg(long, default_value = "")]
    prefix: String,

    /// Regex of slash paths to skip
    #[arg(long)]
    ignore: Option<String>,

    /// Artifact format
    #[arg(long, value_enum, default_value_t = ArtifactFormat::Rust)]
    format: ArtifactFormat,

    /// Record file modification times
    #[arg(long)]
    modtime: bool,

    /// Log level (trace, debug, info, warn, error, or json:<level>)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    // Set up panic handler to return specific exit code
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {panic_info}");
        process::exit(EXIT_PANIC);
    }));

    match panic::catch_unwind(run) {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in bundlefs");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    // Handle --version before clap
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("bundlefs {}", bundlefs::version::full_version());
        return EXIT_SUCCESS;
    }

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                EXIT_INVALID_ARGS
            } else {
                EXIT_SUCCESS
            };
        }
    };

    if let Some(ref level) = args.log_level {
        bundlefs::logger::JsonLogger::init_with_level(level, "CLI --log-level");
    } else {
        bundlefs::logger::JsonLogger::init();
    }

    let options = PackOptions {
        output: args.output,
        pkg: args.pkg,
        prefix: args.prefix,
        ignore: args.ignore,
        format: args.format,
        include_modtime: args.modtime,
    };

    match build_bundle(&args.roots, &options) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("bundlefs: {e}");
            exit_code_for(&e)
        }
    }
}
