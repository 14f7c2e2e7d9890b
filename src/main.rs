mod debug_report;

use demophin::dmrs::Dmrs;
use demophin::{AceOptions, codec, generate, parse_sentence};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DEMOPHIN_LOG";
const GRAMMAR_ENV: &str = "DEMOPHIN_GRAMMAR";
const ACE_ENV: &str = "DEMOPHIN_ACE";

fn main() {
    init_logging();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Task {
    Parse { grammar: PathBuf },
    Generate { grammar: PathBuf },
    /// Read SimpleMRS and derive DMRS without an engine.
    Dmrs,
}

struct CliConfig {
    input: String,
    task: Task,
    ace: AceOptions,
    json: bool,
    color: bool,
}

fn run(config: &CliConfig) -> demophin::Result<()> {
    match &config.task {
        Task::Dmrs => {
            let graphs: Vec<Dmrs> = codec::loads(&config.input)?.iter().map(Dmrs::from_mrs).collect();
            if config.json {
                println!("{}", serde_json::to_string(&graphs)?);
            } else {
                debug_report::print_graphs(&graphs, config.color);
            }
        }
        Task::Parse { grammar } => {
            let Some(parsed) = parse_sentence(&config.input, grammar, &config.ace, None)? else {
                return Ok(());
            };
            if config.json {
                println!("{}", serde_json::to_string(&parsed)?);
            } else {
                debug_report::print_parse(&parsed, config.color);
            }
        }
        Task::Generate { grammar } => {
            // validate locally before handing the graph to the engine
            let m = codec::loads_one(&config.input)?;
            let response = generate(grammar, &codec::dumps_one(&m, &Default::default()), &config.ace)?;
            if config.json {
                println!("{}", serde_json::to_string(&response)?);
            } else {
                debug_report::print_generation(&response, config.color);
            }
        }
    }
    Ok(())
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut mode = "parse";
    let mut grammar = std::env::var_os(GRAMMAR_ENV).map(PathBuf::from);
    let mut ace = AceOptions::default();
    if let Some(executable) = std::env::var_os(ACE_ENV) {
        ace.executable = PathBuf::from(executable);
    }
    let mut json = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("demophin {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "--generate" => mode = "generate",
            "--mrs" => mode = "mrs",
            "--grammar" | "-g" => {
                let value = args.next().ok_or_else(|| "error: --grammar expects a value".to_string())?;
                grammar = Some(PathBuf::from(value));
            }
            "--ace" => {
                let value = args.next().ok_or_else(|| "error: --ace expects a value".to_string())?;
                ace.executable = PathBuf::from(value);
            }
            "--arg" => {
                let value = args.next().ok_or_else(|| "error: --arg expects a value".to_string())?;
                ace.cmdargs.push(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--grammar=") => {
                grammar = Some(PathBuf::from(arg.trim_start_matches("--grammar=")));
            }
            _ if arg.starts_with("--ace=") => {
                ace.executable = PathBuf::from(arg.trim_start_matches("--ace="));
            }
            _ if arg.starts_with("--arg=") => {
                ace.cmdargs.push(arg.trim_start_matches("--arg=").to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                input = Some(std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" "));
                break;
            }
        }
    }

    let task = match (mode, grammar) {
        ("mrs", _) => Task::Dmrs,
        (_, None) => return Err(format!("error: --grammar is required (or set {GRAMMAR_ENV})")),
        ("generate", Some(grammar)) => Task::Generate { grammar },
        (_, Some(grammar)) => Task::Parse { grammar },
    };

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, task, ace, json, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "demophin {version}

Parse sentences with ACE and show their DMRS, or read SimpleMRS directly.

Usage:
  demophin [OPTIONS] --grammar <file> [--] <sentence...>
  demophin [OPTIONS] --grammar <file> --generate < graph.mrs
  demophin [OPTIONS] --mrs < graphs.mrs

Options:
  -g, --grammar <file>       Compiled grammar image. Default: ${grammar_env}
  --ace <program>            Engine executable. Default: ${ace_env}, else `ace`.
  --arg <value>              Extra engine argument (repeatable).
  --generate                 Input is one SimpleMRS graph; print realizations.
  --mrs                      Input is SimpleMRS; derive DMRS without an engine.
  --json                     Print JSON instead of the colored report.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Input is read from the remaining arguments, or stdin when none are given.
Set ${log_env} (e.g. `debug`) to see engine traffic on stderr.

Exit codes:
  0  Success.
  1  Engine, input or I/O error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        grammar_env = GRAMMAR_ENV,
        ace_env = ACE_ENV,
        log_env = LOG_ENV,
    )
}
