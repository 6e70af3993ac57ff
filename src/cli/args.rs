//! CLI argument parsing.
//!
//! Hand-rolled so that parsing can be tested with any iterator of strings.

use std::path::PathBuf;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List registered models and their parameters
    List,
    /// Compute one model from `key=value` pairs
    Compute {
        /// Model identifier, e.g. `mmc_n`.
        model: String,
        /// Raw parameter text, in the order given.
        params: Vec<(String, String)>,
        /// Emit JSON instead of text.
        json: bool,
    },
    /// Show the reference formula of a metric
    Formula {
        /// Model identifier.
        model: String,
        /// Metric id or label.
        metric: String,
    },
    /// Evaluate every scenario of a YAML file
    Run {
        /// Path to the scenario file.
        scenario_path: PathBuf,
        /// Force JSON output regardless of the file's report settings.
        json: bool,
    },
    /// Compare the first two scenarios of a YAML file
    Compare {
        /// Path to the scenario file.
        scenario_path: PathBuf,
        /// Emit the table and chart data as JSON.
        json: bool,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// This method is testable as it accepts any iterator of strings,
    /// not just `std::env::args()`.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "list" => Command::List,
            "compute" => Self::parse_compute_command(args),
            "formula" => Self::parse_formula_command(args),
            "run" => Self::parse_run_command(args),
            "compare" => Self::parse_compare_command(args),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    fn has_json_flag(rest: &[String]) -> bool {
        rest.iter().any(|arg| arg == "--json")
    }

    fn parse_compute_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'compute' command requires a model id");
            return Command::Help;
        }

        let mut params = Vec::new();
        let mut json = false;
        for arg in &args[3..] {
            if arg == "--json" {
                json = true;
            } else if let Some((key, value)) = arg.split_once('=') {
                params.push((key.to_string(), value.to_string()));
            } else {
                eprintln!("Ignoring argument '{arg}' (expected key=value)");
            }
        }

        Command::Compute {
            model: args[2].clone(),
            params,
            json,
        }
    }

    fn parse_formula_command(args: &[String]) -> Command {
        if args.len() < 4 {
            eprintln!("Error: 'formula' command requires a model id and a metric");
            return Command::Help;
        }

        Command::Formula {
            model: args[2].clone(),
            metric: args[3].clone(),
        }
    }

    fn parse_run_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'run' command requires scenario path");
            return Command::Help;
        }

        Command::Run {
            scenario_path: PathBuf::from(&args[2]),
            json: Self::has_json_flag(&args[3..]),
        }
    }

    fn parse_compare_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'compare' command requires scenario path");
            return Command::Help;
        }

        Command::Compare {
            scenario_path: PathBuf::from(&args[2]),
            json: Self::has_json_flag(&args[3..]),
        }
    }
}
