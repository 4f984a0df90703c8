use std::{env, path::Path};

use log::LevelFilter;
use tsp_bb_derive::{CliOptions, CliValue, KvDisplay};

use crate::{Error, Result};

/// Runtime options for reading locations and running the exact search.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct SolverOptions {
    /// Location file to read. Empty means stdin.
    #[cli(long = "input", alias = "file")]
    pub input: String,
    /// Output file for the route. Empty means stdout.
    #[cli(long = "output")]
    pub output: String,
    /// Field separator of the location file.
    #[cli(long = "delimiter", parse_with = "parse_delimiter")]
    #[kv(fmt = "debug")]
    pub delimiter: char,
    /// Log completion percentages while searching.
    #[cli(long = "progress")]
    pub progress: bool,
    /// Prune partial paths costing more than half the best circuit before the midpoint.
    #[cli(long = "half-bound")]
    pub half_bound: bool,
    /// Location count above which a slow-search warning is logged.
    #[cli(long = "warn-above")]
    pub warn_above: usize,
    /// Structured logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    #[cli(long = "log-timestamp")]
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    #[cli(long = "log-output")]
    pub log_output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            delimiter: ',',
            progress: true,
            half_bound: true,
            warn_above: 14,
            log_level: LogLevel::Info,
            log_format: LogFormat::Compact,
            log_timestamp: false,
            log_output: String::new(),
        }
    }
}

impl SolverOptions {
    /// Parses the process arguments. `None` means `--help` was requested.
    pub fn from_args() -> Result<Option<Self>> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Ok(None);
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if !options.apply_cli_option(&name, value)? {
                return Err(Error::invalid_input(format!(
                    "Unknown option: --{name}\n\n{}",
                    Self::usage()
                )));
            }
        }

        Ok(Some(options))
    }

    pub fn usage() -> String {
        format!(
            concat!(
                "Usage:\n",
                "  tsp-bb [options] --input locations.csv\n",
                "  tsp-bb [options] < locations.csv\n\n",
                "Location records are lines starting with a digit:\n",
                "  id,name,street,house number,postal code,city,latitude,longitude\n\n",
                "Options:\n",
                "  --input <path>            (alias --file)\n",
                "  --output <path>\n",
                "  --delimiter <char>\n",
                "  --progress[=<bool>] | --no-progress\n",
                "  --half-bound[=<bool>] | --no-half-bound\n",
                "  --warn-above <usize>\n",
                "  --log-level <{}>\n",
                "  --log-format <{}>\n",
                "  --log-timestamp[=<bool>] | --no-log-timestamp\n",
                "  --log-output <path>\n",
                "  --help\n",
                "\n",
                "Examples:\n",
                "  tsp-bb --file locations.csv\n",
                "  tsp-bb --input locations.csv --output route.txt --no-progress\n",
                "  tsp-bb --log-level=debug --log-format=pretty < locations.csv\n",
            ),
            LogLevel::expected(),
            LogFormat::expected(),
        )
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_empty_path(&self.input)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_empty_path(&self.output)
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_empty_path(&self.log_output)
    }
}

fn non_empty_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}

fn parse_delimiter(raw: &str) -> Result<char> {
    match raw {
        "tab" | "\\t" => Ok('\t'),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(Error::invalid_input(format!(
                    "Invalid value for --delimiter: {raw} (expected a single character)"
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use log::LevelFilter;

    use super::{LogFormat, LogLevel, SolverOptions, parse_delimiter};

    #[test]
    fn log_level_maps_to_expected_filter() {
        assert_eq!(LogLevel::Error.to_filter(), LevelFilter::Error);
        assert_eq!(LogLevel::Warn.to_filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::Info.to_filter(), LevelFilter::Info);
        assert_eq!(LogLevel::Debug.to_filter(), LevelFilter::Debug);
        assert_eq!(LogLevel::Trace.to_filter(), LevelFilter::Trace);
        assert_eq!(LogLevel::Off.to_filter(), LevelFilter::Off);
    }

    #[test]
    fn log_level_parse_accepts_alias_and_reports_expected_values() {
        assert_eq!(LogLevel::parse("WARNING").expect("alias"), LogLevel::Warn);
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogFormat::parse("Pretty").expect("mixed case"), LogFormat::Pretty);
        let err = LogLevel::parse("loud").expect_err("unknown level");
        assert!(
            err.to_string()
                .contains("Invalid value for --log-level: loud (expected error|warn|info|debug|trace|off)")
        );
    }

    #[test]
    fn parse_from_iter_applies_known_cli_options() {
        let options = SolverOptions::parse_from_iter([
            "--input=points.csv",
            "--output",
            "route.txt",
            "--delimiter=;",
            "--no-progress",
            "--half-bound=false",
            "--warn-above=9",
            "--log-level=debug",
            "--log-format=pretty",
            "--log-timestamp",
            "--log-output=run.log",
        ])
        .expect("parse options")
        .expect("not a help request");

        assert_eq!(options.input, "points.csv");
        assert_eq!(options.output, "route.txt");
        assert_eq!(options.delimiter, ';');
        assert!(!options.progress);
        assert!(!options.half_bound);
        assert_eq!(options.warn_above, 9);
        assert_eq!(options.log_level, LogLevel::Debug);
        assert_eq!(options.log_format, LogFormat::Pretty);
        assert!(options.log_timestamp);
        assert_eq!(options.log_output, "run.log");
    }

    #[test]
    fn parse_from_iter_accepts_file_alias() {
        let options = SolverOptions::parse_from_iter(["--file", "stops.csv"])
            .expect("parse options")
            .expect("not a help request");
        assert_eq!(options.input_path(), Some(Path::new("stops.csv")));
    }

    #[test]
    fn parse_from_iter_rejects_negated_flag_with_value() {
        let err = SolverOptions::parse_from_iter(["--no-progress=true"])
            .expect_err("expected flag value rejection");
        assert!(err.to_string().contains("does not take a value"));
    }

    #[test]
    fn parse_from_iter_rejects_unknown_option() {
        let err = SolverOptions::parse_from_iter(["--unknown-opt=1"])
            .expect_err("expected unknown option error");
        assert!(err.to_string().contains("Unknown option: --unknown-opt"));
    }

    #[test]
    fn parse_from_iter_rejects_unexpected_positional_argument() {
        let err = SolverOptions::parse_from_iter(["locations.csv"])
            .expect_err("expected positional error");
        assert!(
            err.to_string()
                .contains("Unexpected argument: locations.csv")
        );
    }

    #[test]
    fn parse_from_iter_requires_value_for_input() {
        let err =
            SolverOptions::parse_from_iter(["--input"]).expect_err("missing value should fail");
        assert!(err.to_string().contains("Missing value for --input"));
    }

    #[test]
    fn parse_from_iter_rejects_invalid_boolean() {
        let err = SolverOptions::parse_from_iter(["--progress=maybe"])
            .expect_err("invalid bool should fail");
        assert!(
            err.to_string()
                .contains("Invalid boolean for --progress: maybe")
        );
    }

    #[test]
    fn parse_from_iter_help_short_circuits_without_error() {
        let parsed = SolverOptions::parse_from_iter(["--input=a.csv", "--help", "--bogus"])
            .expect("help is not an error");
        assert!(parsed.is_none());
        assert!(
            SolverOptions::parse_from_iter(["-h"])
                .expect("short help")
                .is_none()
        );
    }

    #[test]
    fn usage_lists_choices_for_enum_options() {
        let usage = SolverOptions::usage();
        assert!(usage.starts_with("Usage:"));
        assert!(usage.contains("<compact|pretty>"));
        assert!(usage.contains("<error|warn|info|debug|trace|off>"));
    }

    #[test]
    fn defaults_match_interactive_use() {
        let options = SolverOptions::default();
        assert!(options.progress);
        assert!(options.half_bound);
        assert_eq!(options.delimiter, ',');
        assert_eq!(options.input_path(), None);
        assert_eq!(options.output_path(), None);
        assert_eq!(options.log_output_path(), None);
    }

    #[test]
    fn dash_means_standard_streams() {
        let options = SolverOptions::parse_from_iter(["--input=-", "--output=-"])
            .expect("parse options")
            .expect("not a help request");
        assert_eq!(options.input_path(), None);
        assert_eq!(options.output_path(), None);
    }

    #[test]
    fn parse_delimiter_accepts_single_characters_and_tab() {
        assert_eq!(parse_delimiter(";").expect("semicolon"), ';');
        assert_eq!(parse_delimiter("tab").expect("tab"), '\t');
        assert!(parse_delimiter(",,").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn display_lists_every_option() {
        let rendered = SolverOptions::default().to_string();
        assert!(rendered.contains("delimiter"));
        assert!(rendered.contains("','"));
        assert!(rendered.contains("half_bound"));
        assert!(rendered.contains("log_output"));
    }
}
