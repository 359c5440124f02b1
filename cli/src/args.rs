//! Parsing command-line arguments.

use clap::{command, error::ErrorKind, value_parser, Arg, ArgAction, Error};
use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use torlife_lib::{Config, Rule};

/// Where the initial grid comes from.
pub(crate) enum Source {
    /// A pattern file, in RLE or Plaintext format.
    File(PathBuf),
    /// A random grid.
    Random,
}

/// How the grids are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Format {
    Plain,
    Rle,
    Json,
}

/// A struct to store the parse results.
pub(crate) struct Args {
    pub(crate) config: Config,
    pub(crate) source: Source,
    pub(crate) format: Format,
    pub(crate) last: bool,
    pub(crate) time_limit: Option<Duration>,
}

/// Reads a configuration file. The format is chosen by the extension:
/// `.yaml`/`.yml` for YAML, `.toml` for TOML, JSON otherwise.
fn read_config(path: &Path) -> Result<Config, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let config = match path.extension().and_then(OsStr::to_str) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text).map_err(|e| e.to_string()),
        Some("toml") => toml::from_str(&text).map_err(|e| e.to_string()),
        _ => serde_json::from_str(&text).map_err(|e| e.to_string()),
    };
    config.map_err(|e| format!("{}: {}", path.display(), e))
}

fn parse_rule(s: &str) -> Result<Rule, String> {
    s.parse().map_err(|e: torlife_lib::Error| e.to_string())
}

fn parse_density(s: &str) -> Result<f64, String> {
    let density: f64 = s.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    if (0.0..=1.0).contains(&density) {
        Ok(density)
    } else {
        Err(String::from("density must be between 0 and 1"))
    }
}

impl Args {
    /// Parses the command-line arguments.
    pub(crate) fn parse() -> Result<Self, Error> {
        let matches = command!()
            .long_about(
                "Evolves a Life-like cellular automaton on a toroidal grid\n\
                 \n\
                 The initial grid is read from a pattern file, or generated at random.\n\
                 Every generation is printed in order, each marked with whether it \
                 equals the previous one.\n\
                 \n\
                 Patterns are read in RLE format (files ending with `.rle`) or \
                 Plaintext format (any other file).\n\
                 A pattern smaller than the grid is placed at the top-left corner.\n",
            )
            .allow_negative_numbers(true)
            .arg(
                Arg::new("PATTERN")
                    .help("Pattern file of the initial grid")
                    .index(1)
                    .value_parser(value_parser!(PathBuf))
                    .required_unless_present("RANDOM"),
            )
            .arg(
                Arg::new("RANDOM")
                    .help("Starts from a random grid instead of a pattern file")
                    .long("random")
                    .action(ArgAction::SetTrue)
                    .conflicts_with("PATTERN"),
            )
            .arg(
                Arg::new("SIZE")
                    .help("Width and height of the grid")
                    .long_help(
                        "Width and height of the grid\n\
                         Defaults to the size of the pattern, or 16 for random grids.\n",
                    )
                    .short('s')
                    .long("size")
                    .value_parser(value_parser!(u64).range(1..)),
            )
            .arg(
                Arg::new("DENSITY")
                    .help("Probability for each cell of a random grid to be alive")
                    .long("density")
                    .value_parser(parse_density),
            )
            .arg(
                Arg::new("SEED")
                    .help("Seed of the random grid")
                    .long("seed")
                    .value_parser(value_parser!(u64)),
            )
            .arg(
                Arg::new("RULE")
                    .help("Rule of the cellular automaton")
                    .long_help(
                        "Rule of the cellular automaton\n\
                         Supports totalistic Life-like rules whose survival counts form \
                         a contiguous range, e.g., B3/S23 or B36/S23.\n",
                    )
                    .short('r')
                    .long("rule")
                    .value_parser(parse_rule),
            )
            .arg(
                Arg::new("DURATION")
                    .help("Number of generations to produce, including the initial one")
                    .short('d')
                    .long("duration")
                    .value_parser(value_parser!(isize)),
            )
            .arg(
                Arg::new("CONFIG")
                    .help("Reads the configuration from a JSON, YAML or TOML file")
                    .long_help(
                        "Reads the configuration from a JSON, YAML or TOML file\n\
                         Options given on the command line override the file.\n",
                    )
                    .short('c')
                    .long("config")
                    .value_parser(value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("FORMAT")
                    .help("Output format")
                    .short('f')
                    .long("format")
                    .value_parser(["plain", "rle", "json"])
                    .default_value("plain"),
            )
            .arg(
                Arg::new("LAST")
                    .help("Prints only the last generation")
                    .long("last")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("TIME")
                    .help("Stops after this many seconds and prints what has been computed")
                    .short('t')
                    .long("time-limit")
                    .value_parser(value_parser!(f64)),
            )
            .try_get_matches()?;

        let mut config = match matches.get_one::<PathBuf>("CONFIG") {
            Some(path) => {
                read_config(path).map_err(|e| Error::raw(ErrorKind::InvalidValue, e + "\n"))?
            }
            None => Config::default(),
        };
        if let Some(&size) = matches.get_one::<u64>("SIZE") {
            config.size = Some(size as usize);
        }
        if let Some(&density) = matches.get_one::<f64>("DENSITY") {
            config.density = density;
        }
        if let Some(&seed) = matches.get_one::<u64>("SEED") {
            config.seed = Some(seed);
        }
        if let Some(rule) = matches.get_one::<Rule>("RULE") {
            config.rule = rule.clone();
        }
        if let Some(&duration) = matches.get_one::<isize>("DURATION") {
            config.duration = duration;
        }

        let source = match matches.get_one::<PathBuf>("PATTERN") {
            Some(path) => Source::File(path.clone()),
            None => Source::Random,
        };
        let format = match matches.get_one::<String>("FORMAT").map(String::as_str) {
            Some("rle") => Format::Rle,
            Some("json") => Format::Json,
            _ => Format::Plain,
        };
        let last = matches.get_flag("LAST");
        let time_limit = match matches.get_one::<f64>("TIME") {
            Some(&secs) if secs.is_finite() && secs >= 0.0 => Some(Duration::from_secs_f64(secs)),
            Some(&secs) => {
                return Err(Error::raw(
                    ErrorKind::InvalidValue,
                    format!("invalid time limit: {}\n", secs),
                ))
            }
            None => None,
        };

        Ok(Args {
            config,
            source,
            format,
            last,
            time_limit,
        })
    }
}
