// SPDX-License-Identifier: MIT OR Apache-2.0
//! fionn CLI binary: flatten, infer schema, prune, and rewrite JSON.

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code for an I/O failure or a JSON parse error.
const IO_OR_PARSE_EXIT: u8 = 1;

/// The mode-selector flags, in flag-table order; used only to find
/// which one appears *last* on the command line, since the modes are
/// mutually exclusive and the last one given wins.
const MODE_IDS: [&str; 6] = ["flatten", "schema", "remove_empty", "remove_nulls", "replace_keys", "replace_values"];

fn command() -> Command {
    Command::new("fionn")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A high-throughput JSON transformation engine: flatten, infer schema, prune, and rewrite.")
        .arg(Arg::new("flatten").short('f').long("flatten").action(ArgAction::SetTrue).help("Select flatten mode (default)"))
        .arg(Arg::new("schema").short('s').long("schema").action(ArgAction::SetTrue).help("Select schema inference"))
        .arg(
            Arg::new("remove_empty")
                .short('e')
                .long("remove-empty")
                .action(ArgAction::SetTrue)
                .help("Select remove-empty-strings"),
        )
        .arg(
            Arg::new("remove_nulls")
                .short('n')
                .long("remove-nulls")
                .action(ArgAction::SetTrue)
                .help("Select remove-nulls"),
        )
        .arg(
            Arg::new("replace_keys")
                .short('r')
                .long("replace-keys")
                .num_args(2)
                .value_names(["PATTERN", "REPLACEMENT"])
                .help("Select key rewrite"),
        )
        .arg(
            Arg::new("replace_values")
                .short('v')
                .long("replace-values")
                .num_args(2)
                .value_names(["PATTERN", "REPLACEMENT"])
                .help("Select value rewrite"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .num_args(0..=1)
                .default_missing_value("0")
                .value_parser(clap::value_parser!(usize))
                .help("Enable parallel; N=0 auto"),
        )
        .arg(Arg::new("pretty").short('p').long("pretty").action(ArgAction::SetTrue).help("Pretty-print output"))
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("Write to file (else stdout)"),
        )
        .arg(
            Arg::new("input")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Input file (else stdin)"),
        )
}

fn last_occurrence(matches: &ArgMatches, id: &str) -> Option<usize> {
    matches.indices_of(id).and_then(Iterator::max)
}

/// The id of whichever mode flag appears last in argv, or `"flatten"`
/// (the documented default) if none were given.
fn selected_mode_id(matches: &ArgMatches) -> &'static str {
    MODE_IDS
        .iter()
        .filter_map(|id| last_occurrence(matches, id).map(|idx| (idx, *id)))
        .max_by_key(|(idx, _)| *idx)
        .map_or("flatten", |(_, id)| id)
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        None => read_stdin(),
        Some(p) if p.as_os_str() == "-" => read_stdin(),
        Some(p) => fs::read_to_string(p),
    }
}

fn read_stdin() -> io::Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_output(path: Option<&String>, text: &str) -> io::Result<()> {
    match path {
        Some(p) => fs::write(p, text),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(text.as_bytes())?;
            stdout.write_all(b"\n")
        }
    }
}

fn pretty_printed(text: &str) -> anyhow::Result<String> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

fn two_values<'a>(matches: &'a ArgMatches, id: &str) -> (&'a str, &'a str) {
    let mut values = matches.get_many::<String>(id).expect("num_args(2) guarantees both values");
    let pattern = values.next().expect("pattern");
    let replacement = values.next().expect("replacement");
    (pattern, replacement)
}

fn run(matches: &ArgMatches) -> anyhow::Result<String> {
    let text = read_input(matches.get_one::<PathBuf>("input"))?;

    let use_workers = matches.contains_id("threads");
    let workers = matches.get_one::<usize>("threads").copied().unwrap_or(0);

    let result = match selected_mode_id(matches) {
        "schema" => fionn::schema(&text, use_workers, workers)?,
        "remove_empty" => fionn::remove_empty(&text)?,
        "remove_nulls" => fionn::remove_nulls(&text)?,
        "replace_keys" => {
            let (pattern, replacement) = two_values(matches, "replace_keys");
            fionn::replace_keys(&text, pattern, replacement)?
        }
        "replace_values" => {
            let (pattern, replacement) = two_values(matches, "replace_values");
            fionn::replace_values(&text, pattern, replacement)?
        }
        _ => fionn::flatten(&text, use_workers, workers)?,
    };

    if matches.get_flag("pretty") {
        pretty_printed(&result)
    } else {
        Ok(result)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let matches = command().get_matches();

    match run(&matches) {
        Ok(text) => match write_output(matches.get_one::<String>("output"), &text) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::from(IO_OR_PARSE_EXIT)
            }
        },
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(IO_OR_PARSE_EXIT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_from(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["fionn"];
        argv.extend_from_slice(args);
        command().try_get_matches_from(argv).unwrap()
    }

    #[test]
    fn defaults_to_flatten() {
        assert_eq!(selected_mode_id(&matches_from(&[])), "flatten");
    }

    #[test]
    fn last_mode_flag_wins() {
        assert_eq!(selected_mode_id(&matches_from(&["-s", "-e"])), "remove_empty");
        assert_eq!(selected_mode_id(&matches_from(&["-e", "-s"])), "schema");
    }

    #[test]
    fn replace_keys_participates_in_mode_ordering() {
        let matches = matches_from(&["-s", "-r", "^old_", ""]);
        assert_eq!(selected_mode_id(&matches), "replace_keys");
    }

    #[test]
    fn threads_flag_defaults_to_auto_when_bare() {
        let matches = matches_from(&["-t"]);
        assert!(matches.contains_id("threads"));
        assert_eq!(matches.get_one::<usize>("threads").copied(), Some(0));
    }

    #[test]
    fn threads_flag_absent_means_no_parallelism_requested() {
        let matches = matches_from(&[]);
        assert!(!matches.contains_id("threads"));
    }
}
