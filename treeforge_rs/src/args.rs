use std::path::PathBuf;

use crate::types::{ColorMode, OutputMode};

/// Flags and positionals shared by every subcommand.
pub struct ParsedArgs {
    pub positionals: Vec<String>,
    pub name: Option<String>,
    pub output_path: Option<PathBuf>,
    pub branch: Option<String>,
    pub path_filter: Option<String>,
    pub list_branches: bool,
    pub color: ColorMode,
    pub output: OutputMode,
    pub show_help: bool,
    pub show_version: bool,
}

impl Default for ParsedArgs {
    fn default() -> Self {
        Self {
            positionals: Vec::new(),
            name: None,
            output_path: None,
            branch: None,
            path_filter: None,
            list_branches: false,
            color: ColorMode::Auto,
            output: OutputMode::Human,
            show_help: false,
            show_version: false,
        }
    }
}

fn parse_color_mode(raw: &str) -> Result<ColorMode, String> {
    match raw {
        "auto" => Ok(ColorMode::Auto),
        "always" => Ok(ColorMode::Always),
        "never" => Ok(ColorMode::Never),
        _ => Err("--color expects auto|always|never".to_string()),
    }
}

/// Parse everything after the subcommand. Unknown flags are errors;
/// a lone `-` is a positional (stdin).
pub fn parse_args(raw: &[String]) -> Result<ParsedArgs, String> {
    let mut args = ParsedArgs::default();
    let mut i = 0;

    while i < raw.len() {
        let arg = raw[i].as_str();
        match arg {
            "--help" | "-h" => args.show_help = true,
            "--version" | "-V" => args.show_version = true,
            "--json" => args.output = OutputMode::Json,
            "--branches" => args.list_branches = true,
            "--color" => {
                let value = expect_value(raw, i, "--color")?;
                args.color = parse_color_mode(value)?;
                i += 1;
            }
            "--name" | "-n" => {
                args.name = Some(expect_value(raw, i, arg)?.to_string());
                i += 1;
            }
            "--output" | "-o" => {
                args.output_path = Some(PathBuf::from(expect_value(raw, i, arg)?));
                i += 1;
            }
            "--branch" | "-b" => {
                args.branch = Some(expect_value(raw, i, arg)?.to_string());
                i += 1;
            }
            "--path" => {
                args.path_filter = Some(expect_value(raw, i, "--path")?.to_string());
                i += 1;
            }
            flag if flag.starts_with('-') && flag != "-" => {
                return Err(format!("unknown flag: {}", flag));
            }
            positional => args.positionals.push(positional.to_string()),
        }
        i += 1;
    }

    Ok(args)
}

fn expect_value<'a>(raw: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    raw.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} expects a value", flag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_vec(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_positionals_and_flags() {
        let parsed = parse_args(&to_vec(&["tree.txt", "--name", "demo", "-o", "out.zip"])).unwrap();
        assert_eq!(parsed.positionals, vec!["tree.txt"]);
        assert_eq!(parsed.name.as_deref(), Some("demo"));
        assert_eq!(parsed.output_path, Some(PathBuf::from("out.zip")));
    }

    #[test]
    fn dash_is_a_positional() {
        let parsed = parse_args(&to_vec(&["-"])).unwrap();
        assert_eq!(parsed.positionals, vec!["-"]);
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(parse_args(&to_vec(&["--bogus"])).is_err());
    }

    #[test]
    fn color_mode_values() {
        assert_eq!(
            parse_args(&to_vec(&["--color", "never"])).unwrap().color,
            ColorMode::Never
        );
        assert!(parse_args(&to_vec(&["--color", "sometimes"])).is_err());
        assert!(parse_args(&to_vec(&["--color"])).is_err());
    }

    #[test]
    fn json_flag_switches_output_mode() {
        let parsed = parse_args(&to_vec(&["--json"])).unwrap();
        assert_eq!(parsed.output, OutputMode::Json);
    }
}
