use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{client::ClientConfig, parse::StatusLineMode};

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// `[METHOD] URL`. The method defaults to GET when only a URL is given.
    #[clap(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Form field sent in the body of a POST request.
    #[clap(long, short, value_name = "KEY=VALUE", value_parser = parse_form_arg)]
    pub data: Vec<(String, String)>,

    /// Give up connecting, reading or writing after this many seconds.
    #[clap(long, value_name = "SECONDS", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Require a well-formed `HTTP/x.y CODE` status line.
    #[clap(long)]
    pub strict_status_line: bool,

    #[clap(long, default_value = "warn")]
    pub log_level: super::logging::Level,

    #[clap(long)]
    pub log_file: Option<PathBuf>,

    #[clap(long)]
    pub log_json: bool,
}

impl Args {
    /// Returns the method and URL, or `None` when no arguments were given.
    ///
    /// Arguments after the second are ignored.
    pub fn method_and_url(&self) -> Option<(&str, &str)> {
        match self.args.as_slice() {
            [] => None,
            [url] => Some(("GET", url.as_str())),
            [method, url, ..] => Some((method.as_str(), url.as_str())),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: self.timeout,
            status_line: if self.strict_status_line {
                StatusLineMode::Strict
            } else {
                StatusLineMode::Positional
            },
            ..Default::default()
        }
    }
}

fn parse_form_arg(value: &str) -> Result<(String, String), String> {
    let (key, value) = value
        .split_once('=')
        .ok_or_else(|| format!("no `=` found in `{}`", value))?;

    Ok((key.to_string(), value.to_string()))
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    let seconds = value.parse::<f64>().map_err(|error| error.to_string())?;

    match Duration::try_from_secs_f64(seconds) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        Ok(_) => Err("timeout must be greater than zero".to_string()),
        Err(error) => Err(error.to_string()),
    }
}
