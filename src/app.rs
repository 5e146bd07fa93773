use std::process::ExitCode;

use clap::Parser;

use crate::client::HttpClient;

use self::arg::Args;

mod arg;
mod logging;

const USAGE: &str = "httpclient [GET/POST] [URL]\n";

pub fn run() -> ExitCode {
    match run_impl() {
        Ok(exit_code) => exit_code,
        Err(error) => {
            tracing::error!(?error);
            eprintln!("{:#}", error);
            ExitCode::FAILURE
        }
    }
}

fn run_impl() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    self::logging::set_up_logging(args.log_level, args.log_file.as_deref(), args.log_json)?;

    let Some((method, url)) = args.method_and_url() else {
        println!("{}", USAGE);
        return Ok(ExitCode::FAILURE);
    };

    let client = HttpClient::with_config(args.client_config());
    let form_args = args.data.iter().map(|(key, value)| (key, value));
    let outcome = client.command(url, method, form_args);

    println!("{}", outcome);

    Ok(ExitCode::SUCCESS)
}
