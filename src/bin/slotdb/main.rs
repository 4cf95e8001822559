use anyhow::Result;

mod cli;
mod util;
mod cmd_run;
mod cmd_fill;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = <cli::Cli as clap::Parser>::parse();
    match cli.cmd {
        cli::Cmd::Run { page_size, ops_file, ops_json, search, json, dump, verify } =>
            cmd_run::exec(page_size, ops_file, ops_json, search, json, dump, verify),

        cli::Cmd::Fill { page_size, key_size, value_size, seed, json } =>
            cmd_fill::exec(page_size, key_size, value_size, seed, json),
    }
}
