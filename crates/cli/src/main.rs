mod cmd;
mod util;

use anyhow::Result;
use argp::FromArgs;
use primer_bot_core::config::{Config, DEFAULT_CONFIG_PATH};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};
use typed_path::Utf8NativePathBuf;

use crate::util::{native_path, std_path};

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Report typeshed primer results on pull requests.
struct TopLevel {
    #[argp(option, from_str_fn(native_path))]
    /// config file (default: primer-bot.yml)
    config: Option<Utf8NativePathBuf>,
    #[argp(subcommand)]
    command: SubCommand,
}

#[derive(FromArgs, PartialEq, Eq, Debug)]
#[argp(subcommand)]
enum SubCommand {
    Download(cmd::download::Args),
    Post(cmd::post::Args),
    Render(cmd::render::Args),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::builder()
        // Default to info level
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    // stdout is reserved for command output
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    let args: TopLevel = argp::parse_args_or_exit(argp::DEFAULT);
    let config_path = args
        .config
        .as_ref()
        .map(std_path)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.into());
    let config = Config::load(&config_path)?;
    match args.command {
        SubCommand::Download(args) => cmd::download::run(args, config).await,
        SubCommand::Post(args) => cmd::post::run(args, config).await,
        SubCommand::Render(args) => cmd::render::run(args, config),
    }
}
