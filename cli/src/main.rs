mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, audit, classify};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();
    let cfg = commands.config();

    logging::init_logging(cfg.quiet);
    print::banner(cfg.no_banner, cfg.quiet);

    let exit_code = match &commands.command {
        Commands::Audit(_) => audit::audit(&cfg).await?,
        Commands::Classify { ranges } => {
            print::header("classifying address ranges", cfg.quiet);
            classify::classify(ranges)
        }
    };

    if cfg.quiet == 0 {
        print::end_of_program();
    }
    Ok(exit_code)
}
