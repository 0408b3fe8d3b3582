use clap::Parser;

use uptake_guard::cli::{Cli, Commands};
use uptake_guard::commands::{color_choice_to_mode, run_check, run_config, run_init};
use uptake_guard::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet, color_choice_to_mode(cli.color));

    let exit_code = match &cli.command {
        Commands::Check(args) => run_check(args, &cli),
        Commands::Init(args) => run_init(args),
        Commands::Config(args) => run_config(args, &cli),
    };

    std::process::exit(exit_code);
}
