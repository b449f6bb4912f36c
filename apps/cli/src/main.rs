mod cli;
mod command;
mod config;
mod error;
mod offline;
mod schema_file;

use error::WrapErr;

use clap::CommandFactory;
use clap::Parser;
use tracing::Level;

fn main() -> error::Result<()> {
    color_eyre::install()?;
    let command_line = cli::Cli::parse();
    init_tracing(command_line.verbose);

    let cfg = config::load(command_line.config.as_deref()).context("Load configuration error")?;

    if let Some(command) = command_line.command {
        let cmd: Box<dyn command::Command> = match command {
            cli::Commands::Define { schema } => Box::new(command::DefineCommand::new(cfg, schema)),
            cli::Commands::Document {
                schema,
                record,
                id,
                version,
                delete,
            } => Box::new(command::DocumentCommand::new(
                cfg, schema, record, id, version, delete,
            )),
            cli::Commands::Compile {
                schema,
                clauses,
                text,
                order,
                limit,
                offset,
                returning,
            } => Box::new(command::CompileCommand {
                config: cfg,
                schema,
                clauses,
                text,
                order,
                limit,
                offset,
                returning,
            }),
        };
        cmd.execute()?;
    } else {
        cli::Cli::command().print_help()?;
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
