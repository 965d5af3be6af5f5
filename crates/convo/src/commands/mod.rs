pub mod stf;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle STF files
    Stf {
        #[command(subcommand)]
        command: stf::StfCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Stf { command } => command.handle(),
        }
    }
}
