use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, path::Path};

pub mod decode;
pub mod diff;
pub mod encode;

#[derive(clap::Subcommand)]
pub enum StfCommands {
    /// Decode STF files into JSON
    Decode(decode::DecodeArgs),
    /// Encode a JSON object into a STF file
    Encode(encode::EncodeArgs),
    /// Compare two STF files
    Diff(diff::DiffArgs),
}

impl StfCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            StfCommands::Decode(decode) => decode.handle(),
            StfCommands::Encode(encode) => encode.handle(),
            StfCommands::Diff(diff) => diff.handle(),
        }
    }
}

fn create_output(path: &Path, overwrite: bool) -> Result<File> {
    if !overwrite {
        File::create_new(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    } else {
        File::create(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    }
}
