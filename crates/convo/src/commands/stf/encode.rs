use clap::Args;
use convo_stf::{
    write::{encode_with, CharacterPolicy, WriterOptions},
    StringTable,
};
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{fs::File, io::Write, path::PathBuf};
use tracing::info;

use super::create_output;

#[derive(Args)]
pub struct EncodeArgs {
    /// An input JSON file holding a `{"key": "value"}` object or a list of `["key", "value"]` pairs
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target STF file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Write this character in place of characters that do not fit in a single byte
    #[arg(long, value_name = "CHAR")]
    replace: Option<char>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl EncodeArgs {
    fn options(&self) -> Result<WriterOptions> {
        let character_policy = match self.replace {
            Some(c) => CharacterPolicy::Replace(
                u8::try_from(c)
                    .map_err(|_| miette!("replacement {c:?} does not fit in a single byte"))?,
            ),
            None => CharacterPolicy::Reject,
        };

        Ok(WriterOptions::builder()
            .character_policy(character_policy)
            .build())
    }

    pub fn handle(&self) -> Result<()> {
        let options = self.options()?;

        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let table: StringTable = serde_json::from_reader(std::io::BufReader::new(f))
            .into_diagnostic()
            .context(format!("parsing {}", &self.file.display()))?;

        let data = encode_with(&table, options)
            .context(format!("encoding {}", &self.file.display()))?;

        info!("writing {} rows to {}", table.len(), &self.output.display());

        let mut out = create_output(&self.output, self.overwrite)?;
        out.write_all(&data)
            .into_diagnostic()
            .context(format!("writing {}", &self.output.display()))
    }
}

#[cfg(test)]
mod test {
    use miette::{IntoDiagnostic, Result};
    use std::path::PathBuf;

    use super::EncodeArgs;

    fn args(file: PathBuf, output: PathBuf, replace: Option<char>) -> EncodeArgs {
        EncodeArgs {
            file,
            output,
            replace,
            overwrite: false,
        }
    }

    #[test]
    fn encodes_json_objects() -> Result<()> {
        let dir = tempfile::tempdir().into_diagnostic()?;
        let input = dir.path().join("greet.json");
        let output = dir.path().join("greet.stf");
        std::fs::write(&input, r#"{"GREET": "Hi"}"#).into_diagnostic()?;

        args(input, output.clone(), None).handle()?;

        let data = std::fs::read(&output).into_diagnostic()?;
        assert_eq!(data.len(), 42);
        assert_eq!(
            convo_stf::decode(&data)?,
            [("GREET", "Hi")]
                .into_iter()
                .collect::<convo_stf::StringTable>()
        );

        Ok(())
    }

    #[test]
    fn wide_characters_need_a_replacement() -> Result<()> {
        let dir = tempfile::tempdir().into_diagnostic()?;
        let input = dir.path().join("quote.json");
        let output = dir.path().join("quote.stf");
        std::fs::write(&input, r#"[["s_1", "“Hi”"]]"#).into_diagnostic()?;

        assert!(args(input.clone(), output.clone(), None).handle().is_err());
        assert!(!output.exists());

        assert!(args(input.clone(), output.clone(), Some('\u{2014}'))
            .handle()
            .is_err());

        args(input, output.clone(), Some('"')).handle()?;
        let data = std::fs::read(&output).into_diagnostic()?;
        assert_eq!(convo_stf::decode(&data)?.by_key("s_1"), Some("\"Hi\""));

        Ok(())
    }
}
