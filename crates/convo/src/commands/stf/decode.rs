use clap::{Args, ValueEnum};
use convo_stf::read::{ReaderOptions, RowNumbering, StringTableReader};
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;
use walkdir::WalkDir;

use super::create_output;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Values keyed by their row index
    #[default]
    Values,
    /// Values keyed by their string key, in row order
    Table,
}

#[derive(Args)]
pub struct DecodeArgs {
    /// An input STF file, or a directory to search for STF files
    #[arg(short, long, value_name = "PATH")]
    file: PathBuf,

    /// A target JSON file, or a target directory when decoding a directory. Defaults to stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Shape of the generated JSON
    #[arg(long, value_enum, default_value_t)]
    format: Format,

    /// Remove line feeds from every value
    #[arg(long, default_value_t = false)]
    strip_newlines: bool,

    /// Skip rows with missing or duplicate row numbers instead of failing
    #[arg(long, default_value_t = false)]
    lenient: bool,

    /// Fail on files that do not start with the STF magic number
    #[arg(long, default_value_t = false)]
    verify_header: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl DecodeArgs {
    fn options(&self) -> ReaderOptions {
        ReaderOptions::builder()
            .verify_header(self.verify_header)
            .row_numbering(if self.lenient {
                RowNumbering::Lenient
            } else {
                RowNumbering::Strict
            })
            .build()
    }

    fn render(&self, path: &Path) -> Result<String> {
        let f = File::open(path)
            .into_diagnostic()
            .context(format!("path: {}", path.display()))?;
        let stf = StringTableReader::with_options(f, self.options())
            .context(format!("decoding {}", path.display()))?;

        match self.format {
            Format::Values => {
                let mut values = stf.into_values();
                if self.strip_newlines {
                    values.values_mut().for_each(|v| v.retain(|c| c != '\n'));
                }
                serde_json::to_string_pretty(&values).into_diagnostic()
            }
            Format::Table => {
                let mut table = stf.into_table();
                if self.strip_newlines {
                    table.strip_newlines();
                }
                serde_json::to_string_pretty(&table).into_diagnostic()
            }
        }
    }

    fn write(&self, json: &str, target: &Path) -> Result<()> {
        info!("writing {}", target.display());

        let mut out = create_output(target, self.overwrite)?;
        out.write_all(json.as_bytes())
            .into_diagnostic()
            .context(format!("writing {}", target.display()))
    }

    fn handle_directory(&self) -> Result<()> {
        let output = self
            .output
            .as_ref()
            .ok_or(miette!("an output directory is required when decoding a directory"))?;

        let files = WalkDir::new(&self.file)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "stf"))
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Err(miette!("no stf files found in {}", self.file.display()));
        }

        for file in files {
            let name = file.path().strip_prefix(&self.file).into_diagnostic()?;
            let target = output.join(name).with_extension("json");

            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .into_diagnostic()
                    .context(format!("creating {}", parent.display()))?;
            }

            let json = self.render(file.path())?;
            self.write(&json, &target)?;
        }

        Ok(())
    }

    pub fn handle(&self) -> Result<()> {
        if self.file.is_dir() {
            return self.handle_directory();
        }

        let json = self.render(&self.file)?;
        match &self.output {
            Some(target) => self.write(&json, target),
            None => {
                println!("{json}");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use miette::{IntoDiagnostic, Result};
    use std::path::PathBuf;

    use super::{DecodeArgs, Format};

    fn args(file: PathBuf, output: Option<PathBuf>) -> DecodeArgs {
        DecodeArgs {
            file,
            output,
            format: Format::Values,
            strip_newlines: false,
            lenient: false,
            verify_header: false,
            overwrite: false,
        }
    }

    fn write_stf(path: &std::path::Path, rows: &[(&str, &str)]) -> Result<()> {
        let rows = rows.iter().copied().collect::<convo_stf::StringTable>();
        std::fs::write(path, convo_stf::encode(&rows)?).into_diagnostic()
    }

    #[test]
    fn renders_values_by_index() -> Result<()> {
        let dir = tempfile::tempdir().into_diagnostic()?;
        let path = dir.path().join("greet.stf");
        write_stf(&path, &[("GREET", "Hi\nthere"), ("BYE", "Bye")])?;

        let mut args = args(path.clone(), None);
        let json: serde_json::Value = serde_json::from_str(&args.render(&path)?).into_diagnostic()?;
        assert_eq!(json, serde_json::json!({ "0": "Hi\nthere", "1": "Bye" }));

        args.format = Format::Table;
        args.strip_newlines = true;
        assert_eq!(
            args.render(&path)?,
            "{\n  \"GREET\": \"Hithere\",\n  \"BYE\": \"Bye\"\n}"
        );

        Ok(())
    }

    #[test]
    fn decodes_directories() -> Result<()> {
        let input = tempfile::tempdir().into_diagnostic()?;
        let output = tempfile::tempdir().into_diagnostic()?;

        std::fs::create_dir(input.path().join("conversation")).into_diagnostic()?;
        write_stf(&input.path().join("conversation/guard.stf"), &[("s_1", "Halt!")])?;
        std::fs::write(input.path().join("notes.txt"), "skipped").into_diagnostic()?;

        args(input.path().to_path_buf(), Some(output.path().to_path_buf())).handle()?;

        let json = std::fs::read_to_string(output.path().join("conversation/guard.json"))
            .into_diagnostic()?;
        assert_eq!(json, "{\n  \"0\": \"Halt!\"\n}");
        assert!(!output.path().join("notes.json").exists());

        Ok(())
    }

    #[test]
    fn refuses_to_overwrite() -> Result<()> {
        let dir = tempfile::tempdir().into_diagnostic()?;
        let path = dir.path().join("greet.stf");
        let target = dir.path().join("greet.json");
        write_stf(&path, &[("GREET", "Hi")])?;
        std::fs::write(&target, "{}").into_diagnostic()?;

        assert!(args(path.clone(), Some(target.clone())).handle().is_err());

        let mut args = args(path, Some(target.clone()));
        args.overwrite = true;
        args.handle()?;
        assert_eq!(
            std::fs::read_to_string(&target).into_diagnostic()?,
            "{\n  \"0\": \"Hi\"\n}"
        );

        Ok(())
    }
}
