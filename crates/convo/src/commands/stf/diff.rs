use clap::{Args, ValueEnum};
use convo_stf::{StringTable, StringTableReader};
use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::{collections::HashMap, fmt::Display, fs::File, path::Path, path::PathBuf};
use tracing::info;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    /// Only list which keys changed
    #[default]
    Semantic,
    /// Show an inline diff of every changed value
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Change {
    Added(String, String),
    Removed(String, String),
    Moved(String, usize, usize),
    Modified(String, String, String),
}

impl Change {
    fn key(&self) -> &str {
        match self {
            Change::Added(key, _)
            | Change::Removed(key, _)
            | Change::Moved(key, _, _)
            | Change::Modified(key, _, _) => key,
        }
    }
}

fn inline_diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_chars(old, new);

    let mut context = String::new();
    for change in diff.iter_all_changes() {
        let value = change.value();
        match change.tag() {
            ChangeTag::Insert => context.push_str(&format!("{}", value.green().underline())),
            ChangeTag::Delete => context.push_str(&format!("{}", value.red().strikethrough())),
            ChangeTag::Equal => context.push_str(value),
        }
    }
    context
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(k, v) => writeln!(f, "✅ {}: {}", k, v.green()),
            Change::Removed(k, v) => writeln!(f, "❌ {}: {}", k, v.red()),
            Change::Moved(k, from, to) => writeln!(f, "↕ {}: row {} -> {}", k, from, to.blue()),
            Change::Modified(k, old, new) => writeln!(f, "🔃 {}: {}", k, inline_diff(old, new)),
        }
    }
}

/// Position and value of the first row holding each key
fn index(table: &StringTable) -> HashMap<&str, (usize, &str)> {
    let mut result = HashMap::with_capacity(table.len());
    for (i, row) in table.iter().enumerate() {
        result
            .entry(row.key.as_str())
            .or_insert((i, row.value.as_str()));
    }
    result
}

fn changes(left: &StringTable, right: &StringTable) -> Vec<Change> {
    let old = index(left);
    let new = index(right);

    let mut result = Vec::new();

    // Find Added Entries
    new.iter()
        .filter(|(k, _)| !old.contains_key(*k))
        .map(|(k, (_, v))| Change::Added(k.to_string(), v.to_string()))
        .for_each(|c| result.push(c));

    // Find Removed Entries
    old.iter()
        .filter(|(k, _)| !new.contains_key(*k))
        .map(|(k, (_, v))| Change::Removed(k.to_string(), v.to_string()))
        .for_each(|c| result.push(c));

    // Find Differences
    for (k, (old_row, old_value)) in old.iter().sorted() {
        let Some((new_row, new_value)) = new.get(k) else {
            continue;
        };

        if old_value != new_value {
            result.push(Change::Modified(
                k.to_string(),
                old_value.to_string(),
                new_value.to_string(),
            ));
        }
        if old_row != new_row {
            result.push(Change::Moved(k.to_string(), *old_row, *new_row));
        }
    }

    result.sort_by(|a, b| a.key().cmp(b.key()).then(a.cmp(b)));
    result
}

#[derive(Args)]
pub struct DiffArgs {
    /// An input STF file
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input STF file
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t = Mode::Semantic)]
    mode: Mode,
}

impl DiffArgs {
    fn load(path: &Path) -> Result<StringTable> {
        let f = File::open(path)
            .into_diagnostic()
            .context(format!("path: {}", path.display()))?;
        Ok(StringTableReader::new(f)
            .context(format!("decoding {}", path.display()))?
            .into_table())
    }

    pub fn handle(&self) -> Result<()> {
        let left = Self::load(&self.left)?;
        let right = Self::load(&self.right)?;

        let changes = changes(&left, &right);
        if changes.is_empty() {
            info!("no differences");
            return Ok(());
        }

        let output = match self.mode {
            Mode::Full => changes.iter().join(""),
            Mode::Semantic => changes
                .iter()
                .map(|c| match c {
                    Change::Added(k, _) => format!("✅ {}\n", k),
                    Change::Removed(k, _) => format!("❌ {}\n", k),
                    Change::Moved(k, from, to) => format!("↕ {}: row {} -> {}\n", k, from, to),
                    Change::Modified(k, _, _) => format!("🔃 {}\n", k),
                })
                .join(""),
        };
        print!("{}", output);

        Ok(())
    }
}
