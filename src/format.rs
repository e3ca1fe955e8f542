use anyhow::Result;

use crate::grid::{Mode, Run};

pub const DEFAULT_EDITOR: &str = "./editor";
pub const DEFAULT_CSV_DIR: &str = "./csvs_for_final_project";

const TIMING_PREFIX: &str = "timing_";
/// Stands in for the level in sequential redirect targets.
const SEQUENTIAL_MARKER: &str = "1";
/// Characters that would change how the shell parses a generated line.
const SHELL_SPECIAL: &[char] = &[
  '(', ')', '<', '>', ';', '&', '|', '$', '`', '"', '\'', '\\', '*', '?', '[', ']', '#', '~', '{', '}', '!',
];

/// What the generated commands invoke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
  /// Editor command, as written into the shell line.
  pub editor: String,
  /// Directory holding `csv_file_<id>.csv`.
  pub csv_dir: String,
}

impl Default for Target {
  fn default() -> Self {
    Self {
      editor: DEFAULT_EDITOR.to_string(),
      csv_dir: DEFAULT_CSV_DIR.to_string(),
    }
  }
}

impl Target {
  /// Returns an error if the editor or csv directory would not survive the
  /// shell unquoted.
  pub fn validate(&self) -> Result<()> {
    if self.editor.is_empty() {
      anyhow::bail!("empty editor command");
    }

    for (name, value) in [("editor", &self.editor), ("csv dir", &self.csv_dir)] {
      if let Some(c) = value.chars().find(|&c| c.is_whitespace() || SHELL_SPECIAL.contains(&c)) {
        anyhow::bail!("{name} {value:?} contains shell special character {c:?}");
      }
    }

    Ok(())
  }
}

/// Path of `csv_file_<id>.csv`, relative to the working directory when the csv
/// directory is empty.
pub fn csv_path(target: &Target, file_id: u32) -> String {
  let file = format!("csv_file_{file_id}.csv");

  if target.csv_dir.is_empty() {
    return file;
  }

  match target.csv_dir.trim_end_matches('/') {
    "" => format!("/{file}"),
    dir => format!("{dir}/{file}"),
  }
}

/// Name of the file a run's `time` output is redirected to, e.g.
/// `timing_02_1_0` for level 2 or `timing_11_1_0` for a sequential run.
pub fn timing_name(mode: Mode, level: Option<u32>, file_id: u32, repetition: u32) -> String {
  let level = match level {
    Some(level) => level.to_string(),
    None => SEQUENTIAL_MARKER.to_string(),
  };

  format!("{TIMING_PREFIX}{flag}{level}_{file_id}_{repetition}", flag = mode.flag())
}

/// A full shell line for `run`, without a line terminator.
pub fn command_line(target: &Target, run: &Run) -> String {
  let csv = csv_path(target, run.file_id);
  let timing = timing_name(run.mode(), run.parallelism, run.file_id, run.repetition);

  match run.parallelism {
    Some(level) => format!("(time {} {csv} p={level}) 2>{timing}", target.editor),
    None => format!("(time {} {csv}) 2>{timing}", target.editor),
  }
}
