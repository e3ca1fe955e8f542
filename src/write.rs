use std::{
  fs::OpenOptions,
  io::{BufWriter, Write},
  path::Path,
};

use anyhow::{Context, Result};

use crate::{
  ext::OpenOptionsExt as _,
  format::{self, Target},
  grid::Grid,
};

pub const DEFAULT_OUTPUT: &str = "convolution_commands.sh";

/// How an existing output file is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpenMode {
  /// Add a fresh copy of the grid after the existing contents.
  #[default]
  Append,
  /// Replace the existing contents.
  Truncate,
}

/// Writes every command line of `grid` to `writer`, each preceded by a
/// newline. Returns the number of lines written.
pub fn emit<W: Write>(grid: &Grid, target: &Target, mut writer: W) -> Result<usize> {
  let mut written = 0;

  log::debug!("writing {} commands for {grid:?}", grid.len());

  for run in grid.runs() {
    write!(writer, "\n{}", format::command_line(target, &run)).context("write")?;
    written += 1;
  }

  writer.flush().context("flush")?;

  Ok(written)
}

/// Writes the grid to the file at `path`, creating it if needed. The file is
/// closed before this returns.
///
/// # Errors
///
/// This will return an error if:
/// - the grid contains duplicate file ids or levels.
/// - the editor or csv directory contains whitespace or shell syntax.
/// - `path` cannot be opened for writing.
/// - a write fails.
pub fn generate<P: AsRef<Path>>(grid: &Grid, target: &Target, path: P, mode: OpenMode) -> Result<usize> {
  let path = path.as_ref();

  grid.validate().context("validate grid")?;
  target.validate().context("validate target")?;

  let file = OpenOptions::for_mode(mode).open_with_context(path)?;
  let written = emit(grid, target, BufWriter::new(file)).with_context(|| format!("emit {path:?}"))?;

  log::info!("wrote {written} commands to {path:?} ({mode:?})");

  Ok(written)
}
