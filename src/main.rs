mod ext;
mod format;
mod grid;
mod write;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};

use self::{
  format::{Target, DEFAULT_CSV_DIR, DEFAULT_EDITOR},
  grid::{Grid, DEFAULT_REPETITIONS},
  write::{OpenMode, DEFAULT_OUTPUT},
};

#[derive(Parser)]
struct Args {
  /// Defaults to `generate` with every default.
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Append the benchmark commands to a shell script.
  Generate {
    /// Script to write the commands to.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
    /// Replace the script's contents instead of appending to them.
    #[arg(long)]
    truncate: bool,
    #[command(flatten)]
    sweep: Sweep,
  },
  /// Print the benchmark commands to stdout.
  Print {
    #[command(flatten)]
    sweep: Sweep,
  },
}

#[derive(ClapArgs, Debug)]
struct Sweep {
  /// Ids of the csv files to run, `csv_file_<id>.csv`.
  #[arg(short, long, num_args = 1.., value_delimiter = ',', default_values_t = grid::DEFAULT_FILE_IDS)]
  files: Vec<u32>,
  /// Parallelism levels passed to the editor as `p=<level>`.
  #[arg(short = 'p', long, num_args = 1.., value_delimiter = ',', default_values_t = grid::DEFAULT_LEVELS)]
  levels: Vec<u32>,
  /// How many times each configuration is run.
  #[arg(short, long, default_value_t = DEFAULT_REPETITIONS)]
  repetitions: u32,
  /// Editor command to benchmark.
  #[arg(long, default_value = DEFAULT_EDITOR)]
  editor: String,
  /// Directory containing the csv files.
  #[arg(long, default_value = DEFAULT_CSV_DIR)]
  csv_dir: String,
}

impl Default for Command {
  fn default() -> Self {
    Command::Generate {
      output: PathBuf::from(DEFAULT_OUTPUT),
      truncate: false,
      sweep: Sweep::default(),
    }
  }
}

impl Default for Sweep {
  fn default() -> Self {
    let (grid, target) = (Grid::default(), Target::default());

    Self {
      files: grid.file_ids,
      levels: grid.levels,
      repetitions: grid.repetitions,
      editor: target.editor,
      csv_dir: target.csv_dir,
    }
  }
}

impl Sweep {
  fn into_parts(self) -> (Grid, Target) {
    let grid = Grid {
      file_ids: self.files,
      levels: self.levels,
      repetitions: self.repetitions,
    };
    let target = Target {
      editor: self.editor,
      csv_dir: self.csv_dir,
    };

    (grid, target)
  }
}

fn main() -> Result<()> {
  pretty_env_logger::init();

  match Args::parse().command.unwrap_or_default() {
    Command::Generate { output, truncate, sweep } => {
      let (grid, target) = sweep.into_parts();
      let mode = if truncate { OpenMode::Truncate } else { OpenMode::Append };

      write::generate(&grid, &target, &output, mode).context("generate")?;
    }
    Command::Print { sweep } => {
      let (grid, target) = sweep.into_parts();
      grid.validate().context("validate grid")?;
      target.validate().context("validate target")?;

      write::emit(&grid, &target, io::stdout().lock()).context("emit")?;
      println!();
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_fixed_sweep() {
    let args = Args::try_parse_from(["convolution-commands", "generate"]).unwrap();
    let Some(Command::Generate { output, truncate, sweep }) = args.command else {
      panic!("expected generate");
    };
    let (grid, target) = sweep.into_parts();

    assert_eq!(output, PathBuf::from(DEFAULT_OUTPUT));
    assert!(!truncate);
    assert_eq!(grid, Grid::default());
    assert_eq!(target, Target::default());
  }

  #[test]
  fn bare_run_generates_defaults() {
    let args = Args::try_parse_from(["convolution-commands"]).unwrap();
    assert!(args.command.is_none());

    let Command::Generate { output, truncate, sweep } = args.command.unwrap_or_default() else {
      panic!("expected generate");
    };
    let parsed = Args::try_parse_from(["convolution-commands", "generate"]).unwrap();
    let Some(Command::Generate { sweep: parsed_sweep, .. }) = parsed.command else {
      panic!("expected generate");
    };

    assert_eq!(output, PathBuf::from(DEFAULT_OUTPUT));
    assert!(!truncate);
    assert_eq!(sweep.into_parts(), parsed_sweep.into_parts());
    assert_eq!(Sweep::default().into_parts(), (Grid::default(), Target::default()));
  }

  #[test]
  fn comma_separated_lists() {
    let args = Args::try_parse_from(["convolution-commands", "print", "-f", "4,5", "-p", "16", "-r", "2"]).unwrap();
    let Some(Command::Print { sweep }) = args.command else {
      panic!("expected print");
    };
    let (grid, _) = sweep.into_parts();

    assert_eq!(
      grid,
      Grid {
        file_ids: vec![4, 5],
        levels: vec![16],
        repetitions: 2,
      }
    );
  }

  #[test]
  fn cli_is_consistent() {
    use clap::CommandFactory;

    Args::command().debug_assert();
  }
}
