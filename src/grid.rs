use std::collections::BTreeSet;

use anyhow::Result;

pub const DEFAULT_FILE_IDS: [u32; 3] = [1, 2, 3];
pub const DEFAULT_LEVELS: [u32; 4] = [2, 4, 6, 8];
pub const DEFAULT_REPETITIONS: u32 = 5;

/// Whether a run passes a parallelism argument to the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
  Parallel,
  Sequential,
}

impl Mode {
  /// Modes in the order their blocks are emitted.
  pub const ORDER: [Mode; 2] = [Mode::Parallel, Mode::Sequential];

  /// The numeric flag used as the first character of redirect targets.
  pub fn flag(self) -> u8 {
    match self {
      Mode::Parallel => 0,
      Mode::Sequential => 1,
    }
  }
}

/// A single cell of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
  pub file_id: u32,
  pub repetition: u32,
  /// `None` for sequential runs.
  pub parallelism: Option<u32>,
}

impl Run {
  pub fn mode(&self) -> Mode {
    match self.parallelism {
      Some(_) => Mode::Parallel,
      None => Mode::Sequential,
    }
  }
}

/// The parameter sweep: which csv files to run, at which parallelism levels,
/// and how many times each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
  pub file_ids: Vec<u32>,
  pub levels: Vec<u32>,
  pub repetitions: u32,
}

impl Default for Grid {
  fn default() -> Self {
    Self {
      file_ids: DEFAULT_FILE_IDS.to_vec(),
      levels: DEFAULT_LEVELS.to_vec(),
      repetitions: DEFAULT_REPETITIONS,
    }
  }
}

impl Grid {
  /// Number of runs, one sequential run plus one per level for every file and
  /// repetition.
  pub fn len(&self) -> usize {
    self.file_ids.len() * self.repetitions as usize * (1 + self.levels.len())
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns an error if two runs would share a redirect target. Logs a
  /// warning for an empty grid or levels the editor runs sequentially.
  pub fn validate(&self) -> Result<()> {
    if let Some(id) = first_duplicate(&self.file_ids) {
      anyhow::bail!("duplicate file id {id}");
    }

    if let Some(level) = first_duplicate(&self.levels) {
      anyhow::bail!("duplicate parallelism level {level}");
    }

    if self.is_empty() {
      log::warn!("grid is empty, no commands will be written");
    }

    for level in self.levels.iter().filter(|&&level| level <= 1) {
      log::warn!("parallelism level {level} runs the editor sequentially");
    }

    Ok(())
  }

  /// All runs of a single mode, files outermost, then repetitions, then
  /// levels.
  pub fn runs_in(&self, mode: Mode) -> impl Iterator<Item = Run> + '_ {
    let levels: Vec<Option<u32>> = match mode {
      Mode::Parallel => self.levels.iter().copied().map(Some).collect(),
      Mode::Sequential => vec![None],
    };

    self.file_ids.iter().flat_map(move |&file_id| {
      let levels = levels.clone();
      (0..self.repetitions).flat_map(move |repetition| {
        levels.clone().into_iter().map(move |parallelism| Run {
          file_id,
          repetition,
          parallelism,
        })
      })
    })
  }

  /// Every run in emission order, the whole parallel block before the
  /// sequential one.
  pub fn runs(&self) -> impl Iterator<Item = Run> + '_ {
    Mode::ORDER.into_iter().flat_map(move |mode| self.runs_in(mode))
  }
}

fn first_duplicate(values: &[u32]) -> Option<u32> {
  let mut seen = BTreeSet::new();
  values.iter().copied().find(|&value| !seen.insert(value))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_grid_has_75_runs() {
    let grid = Grid::default();

    assert_eq!(grid.len(), 75);
    assert_eq!(grid.runs().count(), 75);
  }

  #[test]
  fn len_matches_enumeration() {
    let grid = Grid {
      file_ids: vec![7, 9],
      levels: vec![3],
      repetitions: 4,
    };

    assert_eq!(grid.len(), 2 * 4 * 2);
    assert_eq!(grid.runs().count(), grid.len());
  }

  #[test]
  fn parallel_block_comes_first() {
    let runs: Vec<Run> = Grid::default().runs().collect();

    assert!(runs[..60].iter().all(|run| run.mode() == Mode::Parallel));
    assert!(runs[60..].iter().all(|run| run.mode() == Mode::Sequential));
  }

  #[test]
  fn order_is_file_then_repetition_then_level() {
    let grid = Grid {
      file_ids: vec![1, 2],
      levels: vec![2, 4],
      repetitions: 2,
    };

    let runs: Vec<(u32, u32, Option<u32>)> =
      grid.runs().map(|run| (run.file_id, run.repetition, run.parallelism)).collect();

    assert_eq!(
      runs,
      vec![
        (1, 0, Some(2)),
        (1, 0, Some(4)),
        (1, 1, Some(2)),
        (1, 1, Some(4)),
        (2, 0, Some(2)),
        (2, 0, Some(4)),
        (2, 1, Some(2)),
        (2, 1, Some(4)),
        (1, 0, None),
        (1, 1, None),
        (2, 0, None),
        (2, 1, None),
      ]
    );
  }

  #[test]
  fn zero_repetitions_is_empty() {
    let grid = Grid {
      repetitions: 0,
      ..Grid::default()
    };

    assert!(grid.is_empty());
    assert!(grid.validate().is_ok());
    assert_eq!(grid.runs().next(), None);
  }

  #[test]
  fn validate_rejects_duplicates() {
    let files = Grid {
      file_ids: vec![1, 2, 1],
      ..Grid::default()
    };
    let levels = Grid {
      levels: vec![2, 4, 4],
      ..Grid::default()
    };

    assert!(files.validate().unwrap_err().to_string().contains("file id 1"));
    assert!(levels.validate().unwrap_err().to_string().contains("level 4"));
    assert!(Grid::default().validate().is_ok());
  }
}
