use std::{
  fs::{File, OpenOptions},
  path::Path,
};

use anyhow::{Context, Result};

use crate::write::OpenMode;

#[extend::ext]
pub impl OpenOptions {
  /// Options for writing with the given `mode`, creating the file if it is
  /// missing.
  fn for_mode(mode: OpenMode) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.create(true);

    match mode {
      OpenMode::Append => options.append(true),
      OpenMode::Truncate => options.write(true).truncate(true),
    };

    options
  }

  fn open_with_context<P: AsRef<Path>>(&self, path: P) -> Result<File> {
    let path = path.as_ref();
    self.open(path).with_context(|| format!("open {path:?}"))
  }
}
