use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, trace};

use crate::error::{ChartError, ChartResult};

use super::ChartKind;

const MAX_RESERVE_ATTEMPTS: u32 = 10_000;

/// A reserved output file. The path is absolute and exists (possibly empty)
/// from the moment the artifact is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub kind: ChartKind,
    pub path: PathBuf,
    pub created_at: DateTime<Local>,
}

/// Derives collision-free `<tag>_<YYYYMMDD_HHMMSS>[_<n>].png` paths.
///
/// Each name is claimed with `create_new`, so a name already present on disk
/// (from this process or another one) is never handed out twice; the
/// per-kind counter only saves probing when many calls share one second.
#[derive(Debug)]
pub struct OutputNamer {
    directory: PathBuf,
    next_suffix: HashMap<ChartKind, (String, u32)>,
}

impl OutputNamer {
    pub fn new(directory: impl AsRef<Path>) -> ChartResult<Self> {
        let directory = std::path::absolute(directory.as_ref()).map_err(|err| {
            ChartError::Path(format!(
                "cannot resolve output directory `{}`: {err}",
                directory.as_ref().display()
            ))
        })?;
        Ok(Self {
            directory,
            next_suffix: HashMap::new(),
        })
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Claims a fresh output path for `kind` at instant `now`.
    pub fn reserve(&mut self, kind: ChartKind, now: DateTime<Local>) -> ChartResult<OutputArtifact> {
        let stamp = now.format("%Y%m%d_%H%M%S").to_string();
        let mut suffix = match self.next_suffix.get(&kind) {
            Some((last_stamp, next)) if *last_stamp == stamp => *next,
            _ => 0,
        };

        for _ in 0..MAX_RESERVE_ATTEMPTS {
            let file_name = if suffix == 0 {
                format!("{}_{stamp}.png", kind.file_tag())
            } else {
                format!("{}_{stamp}_{suffix}.png", kind.file_tag())
            };
            let path = self.directory.join(file_name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => {
                    debug!(kind = %kind, path = %path.display(), "reserved output path");
                    self.next_suffix.insert(kind, (stamp, suffix + 1));
                    return Ok(OutputArtifact {
                        kind,
                        path,
                        created_at: now,
                    });
                }
                Err(err) if err.kind() == IoErrorKind::AlreadyExists => {
                    trace!(path = %path.display(), "output path taken, probing next suffix");
                    suffix += 1;
                }
                Err(err) => {
                    return Err(ChartError::Path(format!(
                        "output directory `{}` is not writable: {err}",
                        self.directory.display()
                    )));
                }
            }
        }

        Err(ChartError::Path(format!(
            "no free output name for `{}` in `{}` after {MAX_RESERVE_ATTEMPTS} attempts",
            kind.file_tag(),
            self.directory.display()
        )))
    }
}
