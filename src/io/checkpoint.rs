//! Restart files.
//!
//! One postcard-encoded [`RestartRecord`] per rank per checkpoint, at
//!
//! ```text
//! {restart_dir}/{casename}-{step:06}-{rank:04}.rst
//! ```
//!
//! A run started from a restart file never overwrites that file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::mesh::MeshPartition;
use crate::physics::{ModalProjection, OrderConversion};
use crate::state::SimulationState;
use crate::types::RankIndex;

/// Error type for checkpoint operations.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("restart encoding error: {0}")]
    Encoding(#[from] postcard::Error),

    #[error("restart written for {found} partitions, run has {expected}")]
    PartitionMismatch { expected: usize, found: usize },

    #[error("restart carries {found} species, run has {expected}")]
    SpeciesMismatch { expected: usize, found: usize },

    #[error("restart mesh is {found}-dimensional, run is {expected}-dimensional")]
    DimensionMismatch { expected: usize, found: usize },
}

impl CheckpointError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Everything one rank needs to resume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RestartRecord {
    pub mesh: MeshPartition,
    pub state: SimulationState,
    pub time: f64,
    pub step: u64,
    pub order: usize,
    pub global_n_elements: usize,
    pub num_parts: usize,
    pub nspecies: usize,
}

/// Layout the loading run expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestartExpectation {
    pub num_parts: usize,
    pub nspecies: usize,
    pub dim: usize,
    pub order: usize,
}

impl RestartExpectation {
    pub fn from_config(config: &SimulationConfig, num_parts: usize) -> Self {
        Self {
            num_parts,
            nspecies: config.nspecies,
            dim: config.dim,
            order: config.order,
        }
    }
}

/// Writes and reads one rank's restart files.
#[derive(Clone, Debug)]
pub struct CheckpointManager {
    dir: PathBuf,
    casename: String,
    rank: RankIndex,
    /// File this run was initialized from
    source: Option<PathBuf>,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>, casename: impl Into<String>, rank: RankIndex) -> Self {
        Self {
            dir: dir.into(),
            casename: casename.into(),
            rank,
            source: None,
        }
    }

    pub fn from_config(config: &SimulationConfig, rank: RankIndex) -> Self {
        Self::new(&config.restart_dir, &config.casename, rank)
    }

    /// Mark `path` as the file this run started from. Any spelling of the
    /// file (relative, `./`-prefixed, through a symlink) is recognized.
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn rank(&self) -> RankIndex {
        self.rank
    }

    /// Path of this rank's checkpoint for `step`.
    pub fn restart_path(&self, step: u64) -> PathBuf {
        self.dir.join(format!(
            "{}-{:06}-{:04}.rst",
            self.casename,
            step,
            self.rank.as_usize()
        ))
    }

    /// This rank's file of a checkpoint given without the rank suffix,
    /// e.g. `restart_data/case-000100`.
    pub fn rank_file(prefix: impl AsRef<Path>, rank: RankIndex) -> PathBuf {
        let prefix = prefix.as_ref();
        let name = prefix
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        prefix.with_file_name(format!("{}-{:04}.rst", name, rank.as_usize()))
    }

    /// Write `record` to its restart path.
    ///
    /// Returns `Ok(None)` without touching the disk when the path is the
    /// file this run started from.
    pub fn write(&self, record: &RestartRecord) -> Result<Option<PathBuf>, CheckpointError> {
        let path = self.restart_path(record.step);
        if self.is_source(&path) {
            debug!(path = %path.display(), "Skipping checkpoint over the restart source");
            return Ok(None);
        }

        fs::create_dir_all(&self.dir).map_err(|e| CheckpointError::io(&self.dir, e))?;
        let bytes = postcard::to_allocvec(record)?;
        let mut file = fs::File::create(&path).map_err(|e| CheckpointError::io(&path, e))?;
        file.write_all(&bytes)
            .map_err(|e| CheckpointError::io(&path, e))?;

        debug!(
            path = %path.display(),
            step = record.step,
            time = record.time,
            bytes = bytes.len(),
            "Wrote checkpoint"
        );
        Ok(Some(path))
    }

    fn is_source(&self, path: &Path) -> bool {
        let Some(source) = self.source.as_deref() else {
            return false;
        };
        if source == path {
            return true;
        }
        // Only an existing target can be the source
        match (fs::canonicalize(source), fs::canonicalize(path)) {
            (Ok(source), Ok(path)) => source == path,
            _ => false,
        }
    }

    /// Decode one restart file.
    pub fn read(path: impl AsRef<Path>) -> Result<RestartRecord, CheckpointError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| CheckpointError::io(path, e))?;
        Ok(postcard::from_bytes(&bytes)?)
    }

    /// Read, validate and project a restart file to the expected order.
    pub fn load(
        path: impl AsRef<Path>,
        expected: &RestartExpectation,
    ) -> Result<RestartRecord, CheckpointError> {
        let path = path.as_ref();
        let record = Self::read(path)?;

        if record.num_parts != expected.num_parts {
            return Err(CheckpointError::PartitionMismatch {
                expected: expected.num_parts,
                found: record.num_parts,
            });
        }
        if record.nspecies != expected.nspecies {
            return Err(CheckpointError::SpeciesMismatch {
                expected: expected.nspecies,
                found: record.nspecies,
            });
        }
        if record.mesh.dim != expected.dim {
            return Err(CheckpointError::DimensionMismatch {
                expected: expected.dim,
                found: record.mesh.dim,
            });
        }

        info!(
            path = %path.display(),
            step = record.step,
            time = record.time,
            order = record.order,
            "Read restart"
        );

        if record.order == expected.order {
            return Ok(record);
        }
        let projection = ModalProjection::new(expected.dim, record.order, expected.order);
        Ok(Self::project(record, &projection))
    }

    /// Convert the state of `record` to the converter's target order.
    pub fn project(record: RestartRecord, conversion: &dyn OrderConversion) -> RestartRecord {
        info!(
            from = conversion.source_order(),
            to = conversion.target_order(),
            "Projecting restart state"
        );
        RestartRecord {
            state: conversion.convert_state(&record.state),
            order: conversion.target_order(),
            ..record
        }
    }
}
