//! Runs an external validator such as `glslangValidator` over the stage sources.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use crate::interface::ShaderStage;

/// Prefix of the stage files handed to the validator.
pub const STAGE_FILE_PREFIX: &str = "shadertool-";

/// The source of one stage as loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct StageSource {
    /// Stage of the source.
    pub stage: ShaderStage,
    /// File name including the stage extension, e.g. `world.frag`.
    pub file_name: String,
    /// Full text.
    pub source: String,
}

impl StageSource {
    /// Make a new `StageSource`.
    #[inline]
    #[must_use]
    pub const fn new(stage: ShaderStage, file_name: String, source: String) -> Self {
        Self {
            stage,
            file_name,
            source,
        }
    }
}

/// An error indicating that a stage could not be validated or was rejected.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "this is intended")]
pub enum ValidatorError {
    /// The stage file for the validator could not be written.
    #[error("could not write stage file `{}`: {source}", path.display())]
    Write {
        /// Destination of the stage file.
        path: PathBuf,
        /// Source of the error.
        source: io::Error,
    },
    /// IO error occurred while calling the validator.
    #[error("IO error occurred while calling `{command:?}`: {source}")]
    Io {
        /// The command which was called.
        command: Box<Command>,
        /// Source of the error.
        source: io::Error,
    },
    /// The validator rejected a stage.
    #[error("failed to validate {stage} shader `{}`", path.display())]
    Rejected {
        /// The first rejected stage.
        stage: ShaderStage,
        /// The stage file given to the validator.
        path: PathBuf,
        /// Exit status of the validator.
        status: ExitStatus,
    },
}

impl ValidatorError {
    /// Exit code of the validator, `None` unless a stage was rejected.
    #[inline]
    #[must_use]
    pub fn validator_exit_code(&self) -> Option<i32> {
        match self {
            // terminated by a signal
            Self::Rejected { status, .. } => Some(status.code().unwrap_or(1)),
            Self::Write { .. } | Self::Io { .. } => None,
        }
    }
}

/// Position of `stage` in the order failures are reported in.
const fn report_rank(stage: ShaderStage) -> u8 {
    match stage {
        ShaderStage::Fragment => 0,
        ShaderStage::Vertex => 1,
        ShaderStage::Geometry => 2,
        ShaderStage::Compute => 3,
    }
}

/// A validator binary together with the directory stage files are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Validator {
    /// The validator binary, looked up in `PATH` if it has no directory.
    pub binary: PathBuf,
    /// Where stage files are written.
    pub output_dir: PathBuf,
}

impl Validator {
    /// Make a new `Validator`.
    #[inline]
    #[must_use]
    pub const fn new(binary: PathBuf, output_dir: PathBuf) -> Self {
        Self { binary, output_dir }
    }

    /// Path of the file the validator receives for `stage`.
    #[inline]
    #[must_use]
    pub fn stage_path(&self, stage: &StageSource) -> PathBuf {
        self.output_dir
            .join(format!("{STAGE_FILE_PREFIX}{}", stage.file_name))
    }

    /// Writes every stage and runs the validator on each of them.
    ///
    /// All stages are validated, the reported failure is the first one in the order
    /// fragment, vertex, geometry, compute.
    ///
    /// # Errors
    ///
    /// See [`ValidatorError`].
    #[inline]
    pub fn validate(&self, stages: &[StageSource]) -> Result<(), ValidatorError> {
        let mut paths = Vec::with_capacity(stages.len());
        for stage in stages {
            paths.push(self.write_stage(stage)?);
        }

        let mut failures = Vec::new();
        for (stage, path) in stages.iter().zip(paths) {
            log::debug!("validating {} shader '{}'", stage.stage, path.display());
            let status = self.run(&path)?;
            if !status.success() {
                log::error!("failed to validate {} shader", stage.stage);
                log::warn!("{} {}", self.binary.display(), path.display());
                failures.push((stage.stage, path, status));
            }
        }

        failures.sort_by_key(|(stage, _, _)| report_rank(*stage));
        match failures.into_iter().next() {
            Some((stage, path, status)) => Err(ValidatorError::Rejected {
                stage,
                path,
                status,
            }),
            None => Ok(()),
        }
    }

    /// Writes the stage file, creating the output directory if needed.
    fn write_stage(&self, stage: &StageSource) -> Result<PathBuf, ValidatorError> {
        let path = self.stage_path(stage);
        fs::create_dir_all(&self.output_dir)
            .and_then(|()| fs::write(&path, &stage.source))
            .map_err(|source| ValidatorError::Write {
                path: path.clone(),
                source,
            })?;
        log::debug!("wrote {} shader to '{}'", stage.stage, path.display());
        Ok(path)
    }

    /// Runs the validator on one stage file, its output goes straight to the terminal.
    fn run(&self, path: &Path) -> Result<ExitStatus, ValidatorError> {
        let mut command = Command::new(&self.binary);
        command.arg(path);
        command.status().map_err(|source| ValidatorError::Io {
            command: Box::new(command),
            source,
        })
    }
}
