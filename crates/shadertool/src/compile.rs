//! `shadertool generate`: loads the stages of a shader program, extracts their
//! interface, writes the bindings and validates the stages.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::config::{self, ConfigError, GenerateArgs};
use crate::generate::{generate, GenerateOptions, Generated, Templates};
use crate::interface::{ShaderInterface, ShaderStage};
use crate::parser::{parse_stage, ParseError};
use crate::validator::{StageSource, Validator, ValidatorError};

/// Exit code of a run that could not write its bindings.
pub const WRITE_FAILURE_EXIT_CODE: i32 = 100;

/// Stages that must be present, in load order.
const REQUIRED_STAGES: [ShaderStage; 2] = [ShaderStage::Fragment, ShaderStage::Vertex];

/// Stages that are used when present, in load order.
const OPTIONAL_STAGES: [ShaderStage; 2] = [ShaderStage::Geometry, ShaderStage::Compute];

/// Order the stages are parsed in. The vertex stage comes last.
const PARSE_ORDER: [ShaderStage; 4] = [
    ShaderStage::Fragment,
    ShaderStage::Geometry,
    ShaderStage::Compute,
    ShaderStage::Vertex,
];

/// An error that ends a generation run.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "this is intended")]
pub enum CompileError {
    /// The arguments could not be assembled.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The shader path has no file name to derive the program name from.
    #[error("`{}` does not name a shader", path.display())]
    InvalidShaderPath {
        /// The given shader path.
        path: PathBuf,
    },
    /// A required stage does not exist or is empty.
    #[error("could not load {stage} shader `{}`", path.display())]
    MissingStage {
        /// The missing stage.
        stage: ShaderStage,
        /// Where it was expected.
        path: PathBuf,
    },
    /// A stage exists but could not be read.
    #[error("could not read {stage} shader `{}`: {source}", path.display())]
    ReadStage {
        /// The stage.
        stage: ShaderStage,
        /// The stage file.
        path: PathBuf,
        /// Source of the error.
        source: io::Error,
    },
    /// A template could not be read.
    #[error("could not read template `{}`: {source}", path.display())]
    Template {
        /// The template file.
        path: PathBuf,
        /// Source of the error.
        source: io::Error,
    },
    /// A stage could not be parsed.
    #[error("could not parse {stage} shader `{}`: {source}", path.display())]
    Parse {
        /// The stage.
        stage: ShaderStage,
        /// The stage file.
        path: PathBuf,
        /// Source of the error.
        source: ParseError,
    },
    /// A binding could not be written.
    #[error("failed to write `{}`: {source}", path.display())]
    Write {
        /// The destination.
        path: PathBuf,
        /// Source of the error.
        source: io::Error,
    },
    /// The validator could not be run or rejected a stage.
    #[error(transparent)]
    Validation(#[from] ValidatorError),
}

impl CompileError {
    /// The process exit code for this error.
    ///
    /// A rejected stage reports the exit code of the validator,
    /// a failed write [`WRITE_FAILURE_EXIT_CODE`], everything else `1`.
    #[inline]
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Write { .. } => WRITE_FAILURE_EXIT_CODE,
            Self::Validation(err) => err.validator_exit_code().unwrap_or(1),
            Self::Config(_)
            | Self::InvalidShaderPath { .. }
            | Self::MissingStage { .. }
            | Self::ReadStage { .. }
            | Self::Template { .. }
            | Self::Parse { .. } => 1,
        }
    }
}

/// The stage sources of one shader program.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ShaderProgram {
    /// Base name shared by all stage files.
    pub name: String,
    /// Directory the stage files are in.
    pub dir: PathBuf,
    /// The present stages, fragment and vertex first.
    pub stages: Vec<StageSource>,
}

impl ShaderProgram {
    /// Loads the stages of `shader`, a path without stage extension.
    ///
    /// # Errors
    ///
    /// Fails if the fragment or vertex stage is missing or any present stage can't be read.
    #[inline]
    pub fn load(shader: &Path) -> Result<Self, CompileError> {
        let name = shader
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| CompileError::InvalidShaderPath {
                path: shader.to_path_buf(),
            })?;
        let dir = shader.parent().map(Path::to_path_buf).unwrap_or_default();
        log::debug!("preparing shader file {name} in '{}'", dir.display());

        let mut stages = Vec::with_capacity(4);
        for stage in REQUIRED_STAGES {
            let file_name = stage_file_name(&name, stage);
            let path = dir.join(&file_name);
            let source =
                read_stage(stage, &path)?.ok_or(CompileError::MissingStage { stage, path })?;
            stages.push(StageSource::new(stage, file_name, source));
        }
        for stage in OPTIONAL_STAGES {
            let file_name = stage_file_name(&name, stage);
            if let Some(source) = read_stage(stage, &dir.join(&file_name))? {
                stages.push(StageSource::new(stage, file_name, source));
            }
        }
        Ok(Self { name, dir, stages })
    }

    /// The source of `stage`, if present.
    #[inline]
    #[must_use]
    pub fn stage(&self, stage: ShaderStage) -> Option<&StageSource> {
        self.stages.iter().find(|source| source.stage == stage)
    }

    /// Parses all present stages into one interface, the vertex stage last.
    ///
    /// # Errors
    ///
    /// [`CompileError::Parse`] naming the first stage that failed.
    #[inline]
    pub fn parse(&self) -> Result<ShaderInterface, CompileError> {
        let mut interface = ShaderInterface::new(self.name.clone(), self.name.clone());
        for stage in PARSE_ORDER {
            let Some(source) = self.stage(stage) else {
                continue;
            };
            log::debug!("parsing {stage} shader {}", source.file_name);
            parse_stage(&source.source, stage, &mut interface).map_err(|err| {
                CompileError::Parse {
                    stage,
                    path: self.dir.join(&source.file_name),
                    source: err,
                }
            })?;
        }
        Ok(interface)
    }
}

/// `<name>.<extension>`
fn stage_file_name(name: &str, stage: ShaderStage) -> String {
    format!("{name}.{}", stage.extension())
}

/// Reads a stage file, `None` if it does not exist or is empty.
fn read_stage(stage: ShaderStage, path: &Path) -> Result<Option<String>, CompileError> {
    match fs::read_to_string(path) {
        Ok(source) if source.is_empty() => Ok(None),
        Ok(source) => Ok(Some(source)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(CompileError::ReadStage {
            stage,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Reads the program and uniform block templates.
///
/// # Errors
///
/// [`CompileError::Template`] naming the unreadable template.
#[inline]
pub fn load_templates(program: &Path, uniform_block: &Path) -> Result<Templates, CompileError> {
    let read = |path: &Path| {
        fs::read_to_string(path).map_err(|source| CompileError::Template {
            path: path.to_path_buf(),
            source,
        })
    };
    Ok(Templates::new(read(program)?, read(uniform_block)?))
}

/// Writes every generated file to `dir`, creating it if needed.
///
/// # Errors
///
/// [`CompileError::Write`] for the first file that could not be written.
#[inline]
pub fn write_generated(generated: &Generated, dir: &Path) -> Result<Vec<PathBuf>, CompileError> {
    let write_error = |path: &Path, source| CompileError::Write {
        path: path.to_path_buf(),
        source,
    };
    fs::create_dir_all(dir).map_err(|err| write_error(dir, err))?;
    let dir = dunce::canonicalize(dir).map_err(|err| write_error(dir, err))?;

    let mut written = Vec::new();
    for file in generated.files() {
        let path = dir.join(&file.file_name);
        log::info!("generating {} at '{}'", file.file_name, path.display());
        fs::write(&path, &file.contents).map_err(|err| {
            log::error!("failed to write '{}'", path.display());
            write_error(&path, err)
        })?;
        written.push(path);
    }
    Ok(written)
}

/// Runs all steps for the given arguments.
///
/// # Errors
///
/// See [`CompileError`].
#[inline]
pub fn compile(args: &GenerateArgs) -> Result<ShaderInterface, CompileError> {
    let source_dir = args.source_dir();
    log::debug!("using '{}' as output directory", source_dir.display());
    log::debug!("using {} as namespace", args.namespace);
    log::debug!("using {} as shader directory", args.shader_dir);

    let program = ShaderProgram::load(args.shader()?)?;
    let interface = program.parse()?;
    let templates = load_templates(args.shader_template()?, args.buffer_template()?)?;
    let options = GenerateOptions::new(&args.namespace, &args.shader_dir, args.padding);
    let generated = generate(&interface, &templates, &options);
    write_generated(&generated, &source_dir)?;

    match &args.glslang {
        Some(binary) => {
            log::debug!("validating shader file {}", program.name);
            Validator::new(binary.clone(), args.validation_dir()).validate(&program.stages)?;
        }
        None => log::info!("no validator given, skipping validation of {}", program.name),
    }
    Ok(interface)
}

/// `shadertool generate`
#[derive(Clone, Debug, clap::Parser)]
#[non_exhaustive]
pub struct Generate {
    /// TOML file with a `[shadertool]` table providing defaults for the arguments below.
    #[clap(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// The flattened [`GenerateArgs`].
    #[clap(flatten)]
    pub args: GenerateArgs,
}

impl Generate {
    /// Entrypoint
    ///
    /// # Errors
    ///
    /// See [`CompileError`].
    #[inline]
    pub fn run(&self) -> Result<(), CompileError> {
        let args = config::from_config_file_with_args(self.config.as_deref(), &self.args)?;
        log::debug!("generating with final merged arguments: {args:#?}");
        args.check_required()?;
        compile(&args)?;
        Ok(())
    }
}
