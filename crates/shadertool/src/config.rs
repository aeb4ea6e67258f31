//! Manage and merge the various sources of config:
//! the `[shadertool]` table of a TOML file and the provided args.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use crate::block_layout::PaddingMode;
use crate::merge::{apply, merge};

/// Name of the table the config file keeps its values in.
pub const CONFIG_TABLE: &str = "shadertool";

/// Arguments of a generation run.
#[derive(Clone, Debug, PartialEq, Eq, clap::Parser, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "it is intended")]
pub struct GenerateArgs {
    /// Base path of the shader program, `.vert`, `.frag`, `.geom` and `.comp` are appended.
    #[clap(long, short = 's')]
    pub shader: Option<PathBuf>,

    /// The program binding template file.
    #[clap(long, short = 't', alias("shadertemplate"))]
    pub shader_template: Option<PathBuf>,

    /// The uniform buffer binding template file.
    #[clap(long, short = 'b', alias("buffertemplate"))]
    pub buffer_template: Option<PathBuf>,

    /// Namespace to generate the source in.
    #[clap(long, short = 'n', default_value = "shader")]
    pub namespace: String,

    /// Directory the shader is loaded from at runtime.
    #[clap(long, short = 'd', alias("shaderdir"), default_value = "shaders/")]
    pub shader_dir: String,

    /// Directory to generate the source in, `src/modules/<namespace>/` if not given.
    #[clap(long, alias("sourcedir"))]
    pub source_dir: Option<PathBuf>,

    /// Path to the `glslangValidator` binary. Validation is skipped without it.
    #[clap(long, short = 'g')]
    pub glslang: Option<PathBuf>,

    /// Directory the stage files for the validator are written to.
    #[clap(long)]
    pub validation_dir: Option<PathBuf>,

    /// How uniform block structs are aligned.
    #[clap(long, value_enum, default_value_t = PaddingMode::AlignAs)]
    pub padding: PaddingMode,
}

impl Default for GenerateArgs {
    #[inline]
    fn default() -> Self {
        Self {
            shader: None,
            shader_template: None,
            buffer_template: None,
            namespace: "shader".to_owned(),
            shader_dir: "shaders/".to_owned(),
            source_dir: None,
            glslang: None,
            validation_dir: None,
            padding: PaddingMode::AlignAs,
        }
    }
}

impl GenerateArgs {
    /// Directory the bindings are written to.
    #[inline]
    #[must_use]
    pub fn source_dir(&self) -> PathBuf {
        self.source_dir.clone().unwrap_or_else(|| {
            Path::new("src")
                .join("modules")
                .join(&self.namespace)
        })
    }

    /// Directory the validator stage files are written to.
    #[inline]
    #[must_use]
    pub fn validation_dir(&self) -> PathBuf {
        self.validation_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("shadertool"))
    }

    /// Base path of the shader program.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] if neither the command line nor the config file gave one.
    #[inline]
    pub fn shader(&self) -> Result<&Path, ConfigError> {
        required(self.shader.as_deref(), "shader")
    }

    /// The program binding template.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] if neither the command line nor the config file gave one.
    #[inline]
    pub fn shader_template(&self) -> Result<&Path, ConfigError> {
        required(self.shader_template.as_deref(), "shader-template")
    }

    /// The uniform buffer binding template.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] if neither the command line nor the config file gave one.
    #[inline]
    pub fn buffer_template(&self) -> Result<&Path, ConfigError> {
        required(self.buffer_template.as_deref(), "buffer-template")
    }

    /// Fails if an argument without a usable default is missing.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] naming the first missing argument.
    #[inline]
    pub fn check_required(&self) -> Result<(), ConfigError> {
        self.shader()?;
        self.shader_template()?;
        self.buffer_template()?;
        Ok(())
    }

    /// Resolves relative paths read from the config file against its directory.
    fn relative_to(&mut self, dir: &Path) {
        for path in [
            &mut self.shader,
            &mut self.shader_template,
            &mut self.buffer_template,
            &mut self.source_dir,
            &mut self.validation_dir,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }
}

/// `path`, or [`ConfigError::Missing`] naming the flag.
fn required<'path>(
    path: Option<&'path Path>,
    name: &'static str,
) -> Result<&'path Path, ConfigError> {
    path.filter(|path| !path.as_os_str().is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// An error while assembling the configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "it is intended")]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("could not read config file `{}`: {source}", path.display())]
    Read {
        /// The config file.
        path: PathBuf,
        /// Source of the error.
        source: io::Error,
    },
    /// The config file is not valid TOML.
    #[error("could not parse config file `{}`: {source}", path.display())]
    Parse {
        /// The config file.
        path: PathBuf,
        /// Source of the error.
        source: toml::de::Error,
    },
    /// The configured values do not fit the arguments.
    #[error("invalid config values: {0}")]
    Convert(#[from] serde_json::Error),
    /// A required argument was given neither on the command line nor in the config file.
    #[error("missing `--{0}`, pass it on the command line or in the config file")]
    Missing(&'static str),
}

/// Overrides the options from the config file with the options from `args`.
///
/// Without a config file, `args` are returned as they are.
///
/// # Errors
///
/// See [`ConfigError`].
#[inline]
pub fn from_config_file_with_args(
    config_file: Option<&Path>,
    args: &GenerateArgs,
) -> Result<GenerateArgs, ConfigError> {
    let Some(config_file) = config_file else {
        return Ok(args.clone());
    };
    let mut from_file: GenerateArgs = from_config_file(config_file)?;
    if let Some(dir) = config_file.parent() {
        from_file.relative_to(dir);
    }
    let merged = merge(&from_file, args)?;
    Ok(merged)
}

/// Reads the `[shadertool]` table of a TOML file into the value of the specified type.
///
/// # Errors
///
/// See [`ConfigError`].
#[inline]
pub fn from_config_file<T>(path: &Path) -> Result<T, ConfigError>
where
    T: Default + Serialize + DeserializeOwned,
{
    log::debug!("reading config file '{}'", path.display());
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table: toml::Table = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    from_table(&serde_json::to_value(table)?)
}

/// Converts the `shadertool` table of some config in JSON format to the value of specified type.
fn from_table<T>(config: &Value) -> Result<T, ConfigError>
where
    T: Default + Serialize + DeserializeOwned,
{
    let patch = config
        .get(CONFIG_TABLE)
        .cloned()
        .unwrap_or_else(|| json!({}))
        .keys_to_snake_case();
    log::debug!("got `{CONFIG_TABLE}` config: {patch:#?}");

    let defaults = serde_json::to_value(T::default())?;
    let mut value = defaults.clone();
    apply(&mut value, patch, &defaults);
    Ok(serde_json::from_value(value)?)
}

/// Extension trait for [JSON value](Value).
trait JsonKeysToSnakeCase {
    /// Converts JSON keys from kebab case to snake case, e.g. from `a-b` to `a_b`.
    ///
    /// The config file uses the spelling of the command line flags,
    /// while [`serde`] expects the field names of the Rust structs.
    fn keys_to_snake_case(self) -> Value;
}

impl JsonKeysToSnakeCase for Value {
    #[inline]
    #[expect(clippy::wildcard_enum_match_arm, reason = "we only want objects")]
    fn keys_to_snake_case(self) -> Value {
        match self {
            Self::Object(object) => Self::Object(
                object
                    .into_iter()
                    .map(|(key, value)| (key.replace('-', "_"), value.keys_to_snake_case()))
                    .collect(),
            ),
            other => other,
        }
    }
}

#[cfg(test)]
mod test {
    use clap::Parser as _;

    use super::*;

    fn write_config(dir: &Path, lines: &[&str]) -> PathBuf {
        let path = dir.join("shadertool.toml");
        fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    #[test_log::test]
    fn defaults_from_cli() {
        let args = GenerateArgs::parse_from(["shadertool", "--shader", "world"]);
        assert_eq!(args.namespace, "shader");
        assert_eq!(args.shader_dir, "shaders/");
        assert_eq!(args.padding, PaddingMode::AlignAs);
        assert_eq!(
            args,
            GenerateArgs {
                shader: Some("world".into()),
                ..GenerateArgs::default()
            }
        );
    }

    #[test_log::test]
    fn legacy_flag_spellings() {
        let args = GenerateArgs::parse_from([
            "shadertool",
            "--shadertemplate",
            "shader.h.in",
            "--buffertemplate",
            "ub.h.in",
            "--shaderdir",
            "assets",
            "--sourcedir",
            "gen",
            "--padding",
            "explicit",
        ]);
        assert_eq!(args.shader_template().unwrap(), Path::new("shader.h.in"));
        assert_eq!(args.buffer_template().unwrap(), Path::new("ub.h.in"));
        assert_eq!(args.shader_dir, "assets");
        assert_eq!(args.source_dir.as_deref(), Some(Path::new("gen")));
        assert_eq!(args.padding, PaddingMode::Explicit);
    }

    #[test_log::test]
    fn values_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            dir.path(),
            &[
                "[shadertool]",
                "namespace = \"render\"",
                "shader-template = \"templates/shader.h.in\"",
                "source-dir = \"/abs/gen\"",
                "padding = \"explicit\"",
            ],
        );
        let args = GenerateArgs::parse_from(["shadertool", "-s", "world"]);
        let merged = from_config_file_with_args(Some(&config), &args).unwrap();
        assert_eq!(merged.namespace, "render");
        assert_eq!(merged.shader().unwrap(), Path::new("world"));
        assert_eq!(
            merged.shader_template().unwrap(),
            dir.path().join("templates/shader.h.in")
        );
        assert!(merged.buffer_template.is_none());
        assert_eq!(merged.padding, PaddingMode::Explicit);
        if cfg!(not(target_os = "windows")) {
            assert_eq!(merged.source_dir.as_deref(), Some(Path::new("/abs/gen")));
        }
    }

    #[test_log::test]
    fn cli_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            dir.path(),
            &["[shadertool]", "namespace = \"render\"", "shader-dir = \"a/\""],
        );
        let args = GenerateArgs::parse_from(["shadertool", "--namespace", "ui"]);
        let merged = from_config_file_with_args(Some(&config), &args).unwrap();
        assert_eq!(merged.namespace, "ui");
        assert_eq!(merged.shader_dir, "a/");
    }

    #[test_log::test]
    fn missing_table_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), &["[other]", "namespace = \"render\""]);
        let args = GenerateArgs::default();
        let merged = from_config_file_with_args(Some(&config), &args).unwrap();
        assert_eq!(merged, args);

        let err = from_config_file_with_args(Some(&dir.path().join("nope.toml")), &args)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test_log::test]
    fn invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), &["[shadertool", "namespace ="]);
        let err = from_config_file_with_args(Some(&config), &GenerateArgs::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test_log::test]
    fn required_arguments() {
        let args = GenerateArgs::parse_from(["shadertool", "-s", "world", "-t", "a.in"]);
        assert!(matches!(
            args.check_required(),
            Err(ConfigError::Missing("buffer-template"))
        ));
        let args =
            GenerateArgs::parse_from(["shadertool", "-s", "world", "-t", "a.in", "-b", "b.in"]);
        args.check_required().unwrap();

        let args = GenerateArgs::parse_from(["shadertool"]);
        assert!(matches!(
            args.check_required(),
            Err(ConfigError::Missing("shader"))
        ));
    }

    #[test_log::test]
    fn required_paths_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            dir.path(),
            &[
                "[shadertool]",
                "shader = \"shaders/world\"",
                "shader-template = \"shader.h.in\"",
                "buffer-template = \"ub.h.in\"",
            ],
        );
        let args = GenerateArgs::parse_from(["shadertool", "-t", "/other/shader.h.in"]);
        let merged = from_config_file_with_args(Some(&config), &args).unwrap();
        merged.check_required().unwrap();
        assert_eq!(merged.shader().unwrap(), dir.path().join("shaders/world"));
        assert_eq!(
            merged.shader_template().unwrap(),
            Path::new("/other/shader.h.in")
        );
        assert_eq!(
            merged.buffer_template().unwrap(),
            dir.path().join("ub.h.in")
        );
    }

    #[test_log::test]
    fn derived_directories() {
        let args = GenerateArgs::parse_from(["shadertool", "-n", "render"]);
        assert_eq!(args.source_dir(), Path::new("src").join("modules").join("render"));
        assert!(args.validation_dir().ends_with("shadertool"));
    }
}
