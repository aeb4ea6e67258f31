//! Display various information about shadertool, e.g. the supported types.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::compile::ShaderProgram;
use crate::types::TYPES;

/// Show the type table or the interface of a shader.
#[derive(Clone, Debug, clap::Subcommand)]
#[non_exhaustive]
pub enum Info {
    /// Every supported GLSL type with its generated counterpart.
    Types,
    /// The interface of a shader program as JSON, without generating anything.
    Interface {
        /// Base path of the shader program, without stage extension.
        #[clap(long, short = 's')]
        shader: PathBuf,
    },
}

/// `shadertool show`
#[derive(Clone, Debug, clap::Parser)]
#[non_exhaustive]
pub struct Show {
    /// Display information about shadertool.
    #[clap(subcommand)]
    pub command: Info,
}

impl Show {
    /// Entrypoint
    ///
    /// # Errors
    ///
    /// Fails if the shader can't be loaded or parsed, or stdout is closed.
    #[inline]
    pub fn run(&self) -> anyhow::Result<()> {
        let text = self.render()?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    /// The text [`Self::run`] prints.
    fn render(&self) -> anyhow::Result<String> {
        match &self.command {
            Info::Types => Ok(type_table()),
            Info::Interface { shader } => {
                log::debug!("showing interface of '{}'", shader.display());
                let interface = ShaderProgram::load(shader)
                    .and_then(|program| program.parse())
                    .with_context(|| format!("showing the interface of '{}'", shader.display()))?;
                let mut json = serde_json::to_string_pretty(&interface)?;
                json.push('\n');
                Ok(json)
            }
        }
    }
}

/// One line per supported type: source name, generated name, components and passing convention.
fn type_table() -> String {
    let mut out = format!(
        "{:<22}{:<20}{:<12}{}\n",
        "glsl", "generated", "components", "passed by"
    );
    for descriptor in &TYPES {
        out.push_str(&format!(
            "{:<22}{:<20}{:<12}{:?}\n",
            descriptor.glsl, descriptor.ctype, descriptor.components, descriptor.pass_by
        ));
    }
    out
}
