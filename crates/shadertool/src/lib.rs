//! Command line tool for generating typed bindings from GLSL shader programs.
//!
//! Shader stages declare their interface with a small directive language on top of GLSL:
//! `$in` and `$out` for stage inputs and outputs, `uniform` for loose uniforms and
//! uniform blocks, and `layout(...)` qualifiers.
//!
//! ## Generating bindings
//!
//! `shadertool generate` takes the base path of a shader program, loads its `.frag` and
//! `.vert` stages (plus `.geom` and `.comp` if present), and collects the declarations of all
//! stages into one [`ShaderInterface`](interface::ShaderInterface). The interface is rendered
//! through two text templates into a program header and one header per uniform block. Uniform
//! blocks are laid out following simplified `std140` rules, see [`block_layout`].
//!
//! Afterwards every stage is handed to an external validator such as `glslangValidator`.
//! The exit code of the process tells what went wrong,
//! see [`CompileError::exit_code`](compile::CompileError::exit_code).
//!
//! ## Configuration
//!
//! All arguments of `generate` can also be given in the `[shadertool]` table of a TOML file
//! passed with `--config`. Arguments given on the command line win.

use self::{compile::Generate, show::Show};

pub mod block_layout;
pub mod compile;
pub mod config;
pub mod generate;
pub mod interface;
pub mod layout;
pub mod lexer;
pub mod naming;
pub mod parser;
pub mod show;
pub mod tokenizer;
pub mod types;
pub mod validator;

mod merge;

/// All of the available subcommands for `shadertool`
#[derive(clap::Subcommand)]
#[non_exhaustive]
pub enum Command {
    /// Generate the bindings of a shader program and validate its stages.
    Generate(Box<Generate>),

    /// Show some useful values.
    Show(Show),
}

impl Command {
    /// Runs the command
    ///
    /// # Errors
    /// Any errors during execution, usually printed to the user.
    /// A failed generation keeps its [`CompileError`](compile::CompileError) for the exit code.
    #[inline]
    pub fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Generate(generate) => generate.run()?,
            Self::Show(show) => show.run()?,
        }
        Ok(())
    }
}

/// The struct representing the main CLI.
#[derive(clap::Parser)]
#[clap(author, version, about, subcommand_required = true)]
#[non_exhaustive]
pub struct Cli {
    /// Log more, may be repeated.
    #[clap(long, short, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[clap(long, short, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// The command to run.
    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The log level selected by `--verbose` and `--quiet`, `info` by default.
    #[inline]
    #[must_use]
    pub const fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
