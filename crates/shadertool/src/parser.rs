//! Extracts declarations from one shader stage into a [`ShaderInterface`].
//!
//! The grammar is a small directive language on top of GLSL:
//!
//! ```glsl
//! $in vec3 a_pos;                   // vertex attribute
//! $out vec4 o_color;                // varying (vertex stage) or output
//! layout(location = 0) uniform sampler2D u_texture;
//! layout(std140) uniform Block {
//!     vec3 color;
//!     float intensity[4];
//! };
//! ```
//!
//! Everything else in the source is skipped.

use crate::interface::{
    push_unique, Container, ShaderInterface, ShaderStage, UniformBlock, Variable, UNBOUNDED_ARRAY,
};
use crate::layout::Layout;
use crate::lexer::tokenize;
use crate::tokenizer::Tokenizer;
use crate::types::VariableType;

/// Number of lines shown before and after the offending one in a [`ParseError`].
const CONTEXT_LINES: usize = 2;

/// Keywords that may precede the type of a declaration and carry no meaning here.
const PRECISION_QUALIFIERS: [&str; 4] = ["highp", "mediump", "lowp", "precision"];

/// A problem that makes the stage unusable for binding generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}\n{context}")]
#[non_exhaustive]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// 1-based line of the offending token.
    pub line: usize,
    /// The source lines around [`Self::line`].
    pub context: String,
}

impl ParseError {
    /// Make a new `ParseError`, cutting the context out of `source`.
    fn new(kind: ParseErrorKind, line: usize, source: &str) -> Self {
        Self {
            kind,
            line,
            context: source_context(source, line),
        }
    }
}

/// The reason of a [`ParseError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// A declaration used a type missing from the type table.
    #[error("unknown type `{0}`")]
    UnknownType(String),
    /// The stage ended before the declaration was complete.
    #[error("unexpected end of shader, expected {0}")]
    UnexpectedEnd(&'static str),
    /// The stage ended inside a uniform block.
    #[error("uniform block `{0}` is not terminated")]
    UnterminatedBlock(String),
    /// The closing `}` of a block was not followed by `;`.
    #[error("expected `;` after uniform block `{block}`, got `{found}`")]
    MissingBlockSemicolon {
        /// The block being closed.
        block: String,
        /// What came instead.
        found: String,
    },
    /// A block was opened inside another one.
    #[error("uniform block `{inner}` is nested in `{outer}`")]
    NestedBlock {
        /// The open block.
        outer: String,
        /// The block that was opened inside of it.
        inner: String,
    },
    /// An array size was not followed by `]`.
    #[error("expected `]` after the array size of `{name}`, got `{found}`")]
    MissingBracket {
        /// The array variable.
        name: String,
        /// What came instead.
        found: String,
    },
}

/// What a declaration turned out to be.
enum Declaration<'tokens> {
    /// `Type {` opens a uniform block.
    Block(&'tokens str),
    /// A plain variable.
    Variable {
        /// Resolved type.
        ty: VariableType,
        /// Declared name.
        name: &'tokens str,
        /// See [`Variable::array_size`].
        array_size: i32,
    },
}

/// Parses one stage and adds its declarations to `interface`.
///
/// Malformed `layout(...)` lists, duplicated names and unusable array sizes are logged
/// and skipped. Declarations recorded before an error stay in `interface`.
///
/// # Errors
///
/// Returns a [`ParseError`] if the stage cannot be bound safely, see [`ParseErrorKind`].
#[inline]
pub fn parse_stage(
    source: &str,
    stage: ShaderStage,
    interface: &mut ShaderInterface,
) -> Result<(), ParseError> {
    let tokens = tokenize(source);
    let mut tok = Tokenizer::new(&tokens);
    let error = |kind: ParseErrorKind, line: usize| ParseError::new(kind, line, source);

    let mut layout = Layout::default();
    let mut block: Option<UniformBlock> = None;

    while tok.has_next() {
        let before = tok.checkpoint();
        let token = tok.next();
        let container = match token {
            "$in" => stage.inputs(),
            "$out" => Some(stage.outputs()),
            "layout" => {
                // consecutive qualifiers belong to the same declaration, also inside a block
                loop {
                    if let Err(err) = layout.parse(&mut tok) {
                        log::warn!("could not parse layout at line {}: {err}", tok.line());
                    }
                    if tok.peek_next() != Some("layout") {
                        break;
                    }
                    tok.next();
                }
                None
            }
            "buffer" => {
                log::warn!("storage buffers are not supported (line {})", tok.line());
                None
            }
            "uniform" => Some(Container::Uniforms),
            "}" if block.is_some() => {
                let found = if tok.has_next() { tok.next() } else { "end of shader" };
                let Some(mut closed) = block.take() else {
                    continue;
                };
                if found != ";" {
                    return Err(error(
                        ParseErrorKind::MissingBlockSemicolon {
                            block: closed.name,
                            found: found.to_owned(),
                        },
                        tok.line(),
                    ));
                }
                log::trace!("end of uniform block {}", closed.name);
                closed.layout = layout;
                interface.uniform_blocks.push(closed);
                layout = Layout::default();
                continue;
            }
            _ => {
                if block.is_some() {
                    // a block member, reparse it as a declaration
                    tok.restore(before);
                }
                None
            }
        };

        if container.is_none() && block.is_none() {
            continue;
        }

        match read_declaration(&mut tok).map_err(|(kind, line)| error(kind, line))? {
            Declaration::Block(name) => {
                if let Some(outer) = &block {
                    return Err(error(
                        ParseErrorKind::NestedBlock {
                            outer: outer.name.clone(),
                            inner: name.to_owned(),
                        },
                        tok.line(),
                    ));
                }
                log::trace!("found uniform block {name}");
                block = Some(UniformBlock::new(name));
            }
            Declaration::Variable {
                ty,
                name,
                array_size,
            } => {
                let variable = Variable::new(ty, name, array_size).with_layout(layout);
                if let Some(open) = block.as_mut() {
                    add_variable(&mut open.members, variable);
                } else if let Some(target) = container {
                    add_variable(interface.container_mut(target), variable);
                    layout = Layout::default();
                }
            }
        }
    }

    if let Some(open) = block {
        return Err(error(ParseErrorKind::UnterminatedBlock(open.name), tok.line()));
    }
    Ok(())
}

/// Reads `[precision] type name [ '[' size ']' ] [;]` or `Type {`.
fn read_declaration<'tokens>(
    tok: &mut Tokenizer<'tokens>,
) -> Result<Declaration<'tokens>, (ParseErrorKind, usize)> {
    let mut ty = expect_token(tok, "a type")?;
    while PRECISION_QUALIFIERS.contains(&ty) {
        ty = expect_token(tok, "a type")?;
    }
    let type_line = tok.line();
    let name = expect_token(tok, "a variable name")?;
    if name == "{" {
        return Ok(Declaration::Block(ty));
    }

    let resolved = VariableType::from_glsl(ty)
        .ok_or_else(|| (ParseErrorKind::UnknownType(ty.to_owned()), type_line))?;

    let mut array_size = 0;
    if tok.peek_next() == Some("[") {
        tok.next();
        array_size = read_array_size(tok, name)?;
    }
    if tok.peek_next() == Some(";") {
        tok.next();
    }
    // TODO: multi dimensional arrays once GLSL 5.50 sources are supported
    Ok(Declaration::Variable {
        ty: resolved,
        name,
        array_size,
    })
}

/// Reads `size ]` after an opening bracket.
///
/// A size of zero, an empty `[]` or a size that is not a number yield an unbounded array.
fn read_array_size(tok: &mut Tokenizer<'_>, name: &str) -> Result<i32, (ParseErrorKind, usize)> {
    let number = expect_token(tok, "an array size")?;
    if number == "]" {
        log::warn!("could not determine array size for {name} (no size given)");
        return Ok(UNBOUNDED_ARRAY);
    }
    let close = expect_token(tok, "`]`")?;
    if close != "]" {
        return Err((
            ParseErrorKind::MissingBracket {
                name: name.to_owned(),
                found: close.to_owned(),
            },
            tok.line(),
        ));
    }
    match number.trim_end_matches(['u', 'U']).parse::<i32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => {
            log::warn!("could not determine array size for {name} ({number})");
            Ok(UNBOUNDED_ARRAY)
        }
    }
}

/// Reads the next token, failing with `expected` at the end of the stream.
fn expect_token<'tokens>(
    tok: &mut Tokenizer<'tokens>,
    expected: &'static str,
) -> Result<&'tokens str, (ParseErrorKind, usize)> {
    if tok.has_next() {
        Ok(tok.next())
    } else {
        Err((ParseErrorKind::UnexpectedEnd(expected), tok.line()))
    }
}

/// Appends `variable`, warning about duplicates.
fn add_variable(variables: &mut Vec<Variable>, variable: Variable) {
    let name = variable.name.clone();
    let ty = variable.ty;
    if let Err(existing) = push_unique(variables, variable) {
        log::warn!(
            "found duplicate variable {name} ({} versus {})",
            existing.ctype(),
            ty.ctype()
        );
    }
}

/// The lines around `line`, numbered, with the line itself marked.
fn source_context(source: &str, line: usize) -> String {
    let first = line.saturating_sub(CONTEXT_LINES).max(1);
    let last = line.saturating_add(CONTEXT_LINES);
    source
        .lines()
        .enumerate()
        .map(|(index, text)| (index + 1, text))
        .filter(|(number, _)| (first..=last).contains(number))
        .map(|(number, text)| {
            let marker = if number == line { '>' } else { ' ' };
            format!("{marker}{number:>5} | {text}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
