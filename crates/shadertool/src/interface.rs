//! The external interface of a shader program, collected over all of its stages.

use crate::layout::Layout;
use crate::types::VariableType;

/// Array size of a declaration whose length is only known at runtime.
pub const UNBOUNDED_ARRAY: i32 = -1;

/// One declared variable.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[non_exhaustive]
pub struct Variable {
    /// Resolved type.
    #[serde(rename = "type")]
    pub ty: VariableType,
    /// Declared name.
    pub name: String,
    /// `0` for non-arrays, the length for fixed arrays, [`UNBOUNDED_ARRAY`] otherwise.
    pub array_size: i32,
    /// Qualifiers pending when the declaration was recorded.
    pub layout: Layout,
}

impl Variable {
    /// Make a new `Variable` without layout qualifiers.
    #[inline]
    #[expect(clippy::impl_trait_in_params, reason = "just a struct new")]
    pub fn new(ty: VariableType, name: impl Into<String>, array_size: i32) -> Self {
        Self {
            ty,
            name: name.into(),
            array_size,
            layout: Layout::default(),
        }
    }

    /// Attaches qualifiers to the variable.
    #[inline]
    #[must_use]
    pub fn with_layout(self, layout: Layout) -> Self {
        Self { layout, ..self }
    }

    /// Whether this is a fixed size array.
    #[inline]
    #[must_use]
    pub const fn is_fixed_array(&self) -> bool {
        self.array_size > 0
    }

    /// Whether this is an array of runtime length.
    #[inline]
    #[must_use]
    pub const fn is_unbounded_array(&self) -> bool {
        self.array_size == UNBOUNDED_ARRAY
    }
}

/// Where a declaration ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Container {
    /// Vertex inputs.
    Attributes,
    /// Vertex outputs.
    Varyings,
    /// Outputs of non-vertex stages.
    Outputs,
    /// Loose uniforms.
    Uniforms,
}

/// A named group of uniforms backed by one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[non_exhaustive]
pub struct UniformBlock {
    /// Declared block name.
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<Variable>,
    /// Qualifiers pending when the block was closed.
    pub layout: Layout,
}

impl UniformBlock {
    /// Make a new, empty `UniformBlock`.
    #[inline]
    #[expect(clippy::impl_trait_in_params, reason = "just a struct new")]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Shader stage a source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
#[expect(missing_docs, reason = "self explanatory")]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    Compute,
}

impl ShaderStage {
    /// File extension of the stage source.
    #[inline]
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Vertex => "vert",
            Self::Fragment => "frag",
            Self::Geometry => "geom",
            Self::Compute => "comp",
        }
    }

    /// Container receiving `$in` declarations, `None` where they are not tracked.
    #[inline]
    #[must_use]
    pub const fn inputs(self) -> Option<Container> {
        match self {
            Self::Vertex => Some(Container::Attributes),
            // TODO: route into varyings once `$out`/`$in` pairs are validated across stages
            Self::Fragment | Self::Geometry | Self::Compute => None,
        }
    }

    /// Container receiving `$out` declarations.
    #[inline]
    #[must_use]
    pub const fn outputs(self) -> Container {
        match self {
            Self::Vertex => Container::Varyings,
            Self::Fragment | Self::Geometry | Self::Compute => Container::Outputs,
        }
    }
}

impl core::fmt::Display for ShaderStage {
    #[expect(
        clippy::min_ident_chars,
        reason = "It's a core library trait implementation"
    )]
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Geometry => "geometry",
            Self::Compute => "compute",
        })
    }
}

/// Everything a shader program exposes, aggregated across its stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[non_exhaustive]
pub struct ShaderInterface {
    /// Base name of the shader program.
    pub name: String,
    /// File name the sources were loaded from, without stage extension.
    pub filename: String,
    /// `$in` of the vertex stage.
    pub attributes: Vec<Variable>,
    /// `$out` of the vertex stage.
    pub varyings: Vec<Variable>,
    /// `$out` of all other stages.
    pub outputs: Vec<Variable>,
    /// Uniforms outside of blocks.
    pub uniforms: Vec<Variable>,
    /// Uniform blocks in declaration order.
    pub uniform_blocks: Vec<UniformBlock>,
}

impl ShaderInterface {
    /// Make a new, empty `ShaderInterface`.
    #[inline]
    #[expect(clippy::impl_trait_in_params, reason = "just a struct new")]
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Mutable access to one of the variable lists.
    #[inline]
    pub fn container_mut(&mut self, container: Container) -> &mut Vec<Variable> {
        match container {
            Container::Attributes => &mut self.attributes,
            Container::Varyings => &mut self.varyings,
            Container::Outputs => &mut self.outputs,
            Container::Uniforms => &mut self.uniforms,
        }
    }
}

/// Adds `variable` unless a variable of the same name exists already.
///
/// Returns the type of the existing variable when `variable` was rejected.
#[inline]
pub fn push_unique(variables: &mut Vec<Variable>, variable: Variable) -> Result<(), VariableType> {
    if let Some(existing) = variables.iter().find(|known| known.name == variable.name) {
        return Err(existing.ty);
    }
    variables.push(variable);
    Ok(())
}
