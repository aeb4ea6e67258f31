//! The catalog of GLSL types a shader interface may use.
//!
//! Every supported type has exactly one [`TypeDescriptor`] in [`TYPES`],
//! stored at the index of its [`VariableType`] discriminant.

/// How a value of some type is handed to a generated setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[non_exhaustive]
pub enum PassBy {
    /// Copied into the parameter.
    Value,
    /// Passed as a const reference.
    Reference,
    /// Passed as a pointer, usually together with an element count.
    Pointer,
}

/// Every GLSL type known to the interface compiler.
///
/// Serializes as its GLSL name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
#[expect(missing_docs, reason = "variants are named after their GLSL types")]
pub enum VariableType {
    Double,
    Float,
    UnsignedInt,
    Bool,
    Int,
    BVec2,
    BVec3,
    BVec4,
    DVec2,
    DVec3,
    DVec4,
    UVec2,
    UVec3,
    UVec4,
    IVec2,
    IVec3,
    IVec4,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
    Mat3x4,
    Mat4x3,
    Sampler1D,
    Sampler2D,
    Sampler2DArray,
    Sampler2DArrayShadow,
    Sampler3D,
    SamplerCube,
    Sampler1DShadow,
    Sampler2DShadow,
}

/// Static information about one [`VariableType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TypeDescriptor {
    /// The type this entry describes.
    pub ty: VariableType,
    /// Number of components, `1` for scalars, matrices and samplers.
    pub components: u32,
    /// Name of the type in generated code.
    pub ctype: &'static str,
    /// Calling convention of generated setters.
    pub pass_by: PassBy,
    /// Name of the type in shader source.
    pub glsl: &'static str,
}

/// Shorthand for building the table.
const fn entry(
    ty: VariableType,
    components: u32,
    ctype: &'static str,
    pass_by: PassBy,
    glsl: &'static str,
) -> TypeDescriptor {
    TypeDescriptor {
        ty,
        components,
        ctype,
        pass_by,
        glsl,
    }
}

/// All supported types, indexed by [`VariableType`] discriminant.
pub static TYPES: [TypeDescriptor; 33] = [
    entry(VariableType::Double, 1, "double", PassBy::Value, "double"),
    entry(VariableType::Float, 1, "float", PassBy::Value, "float"),
    entry(VariableType::UnsignedInt, 1, "uint32_t", PassBy::Value, "uint"),
    entry(VariableType::Bool, 1, "bool", PassBy::Value, "bool"),
    entry(VariableType::Int, 1, "int32_t", PassBy::Value, "int"),
    entry(VariableType::BVec2, 2, "glm::bvec2", PassBy::Reference, "bvec2"),
    entry(VariableType::BVec3, 3, "glm::bvec3", PassBy::Reference, "bvec3"),
    entry(VariableType::BVec4, 4, "glm::bvec4", PassBy::Reference, "bvec4"),
    entry(VariableType::DVec2, 2, "glm::dvec2", PassBy::Reference, "dvec2"),
    entry(VariableType::DVec3, 3, "glm::dvec3", PassBy::Reference, "dvec3"),
    entry(VariableType::DVec4, 4, "glm::dvec4", PassBy::Reference, "dvec4"),
    entry(VariableType::UVec2, 2, "glm::uvec2", PassBy::Reference, "uvec2"),
    entry(VariableType::UVec3, 3, "glm::uvec3", PassBy::Reference, "uvec3"),
    entry(VariableType::UVec4, 4, "glm::uvec4", PassBy::Reference, "uvec4"),
    entry(VariableType::IVec2, 2, "glm::ivec2", PassBy::Reference, "ivec2"),
    entry(VariableType::IVec3, 3, "glm::ivec3", PassBy::Reference, "ivec3"),
    entry(VariableType::IVec4, 4, "glm::ivec4", PassBy::Reference, "ivec4"),
    entry(VariableType::Vec2, 2, "glm::vec2", PassBy::Reference, "vec2"),
    entry(VariableType::Vec3, 3, "glm::vec3", PassBy::Reference, "vec3"),
    entry(VariableType::Vec4, 4, "glm::vec4", PassBy::Reference, "vec4"),
    entry(VariableType::Mat2, 1, "glm::mat2", PassBy::Reference, "mat2"),
    entry(VariableType::Mat3, 1, "glm::mat3", PassBy::Reference, "mat3"),
    entry(VariableType::Mat4, 1, "glm::mat4", PassBy::Reference, "mat4"),
    entry(VariableType::Mat3x4, 1, "glm::mat3x4", PassBy::Reference, "mat3x4"),
    entry(VariableType::Mat4x3, 1, "glm::mat4x3", PassBy::Reference, "mat4x3"),
    entry(VariableType::Sampler1D, 1, "video::TextureUnit", PassBy::Value, "sampler1D"),
    entry(VariableType::Sampler2D, 1, "video::TextureUnit", PassBy::Value, "sampler2D"),
    entry(VariableType::Sampler2DArray, 1, "video::TextureUnit", PassBy::Value, "sampler2DArray"),
    entry(
        VariableType::Sampler2DArrayShadow,
        1,
        "video::TextureUnit",
        PassBy::Value,
        "sampler2DArrayShadow",
    ),
    entry(VariableType::Sampler3D, 1, "video::TextureUnit", PassBy::Value, "sampler3D"),
    entry(VariableType::SamplerCube, 1, "video::TextureUnit", PassBy::Value, "samplerCube"),
    entry(VariableType::Sampler1DShadow, 1, "video::TextureUnit", PassBy::Value, "sampler1DShadow"),
    entry(VariableType::Sampler2DShadow, 1, "video::TextureUnit", PassBy::Value, "sampler2DShadow"),
];

impl VariableType {
    /// Resolves a GLSL type name, e.g. `vec3`, by exact match.
    #[inline]
    #[must_use]
    pub fn from_glsl(name: &str) -> Option<Self> {
        TYPES
            .iter()
            .find(|descriptor| descriptor.glsl == name)
            .map(|descriptor| descriptor.ty)
    }

    /// The table entry of this type.
    #[inline]
    #[must_use]
    #[expect(
        clippy::indexing_slicing,
        clippy::as_conversions,
        reason = "the table holds one entry per discriminant"
    )]
    pub fn descriptor(self) -> &'static TypeDescriptor {
        &TYPES[self as usize]
    }

    /// Number of components as listed in the table.
    #[inline]
    #[must_use]
    pub fn components(self) -> u32 {
        self.descriptor().components
    }

    /// The name used in generated code.
    #[inline]
    #[must_use]
    pub fn ctype(self) -> &'static str {
        self.descriptor().ctype
    }

    /// The name used in shader source.
    #[inline]
    #[must_use]
    pub fn glsl(self) -> &'static str {
        self.descriptor().glsl
    }

    /// Whether this is a 2, 3 or 4 component vector of any scalar family.
    #[inline]
    #[must_use]
    pub const fn is_vector(self) -> bool {
        matches!(
            self,
            Self::BVec2
                | Self::BVec3
                | Self::BVec4
                | Self::DVec2
                | Self::DVec3
                | Self::DVec4
                | Self::UVec2
                | Self::UVec3
                | Self::UVec4
                | Self::IVec2
                | Self::IVec3
                | Self::IVec4
                | Self::Vec2
                | Self::Vec3
                | Self::Vec4
        )
    }

    /// Whether this is a plain scalar.
    #[inline]
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Double | Self::Float | Self::UnsignedInt | Self::Bool | Self::Int
        )
    }

    /// Whether this is an opaque texture handle.
    #[inline]
    #[must_use]
    pub const fn is_sampler(self) -> bool {
        matches!(
            self,
            Self::Sampler1D
                | Self::Sampler2D
                | Self::Sampler2DArray
                | Self::Sampler2DArrayShadow
                | Self::Sampler3D
                | Self::SamplerCube
                | Self::Sampler1DShadow
                | Self::Sampler2DShadow
        )
    }

    /// Whether values of this type are stored as integers in a vertex buffer.
    #[inline]
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::UnsignedInt
                | Self::IVec2
                | Self::IVec3
                | Self::IVec4
                | Self::UVec2
                | Self::UVec3
                | Self::UVec4
        )
    }

    /// `int` or `uint`.
    #[inline]
    #[must_use]
    pub const fn is_single_integer(self) -> bool {
        matches!(self, Self::Int | Self::UnsignedInt)
    }

    /// Whether this is one of the double precision types.
    #[inline]
    #[must_use]
    pub const fn is_double(self) -> bool {
        matches!(
            self,
            Self::Double | Self::DVec2 | Self::DVec3 | Self::DVec4
        )
    }

    /// Whether this is a `vec2`, `vec3` or `vec4` of floats.
    #[inline]
    #[must_use]
    pub const fn is_float_vector(self) -> bool {
        matches!(self, Self::Vec2 | Self::Vec3 | Self::Vec4)
    }

    /// Suffix of the low level `setUniform*` call for this type.
    ///
    /// `amount` is the number of elements passed, anything above `1` selects the array variant.
    #[inline]
    #[must_use]
    pub fn uniform_setter_postfix(self, amount: i32) -> &'static str {
        let (single, array) = match self {
            Self::Float => ("f", "1fv"),
            Self::Double => ("d", "1dv"),
            Self::UnsignedInt => ("ui", "1uiv"),
            Self::Bool | Self::Int | Self::SamplerCube => ("i", "1iv"),
            Self::BVec2 | Self::DVec2 | Self::UVec2 | Self::IVec2 | Self::Vec2 => ("Vec2", "Vec2v"),
            Self::BVec3 | Self::DVec3 | Self::UVec3 | Self::IVec3 | Self::Vec3 => ("Vec3", "Vec3v"),
            Self::BVec4 | Self::DVec4 | Self::UVec4 | Self::IVec4 | Self::Vec4 => ("Vec4", "Vec4v"),
            Self::Mat2 | Self::Mat3 | Self::Mat4 | Self::Mat3x4 | Self::Mat4x3 => {
                ("Matrix", "Matrixv")
            }
            Self::Sampler1D
            | Self::Sampler2D
            | Self::Sampler2DArray
            | Self::Sampler2DArrayShadow
            | Self::Sampler3D
            | Self::Sampler1DShadow
            | Self::Sampler2DShadow => {
                if amount > 1 {
                    // Opaque arrays need GLSL 4.0, texture units have no array setter.
                    log::warn!("sampler arrays are only allowed under special circumstances");
                }
                ("", "1iv")
            }
        };
        if amount > 1 {
            array
        } else {
            single
        }
    }
}

impl core::fmt::Display for VariableType {
    #[expect(
        clippy::min_ident_chars,
        reason = "It's a core library trait implementation"
    )]
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.glsl())
    }
}

impl serde::Serialize for VariableType {
    #[inline]
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.glsl())
    }
}
