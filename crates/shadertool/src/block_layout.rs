//! Memory layout of uniform blocks under the `std140` and `std430` rules.
//!
//! The rules implemented here are a simplification of the GLSL specification:
//!
//! * vectors align to 16 bytes, scalars to 4, everything else gets no annotation,
//! * a 3 component vector takes the space of a 4 component one,
//! * `mat3`, `mat3x4` and `mat4x3` use approximated sizes,
//! * array elements are not rounded up to a 16 byte stride,
//! * the block size is the plain sum of its members, without tail padding.
//!
//! `std430` currently shares the `std140` rules.

use crate::interface::{UniformBlock, Variable};
use crate::layout::BlockLayout;
use crate::types::VariableType;

/// How generated structs are brought in line with the GPU layout.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize,
)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum PaddingMode {
    /// Annotate every member with its alignment.
    #[default]
    AlignAs,
    /// Insert a `float` after every 3 component vector, without alignment annotations.
    Explicit,
}

/// Layout of one block member.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct MemberLayout {
    /// Required alignment in bytes, emitted as annotation in [`PaddingMode::AlignAs`].
    pub align: Option<usize>,
    /// Size in bytes.
    pub size: usize,
    /// Padding field following the member in [`PaddingMode::Explicit`].
    pub padding: Option<String>,
}

/// Layout of a whole uniform block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ComputedBlock {
    /// Packing rules that were applied.
    pub kind: BlockLayout,
    /// One entry per member, in declaration order.
    pub members: Vec<MemberLayout>,
    /// Sum of all member sizes.
    pub size: usize,
}

/// Computes the layout of `block` with its own packing qualifier.
#[inline]
#[must_use]
pub fn compute(block: &UniformBlock, mode: PaddingMode) -> ComputedBlock {
    let kind = block.layout.block_layout;
    let mut padding_counter = 0;
    let mut members = Vec::with_capacity(block.members.len());
    for member in &block.members {
        let (padding, next_counter) = match mode {
            PaddingMode::AlignAs => (None, padding_counter),
            PaddingMode::Explicit => padding(member, kind, padding_counter),
        };
        padding_counter = next_counter;
        members.push(MemberLayout {
            align: match mode {
                PaddingMode::AlignAs => alignment(member, kind),
                PaddingMode::Explicit => None,
            },
            size: size(member, kind),
            padding,
        });
    }
    let size = members.iter().map(|member| member.size).sum();
    ComputedBlock {
        kind,
        members,
        size,
    }
}

/// Alignment of `var` in bytes, `None` where no annotation is emitted.
#[inline]
#[must_use]
pub fn alignment(var: &Variable, kind: BlockLayout) -> Option<usize> {
    match kind {
        BlockLayout::Unknown | BlockLayout::Std140 => std140_alignment(var.ty),
        // TODO: std430 drops the vec4 rounding of arrays and structs
        BlockLayout::Std430 => std140_alignment(var.ty),
    }
}

/// Size of `var` in bytes, including array elements.
#[inline]
#[must_use]
pub fn size(var: &Variable, kind: BlockLayout) -> usize {
    match kind {
        BlockLayout::Unknown | BlockLayout::Std140 | BlockLayout::Std430 => std140_size(var),
    }
}

/// Padding field following `var`, if any, and the counter for the next one.
#[inline]
#[must_use]
pub fn padding(var: &Variable, kind: BlockLayout, counter: u32) -> (Option<String>, u32) {
    match kind {
        BlockLayout::Unknown | BlockLayout::Std140 | BlockLayout::Std430 => {
            std140_padding(var.ty, counter)
        }
    }
}

/// `std140` base alignment.
const fn std140_alignment(ty: VariableType) -> Option<usize> {
    if ty.is_vector() {
        Some(16)
    } else if ty.is_scalar() {
        Some(4)
    } else {
        None
    }
}

/// `std140` size, 3 component vectors count as 4 components.
fn std140_size(var: &Variable) -> usize {
    let bytes = if var.ty.is_double() { 8 } else { 4 };
    let components: usize = match var.ty {
        VariableType::Vec2
        | VariableType::DVec2
        | VariableType::IVec2
        | VariableType::UVec2
        | VariableType::BVec2 => 2,
        VariableType::Vec3
        | VariableType::DVec3
        | VariableType::IVec3
        | VariableType::UVec3
        | VariableType::BVec3 => 4,
        VariableType::Mat2 => 4,
        // FIXME: a std140 mat3 has 3 columns padded to vec4, that is 12 components
        VariableType::Mat3 => 9,
        VariableType::Mat4 => 16,
        // FIXME: approximated, like mat3
        VariableType::Mat3x4 | VariableType::Mat4x3 => 16,
        other => usize::try_from(other.components()).unwrap_or(1),
    };
    let elements = usize::try_from(var.array_size)
        .ok()
        .filter(|&count| count > 0)
        .unwrap_or(1);
    components * bytes * elements
}

/// `std140` padding, a `float` after every 3 component vector.
fn std140_padding(ty: VariableType, counter: u32) -> (Option<String>, u32) {
    match ty {
        VariableType::Vec3
        | VariableType::DVec3
        | VariableType::IVec3
        | VariableType::UVec3
        | VariableType::BVec3 => (
            Some(format!("\t\tfloat _padding{counter};\n")),
            counter.saturating_add(1),
        ),
        _ => (None, counter),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::interface::UNBOUNDED_ARRAY;

    fn var(ty: VariableType, array_size: i32) -> Variable {
        Variable::new(ty, "v", array_size)
    }

    fn block(kind: BlockLayout, members: Vec<Variable>) -> UniformBlock {
        let mut block = UniformBlock::new("Block");
        block.members = members;
        block.layout.block_layout = kind;
        block
    }

    #[test_log::test]
    fn vec3_is_padded_to_vec4() {
        let vec3 = var(VariableType::Vec3, 0);
        assert_eq!(size(&vec3, BlockLayout::Std140), 16);
        assert_eq!(alignment(&vec3, BlockLayout::Std140), Some(16));
    }

    #[test_log::test]
    fn scalar_sizes() {
        assert_eq!(size(&var(VariableType::Float, 0), BlockLayout::Std140), 4);
        assert_eq!(size(&var(VariableType::Double, 0), BlockLayout::Std140), 8);
        assert_eq!(size(&var(VariableType::Bool, 0), BlockLayout::Std140), 4);
        assert_eq!(alignment(&var(VariableType::Int, 0), BlockLayout::Std140), Some(4));
        assert_eq!(alignment(&var(VariableType::Double, 0), BlockLayout::Std140), Some(4));
    }

    #[test_log::test]
    fn vector_sizes() {
        assert_eq!(size(&var(VariableType::Vec2, 0), BlockLayout::Std140), 8);
        assert_eq!(size(&var(VariableType::DVec2, 0), BlockLayout::Std140), 16);
        assert_eq!(size(&var(VariableType::DVec3, 0), BlockLayout::Std140), 32);
        assert_eq!(size(&var(VariableType::IVec4, 0), BlockLayout::Std140), 16);
        assert_eq!(alignment(&var(VariableType::BVec2, 0), BlockLayout::Std140), Some(16));
    }

    #[test_log::test]
    fn matrix_sizes() {
        assert_eq!(size(&var(VariableType::Mat2, 0), BlockLayout::Std140), 16);
        assert_eq!(size(&var(VariableType::Mat3, 0), BlockLayout::Std140), 36);
        assert_eq!(size(&var(VariableType::Mat4, 0), BlockLayout::Std140), 64);
        assert_eq!(size(&var(VariableType::Mat4x3, 0), BlockLayout::Std140), 64);
        assert_eq!(alignment(&var(VariableType::Mat4, 0), BlockLayout::Std140), None);
    }

    #[test_log::test]
    fn arrays_have_no_stride_rounding() {
        assert_eq!(size(&var(VariableType::Float, 4), BlockLayout::Std140), 16);
        assert_eq!(size(&var(VariableType::Vec3, 2), BlockLayout::Std140), 32);
        assert_eq!(size(&var(VariableType::Float, UNBOUNDED_ARRAY), BlockLayout::Std140), 4);
    }

    #[test_log::test]
    fn std430_matches_std140() {
        for ty in [VariableType::Vec3, VariableType::Float, VariableType::Mat3] {
            let member = var(ty, 3);
            assert_eq!(size(&member, BlockLayout::Std430), size(&member, BlockLayout::Std140));
            assert_eq!(
                alignment(&member, BlockLayout::Std430),
                alignment(&member, BlockLayout::Std140)
            );
        }
    }

    #[test_log::test]
    fn padding_counter_is_threaded() {
        let (text, next) = padding(&var(VariableType::Vec3, 0), BlockLayout::Std140, 2);
        assert_eq!(text.as_deref(), Some("\t\tfloat _padding2;\n"));
        assert_eq!(next, 3);
        let (text, next) = padding(&var(VariableType::Vec4, 0), BlockLayout::Std140, 3);
        assert_eq!(text, None);
        assert_eq!(next, 3);
    }

    #[test_log::test]
    fn block_total_has_no_tail_padding() {
        let members = vec![
            Variable::new(VariableType::Vec3, "color", 0),
            Variable::new(VariableType::Float, "intensity", 0),
        ];
        let computed = compute(&block(BlockLayout::Std140, members), PaddingMode::AlignAs);
        assert_eq!(computed.size, 20);
        assert_eq!(computed.kind, BlockLayout::Std140);
        let aligns: Vec<Option<usize>> = computed.members.iter().map(|m| m.align).collect();
        assert_eq!(aligns, [Some(16), Some(4)]);
        assert!(computed.members.iter().all(|member| member.padding.is_none()));
    }

    #[test_log::test]
    fn explicit_padding_mode() {
        let members = vec![
            Variable::new(VariableType::Vec3, "a", 0),
            Variable::new(VariableType::Vec3, "b", 0),
            Variable::new(VariableType::Float, "c", 0),
        ];
        let computed = compute(&block(BlockLayout::Unknown, members), PaddingMode::Explicit);
        let paddings: Vec<Option<&str>> = computed
            .members
            .iter()
            .map(|member| member.padding.as_deref())
            .collect();
        assert_eq!(
            paddings,
            [
                Some("\t\tfloat _padding0;\n"),
                Some("\t\tfloat _padding1;\n"),
                None
            ]
        );
        assert!(computed.members.iter().all(|member| member.align.is_none()));
        assert_eq!(computed.size, 36);
    }
}
