//! `layout(...)` qualifiers.
//!
//! Since GLSL 4.2 a declaration may carry several `layout` qualifiers, so the parsed
//! fields accumulate in one [`Layout`] until the declaration they belong to is recorded.
//! The last value given for a field wins.

use crate::tokenizer::Tokenizer;

/// Memory layout of a uniform block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum BlockLayout {
    /// No packing qualifier was given, treated like [`BlockLayout::Std140`].
    #[default]
    Unknown,
    /// `std140`
    Std140,
    /// `std430`
    Std430,
}

impl BlockLayout {
    /// Name as written in a `layout` qualifier.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown | Self::Std140 => "std140",
            Self::Std430 => "std430",
        }
    }
}

/// Geometry shader primitive given by `primitive_type = ...`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
#[expect(missing_docs, reason = "variants are named after their qualifiers")]
pub enum PrimitiveType {
    #[default]
    None,
    Points,
    Lines,
    LinesAdjacency,
    Triangles,
    TrianglesAdjacency,
    LineStrip,
    TriangleStrip,
}

impl PrimitiveType {
    /// Qualifier names and the primitives they select.
    const NAMES: [(&'static str, Self); 7] = [
        ("points", Self::Points),
        ("lines", Self::Lines),
        ("lines_adjacency", Self::LinesAdjacency),
        ("triangles", Self::Triangles),
        ("triangles_adjacency", Self::TrianglesAdjacency),
        ("line_strip", Self::LineStrip),
        ("triangle_strip", Self::TriangleStrip),
    ];

    /// Maps a qualifier value to a primitive, [`PrimitiveType::None`] if unknown.
    #[inline]
    #[must_use]
    pub fn from_qualifier(token: &str) -> Self {
        Self::NAMES
            .iter()
            .find(|(name, _)| *name == token)
            .map_or(Self::None, |(_, primitive)| *primitive)
    }
}

/// All qualifiers collected from consecutive `layout(...)` occurrences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[non_exhaustive]
#[expect(clippy::struct_excessive_bools, reason = "mirrors the qualifier flags")]
pub struct Layout {
    /// `std140` / `std430`
    pub block_layout: BlockLayout,
    /// `location = N`
    pub location: Option<i32>,
    /// `offset = N`
    pub offset: Option<i32>,
    /// `compontents = N`, the qualifier keeps its historical misspelling.
    pub components: Option<i32>,
    /// `index = N`
    pub index: Option<i32>,
    /// `binding = N`
    pub binding: Option<i32>,
    /// `xfb_buffer = N`
    pub transform_feedback_buffer: Option<i32>,
    /// `xfb_offset = N`
    pub transform_feedback_offset: Option<i32>,
    /// `vertices = N` of a tessellation control shader.
    pub tesselation_vertices: Option<i32>,
    /// `max_vertices = N` of a geometry shader.
    pub max_geometry_vertices: Option<i32>,
    /// `origin_upper_left`
    pub origin_upper_left: bool,
    /// `pixel_center_integer`
    pub pixel_center_integer: bool,
    /// `early_fragment_tests`
    pub early_fragment_tests: bool,
    /// `primitive_type = ...`
    pub primitive_type: PrimitiveType,
}

/// Why a `layout(...)` list was abandoned. None of these stop the parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LayoutError {
    /// The token after `layout` was not `(`.
    #[error("expected `(` after `layout`, got `{0}`")]
    MissingParen(String),
    /// The stream ended inside the qualifier list.
    #[error("unexpected end of shader inside a layout qualifier list")]
    UnexpectedEnd,
    /// A `key = value` qualifier had no `=`.
    #[error("expected `=` after `{qualifier}`, got `{found}`")]
    MissingEquals {
        /// The qualifier keyword.
        qualifier: String,
        /// What came instead.
        found: String,
    },
    /// A numeric qualifier had a value that is not an integer.
    #[error("invalid value `{value}` for `{qualifier}`")]
    InvalidValue {
        /// The qualifier keyword.
        qualifier: String,
        /// The rejected value.
        value: String,
    },
}

/// The field set by a numeric `key = value` qualifier, `None` for other keywords.
fn numeric_field<'layout>(
    layout: &'layout mut Layout,
    qualifier: &str,
) -> Option<&'layout mut Option<i32>> {
    let field = match qualifier {
        "location" => &mut layout.location,
        "offset" => &mut layout.offset,
        "compontents" => &mut layout.components,
        "index" => &mut layout.index,
        "binding" => &mut layout.binding,
        "xfb_buffer" => &mut layout.transform_feedback_buffer,
        "xfb_offset" => &mut layout.transform_feedback_offset,
        "vertices" => &mut layout.tesselation_vertices,
        "max_vertices" => &mut layout.max_geometry_vertices,
        _ => return None,
    };
    Some(field)
}

impl Layout {
    /// Parses one qualifier list into `self`. The `layout` keyword must already be consumed.
    ///
    /// Unknown qualifiers are skipped. On error the fields parsed so far are kept
    /// and the tokenizer stays where the problem was found.
    ///
    /// # Errors
    ///
    /// See [`LayoutError`].
    #[inline]
    pub fn parse(&mut self, tok: &mut Tokenizer<'_>) -> Result<(), LayoutError> {
        let open = next_token(tok)?;
        if open != "(" {
            return Err(LayoutError::MissingParen(open.to_owned()));
        }
        loop {
            let token = next_token(tok)?;
            match token {
                ")" => return Ok(()),
                "std140" => self.block_layout = BlockLayout::Std140,
                "std430" => self.block_layout = BlockLayout::Std430,
                "origin_upper_left" => self.origin_upper_left = true,
                "pixel_center_integer" => self.pixel_center_integer = true,
                "early_fragment_tests" => self.early_fragment_tests = true,
                "primitive_type" => {
                    let value = qualifier_value(tok, token)?;
                    self.primitive_type = PrimitiveType::from_qualifier(value);
                }
                _ => {
                    if let Some(field) = numeric_field(self, token) {
                        let value = qualifier_value(tok, token)?;
                        let number = value.parse::<i32>().map_err(|_err| {
                            LayoutError::InvalidValue {
                                qualifier: token.to_owned(),
                                value: value.to_owned(),
                            }
                        })?;
                        *field = Some(number);
                    }
                }
            }
        }
    }
}

/// Reads the next token, failing at the end of the stream.
fn next_token<'tokens>(tok: &mut Tokenizer<'tokens>) -> Result<&'tokens str, LayoutError> {
    if !tok.has_next() {
        return Err(LayoutError::UnexpectedEnd);
    }
    Ok(tok.next())
}

/// Reads the `= value` part of a `key = value` qualifier.
fn qualifier_value<'tokens>(
    tok: &mut Tokenizer<'tokens>,
    qualifier: &str,
) -> Result<&'tokens str, LayoutError> {
    let equals = next_token(tok)?;
    if equals != "=" {
        return Err(LayoutError::MissingEquals {
            qualifier: qualifier.to_owned(),
            found: equals.to_owned(),
        });
    }
    next_token(tok)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lexer::tokenize;

    /// Parses `source`, which must start right after the `layout` keyword.
    fn parse_into(layout: &mut Layout, source: &str) -> Result<(), LayoutError> {
        let tokens = tokenize(source);
        let mut tok = Tokenizer::new(&tokens);
        layout.parse(&mut tok)
    }

    #[test_log::test]
    fn numeric_and_flag_qualifiers() {
        let mut layout = Layout::default();
        parse_into(
            &mut layout,
            "(std430, binding = 3, location=2, origin_upper_left, xfb_offset = 16)",
        )
        .unwrap();
        assert_eq!(layout.block_layout, BlockLayout::Std430);
        assert_eq!(layout.binding, Some(3));
        assert_eq!(layout.location, Some(2));
        assert_eq!(layout.transform_feedback_offset, Some(16));
        assert!(layout.origin_upper_left);
        assert!(!layout.early_fragment_tests);
        assert_eq!(layout.offset, None);
    }

    #[test_log::test]
    fn later_occurrence_overrides() {
        let mut layout = Layout::default();
        parse_into(&mut layout, "(location = 1)").unwrap();
        parse_into(&mut layout, "(location = 2, std140)").unwrap();
        assert_eq!(layout.location, Some(2));
        assert_eq!(layout.block_layout, BlockLayout::Std140);
    }

    #[test_log::test]
    fn legacy_components_spelling() {
        let mut layout = Layout::default();
        parse_into(&mut layout, "(compontents = 3, components = 4)").unwrap();
        assert_eq!(layout.components, Some(3));
    }

    #[test_log::test]
    fn primitive_types() {
        let mut layout = Layout::default();
        parse_into(&mut layout, "(primitive_type = triangle_strip, max_vertices = 4)").unwrap();
        assert_eq!(layout.primitive_type, PrimitiveType::TriangleStrip);
        assert_eq!(layout.max_geometry_vertices, Some(4));

        parse_into(&mut layout, "(primitive_type = quads)").unwrap();
        assert_eq!(layout.primitive_type, PrimitiveType::None);
    }

    #[test_log::test]
    fn unknown_qualifiers_are_skipped() {
        let mut layout = Layout::default();
        parse_into(&mut layout, "(local_size_x = 8, shared, binding = 1)").unwrap();
        assert_eq!(layout.binding, Some(1));
    }

    #[test_log::test]
    fn missing_paren() {
        let mut layout = Layout::default();
        assert_eq!(
            parse_into(&mut layout, "location = 1"),
            Err(LayoutError::MissingParen("location".to_owned()))
        );
    }

    #[test_log::test]
    fn premature_end() {
        let mut layout = Layout::default();
        assert_eq!(
            parse_into(&mut layout, "(binding = 1, location ="),
            Err(LayoutError::UnexpectedEnd)
        );
        assert_eq!(layout.binding, Some(1));
        assert_eq!(parse_into(&mut layout, ""), Err(LayoutError::UnexpectedEnd));
    }

    #[test_log::test]
    fn malformed_values() {
        let mut layout = Layout::default();
        assert!(matches!(
            parse_into(&mut layout, "(location 1)"),
            Err(LayoutError::MissingEquals { .. })
        ));
        assert!(matches!(
            parse_into(&mut layout, "(location = x)"),
            Err(LayoutError::InvalidValue { .. })
        ));
    }
}
