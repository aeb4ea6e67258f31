//! Renders a [`ShaderInterface`] into binding source through text templates.
//!
//! Both templates are plain text with `$placeholder$` markers. The program template
//! receives `$name$`, `$namespace$`, `$filename$`, `$uniforms$`, `$uniformarrayinfo$`,
//! `$attributes$`, `$setters$` and `$includes$`. The uniform block template receives
//! `$name$`, `$namespace$`, `$uniformbuffers$`, `$setters$` and `$shutdown$`.
//! Every occurrence of a placeholder is replaced.

use crate::block_layout::{self, PaddingMode};
use crate::interface::{ShaderInterface, UniformBlock, Variable};
use crate::naming::convert_name;
use crate::types::{PassBy, VariableType};

/// The two template texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Templates {
    /// Template of the program binding.
    pub program: String,
    /// Template of one uniform block binding.
    pub uniform_block: String,
}

impl Templates {
    /// Make a new `Templates`.
    #[inline]
    #[must_use]
    pub const fn new(program: String, uniform_block: String) -> Self {
        Self {
            program,
            uniform_block,
        }
    }
}

/// Settings shared by all generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GenerateOptions {
    /// Namespace the bindings are generated in.
    pub namespace: String,
    /// Directory the shader is loaded from at runtime, ending in `/`.
    pub shader_dir: String,
    /// How uniform block structs are aligned.
    pub padding: PaddingMode,
}

impl Default for GenerateOptions {
    #[inline]
    fn default() -> Self {
        Self {
            namespace: "shader".to_owned(),
            shader_dir: "shaders/".to_owned(),
            padding: PaddingMode::default(),
        }
    }
}

impl GenerateOptions {
    /// Make new `GenerateOptions`, appending the missing `/` to `shader_dir`.
    #[inline]
    #[must_use]
    #[expect(clippy::impl_trait_in_params, reason = "just a struct new")]
    pub fn new(
        namespace: impl Into<String>,
        shader_dir: impl Into<String>,
        padding: PaddingMode,
    ) -> Self {
        let mut shader_dir = shader_dir.into();
        if !shader_dir.ends_with('/') {
            shader_dir.push('/');
        }
        Self {
            namespace: namespace.into(),
            shader_dir,
            padding,
        }
    }
}

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GeneratedFile {
    /// File name without directory.
    pub file_name: String,
    /// Rendered text.
    pub contents: String,
}

/// Everything rendered for one shader program.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Generated {
    /// The program binding.
    pub program: GeneratedFile,
    /// One binding per uniform block, in declaration order.
    pub uniform_blocks: Vec<GeneratedFile>,
}

impl Generated {
    /// All files, uniform blocks first.
    #[inline]
    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.uniform_blocks
            .iter()
            .chain(core::iter::once(&self.program))
    }
}

/// Renders the bindings of `interface`.
#[inline]
#[must_use]
pub fn generate(
    interface: &ShaderInterface,
    templates: &Templates,
    options: &GenerateOptions,
) -> Generated {
    log_interface(interface);

    let mut setters = String::new();
    if !interface.uniforms.is_empty() || !interface.attributes.is_empty() {
        setters.push('\n');
    }
    for uniform in &interface.uniforms {
        setters.push_str(&uniform_setter(uniform));
        setters.push('\n');
    }
    let attribute_setters: Vec<String> =
        interface.attributes.iter().map(attribute_setters).collect();
    setters.push_str(&attribute_setters.join("\n"));

    if !interface.uniform_blocks.is_empty() {
        setters.push('\n');
    }
    let mut includes = String::new();
    let mut uniform_blocks = Vec::with_capacity(interface.uniform_blocks.len());
    for block in &interface.uniform_blocks {
        let file = uniform_block_file(block, templates, options);
        includes.push_str(&format!("#include \"{}\"\n", file.file_name));
        setters.push_str(&uniform_buffer_setter(block));
        uniform_blocks.push(file);
    }

    let name = convert_name(&format!("{}Shader", interface.name), true);
    let filename = format!("{}{}", options.shader_dir, interface.filename);
    let contents = render(
        &templates.program,
        &[
            ("$name$", name.as_str()),
            ("$namespace$", options.namespace.as_str()),
            ("$filename$", filename.as_str()),
            (
                "$uniformarrayinfo$",
                uniform_array_info(&interface.uniforms).as_str(),
            ),
            ("$uniforms$", uniform_check(&interface.uniforms).as_str()),
            (
                "$attributes$",
                attribute_check(&interface.attributes).as_str(),
            ),
            ("$setters$", or_marker(setters, "// no setters").as_str()),
            (
                "$includes$",
                or_marker(includes, "// no uniform buffers").as_str(),
            ),
        ],
    );
    Generated {
        program: GeneratedFile {
            file_name: format!("{name}.h"),
            contents,
        },
        uniform_blocks,
    }
}

/// Replaces every occurrence of each placeholder, in order.
fn render(template: &str, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .fold(template.to_owned(), |text, (placeholder, value)| {
            text.replace(placeholder, value)
        })
}

/// `marker` if `section` is empty.
fn or_marker(section: String, marker: &str) -> String {
    if section.is_empty() {
        marker.to_owned()
    } else {
        section
    }
}

/// Debug output of everything that was found.
fn log_interface(interface: &ShaderInterface) {
    for block in &interface.uniform_blocks {
        log::debug!(
            "found uniform block {} with {} members",
            block.name,
            block.members.len()
        );
    }
    for (kind, variables) in [
        ("uniform", &interface.uniforms),
        ("attribute", &interface.attributes),
        ("varying", &interface.varyings),
        ("output", &interface.outputs),
    ] {
        for var in variables {
            log::debug!("found {kind} of type {} with name {}", var.ty, var.name);
        }
    }
}

/// `$uniforms$`
fn uniform_check(uniforms: &[Variable]) -> String {
    if uniforms.is_empty() {
        return "// no uniforms".to_owned();
    }
    format!("checkUniforms({{{}}});", quoted_names(uniforms))
}

/// `$uniformarrayinfo$`, empty without uniforms.
fn uniform_array_info(uniforms: &[Variable]) -> String {
    uniforms
        .iter()
        .map(|uniform| {
            format!(
                "\t\tsetUniformArraySize(\"{}\", {});\n",
                uniform.name, uniform.array_size
            )
        })
        .collect()
}

/// `$attributes$`
fn attribute_check(attributes: &[Variable]) -> String {
    if attributes.is_empty() {
        return "// no attributes".to_owned();
    }
    let mut out = format!("checkAttributes({{{}}});\n", quoted_names(attributes));
    for attribute in attributes {
        let name = &attribute.name;
        out.push_str(&format!(
            "\t\tconst int {name}Location = getAttributeLocation(\"{name}\");\n"
        ));
        out.push_str(&format!("\t\tif ({name}Location != -1) {{\n"));
        out.push_str(&format!(
            "\t\t\tsetAttributeComponents({name}Location, {});\n",
            attribute.ty.components()
        ));
        out.push_str("\t\t}\n");
    }
    out
}

/// `"a", "b"`
fn quoted_names(variables: &[Variable]) -> String {
    variables
        .iter()
        .map(|var| format!("\"{}\"", var.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Opening of a setter that bails out when the uniform was optimized away.
fn uniform_location_lookup(name: &str) -> String {
    format!(
        "\t\tconst int location = getUniformLocation(\"{name}\");\n\
         \t\tif (location == -1) {{\n\
         \t\t\treturn false;\n\
         \t\t}}\n"
    )
}

/// Parameter list of the main setter of `uniform`.
fn uniform_parameters(uniform: &Variable) -> String {
    let descriptor = uniform.ty.descriptor();
    let mut params = String::new();
    if (uniform.is_fixed_array() && uniform.ty.is_single_integer())
        || descriptor.pass_by == PassBy::Reference
    {
        params.push_str("const ");
    }
    params.push_str(descriptor.ctype);
    if uniform.is_unbounded_array() || descriptor.pass_by == PassBy::Pointer {
        params.push('*');
    } else if descriptor.pass_by == PassBy::Reference && !uniform.is_fixed_array() {
        params.push('&');
    }
    if uniform.is_fixed_array() {
        params.push_str(&format!(" (&{})[{}]", uniform.name, uniform.array_size));
    } else {
        params.push_str(&format!(" {}", uniform.name));
    }
    if uniform.is_unbounded_array() {
        params.push_str(", int amount");
    }
    params
}

/// `set<Name>` and its `std::vector` overloads, if any.
fn uniform_setter(uniform: &Variable) -> String {
    let setter_name = convert_name(&uniform.name, true);
    let name = &uniform.name;
    let amount = if uniform.is_unbounded_array() {
        2
    } else {
        uniform.array_size
    };
    let postfix = uniform.ty.uniform_setter_postfix(amount);
    let count = if uniform.is_fixed_array() {
        format!(", {}", uniform.array_size)
    } else if uniform.is_unbounded_array() {
        ", amount".to_owned()
    } else {
        String::new()
    };

    let mut out = format!(
        "\tinline bool set{setter_name}({}) const {{\n",
        uniform_parameters(uniform)
    );
    out.push_str(&uniform_location_lookup(name));
    out.push_str(&format!("\t\tsetUniform{postfix}(location, {name}{count});\n"));
    out.push_str("\t\treturn true;\n\t}\n");

    if uniform.is_fixed_array() {
        out.push_str(&format!(
            "\n\tinline bool set{setter_name}(const std::vector<{}>& var) const {{\n",
            uniform.ty.ctype()
        ));
        out.push_str(&uniform_location_lookup(name));
        out.push_str(&format!(
            "\t\tcore_assert((int)var.size() == {});\n",
            uniform.array_size
        ));
        out.push_str(&format!(
            "\t\tsetUniform{}(location, &var.front(), var.size());\n",
            uniform.ty.uniform_setter_postfix(uniform.array_size)
        ));
        out.push_str("\t\treturn true;\n\t}\n");
    }
    if uniform.ty.is_float_vector() && !uniform.is_unbounded_array() {
        let components = uniform.ty.components();
        out.push_str(&format!(
            "\n\tinline bool set{setter_name}(const std::vector<float>& var) const {{\n"
        ));
        out.push_str(&uniform_location_lookup(name));
        out.push_str(&format!(
            "\t\tcore_assert(int(var.size()) % {components} == 0);\n"
        ));
        out.push_str(&format!(
            "\t\tsetUniformfv(location, &var.front(), {components}, {components});\n"
        ));
        out.push_str("\t\treturn true;\n\t}\n");
    }
    out
}

/// Generated name of the vertex buffer data type of `ty`.
const fn attribute_data_type(ty: VariableType) -> &'static str {
    if ty.is_integer() {
        "video::DataType::Int"
    } else {
        "video::DataType::Float"
    }
}

/// `init<Name>Custom`, `getLocation<Name>`, `getComponents<Name>`, `init<Name>` and
/// `set<Name>Divisor`.
fn attribute_setters(attribute: &Variable) -> String {
    let setter_name = convert_name(&attribute.name, true);
    let name = &attribute.name;
    let ctype = attribute.ty.ctype();
    let is_int = attribute.ty.is_integer();
    let data_type = attribute_data_type(attribute.ty);

    let mut out = format!(
        "\tinline bool init{setter_name}Custom(size_t stride = sizeof({ctype}), \
         const void* pointer = nullptr, video::DataType type = {data_type}, \
         int size = {}, bool isInt = {is_int}, bool normalize = false) const {{\n",
        attribute.ty.components()
    );
    out.push_str(&format!(
        "\t\tconst int loc = enableVertexAttributeArray(\"{name}\");\n"
    ));
    out.push_str("\t\tif (loc == -1) {\n\t\t\treturn false;\n\t\t}\n");
    out.push_str("\t\tif (isInt) {\n");
    out.push_str("\t\t\tsetVertexAttributeInt(loc, size, type, stride, pointer);\n");
    out.push_str("\t\t} else {\n");
    out.push_str("\t\t\tsetVertexAttribute(loc, size, type, normalize, stride, pointer);\n");
    out.push_str("\t\t}\n\t\treturn true;\n\t}\n\n");

    out.push_str(&format!("\tinline int getLocation{setter_name}() const {{\n"));
    out.push_str(&format!("\t\treturn getAttributeLocation(\"{name}\");\n\t}}\n\n"));

    out.push_str(&format!("\tinline int getComponents{setter_name}() const {{\n"));
    out.push_str(&format!("\t\treturn getAttributeComponents(\"{name}\");\n\t}}\n\n"));

    out.push_str(&format!("\tinline bool init{setter_name}() const {{\n"));
    out.push_str(&format!(
        "\t\tconst int loc = enableVertexAttributeArray(\"{name}\");\n"
    ));
    out.push_str("\t\tif (loc == -1) {\n\t\t\treturn false;\n\t\t}\n");
    out.push_str(&format!("\t\tconst size_t stride = sizeof({ctype});\n"));
    out.push_str("\t\tconst void* pointer = nullptr;\n");
    out.push_str(&format!("\t\tconst video::DataType type = {data_type};\n"));
    out.push_str("\t\tconst int size = getAttributeComponents(loc);\n");
    if is_int {
        out.push_str("\t\tsetVertexAttributeInt(loc, size, type, stride, pointer);\n");
    } else {
        out.push_str("\t\tsetVertexAttribute(loc, size, type, false, stride, pointer);\n");
    }
    out.push_str("\t\treturn true;\n\t}\n\n");

    out.push_str(&format!(
        "\tinline bool set{setter_name}Divisor(uint32_t divisor) const {{\n"
    ));
    out.push_str(&format!(
        "\t\tconst int location = getAttributeLocation(\"{name}\");\n"
    ));
    out.push_str("\t\treturn setDivisor(location, divisor);\n\t}\n");
    out
}

/// `set<Block>` of the program binding.
fn uniform_buffer_setter(block: &UniformBlock) -> String {
    format!(
        "\t/**\n\
         \t * @brief Sets the uniform buffer for the uniform block {name}\n\
         \t */\n\
         \tinline bool set{struct_name}(const video::UniformBuffer& buf) {{\n\
         \t\treturn setUniformBuffer(\"{name}\", buf);\n\
         \t}}\n",
        name = block.name,
        struct_name = convert_name(&block.name, true),
    )
}

/// `Data` struct and buffer accessors of one uniform block.
fn uniform_buffer_section(block: &UniformBlock, padding: PaddingMode) -> String {
    let struct_name = convert_name(&block.name, true);
    let buffer_name = convert_name(&block.name, false);
    let computed = block_layout::compute(block, padding);

    let mut out = format!(
        "\n\t/**\n\t * @brief Uniform buffer for {struct_name}::Data\n\t */\n\
         \tvideo::UniformBuffer _{buffer_name};\n\
         \t/**\n\t * @brief layout({}) aligned uniform block structure\n\t */\n\
         \t#pragma pack(push, 1)\n\tstruct Data {{\n",
        computed.kind.as_str()
    );
    for (member, layout) in block.members.iter().zip(&computed.members) {
        let align = layout
            .align
            .map(|bytes| format!("alignas({bytes}) "))
            .unwrap_or_default();
        let array = if member.is_fixed_array() {
            format!("[{}]", member.array_size)
        } else {
            String::new()
        };
        out.push_str(&format!(
            "\t\t{align}{} {}{array}; // {} bytes\n",
            member.ty.ctype(),
            convert_name(&member.name, false),
            layout.size
        ));
        if let Some(padding_field) = &layout.padding {
            out.push_str(padding_field);
        }
    }
    out.push_str("\t};\n\t#pragma pack(pop)\n");
    out.push_str(&format!(
        "\tstatic_assert(sizeof(Data) == {}, \"Unexpected structure size for Data\");\n",
        computed.size
    ));
    for (signature, call) in [
        ("bool update(const Data& var)", "update"),
        ("bool create(const Data& var)", "create"),
    ] {
        out.push_str(&format!(
            "\n\tinline {signature} {{\n\
             \t\treturn _{buffer_name}.{call}((const void*)&var, sizeof(var));\n\
             \t}}\n\n"
        ));
    }
    out.push_str(&format!(
        "\n\tinline operator const video::UniformBuffer&() const {{\n\
         \t\treturn _{buffer_name};\n\
         \t}}\n"
    ));
    out
}

/// Renders the binding file of one uniform block.
fn uniform_block_file(
    block: &UniformBlock,
    templates: &Templates,
    options: &GenerateOptions,
) -> GeneratedFile {
    let struct_name = convert_name(&block.name, true);
    let buffer_name = convert_name(&block.name, false);
    let shutdown = format!("\t\t_{buffer_name}.shutdown();\n");
    let contents = render(
        &templates.uniform_block,
        &[
            ("$name$", struct_name.as_str()),
            ("$namespace$", options.namespace.as_str()),
            (
                "$uniformbuffers$",
                uniform_buffer_section(block, options.padding).as_str(),
            ),
            ("$setters$", ""),
            ("$shutdown$", shutdown.as_str()),
        ],
    );
    GeneratedFile {
        file_name: format!("{struct_name}.h"),
        contents,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::interface::UNBOUNDED_ARRAY;
    use crate::layout::BlockLayout;

    fn templates() -> Templates {
        Templates::new(
            "// $name$ in $namespace$ from $filename$\n$includes$\n$uniforms$\n$uniformarrayinfo$\n$attributes$\n$setters$"
                .to_owned(),
            "// $name$ in $namespace$\n$uniformbuffers$\n$setters$\n$shutdown$".to_owned(),
        )
    }

    fn interface() -> ShaderInterface {
        let mut interface = ShaderInterface::new("world", "world");
        interface
            .attributes
            .push(Variable::new(VariableType::Vec3, "a_pos", 0));
        interface
            .uniforms
            .push(Variable::new(VariableType::Float, "u_brightness", 0));
        let mut block = UniformBlock::new("Block");
        block.members = vec![
            Variable::new(VariableType::Vec3, "color", 0),
            Variable::new(VariableType::Float, "intensity", 0),
        ];
        interface.uniform_blocks.push(block);
        interface
    }

    #[test_log::test]
    fn names_and_placeholders() {
        let generated = generate(&interface(), &templates(), &GenerateOptions::default());
        assert_eq!(generated.program.file_name, "WorldShader.h");
        assert!(generated
            .program
            .contents
            .starts_with("// WorldShader in shader from shaders/world\n#include \"Block.h\"\n"));
        assert!(!generated.program.contents.contains('$'));

        let [block] = generated.uniform_blocks.as_slice() else {
            panic!("expected one uniform block file");
        };
        assert_eq!(block.file_name, "Block.h");
        assert!(block.contents.starts_with("// Block in shader\n"));
        assert!(block.contents.ends_with("\t\t_block.shutdown();\n"));
        assert!(!block.contents.contains('$'));
    }

    #[test_log::test]
    fn shader_dir_gets_separator() {
        let options = GenerateOptions::new("render", "assets/shaders", PaddingMode::AlignAs);
        assert_eq!(options.shader_dir, "assets/shaders/");
        let generated = generate(&interface(), &templates(), &options);
        assert!(generated
            .program
            .contents
            .starts_with("// WorldShader in render from assets/shaders/world\n"));
    }

    #[test_log::test]
    fn uniform_sections() {
        let generated = generate(&interface(), &templates(), &GenerateOptions::default());
        let contents = &generated.program.contents;
        assert!(contents.contains("checkUniforms({\"u_brightness\"});"));
        assert!(contents.contains("\t\tsetUniformArraySize(\"u_brightness\", 0);\n"));
        assert!(contents.contains("\tinline bool setBrightness(float u_brightness) const {\n"));
        assert!(contents.contains("\t\tsetUniformf(location, u_brightness);\n"));
        assert!(contents.contains(
            "\tinline bool setBlock(const video::UniformBuffer& buf) {\n\t\treturn setUniformBuffer(\"Block\", buf);\n"
        ));
    }

    #[test_log::test]
    fn attribute_sections() {
        let generated = generate(&interface(), &templates(), &GenerateOptions::default());
        let contents = &generated.program.contents;
        assert!(contents.contains("checkAttributes({\"a_pos\"});\n"));
        assert!(contents.contains("\t\t\tsetAttributeComponents(a_posLocation, 3);\n"));
        assert!(contents.contains(
            "\tinline bool initPosCustom(size_t stride = sizeof(glm::vec3), const void* pointer = nullptr, video::DataType type = video::DataType::Float, int size = 3, bool isInt = false, bool normalize = false) const {\n"
        ));
        assert!(contents.contains("\tinline int getLocationPos() const {\n"));
        assert!(contents.contains("\tinline bool setPosDivisor(uint32_t divisor) const {\n"));
        assert!(contents.contains(
            "\t\tsetVertexAttribute(loc, size, type, false, stride, pointer);\n"
        ));
    }

    #[test_log::test]
    fn integer_attributes() {
        let mut interface = ShaderInterface::new("ids", "ids");
        interface
            .attributes
            .push(Variable::new(VariableType::UVec2, "a_id", 0));
        let generated = generate(&interface, &templates(), &GenerateOptions::default());
        let contents = &generated.program.contents;
        assert!(contents.contains(
            "video::DataType type = video::DataType::Int, int size = 2, bool isInt = true"
        ));
        assert!(contents.contains(
            "\t\tsetVertexAttributeInt(loc, size, type, stride, pointer);\n"
        ));
    }

    #[test_log::test]
    fn empty_sections_get_markers() {
        let interface = ShaderInterface::new("empty", "empty");
        let generated = generate(&interface, &templates(), &GenerateOptions::default());
        assert_eq!(
            generated.program.contents,
            "// EmptyShader in shader from shaders/empty\n// no uniform buffers\n// no uniforms\n\n// no attributes\n// no setters"
        );
        assert!(generated.uniform_blocks.is_empty());
    }

    #[test_log::test]
    fn array_setters() {
        let mut interface = ShaderInterface::new("arrays", "arrays");
        interface.uniforms = vec![
            Variable::new(VariableType::Int, "u_ids", 4),
            Variable::new(VariableType::Vec4, "u_lights", UNBOUNDED_ARRAY),
            Variable::new(VariableType::Mat4, "u_bones", 16),
        ];
        let generated = generate(&interface, &templates(), &GenerateOptions::default());
        let contents = &generated.program.contents;
        assert!(contents.contains("\tinline bool setIds(const int32_t (&u_ids)[4]) const {\n"));
        assert!(contents.contains("\t\tsetUniform1iv(location, u_ids, 4);\n"));
        assert!(contents.contains(
            "\tinline bool setIds(const std::vector<int32_t>& var) const {\n"
        ));
        assert!(contents.contains("\t\tcore_assert((int)var.size() == 4);\n"));
        assert!(contents.contains(
            "\tinline bool setLights(const glm::vec4* u_lights, int amount) const {\n"
        ));
        assert!(contents.contains("\t\tsetUniformVec4v(location, u_lights, amount);\n"));
        assert!(contents.contains(
            "\tinline bool setBones(const glm::mat4 (&u_bones)[16]) const {\n"
        ));
        assert!(contents.contains("\t\tsetUniformMatrixv(location, &var.front(), var.size());\n"));
        assert!(contents.contains("\t\tsetUniformArraySize(\"u_lights\", -1);\n"));
    }

    #[test_log::test]
    fn float_vector_overload() {
        let mut interface = ShaderInterface::new("fog", "fog");
        interface
            .uniforms
            .push(Variable::new(VariableType::Vec3, "u_fogcolor", 0));
        let generated = generate(&interface, &templates(), &GenerateOptions::default());
        let contents = &generated.program.contents;
        assert!(contents.contains(
            "\tinline bool setFogcolor(const glm::vec3& u_fogcolor) const {\n"
        ));
        assert!(contents.contains("\t\tsetUniformVec3(location, u_fogcolor);\n"));
        assert!(contents.contains(
            "\tinline bool setFogcolor(const std::vector<float>& var) const {\n"
        ));
        assert!(contents.contains("\t\tcore_assert(int(var.size()) % 3 == 0);\n"));
        assert!(contents.contains("\t\tsetUniformfv(location, &var.front(), 3, 3);\n"));
    }

    #[test_log::test]
    fn fixed_vector_array_overloads() {
        let mut interface = ShaderInterface::new("lights", "lights");
        interface.uniforms = vec![
            Variable::new(VariableType::Vec3, "u_lights", 4),
            Variable::new(VariableType::Vec2, "u_offsets", UNBOUNDED_ARRAY),
        ];
        let generated = generate(&interface, &templates(), &GenerateOptions::default());
        let contents = &generated.program.contents;
        assert!(contents.contains(
            "\tinline bool setLights(const glm::vec3 (&u_lights)[4]) const {\n"
        ));
        assert!(contents.contains(
            "\tinline bool setLights(const std::vector<glm::vec3>& var) const {\n"
        ));
        assert!(contents.contains(
            "\tinline bool setLights(const std::vector<float>& var) const {\n"
        ));
        assert!(contents.contains("\t\tcore_assert(int(var.size()) % 3 == 0);\n"));
        assert!(!contents.contains("setOffsets(const std::vector<float>& var)"));
    }

    #[test_log::test]
    fn uniform_block_struct_align_as() {
        let generated = generate(&interface(), &templates(), &GenerateOptions::default());
        let contents = &generated.uniform_blocks[0].contents;
        assert!(contents.contains("\tvideo::UniformBuffer _block;\n"));
        assert!(contents.contains("@brief layout(std140) aligned uniform block structure"));
        assert!(contents.contains("\t\talignas(16) glm::vec3 color; // 16 bytes\n"));
        assert!(contents.contains("\t\talignas(4) float intensity; // 4 bytes\n"));
        assert!(contents.contains(
            "\tstatic_assert(sizeof(Data) == 20, \"Unexpected structure size for Data\");\n"
        ));
        assert!(contents.contains("\t\treturn _block.update((const void*)&var, sizeof(var));\n"));
        assert!(contents.contains("\t\treturn _block.create((const void*)&var, sizeof(var));\n"));
        assert!(contents.contains("\tinline operator const video::UniformBuffer&() const {\n"));
    }

    #[test_log::test]
    fn uniform_block_struct_explicit_padding() {
        let mut interface = interface();
        interface.uniform_blocks[0].layout.block_layout = BlockLayout::Std430;
        let options = GenerateOptions::new("shader", "shaders/", PaddingMode::Explicit);
        let generated = generate(&interface, &templates(), &options);
        let contents = &generated.uniform_blocks[0].contents;
        assert!(contents.contains("@brief layout(std430) aligned uniform block structure"));
        assert!(contents.contains(
            "\t\tglm::vec3 color; // 16 bytes\n\t\tfloat _padding0;\n\t\tfloat intensity; // 4 bytes\n"
        ));
        assert!(!contents.contains("alignas"));
        assert!(contents.contains(
            "\tstatic_assert(sizeof(Data) == 20, \"Unexpected structure size for Data\");\n"
        ));
    }

    #[test_log::test]
    fn explicit_padding_size_counts_padding_fields() {
        let mut interface = ShaderInterface::new("sky", "sky");
        let mut block = UniformBlock::new("Sky");
        block.members = vec![
            Variable::new(VariableType::Vec3, "a", 0),
            Variable::new(VariableType::Vec3, "b", 0),
            Variable::new(VariableType::Float, "c", 0),
        ];
        interface.uniform_blocks.push(block);
        let options = GenerateOptions::new("shader", "shaders/", PaddingMode::Explicit);
        let generated = generate(&interface, &templates(), &options);
        let contents = &generated.uniform_blocks[0].contents;
        assert!(contents.contains("\t\tfloat _padding1;\n"));
        assert!(contents.contains("\tstatic_assert(sizeof(Data) == 36, "));
    }

    #[test_log::test]
    fn uniform_blocks_render_independently() {
        let mut interface = interface();
        let mut second = UniformBlock::new("light_data");
        second
            .members
            .push(Variable::new(VariableType::Vec4, "light_pos", 2));
        interface.uniform_blocks.push(second);
        let generated = generate(&interface, &templates(), &GenerateOptions::default());

        let [first, second] = generated.uniform_blocks.as_slice() else {
            panic!("expected two uniform block files");
        };
        assert_eq!(second.file_name, "LightData.h");
        assert!(second.contents.contains("\tvideo::UniformBuffer _lightData;\n"));
        assert!(second.contents.contains("\t\talignas(16) glm::vec4 lightPos[2]; // 32 bytes\n"));
        assert!(!second.contents.contains("_block"));
        assert!(!first.contents.contains("_lightData"));
        assert!(generated
            .program
            .contents
            .contains("#include \"Block.h\"\n#include \"LightData.h\"\n"));
        assert_eq!(generated.files().count(), 3);
    }
}
