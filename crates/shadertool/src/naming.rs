//! Turns shader identifiers into names for generated code.

/// Converts a `snake_case` shader identifier into camel case.
///
/// Parts are separated by `_`. Single character parts such as the `u` in `u_color` are
/// dropped when the name has more than one part. The first part is only capitalized if
/// `first_upper` is set. If nothing is left, the input is returned unchanged.
///
/// ```
/// use shadertool::naming::convert_name;
///
/// assert_eq!(convert_name("u_light_dir", true), "LightDir");
/// assert_eq!(convert_name("u_light_dir", false), "lightDir");
/// ```
#[inline]
#[must_use]
pub fn convert_name(name: &str, first_upper: bool) -> String {
    let parts: Vec<&str> = name.split('_').filter(|part| !part.is_empty()).collect();
    let keep_short = parts.len() < 2;
    let mut capitalize = first_upper;
    let mut out = String::with_capacity(name.len());
    for part in parts {
        if part.chars().count() <= 1 && !keep_short {
            continue;
        }
        if capitalize {
            out.push_str(&capitalize_first(part));
        } else {
            out.push_str(part);
            capitalize = true;
        }
    }
    if out.is_empty() {
        name.to_owned()
    } else {
        out
    }
}

/// Upper cases the first character of `text`.
fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
