// src/core/usage.rs

use crate::models::ArgSpec;

/// Renders a sibling list in bracket notation: `<name>` for required slots,
/// `[name]` for optional ones, depth-first, space-separated. An enum slot
/// lists its option names joined by `|`, each option's nested sub-grammar
/// expanding right after the option's name. Underscores in names render as
/// spaces.
pub(crate) fn render_siblings(siblings: &[ArgSpec]) -> String {
    let mut out = String::new();
    write_siblings(siblings, &mut out);
    out
}

fn write_siblings(siblings: &[ArgSpec], out: &mut String) {
    let count = siblings.len();
    for (i, spec) in siblings.iter().enumerate() {
        out.push(if spec.is_optional() { '[' } else { '<' });
        if spec.is_enum() {
            let options = spec.options();
            for (j, option) in options.iter().enumerate() {
                out.push_str(&option.name().replace('_', " "));
                if !option.children().is_empty() {
                    out.push(' ');
                    write_siblings(option.children(), out);
                }
                if j + 1 < options.len() {
                    out.push('|');
                }
            }
        } else {
            out.push_str(&spec.name().replace('_', " "));
            if !spec.children().is_empty() {
                out.push(' ');
                write_siblings(spec.children(), out);
            }
        }
        out.push(if spec.is_optional() { ']' } else { '>' });
        if i + 1 < count {
            out.push(' ');
        }
    }
}

/// Renders an enum slot's legal values for error messages: each option name
/// quoted, the slot's default annotated, the whole list "or"-joined.
/// Example: `'read', 'clear', or 'send'`.
pub(crate) fn render_options(spec: &ArgSpec) -> String {
    let default = spec.default_value();
    let parts: Vec<String> = spec
        .options()
        .iter()
        .map(|option| {
            if !default.is_empty() && option.name() == default {
                format!("'{}' (default)", option.name())
            } else {
                format!("'{}'", option.name())
            }
        })
        .collect();
    join_or(&parts)
}

/// Joins items with commas, the final pair with ", or ".
pub(crate) fn join_or(parts: &[String]) -> String {
    let count = parts.len();
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        out.push_str(part);
        if count > 1 {
            if i + 2 == count {
                out.push_str(", or ");
            } else if i + 1 < count {
                out.push_str(", ");
            }
        }
    }
    out
}
