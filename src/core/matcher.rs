// src/core/matcher.rs
//
// The recursive matching engine. A sibling list is matched against a token
// stream consumed front to back; bound values accumulate in match order and
// every failure propagates out as a `ParseError` via `?`.

use std::collections::VecDeque;

use crate::core::usage;
use crate::models::{ArgKind, ArgSpec, BoundArguments};
use crate::parser::ParseError;

/// Matches one sibling list against the remaining tokens.
///
/// `recursive` is false only on the outermost call (a command's root
/// siblings); nested calls — an enum option's or a nested argument's
/// children — pass true. `usage` is the pre-rendered usage clause embedded
/// in missing-argument errors.
///
/// Token-consumption contract: binding a slot pops its token, so a nested
/// call always sees the correctly shifted stream. Nesting terminates sibling
/// iteration: the grammar is depth-first, single branch per level.
pub(crate) fn match_siblings<'a>(
    siblings: &'a [ArgSpec],
    tokens: &mut VecDeque<String>,
    recursive: bool,
    bound: &mut BoundArguments<'a>,
    usage: &str,
) -> Result<(), ParseError> {
    let count = siblings.len();
    for (i, spec) in siblings.iter().enumerate() {
        let is_last = i + 1 == count;

        // Trailing merge: the final structureless sibling of a list absorbs
        // every leftover token, so trailing free text needs no quotes. Enum
        // slots on the outermost call are exempt; option tokens stay exact.
        if is_last
            && tokens.len() > 1
            && !spec.has_substructure()
            && (recursive || !spec.is_enum())
        {
            let merged = tokens.drain(..).collect::<Vec<_>>().join(" ");
            log::trace!("merged trailing tokens into '{}': {merged:?}", spec.name());
            tokens.push_back(merged);
        }

        let Some(raw) = tokens.pop_front() else {
            // Out of tokens. Optional slots fall back to their default and
            // end this sibling list; required slots are a hard error.
            if spec.is_optional() {
                bound.push(spec, spec.default_value().to_string());
                return Ok(());
            }
            return Err(if spec.is_enum() {
                ParseError::MissingRequiredChoice {
                    options: usage::render_options(spec),
                    usage: usage.to_string(),
                }
            } else {
                ParseError::MissingRequiredArgument {
                    name: spec.name().to_string(),
                    usage: usage.to_string(),
                }
            });
        };

        if let ArgKind::Enum {
            options,
            optional,
            default,
        } = spec.kind()
        {
            let typed = raw.to_lowercase();
            let mut chosen = options.iter().find(|o| o.name() == typed);
            if chosen.is_none() && !default.is_empty() {
                // An unrecognized token on a defaulted enum slot is matched
                // as if the default had been supplied.
                chosen = options.iter().find(|o| o.name() == default.as_str());
            }

            let Some(option) = chosen else {
                if *optional && !is_last {
                    // Not an error: the slot simply was not supplied. The
                    // token stays available to whoever matches next.
                    tokens.push_front(raw);
                    return Ok(());
                }
                return Err(ParseError::UnrecognizedEnumValue {
                    value: typed,
                    options: usage::render_options(spec),
                });
            };

            bound.push(spec, option.name().to_string());
            if !option.children().is_empty() {
                log::trace!("descending into enum option '{}'", option.name());
                match_siblings(option.children(), tokens, true, bound, usage)?;
            }
            continue;
        }

        if !raw.is_empty() && !spec.rule().validate(&raw) {
            return Err(ParseError::ValidationFailed {
                name: spec.name().to_string(),
                rule: spec.rule().label().to_string(),
            });
        }

        let value = if raw.is_empty() {
            spec.default_value().to_string()
        } else {
            raw
        };
        bound.push(spec, value);

        if !spec.children().is_empty() {
            return match_siblings(spec.children(), tokens, true, bound, usage);
        }
    }
    Ok(())
}
