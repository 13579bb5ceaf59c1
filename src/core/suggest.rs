// src/core/suggest.rs

use crate::models::Command;

/// Computes "did you mean" candidates for a mistyped command alias.
///
/// The strategy only decides *which* aliases relate to the input; the
/// registry owns the message formatting and the decision to report at all.
/// Implement this to swap the similarity metric without touching dispatch.
pub trait SuggestionStrategy {
    /// Returns related aliases in registration order.
    fn related(&self, input: &str, commands: &[Command]) -> Vec<String>;
}

/// The historical prefix/suffix similarity heuristic.
///
/// A lowercased alias relates to the lowercased input when any rule holds:
/// 1. the alias starts with the input (missed last letters),
/// 2. the input has ≥ 2 characters and the alias starts with its first two,
/// 3. the input has > 2 characters and the alias ends with its last two
///    (misspelled middle),
/// 4. the alias's first and last characters match the input's.
///
/// At most one alias per command is collected, the first that qualifies.
/// This is deliberately not an edit-distance metric.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixSuffixSuggester;

impl SuggestionStrategy for PrefixSuffixSuggester {
    fn related(&self, input: &str, commands: &[Command]) -> Vec<String> {
        let input = input.to_lowercase();
        let chars: Vec<char> = input.chars().collect();
        let mut related = Vec::new();

        for command in commands {
            for alias in command.aliases() {
                if is_related(alias, &input, &chars) {
                    related.push(alias.clone());
                    break;
                }
            }
        }
        related
    }
}

fn is_related(alias: &str, input: &str, chars: &[char]) -> bool {
    if alias.starts_with(input) {
        return true;
    }
    if chars.len() >= 2 {
        let head: String = chars.iter().take(2).collect();
        if alias.starts_with(&head) {
            return true;
        }
    }
    if chars.len() > 2 {
        let tail: String = chars.iter().skip(chars.len() - 2).collect();
        if alias.ends_with(&tail) {
            return true;
        }
    }
    if let (Some(first), Some(last)) = (chars.first(), chars.last())
        && let (Some(alias_first), Some(alias_last)) = (alias.chars().next(), alias.chars().last())
    {
        return *first == alias_first && *last == alias_last;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Command;

    fn commands(aliases: &[&[&str]]) -> Vec<Command> {
        aliases
            .iter()
            .enumerate()
            .map(|(i, set)| {
                Command::create(format!("Command{i}"))
                    .aliases(set.iter().copied())
                    .action(|_| {})
                    .build()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_prefix_typo_is_related() {
        let commands = commands(&[&["test"]]);
        let related = PrefixSuffixSuggester.related("tst", &commands);
        assert_eq!(related, ["test"]);
    }

    #[test]
    fn test_incomplete_input_is_related() {
        let commands = commands(&[&["register"]]);
        let related = PrefixSuffixSuggester.related("regster", &commands);
        assert_eq!(related, ["register"]);
    }

    #[test]
    fn test_unrelated_alias_is_skipped() {
        let commands = commands(&[&["mail"]]);
        let related = PrefixSuffixSuggester.related("xyz", &commands);
        assert!(related.is_empty());
    }

    #[test]
    fn test_one_suggestion_per_command() {
        let commands = commands(&[&["god", "godmode"], &["give", "giveitem"]]);
        let related = PrefixSuffixSuggester.related("go", &commands);
        assert_eq!(related, ["god"]);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let commands = commands(&[&["test"]]);
        let related = PrefixSuffixSuggester.related("TST", &commands);
        assert_eq!(related, ["test"]);
    }
}
