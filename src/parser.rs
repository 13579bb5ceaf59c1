// src/parser.rs

use std::collections::VecDeque;
use std::fmt;

use thiserror::Error;

use crate::core::matcher::match_siblings;
use crate::core::suggest::{PrefixSuffixSuggester, SuggestionStrategy};
use crate::core::tokenizer::tokenize;
use crate::core::usage::join_or;
use crate::models::{BoundArguments, Command};

/// The prefix a parser identifies commands by when none is configured.
pub const DEFAULT_PREFIX: &str = "/";

/// A parse-time failure. Exactly one of these is reported through the error
/// sink per failed parse (a [`ParseError::CommandNotFound`] may be followed
/// by a separate "did you mean" message), and the command action is never
/// invoked on any of them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No registered alias matched the typed command.
    #[error("Command '{alias}' not found.")]
    CommandNotFound { alias: String },

    /// The caller's access level is below the command's requirement.
    #[error("Command '{command}' requires permission level {required}. (Currently only {level})")]
    PermissionDenied {
        command: String,
        required: i32,
        level: i32,
    },

    /// The command's precondition blocked execution; the message is the
    /// precondition's own.
    #[error("{message}")]
    PreconditionFailed { message: String },

    /// A required argument got no token.
    #[error("Invalid arguments, '{name}' required. Usage: {usage}")]
    MissingRequiredArgument { name: String, usage: String },

    /// A required enum argument got no token; `options` lists the legal
    /// values.
    #[error("Invalid arguments, {options} required. Usage: {usage}")]
    MissingRequiredChoice { options: String, usage: String },

    /// A token matched none of an enum argument's options.
    #[error("Argument '{value}' not recognized. Must be {options}")]
    UnrecognizedEnumValue { value: String, options: String },

    /// A token failed its slot's validation rule.
    #[error("Argument '{name}' is invalid. Must be a valid {rule}.")]
    ValidationFailed { name: String, rule: String },
}

type ErrorSink = Box<dyn Fn(&str)>;

/// The command registry and dispatcher.
///
/// Build one parser up front — prefix, error sink, commands — then feed it
/// raw input lines. A line that does not carry the configured prefix is not
/// a command and `parse` returns `false`, so the caller can treat it as
/// ordinary text (a chat message, for example).
///
/// ```
/// use herald::{Argument, Command, Parser};
///
/// let parser = Parser::with_prefix("")
///     .on_error(|message| eprintln!("{message}"))
///     .add_command(
///         Command::create("Ban User")
///             .alias("ban")
///             .argument(Argument::create("user"))
///             .action(|args| println!("banned {}", args.get("user").unwrap_or("")))
///             .build()
///             .unwrap(),
///     );
/// parser.parse("ban bob");
/// ```
pub struct Parser {
    commands: Vec<Command>,
    prefix: String,
    error_sink: ErrorSink,
    suggester: Box<dyn SuggestionStrategy>,
}

impl Parser {
    /// Creates a parser with the default `/` prefix, a no-op error sink,
    /// and the prefix/suffix suggestion heuristic.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Creates a parser with the given prefix. An empty prefix makes every
    /// non-empty line a command candidate.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            commands: Vec::new(),
            prefix: prefix.into(),
            error_sink: Box::new(|_| {}),
            suggester: Box::new(PrefixSuffixSuggester),
        }
    }

    /// Replaces the prefix the parser identifies commands by.
    pub fn use_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the callback every parse error message is reported through.
    pub fn on_error(mut self, sink: impl Fn(&str) + 'static) -> Self {
        self.error_sink = Box::new(sink);
        self
    }

    /// Swaps the "did you mean" similarity strategy.
    pub fn suggest_with(mut self, suggester: impl SuggestionStrategy + 'static) -> Self {
        self.suggester = Box::new(suggester);
        self
    }

    /// Registers a command. Commands are matched in registration order;
    /// the first alias hit wins.
    pub fn add_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// The registered commands, in registration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Renders the full usage line (prefix included) for the command the
    /// given alias resolves to.
    pub fn usage_for(&self, alias: &str) -> Option<String> {
        let lowered = alias.to_lowercase();
        self.find_command(&lowered)
            .map(|command| format!("{}{}", self.prefix, command.generate_usage(Some(&lowered))))
    }

    /// Parses one input line at access level 0.
    pub fn parse(&self, input: &str) -> bool {
        self.parse_with_access(input, 0)
    }

    /// Parses one input line on behalf of a caller at the given access
    /// level.
    ///
    /// Returns `true` when the line was addressed to the parser (it carried
    /// the prefix and named *something*, known or not) — errors included.
    /// Returns `false` for empty lines and lines without the prefix, so the
    /// host can process them as ordinary text.
    pub fn parse_with_access(&self, input: &str, access_level: i32) -> bool {
        let line = input.trim();
        if line.is_empty() {
            return false;
        }
        let Some(rest) = strip_prefix_ci(line, &self.prefix) else {
            return false;
        };

        let mut tokens = tokenize(rest);
        let Some(typed) = tokens.pop_front() else {
            return false;
        };
        let alias = typed.to_lowercase();
        log::debug!("parsing '{alias}' with {} token(s)", tokens.len());

        if let Err(error) = self.dispatch(&alias, tokens, access_level) {
            self.report(&error.to_string());
            if matches!(error, ParseError::CommandNotFound { .. }) {
                self.suggest(&alias);
            }
        }
        true
    }

    /// Resolves the alias, runs the gates, matches the grammar, and fires
    /// the action.
    fn dispatch(
        &self,
        alias: &str,
        mut tokens: VecDeque<String>,
        access_level: i32,
    ) -> Result<(), ParseError> {
        let command = self
            .find_command(alias)
            .ok_or_else(|| ParseError::CommandNotFound {
                alias: alias.to_string(),
            })?;

        if command.access_level() > access_level {
            return Err(ParseError::PermissionDenied {
                command: command.name().to_string(),
                required: command.access_level(),
                level: access_level,
            });
        }

        if let Some(message) = command.precondition_error() {
            return Err(ParseError::PreconditionFailed { message });
        }

        let usage = format!("{}{}", self.prefix, command.generate_usage(Some(alias)));
        let mut bound = BoundArguments::new(command.roots());
        match_siblings(command.roots(), &mut tokens, false, &mut bound, &usage)?;

        command
            .execute(&bound)
            .map_err(|message| ParseError::PreconditionFailed { message })
    }

    /// Finds a command by alias, case-insensitively. First match wins.
    fn find_command(&self, alias: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|command| command.aliases().iter().any(|a| a == alias))
    }

    /// Reports related aliases for a mistyped command, if any.
    fn suggest(&self, alias: &str) {
        let related = self.suggester.related(alias, &self.commands);
        if related.is_empty() {
            return;
        }
        let quoted: Vec<String> = related.iter().map(|a| format!("'{a}'")).collect();
        self.report(&format!("Did you mean: {}?", join_or(&quoted)));
    }

    fn report(&self, message: &str) {
        (self.error_sink)(message);
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("prefix", &self.prefix)
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

/// Strips `prefix` from the front of `line`, case-insensitively. `None`
/// means the line is not addressed to the parser.
fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(line);
    }
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        line.get(prefix.len()..)
    } else {
        None
    }
}
