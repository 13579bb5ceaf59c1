// src/models.rs

use std::fmt;

use thiserror::Error;

use crate::core::usage;
use crate::core::validation::ValidationRule;

/// A structural configuration error, raised when a grammar is built.
///
/// These are fail-fast errors: they surface at the `build()` call site that
/// violated an invariant, before any parsing exists. They never occur while
/// a command line is being matched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// An argument, command, or alias was declared with an empty name.
    #[error("Names and aliases can not be empty.")]
    EmptyName,

    /// A required sibling was declared after an optional one.
    #[error("Optional arguments must come last: required argument '{required}' follows an optional sibling in '{parent}'.")]
    OrderingViolation { parent: String, required: String },

    /// A default value was declared on a required, non-enum argument.
    #[error("Argument '{name}' must be optional or an enum to carry a default value.")]
    DefaultOnRequired { name: String },

    /// A default value does not satisfy the argument's own validation rule.
    #[error("Default value '{value}' for argument '{name}' does not satisfy its validation rule.")]
    DefaultViolatesRule { name: String, value: String },

    /// Both enum options and sequential children were declared on one node.
    #[error("Argument '{name}' mixes enum options with sequential child arguments.")]
    MixedChildren { name: String },

    /// A command was built without an action callback.
    #[error("Command '{name}' has no action.")]
    MissingAction { name: String },
}

/// Classifies an argument slot and carries the per-kind data.
///
/// Modeling this as a variant instead of `optional`/`is_enum` booleans makes
/// the illegal states unrepresentable: a required non-enum slot cannot carry
/// a default, and an enum slot cannot carry sequential children (its options
/// live inside the variant).
#[derive(Debug, Clone)]
pub enum ArgKind {
    /// The slot must consume a token.
    Required,
    /// The slot may be absent; an empty `default` means "no default".
    Optional { default: String },
    /// The slot only accepts one of a fixed set of option names, each of
    /// which may own its own nested sub-grammar.
    Enum {
        options: Vec<ArgSpec>,
        optional: bool,
        default: String,
    },
}

/// One positional slot in a command's argument grammar.
///
/// Specs are immutable once built; a parse never writes into the tree. The
/// values bound during a parse accumulate in a [`BoundArguments`] instead,
/// which keeps a single grammar safe to match against from concurrent calls.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    name: String,
    kind: ArgKind,
    rule: ValidationRule,
    children: Vec<ArgSpec>,
}

impl ArgSpec {
    /// The slot's name, stored lowercase.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ArgKind {
        &self.kind
    }

    /// True for optional slots, including optional enums.
    pub fn is_optional(&self) -> bool {
        match &self.kind {
            ArgKind::Required => false,
            ArgKind::Optional { .. } => true,
            ArgKind::Enum { optional, .. } => *optional,
        }
    }

    /// True when the slot is restricted to a fixed option set.
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, ArgKind::Enum { .. })
    }

    /// The value bound when no token is supplied. Empty when there is none.
    pub fn default_value(&self) -> &str {
        match &self.kind {
            ArgKind::Required => "",
            ArgKind::Optional { default } => default,
            ArgKind::Enum { default, .. } => default,
        }
    }

    /// The validation rule applied to a non-empty raw token.
    pub fn rule(&self) -> &ValidationRule {
        &self.rule
    }

    /// Sequential nested arguments, parsed after this slot binds.
    /// Always empty for enum slots.
    pub fn children(&self) -> &[ArgSpec] {
        &self.children
    }

    /// The legal option values of an enum slot. Empty for non-enum slots.
    pub fn options(&self) -> &[ArgSpec] {
        match &self.kind {
            ArgKind::Enum { options, .. } => options,
            _ => &[],
        }
    }

    /// True when the slot owns any nested structure, options or children.
    pub(crate) fn has_substructure(&self) -> bool {
        !self.children.is_empty() || !self.options().is_empty()
    }
}

/// Fluent, declarative description of one argument slot.
///
/// Setters never fail; every structural invariant is checked once, when the
/// draft is turned into an [`ArgSpec`] by [`Argument::build`] (or, more
/// commonly, by [`CommandBuilder::build`] for a whole command at once).
///
/// ```
/// use herald::Argument;
///
/// let spec = Argument::create("type")
///     .optional()
///     .option(Argument::create("read"))
///     .option(Argument::create("clear"))
///     .option(
///         Argument::create("send")
///             .child(Argument::create("user"))
///             .child(Argument::create("message")),
///     )
///     .build()
///     .unwrap();
/// assert!(spec.is_enum());
/// ```
#[derive(Debug, Clone)]
pub struct Argument {
    name: String,
    optional: bool,
    default: Option<String>,
    rule: Option<ValidationRule>,
    children: Vec<Argument>,
    options: Vec<Argument>,
}

impl Argument {
    /// Starts a new argument draft. Arguments are required by default.
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
            default: None,
            rule: None,
            children: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Marks the argument optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Declares the value bound when no token is supplied. Only valid on
    /// optional or enum arguments; checked at build time.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Replaces the always-true validation rule.
    pub fn validator(mut self, rule: ValidationRule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Appends a sequential nested argument, parsed after this one binds.
    pub fn child(mut self, argument: Argument) -> Self {
        self.children.push(argument);
        self
    }

    /// Appends an option value, turning this argument into an enum slot.
    /// Each option may own its own nested sub-grammar via [`Argument::child`].
    pub fn option(mut self, option: Argument) -> Self {
        self.options.push(option);
        self
    }

    /// Validates the draft and its whole subtree, producing the immutable
    /// spec the matcher operates over.
    pub fn build(self) -> Result<ArgSpec, GrammarError> {
        if self.name.is_empty() {
            return Err(GrammarError::EmptyName);
        }
        if !self.options.is_empty() && !self.children.is_empty() {
            return Err(GrammarError::MixedChildren { name: self.name });
        }

        let name = self.name.to_lowercase();
        let rule = self.rule.unwrap_or_default();

        if let Some(default) = &self.default {
            if !self.optional && self.options.is_empty() {
                return Err(GrammarError::DefaultOnRequired { name });
            }
            if !rule.validate(default) {
                return Err(GrammarError::DefaultViolatesRule {
                    name,
                    value: default.clone(),
                });
            }
        }
        let default = self.default.unwrap_or_default();

        let children = build_sibling_list(&name, self.children)?;

        let kind = if self.options.is_empty() {
            if self.optional {
                ArgKind::Optional { default }
            } else {
                ArgKind::Required
            }
        } else {
            let options = self
                .options
                .into_iter()
                .map(Argument::build)
                .collect::<Result<Vec<_>, _>>()?;
            ArgKind::Enum {
                options,
                optional: self.optional,
                default,
            }
        };

        Ok(ArgSpec {
            name,
            kind,
            rule,
            children,
        })
    }
}

/// Builds a sibling list and enforces the ordering invariant: once one
/// sibling is optional, every following sibling must be optional too.
fn build_sibling_list(parent: &str, drafts: Vec<Argument>) -> Result<Vec<ArgSpec>, GrammarError> {
    let specs = drafts
        .into_iter()
        .map(Argument::build)
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen_optional = false;
    for spec in &specs {
        if seen_optional && !spec.is_optional() {
            return Err(GrammarError::OrderingViolation {
                parent: parent.to_string(),
                required: spec.name.clone(),
            });
        }
        seen_optional = seen_optional || spec.is_optional();
    }
    Ok(specs)
}

/// Searches a spec forest for a slot by name: the current level first, then
/// each node's children and options, depth-first.
fn find_spec<'a>(specs: &'a [ArgSpec], name: &str) -> Option<&'a ArgSpec> {
    if let Some(spec) = specs.iter().find(|s| s.name == name) {
        return Some(spec);
    }
    for spec in specs {
        if let Some(found) = find_spec(&spec.children, name) {
            return Some(found);
        }
        if let Some(found) = find_spec(spec.options(), name) {
            return Some(found);
        }
    }
    None
}

/// One (slot, value) pair produced by a successful match.
#[derive(Debug)]
pub struct Binding<'a> {
    spec: &'a ArgSpec,
    value: String,
}

impl<'a> Binding<'a> {
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn spec(&self) -> &'a ArgSpec {
        self.spec
    }
}

/// The ordered set of values bound during one parse, handed to the matched
/// command's action.
///
/// Values live here, not on the grammar tree, so nothing has to be reset
/// between parses. Lookups by name first consult the bindings (in match
/// order), then fall back to the schema's declared defaults — an optional
/// slot the input never reached still reads as its default.
#[derive(Debug)]
pub struct BoundArguments<'a> {
    bindings: Vec<Binding<'a>>,
    roots: &'a [ArgSpec],
}

impl<'a> BoundArguments<'a> {
    pub(crate) fn new(roots: &'a [ArgSpec]) -> Self {
        Self {
            bindings: Vec::new(),
            roots,
        }
    }

    pub(crate) fn push(&mut self, spec: &'a ArgSpec, value: String) {
        self.bindings.push(Binding { spec, value });
    }

    /// Looks a value up by argument name, case-insensitively, searching
    /// nested slots arbitrarily deep. Returns `None` only when no slot of
    /// that name exists anywhere in the command's grammar.
    pub fn get(&self, name: &str) -> Option<&str> {
        let needle = name.to_lowercase();
        self.bindings
            .iter()
            .find(|b| b.spec.name == needle)
            .map(Binding::value)
            .or_else(|| find_spec(self.roots, &needle).map(ArgSpec::default_value))
    }

    /// The bindings in match order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding<'a>> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

type Precondition = Box<dyn Fn(&Command) -> Option<String>>;
type Action = Box<dyn Fn(&BoundArguments<'_>)>;

/// A named, aliased entry point owning an argument grammar, an access
/// level, a precondition, and the action invoked on a successful match.
pub struct Command {
    name: String,
    aliases: Vec<String>,
    description: String,
    access_level: i32,
    precondition: Precondition,
    action: Action,
    roots: Vec<ArgSpec>,
}

impl Command {
    /// Starts a new command draft with a human-friendly name. The string
    /// typed to invoke the command is an alias, added separately.
    pub fn create(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            access_level: 0,
            precondition: None,
            action: None,
            arguments: Vec::new(),
        }
    }

    /// The command's human-friendly name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The aliases that invoke this command, in registration order,
    /// stored lowercase.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The minimum access level a caller needs to run this command.
    pub fn access_level(&self) -> i32 {
        self.access_level
    }

    /// The root sibling list of the argument grammar.
    pub fn roots(&self) -> &[ArgSpec] {
        &self.roots
    }

    /// Evaluates the precondition. `Some(message)` means the command is
    /// currently blocked and must not run.
    pub fn precondition_error(&self) -> Option<String> {
        (self.precondition)(self)
    }

    /// Runs the action with an already-bound argument set, re-checking the
    /// precondition first. On `Err` the action was not invoked and the
    /// returned string explains why.
    pub fn execute(&self, arguments: &BoundArguments<'_>) -> Result<(), String> {
        if let Some(message) = self.precondition_error() {
            return Err(message);
        }
        (self.action)(arguments);
        Ok(())
    }

    /// Renders the command's usage string: the primary alias (or the given
    /// override) followed by the bracket-notation grammar. Returns an empty
    /// string when the command has no aliases, and the alias alone when it
    /// has no arguments.
    pub fn generate_usage(&self, alias: Option<&str>) -> String {
        let Some(primary) = self.aliases.first() else {
            return String::new();
        };
        let shown = match alias {
            Some(a) if !a.is_empty() => a,
            _ => primary,
        };
        if self.roots.is_empty() {
            return shown.to_string();
        }
        format!("{} {}", shown, usage::render_siblings(&self.roots))
    }

    /// Renders a one-line help entry, e.g.
    /// `Mail: Allows users to send messages. (Usage: mail [read|clear|send <user> <message>])`.
    pub fn show_help(&self) -> String {
        let mut out = self.name.clone();
        if !self.description.is_empty() {
            out.push_str(": ");
            out.push_str(&self.description);
        }
        out.push_str(" (Usage: ");
        out.push_str(&self.generate_usage(None));
        out.push(')');
        out
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("access_level", &self.access_level)
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

/// Fluent draft for a [`Command`]; validated as a whole by
/// [`CommandBuilder::build`].
pub struct CommandBuilder {
    name: String,
    aliases: Vec<String>,
    description: String,
    access_level: i32,
    precondition: Option<Precondition>,
    action: Option<Action>,
    arguments: Vec<Argument>,
}

impl CommandBuilder {
    /// Adds an alias that invokes the command. Matched case-insensitively.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds several aliases at once.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Restricts the command to callers at or above the given access level.
    pub fn restrict_access(mut self, access_level: i32) -> Self {
        self.access_level = access_level;
        self
    }

    /// Sets the gate evaluated before the command runs. Returning
    /// `Some(message)` blocks execution and surfaces the message verbatim.
    pub fn precondition(
        mut self,
        precondition: impl Fn(&Command) -> Option<String> + 'static,
    ) -> Self {
        self.precondition = Some(Box::new(precondition));
        self
    }

    /// Sets the action invoked with the bound arguments after a fully
    /// successful match.
    pub fn action(mut self, action: impl Fn(&BoundArguments<'_>) + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    /// Appends a root argument. Arguments are parsed in declaration order;
    /// optional arguments must come last (checked at build time).
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Appends several root arguments at once.
    pub fn arguments(mut self, arguments: impl IntoIterator<Item = Argument>) -> Self {
        self.arguments.extend(arguments);
        self
    }

    /// Validates the draft — names, aliases, the ordering invariant at every
    /// nesting level, default placement — and produces the command.
    pub fn build(self) -> Result<Command, GrammarError> {
        if self.name.is_empty() || self.aliases.iter().any(String::is_empty) {
            return Err(GrammarError::EmptyName);
        }
        let Some(action) = self.action else {
            return Err(GrammarError::MissingAction { name: self.name });
        };

        let roots = build_sibling_list(&self.name, self.arguments)?;

        Ok(Command {
            aliases: self.aliases.iter().map(|a| a.to_lowercase()).collect(),
            name: self.name,
            description: self.description,
            access_level: self.access_level,
            precondition: self.precondition.unwrap_or_else(|| Box::new(|_| None)),
            action,
            roots,
        })
    }
}

impl fmt::Debug for CommandBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBuilder")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_command(name: &str) -> CommandBuilder {
        Command::create(name)
            .alias(name.to_lowercase())
            .action(|_| {})
    }

    #[test]
    fn test_empty_argument_name_rejected() {
        assert_eq!(
            Argument::create("").build().unwrap_err(),
            GrammarError::EmptyName
        );
    }

    #[test]
    fn test_names_are_lowercased() {
        let spec = Argument::create("User").build().unwrap();
        assert_eq!(spec.name(), "user");
    }

    #[test]
    fn test_ordering_violation_at_root() {
        let result = noop_command("Test")
            .argument(Argument::create("first").optional())
            .argument(Argument::create("second"))
            .build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::OrderingViolation {
                parent: "Test".to_string(),
                required: "second".to_string(),
            }
        );
    }

    #[test]
    fn test_ordering_violation_in_nested_children() {
        let result = Argument::create("outer")
            .child(Argument::create("a").optional())
            .child(Argument::create("b"))
            .build();
        assert!(matches!(
            result,
            Err(GrammarError::OrderingViolation { ref parent, .. }) if parent == "outer"
        ));
    }

    #[test]
    fn test_required_then_optional_is_fine() {
        let result = noop_command("Test")
            .argument(Argument::create("first"))
            .argument(Argument::create("second").optional())
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_default_on_required_rejected() {
        let result = Argument::create("arg").default_value("10").build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::DefaultOnRequired {
                name: "arg".to_string()
            }
        );
    }

    #[test]
    fn test_default_allowed_on_required_enum() {
        let result = Argument::create("type")
            .option(Argument::create("hand"))
            .option(Argument::create("all"))
            .default_value("hand")
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_default_must_satisfy_rule() {
        let result = Argument::create("amount")
            .optional()
            .validator(ValidationRule::integer())
            .default_value("lots")
            .build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::DefaultViolatesRule {
                name: "amount".to_string(),
                value: "lots".to_string(),
            }
        );
    }

    #[test]
    fn test_mixed_children_rejected() {
        let result = Argument::create("arg")
            .option(Argument::create("on"))
            .child(Argument::create("extra"))
            .build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::MixedChildren {
                name: "arg".to_string()
            }
        );
    }

    #[test]
    fn test_command_requires_action() {
        let result = Command::create("Test").alias("test").build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::MissingAction {
                name: "Test".to_string()
            }
        );
    }

    #[test]
    fn test_empty_alias_rejected() {
        let result = Command::create("Test").alias("").action(|_| {}).build();
        assert_eq!(result.unwrap_err(), GrammarError::EmptyName);
    }

    #[test]
    fn test_bound_arguments_fall_back_to_schema_defaults() {
        let command = noop_command("Test")
            .argument(
                Argument::create("arg1")
                    .optional()
                    .default_value("default")
                    .child(
                        Argument::create("arg2")
                            .optional()
                            .default_value("on")
                            .option(Argument::create("on"))
                            .option(Argument::create("off")),
                    ),
            )
            .build()
            .unwrap();

        let mut bound = BoundArguments::new(command.roots());
        assert_eq!(bound.get("arg1"), Some("default"));
        assert_eq!(bound.get("arg2"), Some("on"));
        assert_eq!(bound.get("missing"), None);

        let first = command.roots().first().unwrap();
        bound.push(first, "123".to_string());
        assert_eq!(bound.get("arg1"), Some("123"));
        assert_eq!(bound.get("ARG1"), Some("123"));
        assert_eq!(bound.get("arg2"), Some("on"));
    }

    #[test]
    fn test_generate_usage_without_aliases_or_arguments() {
        let bare = Command::create("Hidden").action(|_| {}).build().unwrap();
        assert_eq!(bare.generate_usage(None), "");

        let plain = noop_command("Test").build().unwrap();
        assert_eq!(plain.generate_usage(None), "test");
        assert_eq!(plain.generate_usage(Some("alias")), "alias");
    }

    #[test]
    fn test_show_help_includes_description_and_usage() {
        let command = Command::create("Ban User")
            .alias("ban")
            .description("Bans a user from the server.")
            .action(|_| {})
            .argument(Argument::create("user"))
            .build()
            .unwrap();
        assert_eq!(
            command.show_help(),
            "Ban User: Bans a user from the server. (Usage: ban <user>)"
        );
    }

    #[test]
    fn test_show_help_without_description() {
        let command = noop_command("Test").build().unwrap();
        assert_eq!(command.show_help(), "Test (Usage: test)");
    }

    #[test]
    fn test_execute_respects_precondition() {
        use std::cell::Cell;
        use std::rc::Rc;

        let ran = Rc::new(Cell::new(false));
        let ran_handle = ran.clone();
        let command = Command::create("Test")
            .alias("test")
            .precondition(|_| Some("Blocked.".to_string()))
            .action(move |_| ran_handle.set(true))
            .build()
            .unwrap();

        let bound = BoundArguments::new(command.roots());
        assert_eq!(command.execute(&bound), Err("Blocked.".to_string()));
        assert!(!ran.get());
    }
}
