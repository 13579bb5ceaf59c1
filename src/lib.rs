// src/lib.rs

//! # herald
//!
//! A free-form command parsing and dispatch framework.
//!
//! herald interprets one line of text — typically typed into a chat box or
//! a console — as an invocation of a registered command: it resolves an
//! alias, enforces permission and precondition gates, and recursively
//! matches the remaining tokens against a declared, possibly-nested
//! argument grammar. A fully successful match invokes the command's action
//! with the bound values; any failure produces a single human-readable
//! message through the configured error sink.
//!
//! ```
//! use herald::{Argument, Command, Parser};
//!
//! let parser = Parser::with_prefix("/")
//!     .on_error(|message| eprintln!("{message}"))
//!     .add_command(
//!         Command::create("Give Item")
//!             .aliases(["give", "item"])
//!             .description("Gives a user an item.")
//!             .argument(Argument::create("user"))
//!             .argument(Argument::create("item"))
//!             .argument(Argument::create("amount").optional().default_value("10"))
//!             .action(|args| {
//!                 println!(
//!                     "{} gets {} x{}",
//!                     args.get("user").unwrap_or(""),
//!                     args.get("item").unwrap_or(""),
//!                     args.get("amount").unwrap_or(""),
//!                 );
//!             })
//!             .build()
//!             .unwrap(),
//!     );
//!
//! assert!(parser.parse("/give bob sword 3"));
//! assert!(!parser.parse("just chatting")); // no prefix: not a command
//! ```

pub mod core;
pub mod models;
pub mod parser;

pub use self::core::suggest::{PrefixSuffixSuggester, SuggestionStrategy};
pub use self::core::validation::ValidationRule;
pub use self::models::{
    ArgKind, ArgSpec, Argument, Binding, BoundArguments, Command, CommandBuilder, GrammarError,
};
pub use self::parser::{ParseError, Parser};
