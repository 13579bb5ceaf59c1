// src/bin/herald.rs

use anyhow::Result;
use clap::Parser as CliParser;
use colored::*;
use dialoguer::{Input, theme::ColorfulTheme};
use herald::{Argument, Command, Parser, ValidationRule};
use std::cell::Cell;
use std::rc::Rc;

/// Interactive demo for the herald command parser.
#[derive(CliParser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Prefix required in front of every command. Empty means every line is
    /// treated as a command candidate.
    #[arg(long, default_value = "")]
    prefix: String,

    /// Access level commands are parsed at. The demo's `ban` command
    /// requires level 1.
    #[arg(long, default_value_t = 1)]
    access_level: i32,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let parser = build_demo_parser(&cli.prefix)?;

    println!("herald command parser demo. Type 'list' for commands, Ctrl+C to quit.\n");

    loop {
        let Ok(line) = Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("$")
            .allow_empty(true)
            .interact_text()
        else {
            // Interrupted or closed input: leave the loop quietly.
            return Ok(());
        };

        if !parser.parse_with_access(&line, cli.access_level) && !line.trim().is_empty() {
            println!("{}", "Not a command. (Missing prefix?)".dimmed());
        }
    }
}

/// Builds the demo command set: a small game-server-flavored vocabulary
/// exercising aliases, optional and nested arguments, enum options,
/// validators, defaults, preconditions, and access levels.
fn build_demo_parser(prefix: &str) -> Result<Parser, herald::GrammarError> {
    let banned = Rc::new(Cell::new(false));
    let banned_gate = banned.clone();

    let mut commands = vec![
        Command::create("Ban User")
            .aliases(["ban", "banuser"])
            .description("Bans a user from the server.")
            .restrict_access(1)
            .precondition(move |_| {
                if banned_gate.get() {
                    Some("You are already banned!".to_string())
                } else {
                    None
                }
            })
            .argument(Argument::create("user"))
            .argument(Argument::create("reason").optional())
            .action(move |args| {
                println!("User {} was banned!", args.get("user").unwrap_or(""));
                banned.set(true);
            })
            .build()?,
        Command::create("Give Item")
            .aliases(["give", "item", "giveitem"])
            .description("Gives a user an item.")
            .argument(Argument::create("user"))
            .argument(Argument::create("item"))
            .argument(
                Argument::create("amount")
                    .optional()
                    .validator(ValidationRule::integer())
                    .default_value("10"),
            )
            .action(|args| {
                println!(
                    "User {} was given {} of {}",
                    args.get("user").unwrap_or(""),
                    args.get("amount").unwrap_or(""),
                    args.get("item").unwrap_or(""),
                );
            })
            .build()?,
        Command::create("Register")
            .alias("register")
            .description("Creates an account.")
            .argument(Argument::create("username").validator(ValidationRule::alphanumeric()))
            .argument(Argument::create("password"))
            .argument(Argument::create("email").validator(ValidationRule::email()))
            .action(|args| {
                println!(
                    "{} ({}) has registered.",
                    args.get("username").unwrap_or(""),
                    args.get("email").unwrap_or(""),
                );
            })
            .build()?,
        Command::create("Mail")
            .alias("mail")
            .description("Allows users to send messages.")
            .argument(
                Argument::create("type")
                    .optional()
                    .option(Argument::create("read"))
                    .option(Argument::create("clear"))
                    .option(
                        Argument::create("send")
                            .child(Argument::create("user"))
                            .child(Argument::create("message")),
                    ),
            )
            .action(|args| match args.get("type").unwrap_or("") {
                "read" => println!("No new mail!"),
                "clear" => println!("Mail cleared!"),
                "send" => println!(
                    "{} has been sent the message: {}",
                    args.get("user").unwrap_or(""),
                    args.get("message").unwrap_or(""),
                ),
                _ => println!("Welcome to the mail system!"),
            })
            .build()?,
        Command::create("Godmode")
            .aliases(["god", "godmode"])
            .description("Disables or enables godmode.")
            .argument(
                Argument::create("player")
                    .optional()
                    .default_value("User")
                    .child(
                        Argument::create("status")
                            .optional()
                            .default_value("on")
                            .option(Argument::create("on"))
                            .option(Argument::create("off")),
                    ),
            )
            .action(|args| {
                println!(
                    "Godmode turned {} for {}",
                    args.get("status").unwrap_or(""),
                    args.get("player").unwrap_or(""),
                );
            })
            .build()?,
        Command::create("Worth")
            .alias("worth")
            .description("Item worth.")
            .argument(
                Argument::create("type")
                    .option(Argument::create("hand"))
                    .option(Argument::create("all"))
                    .option(
                        Argument::create("item")
                            .optional()
                            .child(Argument::create("itemname"))
                            .child(
                                Argument::create("amount")
                                    .optional()
                                    .validator(ValidationRule::integer())
                                    .default_value("10"),
                            ),
                    )
                    .default_value("item"),
            )
            .action(|args| match args.get("type").unwrap_or("") {
                "hand" => println!("Items in hand worth: $10"),
                "all" => println!("All your items worth: $100"),
                _ => {
                    let amount: i64 = args
                        .get("amount")
                        .unwrap_or("")
                        .parse()
                        .unwrap_or_default();
                    println!(
                        "{} of {} is worth ${}",
                        amount,
                        args.get("itemname").unwrap_or(""),
                        amount * 10,
                    );
                }
            })
            .build()?,
    ];

    // The command list is rendered up front so the `list` action does not
    // need a handle back to the parser that owns it.
    let mut help: Vec<String> = commands.iter().map(Command::show_help).collect();
    help.push("Command List: Lists commands. (Usage: list)".to_string());
    let list = Command::create("Command List")
        .aliases(["list", "commands"])
        .description("Lists commands.")
        .action(move |_| {
            for line in &help {
                println!("{line}");
            }
        })
        .build()?;
    commands.push(list);

    let mut parser = Parser::with_prefix(prefix)
        .on_error(|message| println!("{}", message.yellow()));
    for command in commands {
        parser = parser.add_command(command);
    }
    Ok(parser)
}
