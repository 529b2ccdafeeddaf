//! Interactive play client.
//!
//! Drives one full session against a running server. All state transitions
//! go through [`GameSession`]; the server stays stateless. Plain input
//! interrogates the active suspect, slash commands control the session.

use std::collections::HashMap;
use std::time::Duration;

use console::style;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use whodunit_core::session::GameSession;
use whodunit_types::character::Cast;
use whodunit_types::chat::Message;
use whodunit_types::session::{Phase, Verdict};

const BRIEFING: &str = "\
You are a detective. Richard Sandra, a wealthy friend, invited you to a party
at his mansion deep in the forest. The party ran until 22:00, and as the night
wore on you were offered a room. At 22:55 you woke to a scream: his wife
Emilia had found Richard dead in his study, strangulation marks on his neck,
his pocket watch stopped at 22:45 on the floor beside him.

The guests have gathered in the lounge. Before the police arrive, you must
name the killer yourself. You can ask 20 questions in total, split however
you like between the three suspects.";

// ---------------------------------------------------------------------------
// Slash commands
// ---------------------------------------------------------------------------

/// Available slash commands in the play loop.
#[derive(Debug, PartialEq)]
enum PlayCommand {
    /// Show available commands.
    Help,
    /// List the suspects.
    Cast,
    /// Show the remaining turn budget.
    Turns,
    /// Switch the active suspect.
    Talk(String),
    /// Leave the game.
    Quit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
fn parse(input: &str) -> Option<PlayCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts.get(1).map(|s| s.trim().to_string());

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(PlayCommand::Help),
        "/cast" => Some(PlayCommand::Cast),
        "/turns" => Some(PlayCommand::Turns),
        "/talk" => match arg {
            Some(id) if !id.is_empty() => Some(PlayCommand::Talk(id)),
            _ => Some(PlayCommand::Unknown("/talk requires a suspect id".to_string())),
        },
        "/exit" | "/quit" | "/q" => Some(PlayCommand::Quit),
        other => Some(PlayCommand::Unknown(other.to_string())),
    }
}

fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}       {}", style("/cast").cyan(), "List the suspects");
    println!("  {}  {}", style("/talk <id>").cyan(), "Question another suspect");
    println!("  {}      {}", style("/turns").cyan(), "Show remaining questions");
    println!("  {}       {}", style("/help").cyan(), "Show this help message");
    println!("  {}       {}", style("/quit").cyan(), "Leave the game");
    println!();
}

fn print_cast(cast: &Cast) {
    println!();
    println!("  {}", style("The suspects:").bold());
    for character in cast.characters() {
        println!("    {}  {}", style(&character.id).cyan(), character.name);
    }
    println!();
}

fn thinking_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatBody<'a> {
    message: &'a str,
    character_id: &'a str,
    history: &'a [Message],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatReply {
    reply: String,
    is_final_turn: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeductionBody<'a> {
    character_id: &'a str,
    reasoning: &'a str,
    histories: &'a HashMap<String, Vec<Message>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeductionReply {
    is_correct: bool,
    response: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// POST a JSON body and decode either the reply or the `{ "error" }` shape.
async fn post_json<B: Serialize, R: DeserializeOwned>(
    client: &reqwest::Client,
    url: String,
    body: &B,
) -> anyhow::Result<R> {
    let response = client.post(url).json(body).send().await?;
    let status = response.status();
    if !status.is_success() {
        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("HTTP {status}"));
        anyhow::bail!(message);
    }
    Ok(response.json().await?)
}

// ---------------------------------------------------------------------------
// The play loop
// ---------------------------------------------------------------------------

/// Run one full session against the server at `server`.
pub async fn run(server: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let mut session = GameSession::new(Cast::standard());

    println!();
    println!("  {}", style("The Sandra Mansion Case").bold().underlined());
    println!();
    for line in BRIEFING.lines() {
        println!("  {line}");
    }
    println!();

    if !Confirm::new()
        .with_prompt("Take the case?")
        .default(true)
        .interact()?
    {
        return Ok(());
    }
    session.begin()?;

    print_cast(session.cast());
    println!(
        "  {}",
        style("Type a question to interrogate, or /help for commands.").dim()
    );
    println!();

    while session.phase() == Phase::Interrogation {
        let prompt = format!(
            "{} [{} left]",
            session.active_character().name,
            session.turns_left()
        );
        let line: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = parse(&line) {
            match command {
                PlayCommand::Help => print_help(),
                PlayCommand::Cast => print_cast(session.cast()),
                PlayCommand::Turns => {
                    println!("  {} questions left", session.turns_left());
                }
                PlayCommand::Talk(id) => match session.select_character(&id) {
                    Ok(()) => println!(
                        "  You turn to {}.",
                        style(&session.active_character().name).cyan()
                    ),
                    Err(err) => println!("  {} {err}", style("!").yellow().bold()),
                },
                PlayCommand::Quit => return Ok(()),
                PlayCommand::Unknown(cmd) => {
                    println!("  {} unknown command: {cmd}", style("!").yellow().bold());
                }
            }
            continue;
        }

        session.take_turn()?;

        let character = session.active_character().clone();
        let body = ChatBody {
            message: &line,
            character_id: &character.id,
            history: session.active_history(),
        };
        let spinner = thinking_spinner("The suspect considers the question...");
        let result: anyhow::Result<ChatReply> =
            post_json(&client, format!("{server}/api/chat"), &body).await;
        spinner.finish_and_clear();

        match result {
            Ok(turn) => {
                println!();
                println!("  {} {}", style(format!("{}:", character.name)).cyan().bold(), turn.reply);
                println!();
                if turn.is_final_turn {
                    println!("  {}", style("That was your last question.").dim());
                }
                session.record_exchange(line, turn.reply);
            }
            Err(err) => {
                // The question is spent either way.
                println!("  {} {err}", style("!").red().bold());
                session.abandon_exchange();
            }
        }
    }

    if session.phase() == Phase::FinalDeductionPending {
        run_final_deduction(&client, server, &mut session).await?;
    }

    Ok(())
}

/// Walk the player through accusation and reasoning, then print the verdict.
async fn run_final_deduction(
    client: &reqwest::Client,
    server: &str,
    session: &mut GameSession,
) -> anyhow::Result<()> {
    println!();
    println!(
        "  {}",
        style("All questions are spent. Time to name the killer.").bold()
    );
    println!();

    let names: Vec<&str> = session
        .cast()
        .characters()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    let picked = Select::new()
        .with_prompt("Who killed Richard Sandra?")
        .items(&names)
        .default(0)
        .interact()?;
    let accused_id = session.cast().characters()[picked].id.clone();

    let reasoning: String = Input::new()
        .with_prompt("Lay out the truth of the case")
        .interact_text()?;

    session.submit_deduction(&accused_id)?;

    let body = DeductionBody {
        character_id: &accused_id,
        reasoning: &reasoning,
        histories: session.histories(),
    };
    let spinner = thinking_spinner("The room falls silent...");
    let result: anyhow::Result<DeductionReply> =
        post_json(client, format!("{server}/api/final-deduction"), &body).await;
    spinner.finish_and_clear();

    match result {
        Ok(verdict) => {
            let heading = if verdict.is_correct {
                style("Case closed").green().bold()
            } else {
                style("Deduction failed").red().bold()
            };
            println!();
            println!("  {heading}");
            println!();
            for line in verdict.response.lines() {
                println!("  {line}");
            }
            println!();
            session.resolve(Verdict {
                is_correct: verdict.is_correct,
                narrative: verdict.response,
            })?;
        }
        Err(err) => {
            println!("  {} {err}", style("!").red().bold());
            println!("  Restart the session to submit the deduction again.");
        }
    }

    Ok(())
}
