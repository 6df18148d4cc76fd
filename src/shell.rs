use anyhow::Result;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use tracing::error;

use crate::categories::Domain;
use crate::config::Config;
use crate::conversation::{ConversationEngine, Reply};
use crate::format;

const COMMANDS: &[&str] = &[
    "/start",
    "/help",
    "/school_log",
    "/school_summary",
    "/life_log",
    "/life_summary",
    "/overall_balance",
    "/balance",
    "/add_money",
    "/insights",
    "/exit",
];

/// Interactive chat front-end. Slash commands are routed to the engine's
/// command handlers; anything else is the user's next conversational
/// reply.
pub fn run(mut engine: ConversationEngine, config: &Config, user_id: String) -> Result<()> {
    let mut editor: Editor<ShellCompleter, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(ShellCompleter));

    let history_file = config.history_file();
    if history_file.exists() {
        let _ = editor.load_history(&history_file);
    }

    emit(&engine.welcome());

    loop {
        let prompt = if engine.is_waiting(&user_id) {
            "> "
        } else {
            "baon> "
        };

        match editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                if matches!(line, "/exit" | "/quit") {
                    break;
                }

                match dispatch(&mut engine, &user_id, line) {
                    Ok(replies) => emit(&replies),
                    Err(e) => {
                        // never drop the shell over one conversation's error
                        error!("command failed: {}", e);
                        println!("❌ Something went wrong. Please try again.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    let _ = editor.save_history(&history_file);
    println!("👋 Happy saving!");
    Ok(())
}

fn dispatch(
    engine: &mut ConversationEngine,
    user_id: &str,
    line: &str,
) -> crate::error::Result<Vec<Reply>> {
    let Some(command_line) = line.strip_prefix('/') else {
        return engine.submit(user_id, line);
    };

    let (command, args) = match command_line.split_once(char::is_whitespace) {
        Some((command, args)) => (command, args),
        None => (command_line, ""),
    };

    match command {
        "start" | "help" => Ok(engine.welcome()),
        "school_log" => engine.start_log(user_id, Domain::School),
        "life_log" => engine.start_log(user_id, Domain::Life),
        "school_summary" => engine.summary(user_id, Domain::School),
        "life_summary" => engine.summary(user_id, Domain::Life),
        "overall_balance" => engine.overall_balance(user_id),
        "balance" => engine.balance(user_id),
        "add_money" => engine.add_money(user_id, args),
        "insights" => engine.insights(user_id),
        unknown => Ok(vec![Reply::plain(format!(
            "❓ Unknown command: /{}. Try /help.",
            unknown
        ))]),
    }
}

fn emit(replies: &[Reply]) {
    for reply in replies {
        println!("{}\n", format::render(reply));
    }
}

struct ShellCompleter;

impl Helper for ShellCompleter {}

impl Hinter for ShellCompleter {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for ShellCompleter {}

impl Validator for ShellCompleter {}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if !line.starts_with('/') {
            return Ok((0, Vec::new()));
        }

        let word = &line[..pos];
        let matches: Vec<Pair> = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(word))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}
