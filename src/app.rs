//! Interactive terminal front end.
//!
//! One command per line: `create <text>` resolves the text with the
//! configured grammar and writes it to the calendar (or reports that an
//! identical event exists), `modify <event-id> <text>` overwrites an
//! existing event, `list` shows the next ten upcoming events. Parse errors
//! are reported verbatim and never end the session.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::calendar::google::GoogleCalendar;
use crate::calendar::token::Credential;
use crate::calendar::CalendarPort;
use crate::config::Config;
use crate::reconcile::{self, Outcome};
use crate::resolver::{self, InputGrammar};

pub struct Application;

impl Application {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        let config = Config::load()?;
        log::info!("Using {:?} input grammar", config.grammar.variant);

        let grammar = resolver::create_grammar(&config)?;
        let credential = Credential::from_env()?;
        let calendar = GoogleCalendar::new(credential, config.calendar.calendar_id.clone())?;

        let mut rl = DefaultEditor::new()?;
        println!("Welcome to slated. Type 'help' for commands.");

        loop {
            match rl.readline("slated> ") {
                Ok(line) => {
                    let _ = rl.add_history_entry(line.as_str());
                    let line = line.trim();
                    if line == "quit" || line == "exit" {
                        break;
                    }
                    if let Err(err) =
                        self.process_line(line, grammar.as_ref(), &calendar).await
                    {
                        log::error!("Failed to process command: {:?}", err);
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    async fn process_line(
        &self,
        line: &str,
        grammar: &dyn InputGrammar,
        calendar: &dyn CalendarPort,
    ) -> Result<()> {
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            "" | "help" => {
                println!("Commands:");
                println!("  create <event text>        e.g. create 03/17 12:00pm toronto time team sync 5");
                println!("  modify <event-id> <text>   overwrite an existing event");
                println!("  list                       show the next 10 upcoming events");
                println!("  quit");
            }
            "list" => {
                let events = calendar.list_upcoming(10).await?;
                if events.is_empty() {
                    println!("No upcoming events.");
                }
                for event in events {
                    println!("{}  {}  {}", event.start_utc, event.id, event.summary);
                }
            }
            "create" => match grammar.resolve(rest).await {
                Ok(event) => match reconcile::reconcile(calendar, &event).await {
                    Ok(Outcome::Created(link)) => println!("Event created: {}", link),
                    Ok(Outcome::AlreadyExists) => println!("Event already exists."),
                    Ok(Outcome::Updated) => unreachable!("create path never updates"),
                    Err(err) => println!("Error: {}", err),
                },
                Err(err) if err.is_parse() => println!("Error: {}", err),
                Err(err) => return Err(err.into()),
            },
            "modify" => {
                let Some((id, text)) = rest.split_once(' ') else {
                    println!("Usage: modify <event-id> <event text>");
                    return Ok(());
                };
                match grammar.resolve(text).await {
                    Ok(event) => match reconcile::update(calendar, id, &event).await {
                        Ok(_) => println!("Event updated successfully."),
                        Err(err) => println!("Error: {}", err),
                    },
                    Err(err) if err.is_parse() => println!("Error: {}", err),
                    Err(err) => return Err(err.into()),
                }
            }
            other => println!("Unknown command '{}'. Type 'help' for commands.", other),
        }
        Ok(())
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}
