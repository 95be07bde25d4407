//! `pim` command-line front end.
//!
//! Loads configuration, prepares the schema once, runs one request against
//! `pim_api` and prints the resulting notice and view.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::error;
use pim_api::{App, Form, Response};
use pim_core::{init_logging_from, AppConfig};

mod render;

#[derive(Parser, Debug)]
#[command(
    name = "pim",
    version,
    about = "Personal info manager: persons with career and education history"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database file (overrides `database.path`)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Absolute directory for log files (overrides `logging.dir`)
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (overrides `logging.level`)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Print the response as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage persons
    #[command(subcommand)]
    Person(PersonCommand),
    /// Manage career history
    #[command(subcommand)]
    Career(HistoryCommand),
    /// Manage education history
    #[command(subcommand)]
    Education(HistoryCommand),
}

#[derive(Subcommand, Debug)]
enum PersonCommand {
    /// List persons, optionally filtered by name, email or phone
    List {
        #[arg(long, short = 'q')]
        query: Option<String>,
    },
    /// Show one person with career and education history
    Show { id: i64 },
    /// Add a person (`-f name=... -f phone=... -f email=...`)
    Add(FieldArgs),
    /// Edit contact fields (`gender`, `phone`, `email`, `address`)
    Edit {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a person and all of their history
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List all rows with owner names
    List,
    /// Show one row with owner choices for editing
    Show { id: i64 },
    /// Add a row for a person
    Add {
        person_id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit a row; `person_id` must be among the fields
    Edit {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete one row
    Delete { id: i64 },
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    /// Form field as KEY=VALUE; repeatable
    #[arg(long = "field", short = 'f', value_name = "KEY=VALUE", value_parser = parse_field)]
    fields: Vec<(String, String)>,
}

impl FieldArgs {
    fn form(&self) -> Form {
        self.fields.iter().cloned().collect()
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(path) = cli.db {
        config.database.path = path;
    }
    if let Some(dir) = cli.log_dir {
        config.logging.dir = Some(dir);
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.validate().context("invalid configuration")?;
    init_logging_from(&config.logging).context("failed to initialize logging")?;

    let app = App::new(&config);
    // Requests still run and report the connection failure.
    if let Err(err) = app.startup() {
        error!("event=startup module=cli status=error error_code=schema_init_failed");
        eprintln!("warning: schema initialization failed: {err}");
    }

    let response = dispatch(&app, &cli.command);
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).context("failed to encode response")?
        );
    } else {
        print!("{}", render::render_text(&response));
    }

    Ok(exit_code(&response))
}

fn dispatch(app: &App, command: &Commands) -> Response {
    match command {
        Commands::Person(command) => match command {
            PersonCommand::List { query } => app.person_list(query.as_deref()),
            PersonCommand::Show { id } => app.person_detail(*id),
            PersonCommand::Add(fields) => app.add_person(&fields.form()),
            PersonCommand::Edit { id, fields } => app.update_person(*id, &fields.form()),
            PersonCommand::Delete { id } => app.delete_person(*id),
        },
        Commands::Career(command) => match command {
            HistoryCommand::List => app.career_list(),
            HistoryCommand::Show { id } => app.edit_career_form(*id),
            HistoryCommand::Add { person_id, fields } => {
                app.add_career(*person_id, &fields.form())
            }
            HistoryCommand::Edit { id, fields } => app.update_career(*id, &fields.form()),
            HistoryCommand::Delete { id } => app.delete_career(*id),
        },
        Commands::Education(command) => match command {
            HistoryCommand::List => app.education_list(),
            HistoryCommand::Show { id } => app.edit_education_form(*id),
            HistoryCommand::Add { person_id, fields } => {
                app.add_education(*person_id, &fields.form())
            }
            HistoryCommand::Edit { id, fields } => app.update_education(*id, &fields.form()),
            HistoryCommand::Delete { id } => app.delete_education(*id),
        },
    }
}

fn exit_code(response: &Response) -> ExitCode {
    if response.is_danger() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_field, Cli, Commands, HistoryCommand, PersonCommand};
    use clap::Parser;

    #[test]
    fn parse_field_splits_on_first_equals() {
        assert_eq!(
            parse_field("address=12 A=B Road").unwrap(),
            ("address".to_string(), "12 A=B Road".to_string())
        );
        assert_eq!(
            parse_field("skills=").unwrap(),
            ("skills".to_string(), String::new())
        );
        assert!(parse_field("no-separator").is_err());
        assert!(parse_field("=value").is_err());
    }

    #[test]
    fn parses_person_add_with_fields_and_global_flags() {
        let cli = Cli::try_parse_from([
            "pim", "--json", "person", "add", "-f", "name=Asha", "--field", "phone=9876543210",
            "--db", "/tmp/people.db",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/people.db")));
        match cli.command {
            Commands::Person(PersonCommand::Add(fields)) => {
                let form = fields.form();
                assert_eq!(form.get("name"), Some("Asha"));
                assert_eq!(form.get("phone"), Some("9876543210"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_history_edit() {
        let cli = Cli::try_parse_from([
            "pim", "career", "edit", "4", "-f", "person_id=2", "-f", "job_title=Lead",
        ])
        .unwrap();
        match cli.command {
            Commands::Career(HistoryCommand::Edit { id, fields }) => {
                assert_eq!(id, 4);
                assert_eq!(fields.form().get("person_id"), Some("2"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
