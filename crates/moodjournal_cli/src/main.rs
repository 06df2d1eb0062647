//! `moodjournal` command-line driver.
//!
//! Runs the journal route handlers against a local SQLite file. The `--user`
//! flag stands in for the session collaborator and is trusted unconditionally.

mod cli;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use moodjournal_app::{EntryForm, JournalApp, Response, StaticSession};
use moodjournal_core::db::DEFAULT_MOODS;
use moodjournal_core::UserId;
use serde::Serialize;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let app = JournalApp::bootstrap(cli.config.as_deref(), cli.db.clone())
        .context("starting moodjournal")?;

    match cli.command {
        Commands::Init => {
            let added = app.init_store(DEFAULT_MOODS)?;
            println!(
                "initialized {} (moods_added={added})",
                app.config().db_path.display()
            );
        }
        Commands::SeedUser {
            ref email,
            ref password_hash,
        } => {
            let user_id = app.seed_user(email, password_hash)?;
            println!("{user_id}");
        }
        Commands::Moods => {
            for mood in app.moods()? {
                println!("{}\t{}", mood.id, mood.name);
            }
        }
        Commands::List => {
            let response = app.journal_index(&session(&cli)?)?;
            if cli.json {
                return print_json(&response);
            }
            for item in ok_data(response)?.entry_list_items {
                println!("{}\t{}", item.id, item.title);
            }
        }
        Commands::Show { ref id, html } => {
            let response = app.entry_detail(&session(&cli)?, id)?;
            if cli.json {
                return print_json(&response);
            }
            let detail = ok_data(response)?;
            if html {
                print!("{}", detail.html);
            } else {
                let moods: Vec<_> = detail.entry.moods.iter().map(|m| m.name.as_str()).collect();
                println!("# {}", detail.entry.title);
                if !moods.is_empty() {
                    println!("moods: {}", moods.join(", "));
                }
                println!();
                println!("{}", detail.entry.body);
            }
        }
        Commands::New {
            ref title,
            ref body,
            ref moods,
        } => {
            let session = session(&cli)?;
            let title = match title {
                Some(title) => title.clone(),
                None => ok_data(app.new_entry_form(&session, chrono::Local::now().naive_local())?)?
                    .default_title,
            };
            let mut pairs = vec![("title", title), ("body", body.clone())];
            for mood_id in resolve_moods(&app, moods)? {
                pairs.push(("moods", mood_id));
            }
            let response = app.entry_create(&session, &EntryForm::from_pairs(pairs))?;
            finish_action(&cli, response)?;
        }
        Commands::Edit {
            ref id,
            ref title,
            ref body,
        } => {
            let form = EntryForm::from_pairs([("title", title.as_str()), ("body", body.as_str())]);
            let response = app.entry_update(&session(&cli)?, id, &form)?;
            finish_action(&cli, response)?;
        }
        Commands::Delete { ref id } => {
            let response = app.entry_delete(&session(&cli)?, id)?;
            finish_action(&cli, response)?;
        }
        Commands::Preview { ref body } => match app.entry_preview(body) {
            Some(html) => print!("{html}"),
            None => bail!("nothing to preview"),
        },
    }

    Ok(())
}

fn session(cli: &Cli) -> Result<StaticSession> {
    let raw = cli
        .user
        .as_deref()
        .ok_or_else(|| anyhow!("--user (or MOODJOURNAL_USER) is required"))?;
    let user_id: UserId = raw
        .trim()
        .parse()
        .with_context(|| format!("invalid user id `{raw}`"))?;
    Ok(StaticSession::user(user_id))
}

fn resolve_moods(app: &JournalApp, names: &[String]) -> Result<Vec<String>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let catalog = app.moods()?;
    names
        .iter()
        .map(|name| {
            catalog
                .iter()
                .find(|mood| mood.name.eq_ignore_ascii_case(name.trim()))
                .map(|mood| mood.id.to_string())
                .ok_or_else(|| anyhow!("unknown mood `{name}`"))
        })
        .collect()
}

fn ok_data<T>(response: Response<T>) -> Result<T> {
    match response {
        Response::Ok { data } => Ok(data),
        Response::NotFound => bail!("entry not found"),
        Response::Unauthorized { .. } => bail!("not signed in"),
        Response::Invalid { errors } => bail!("{}", describe_errors(&errors)),
        Response::Redirect { location } => bail!("unexpected redirect to {location}"),
    }
}

fn finish_action(cli: &Cli, response: Response<()>) -> Result<()> {
    if cli.json {
        print_json(&response)?;
    }
    match response {
        Response::Redirect { location } => {
            if !cli.json {
                println!("{location}");
            }
            Ok(())
        }
        other => ok_data(other),
    }
}

fn describe_errors(errors: &moodjournal_app::FieldErrors) -> String {
    [&errors.title, &errors.body, &errors.moods]
        .into_iter()
        .flatten()
        .cloned()
        .collect::<Vec<_>>()
        .join("; ")
}

fn print_json<T: Serialize>(response: &Response<T>) -> Result<()> {
    println!("{}", response.to_json()?);
    Ok(())
}
