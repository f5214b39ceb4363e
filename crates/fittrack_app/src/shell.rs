//! Line-oriented command shell on top of the coordinator.
//!
//! Each input line is split into words (double or single quotes group words)
//! and parsed with clap into a [`Command`], which [`execute`] forwards to the
//! [`App`].

use clap::{CommandFactory, Parser, Subcommand};
use secrecy::SecretString;

use crate::app::{App, Page};
use crate::error::{AppError, AppResult};

#[derive(Parser, Debug)]
#[command(
    name = "fittrack",
    no_binary_name = true,
    disable_version_flag = true,
    about = "Fitness Tracker shell commands"
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Open a page by path, e.g. `go /workouts/42`
    Go { path: String },
    /// Return to the previous page
    Back,
    /// Reload the current page
    Reload,
    /// Sign in
    Login { username: String, password: String },
    /// Create an account and sign in
    Register {
        username: String,
        email: String,
        password: String,
        confirm: String,
    },
    /// Sign out
    Logout,
    /// Next page of workouts
    Next,
    /// Previous page of workouts
    Prev,
    /// Ask to delete the workout being viewed
    Delete,
    /// Confirm the pending delete
    Confirm,
    /// Cancel the pending delete
    Cancel,
    /// Set a field on the workout form or the profile
    Set {
        field: String,
        #[arg(trailing_var_arg = true)]
        value: Vec<String>,
    },
    /// Seed the draft exercise from the library
    Pick {
        #[arg(required = true, trailing_var_arg = true)]
        name: Vec<String>,
    },
    /// Set a field of the draft exercise (name, description, sets, reps, weight, unit, notes)
    Draft {
        field: String,
        #[arg(trailing_var_arg = true)]
        value: Vec<String>,
    },
    /// Append the draft exercise to the workout
    #[command(name = "add-exercise", alias = "add")]
    AddExercise,
    /// Remove the exercise at a 1-based position
    #[command(name = "remove-exercise", alias = "rm")]
    RemoveExercise { position: usize },
    /// Add a tag to the workout
    Tag {
        #[arg(required = true, trailing_var_arg = true)]
        tag: Vec<String>,
    },
    /// Remove a tag from the workout
    Untag {
        #[arg(required = true, trailing_var_arg = true)]
        tag: Vec<String>,
    },
    /// Save the workout form or the profile
    Save,
    /// Filter the exercise library by name or description (no term clears)
    Search {
        #[arg(trailing_var_arg = true)]
        term: Vec<String>,
    },
    /// Filter the exercise library by muscle group
    Group {
        #[arg(required = true, trailing_var_arg = true)]
        name: Vec<String>,
    },
    /// Change the password from the profile page
    Password {
        current: String,
        new: String,
        confirm: String,
    },
    /// Hide the profile notification
    Dismiss,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub enum Parsed {
    Command(Command),
    /// Help or a usage error to show as-is.
    Message(String),
    Empty,
}

/// Split a line into words; quotes group words and are removed.
pub fn split_words(line: &str) -> AppResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return Err(AppError::Validation("unterminated quote".into()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

pub fn parse_line(line: &str) -> AppResult<Parsed> {
    let words = split_words(line)?;
    if words.is_empty() {
        return Ok(Parsed::Empty);
    }
    if words.len() == 1 && words[0] == "help" {
        return Ok(Parsed::Message(help()));
    }
    match ShellLine::try_parse_from(words) {
        Ok(parsed) => Ok(Parsed::Command(parsed.command)),
        Err(e) => Ok(Parsed::Message(e.render().to_string())),
    }
}

pub fn help() -> String {
    ShellLine::command().render_help().to_string()
}

fn secret(s: String) -> SecretString {
    SecretString::new(s.into())
}

/// Run one command against the app.
pub async fn execute(app: &mut App, command: Command) -> AppResult<Flow> {
    match command {
        Command::Go { path } => app.navigate(&path).await?,
        Command::Back => app.back().await?,
        Command::Reload => app.reload().await?,
        Command::Login { username, password } => app.login(&username, secret(password)).await?,
        Command::Register {
            username,
            email,
            password,
            confirm,
        } => {
            app.register(&username, &email, secret(password), secret(confirm))
                .await?
        }
        Command::Logout => app.logout().await?,
        Command::Next => app.next_page().await?,
        Command::Prev => app.prev_page().await?,
        Command::Delete => app.request_delete()?,
        Command::Confirm => app.confirm_delete().await?,
        Command::Cancel => app.cancel_delete()?,
        Command::Set { field, value } => {
            let value = value.join(" ");
            match app.page_mut() {
                Page::WorkoutForm(form) => form.set_field(&field, &value)?,
                Page::Profile(profile) => profile.set_field(&field, &value)?,
                _ => {
                    return Err(AppError::NotAvailable(
                        "set works on the workout form and the profile".into(),
                    ));
                }
            }
        }
        Command::Pick { name } => app.workout_form()?.pick_exercise(&name.join(" "))?,
        Command::Draft { field, value } => app
            .workout_form()?
            .set_draft_field(&field, &value.join(" "))?,
        Command::AddExercise => app.workout_form()?.add_exercise()?,
        Command::RemoveExercise { position } => {
            if position == 0 {
                return Err(AppError::Validation("positions start at 1".into()));
            }
            app.workout_form()?.remove_exercise(position - 1)?
        }
        Command::Tag { tag } => {
            app.workout_form()?.add_tag(&tag.join(" "));
        }
        Command::Untag { tag } => app.workout_form()?.remove_tag(&tag.join(" ")),
        Command::Save => match app.page() {
            Page::WorkoutForm(_) => app.save_workout().await?,
            Page::Profile(_) => app.save_profile().await?,
            _ => {
                return Err(AppError::NotAvailable(
                    "save works on the workout form and the profile".into(),
                ));
            }
        },
        Command::Search { term } => app.exercise_library()?.set_search(&term.join(" ")),
        Command::Group { name } => app.exercise_library()?.select_group(&name.join(" "))?,
        Command::Password {
            current,
            new,
            confirm,
        } => {
            app.change_password(secret(current), secret(new), secret(confirm))
                .await?
        }
        Command::Dismiss => app.profile()?.dismiss_notification(),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_words_honours_quotes() {
        assert_eq!(
            split_words(r#"set name "Leg Day"  "#).unwrap(),
            vec!["set", "name", "Leg Day"]
        );
        assert_eq!(split_words("tag ''").unwrap(), vec!["tag", ""]);
        assert!(split_words("set name \"oops").is_err());
        assert!(split_words("   ").unwrap().is_empty());
    }

    #[test]
    fn parses_commands() {
        let Parsed::Command(cmd) = parse_line("go /workouts/42").unwrap() else {
            panic!("expected a command");
        };
        assert_eq!(
            cmd,
            Command::Go {
                path: "/workouts/42".into()
            }
        );

        let Parsed::Command(cmd) = parse_line("pick Bench Press").unwrap() else {
            panic!("expected a command");
        };
        assert_eq!(
            cmd,
            Command::Pick {
                name: vec!["Bench".into(), "Press".into()]
            }
        );

        let Parsed::Command(cmd) = parse_line("rm 2").unwrap() else {
            panic!("expected a command");
        };
        assert_eq!(cmd, Command::RemoveExercise { position: 2 });

        let Parsed::Command(cmd) = parse_line("search").unwrap() else {
            panic!("expected a command");
        };
        assert_eq!(cmd, Command::Search { term: vec![] });
    }

    #[test]
    fn usage_errors_become_messages() {
        assert!(matches!(parse_line("login alice").unwrap(), Parsed::Message(_)));
        assert!(matches!(parse_line("frobnicate").unwrap(), Parsed::Message(_)));
        assert!(matches!(parse_line("").unwrap(), Parsed::Empty));
        let Parsed::Message(help) = parse_line("help").unwrap() else {
            panic!("expected help");
        };
        assert!(help.contains("add-exercise"));
    }
}
