//! Interactive shell on top of [`App`].
//!
//! Each line is split with shlex and parsed as a clap subcommand; async work
//! runs on the caller's runtime through `block_on`, since rustyline blocks.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use crate::api::{EventId, NotificationId};
use crate::app::{App, Page, Screen};
use crate::cli_style::{
    get_prompt, get_styles, print_error, print_goodbye, print_help, print_warning, CommandGroup,
    CommandHelp,
};
use crate::pages::{AuthForm, AuthMode};
use crate::reconciler::LoadState;
use crate::session::SessionState;
use crate::view;

#[derive(Parser, Debug)]
#[command(styles=get_styles(), name = "", disable_help_subcommand = true)]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum InnerCommand {
    /// Signs in with username and password.
    Login { username: String, password: String },

    /// Creates an account and signs in with it.
    Register {
        username: String,
        password: String,
        /// Password confirmation, must match when given.
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Signs out.
    Logout,

    /// Shows the signed-in user.
    Whoami,

    /// Lists all events.
    Events,

    /// Toggles the bookmark on an event.
    Bookmark { event_id: EventId },

    /// Lists bookmarked events.
    Bookmarks,

    /// Removes an event from the bookmarks.
    Unbookmark { event_id: EventId },

    /// Lists notifications.
    Notifications,

    /// Marks a notification as read.
    Read { notification_id: NotificationId },

    /// Shows this help.
    Help,

    /// Close this program.
    Exit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

pub fn commands_help() -> Vec<CommandHelp> {
    vec![
        CommandHelp {
            name: "login",
            args: "<username> <password>",
            description: "Sign in",
            group: CommandGroup::Account,
        },
        CommandHelp {
            name: "register",
            args: "<username> <password> [--confirm <password>]",
            description: "Create an account",
            group: CommandGroup::Account,
        },
        CommandHelp {
            name: "logout",
            args: "",
            description: "Sign out",
            group: CommandGroup::Account,
        },
        CommandHelp {
            name: "whoami",
            args: "",
            description: "Show the signed-in user",
            group: CommandGroup::Account,
        },
        CommandHelp {
            name: "events",
            args: "",
            description: "List all events",
            group: CommandGroup::Events,
        },
        CommandHelp {
            name: "bookmark",
            args: "<event-id>",
            description: "Toggle the bookmark on an event",
            group: CommandGroup::Events,
        },
        CommandHelp {
            name: "bookmarks",
            args: "",
            description: "List bookmarked events",
            group: CommandGroup::Events,
        },
        CommandHelp {
            name: "unbookmark",
            args: "<event-id>",
            description: "Remove an event from the bookmarks",
            group: CommandGroup::Events,
        },
        CommandHelp {
            name: "notifications",
            args: "",
            description: "List notifications",
            group: CommandGroup::Notifications,
        },
        CommandHelp {
            name: "read",
            args: "<notification-id>",
            description: "Mark a notification as read",
            group: CommandGroup::Notifications,
        },
        CommandHelp {
            name: "help",
            args: "",
            description: "Show this help",
            group: CommandGroup::System,
        },
        CommandHelp {
            name: "exit",
            args: "",
            description: "Close this program",
            group: CommandGroup::System,
        },
    ]
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<InnerCommand>, clap::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let args =
        shlex::split(line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());
    let cli =
        InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)))?;
    Ok(Some(cli.command))
}

/// Whether a line may be written to the history file. Lines carrying a
/// password never are, malformed ones included.
pub fn records_history(line: &str, parsed: &Result<Option<InnerCommand>, clap::Error>) -> bool {
    match parsed {
        Ok(Some(InnerCommand::Login { .. } | InnerCommand::Register { .. })) => false,
        Ok(Some(_)) => true,
        Ok(None) => false,
        Err(_) => !matches!(line.split_whitespace().next(), Some("login" | "register")),
    }
}

fn render_page(app: &App, page: Page, state: &LoadState) {
    match page {
        Page::Events => view::render_events("Events", &app.events().events().items(), state),
        Page::Bookmarks => {
            view::render_events("Bookmarks", &app.bookmarks().bookmarks().items(), state)
        }
        Page::Notifications => {
            view::render_notifications(&app.notifications().notifications().items(), state)
        }
    }
}

/// Navigates to `page` and prints it, or explains why it cannot be shown.
async fn show_page(app: &App, page: Page) -> CommandExecutionResult {
    match app.open(page).await {
        Some(state) => {
            render_page(app, page, &state);
            view::render_nav(&app.nav());
            CommandExecutionResult::Ok
        }
        None => gated(app, page),
    }
}

fn gated(app: &App, page: Page) -> CommandExecutionResult {
    match app.screen(page) {
        Screen::Loading => CommandExecutionResult::Error("Still checking the session".to_string()),
        _ => CommandExecutionResult::Error(
            "Sign in first: login <username> <password>".to_string(),
        ),
    }
}

/// Makes sure a page has data before mutating it, e.g. `bookmark 3` typed
/// before `events` was ever listed.
async fn ensure_mounted(app: &App, page: Page) -> Option<CommandExecutionResult> {
    if app.screen(page) != Screen::Page(page) {
        return Some(gated(app, page));
    }
    let state = match page {
        Page::Events => app.events().events().load_state(),
        Page::Bookmarks => app.bookmarks().bookmarks().load_state(),
        Page::Notifications => app.notifications().notifications().load_state(),
    };
    if state == LoadState::Idle {
        debug!("{:?} not loaded yet, mounting", page);
        app.open(page).await;
    }
    None
}

async fn sign_in(app: &mut App, mode: AuthMode, form: AuthForm) -> CommandExecutionResult {
    match app.sign_in(mode, &form).await {
        Some(identity) => {
            view::Notice::Success(format!("Welcome, {}!", identity.username)).print();
            view::render_nav(&app.nav());
            CommandExecutionResult::Ok
        }
        None => CommandExecutionResult::Error(
            app.auth()
                .error()
                .unwrap_or("Authentication failed")
                .to_string(),
        ),
    }
}

pub async fn execute_command(command: InnerCommand, app: &mut App) -> CommandExecutionResult {
    match command {
        InnerCommand::Login { username, password } => {
            sign_in(app, AuthMode::Login, AuthForm::new(username, password)).await
        }
        InnerCommand::Register {
            username,
            password,
            confirm,
        } => {
            let mut form = AuthForm::new(username, password);
            form.confirm_password = confirm;
            sign_in(app, AuthMode::Register, form).await
        }
        InnerCommand::Logout => {
            if !app.session().current().is_authenticated() {
                print_warning("Not signed in");
                return CommandExecutionResult::Ok;
            }
            app.sign_out().await;
            view::Notice::Success("Signed out".to_string()).print();
            CommandExecutionResult::Ok
        }
        InnerCommand::Whoami => match app.session().current() {
            SessionState::Authenticated(identity) => {
                view::render_identity(&identity.username, identity.id);
                CommandExecutionResult::Ok
            }
            SessionState::Anonymous => {
                CommandExecutionResult::Error("Not signed in".to_string())
            }
            SessionState::Unknown => {
                CommandExecutionResult::Error("Still checking the session".to_string())
            }
        },
        InnerCommand::Events => show_page(app, Page::Events).await,
        InnerCommand::Bookmarks => show_page(app, Page::Bookmarks).await,
        InnerCommand::Notifications => show_page(app, Page::Notifications).await,
        InnerCommand::Bookmark { event_id } => {
            if let Some(result) = ensure_mounted(app, Page::Events).await {
                return result;
            }
            let outcome = app.toggle_bookmark(event_id).await;
            view::toggle_notice(event_id, &outcome).print();
            CommandExecutionResult::Ok
        }
        InnerCommand::Unbookmark { event_id } => {
            if let Some(result) = ensure_mounted(app, Page::Bookmarks).await {
                return result;
            }
            let outcome = app.remove_bookmark(event_id).await;
            view::remove_notice(event_id, &outcome).print();
            CommandExecutionResult::Ok
        }
        InnerCommand::Read { notification_id } => {
            if let Some(result) = ensure_mounted(app, Page::Notifications).await {
                return result;
            }
            let outcome = app.mark_read(notification_id).await;
            view::mark_read_notice(notification_id, &outcome).print();
            view::render_nav(&app.nav());
            CommandExecutionResult::Ok
        }
        InnerCommand::Help => {
            print_help(&commands_help());
            CommandExecutionResult::Ok
        }
        InnerCommand::Exit => CommandExecutionResult::Exit,
    }
}

#[derive(rustyline_derive::Hinter)]
struct ReplHelper {
    commands_names: Vec<String>,
}

impl ReplHelper {
    fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        ReplHelper { commands_names }
    }
}

impl Completer for ReplHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .cloned()
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for ReplHelper {}
impl Validator for ReplHelper {}
impl Helper for ReplHelper {}

/// Runs the shell until `exit`, CTRL-C or CTRL-D.
pub fn run(runtime: &Runtime, mut app: App, history_file: Option<PathBuf>) -> Result<()> {
    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<ReplHelper, FileHistory>::with_config(config)?;
    rl.set_helper(Some(ReplHelper::new()));

    if let Some(path) = &history_file {
        if let Err(err) = rl.load_history(path) {
            debug!("No history loaded from {:?}: {}", path, err);
        }
    }

    loop {
        let nav = app.nav();
        let readline = rl.readline(&get_prompt(nav.username.as_deref(), nav.unread));

        match readline {
            Ok(line) => {
                let parsed = parse_line(&line);
                if records_history(&line, &parsed) {
                    let _ = rl.add_history_entry(line.as_str());
                }
                let command = match parsed {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        if e.print().is_err() {
                            println!("{}", e);
                        }
                        continue;
                    }
                };
                match runtime.block_on(execute_command(command, &mut app)) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => print_error(&err),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                print_error(&format!("{:?}", e));
                break;
            }
        }
    }

    if let Some(path) = &history_file {
        if let Err(err) = rl.save_history(path) {
            warn!("Could not save history to {:?}: {}", path, err);
        }
    }
    print_goodbye();
    Ok(())
}
