//! Interactive terminal front end.
//!
//! Each input line is parsed as a clap multicall command. Commands that
//! belong to a gated view are checked against the route table first, so a
//! student cannot reach admin actions and an anonymous user cannot reach the
//! dashboard. Wallet account changes arrive on a channel and are reported
//! between commands.

use std::io::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use hostel_shared::constants::APP_NAME;
use hostel_shared::{Category, ComplaintId};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::auth::{login_url, AuthState};
use crate::commands::complaints::AddComplaintView;
use crate::commands::dashboard::DashboardView;
use crate::commands::{records, session};
use crate::events::{Notice, SessionEvent};
use crate::render;
use crate::routes::{navigate, resolve, Navigation, Route};
use crate::state::AppState;
use crate::view::SortField;

#[derive(Debug, Parser)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Verdict {
    #[value(alias = "y", alias = "satisfied")]
    Yes,
    #[value(alias = "n", alias = "unsatisfied")]
    No,
}

#[derive(Debug, PartialEq, Subcommand)]
pub enum ShellCommand {
    /// Navigate to a view, e.g. `open /dashboard`
    Open { path: String },
    /// Print the Google sign-in URL
    Login,
    /// Complete sign-in with the redirect URL the browser landed on
    Oauth { url: String },
    /// Forget the signed-in user
    Logout,
    /// Connect the wallet
    Connect,
    /// Disconnect the wallet
    Disconnect,
    /// Show the wallet account, signed-in user and current view
    Whoami,
    /// Fill in and submit a new complaint
    Submit,
    /// Reload and show your complaints
    List,
    /// Filter the dashboard by text, category or room
    Search { text: Vec<String> },
    /// Sort the dashboard by id, status, text, block, room or category
    Sort { field: SortField },
    /// Toggle ascending/descending order
    Order,
    /// Review a completed complaint
    Review { id: ComplaintId, verdict: Verdict },
    /// Upload a photo for one of your complaints
    Attach { complaint_id: ComplaintId, file: PathBuf },
    /// List complaint images
    Images,
    /// Show the image record of one complaint
    Image { complaint_id: ComplaintId },
    /// Leave admin feedback on a complaint image
    Feedback { complaint_id: ComplaintId },
    /// Post an announcement
    Announce,
    /// Show announcements
    Announcements,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

impl ShellCommand {
    /// View a command belongs to, when that view is gated.
    fn required_routes(&self) -> &'static [Route] {
        match self {
            ShellCommand::List
            | ShellCommand::Search { .. }
            | ShellCommand::Sort { .. }
            | ShellCommand::Order
            | ShellCommand::Review { .. } => &[Route::Dashboard],
            ShellCommand::Feedback { .. } | ShellCommand::Announce => {
                &[Route::LowerAdmin, Route::HigherAdmin]
            }
            _ => &[],
        }
    }

    /// Whether the current user may run this command.
    pub fn is_allowed(&self, auth: &AuthState) -> bool {
        let routes = self.required_routes();
        routes.is_empty()
            || routes
                .iter()
                .any(|r| resolve(*r, auth) == Navigation::Render(*r))
    }
}

pub fn parse_line(line: &str) -> Result<ShellCommand, clap::Error> {
    ShellLine::try_parse_from(line.split_whitespace()).map(|l| l.command)
}

enum Input {
    Line(Option<String>),
    Event(SessionEvent),
}

pub struct Shell {
    state: AppState,
    route: Route,
    add_complaint: AddComplaintView,
    dashboard: DashboardView,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    lines: Lines<BufReader<Stdin>>,
}

impl Shell {
    pub fn new(state: AppState) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state,
            route: Route::Home,
            add_complaint: AddComplaintView::default(),
            dashboard: DashboardView::default(),
            events_tx,
            events_rx,
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        session::start_account_watcher(&mut self.state, self.events_tx.clone());

        println!("{APP_NAME}. Type `help` for commands.");
        self.print_status()?;

        loop {
            self.print_prompt()?;

            let input = tokio::select! {
                line = self.lines.next_line() => Input::Line(line?),
                Some(event) = self.events_rx.recv() => Input::Event(event),
            };

            match input {
                Input::Line(None) => break,
                Input::Line(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if !self.handle_line(&line).await? {
                        break;
                    }
                }
                Input::Event(event) => self.on_event(event),
            }
        }

        info!("shell closed");
        Ok(())
    }

    fn print_prompt(&self) -> std::io::Result<()> {
        let account = self.state.account().ok().flatten();
        print!("{} {}> ", render::account_badge(account.as_ref()), self.route);
        std::io::stdout().flush()
    }

    fn print_status(&self) -> anyhow::Result<()> {
        let account = self.state.account()?;
        println!("wallet: {}", render::account_badge(account.as_ref()));
        println!("user:   {}", render::auth_badge(&self.state.auth));
        println!("view:   {}", self.route);
        if !self.state.gateway.is_ready() {
            println!("contract: not loaded");
        }
        Ok(())
    }

    fn on_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::AccountChanged(Some(account)) => {
                println!("\nwallet account changed to {}", account.short());
            }
            SessionEvent::AccountChanged(None) => println!("\nwallet disconnected"),
        }
    }

    fn notify(notice: &Notice) {
        let mark = if notice.success { "ok" } else { "!!" };
        println!("[{mark}] {}", notice.message);
    }

    async fn prompt(&mut self, label: &str, current: &str) -> anyhow::Result<String> {
        if current.is_empty() {
            print!("{label}: ");
        } else {
            print!("{label} [{current}]: ");
        }
        std::io::stdout().flush()?;

        let line = self.lines.next_line().await?.unwrap_or_default();
        let line = line.trim();
        Ok(if line.is_empty() { current.to_string() } else { line.to_string() })
    }

    /// Run one command. Returns `false` when the shell should exit.
    async fn handle_line(&mut self, line: &str) -> anyhow::Result<bool> {
        let command = match parse_line(line) {
            Ok(command) => command,
            Err(e) => {
                let _ = e.print();
                return Ok(true);
            }
        };

        if !command.is_allowed(&self.state.auth) {
            warn!(?command, "command not permitted for current role");
            println!("Not available for your role; redirected to {}", Route::Home);
            self.route = Route::Home;
            return Ok(true);
        }

        match command {
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Open { path } => self.open(&path).await,
            ShellCommand::Login => {
                println!("Sign in at {}", login_url(&self.state.config.api_url));
                println!("then run `oauth <redirect url>`");
            }
            ShellCommand::Oauth { url } => match AuthState::from_redirect(&url) {
                Ok(auth) => {
                    self.state.auth = auth;
                    println!("Signed in: {}", render::auth_badge(&self.state.auth));
                    if let Some(role) = self.state.auth.role() {
                        self.open(Route::landing_for(role).path()).await;
                    }
                }
                Err(e) => println!("Sign-in failed: {e}"),
            },
            ShellCommand::Logout => {
                self.state.auth.logout();
                self.route = Route::Home;
                println!("Signed out.");
            }
            ShellCommand::Connect => match session::connect_wallet(&self.state).await {
                Ok(account) => println!("Connected {}", account.short()),
                Err(e) => Self::notify(&Notice::from_error(&e)),
            },
            ShellCommand::Disconnect => match session::disconnect_wallet(&self.state) {
                Ok(()) => println!("Wallet disconnected."),
                Err(e) => Self::notify(&Notice::from_error(&e)),
            },
            ShellCommand::Whoami => self.print_status()?,
            ShellCommand::Submit => self.submit().await?,
            ShellCommand::List => self.list(true).await?,
            ShellCommand::Search { text } => {
                self.dashboard.query.search = text.join(" ");
                self.list(false).await?;
            }
            ShellCommand::Sort { field } => {
                self.dashboard.query.sort_field = field;
                self.list(false).await?;
            }
            ShellCommand::Order => {
                self.dashboard.query.sort_order = self.dashboard.query.sort_order.toggle();
                self.list(false).await?;
            }
            ShellCommand::Review { id, verdict } => {
                let satisfied = verdict == Verdict::Yes;
                let feedback = if satisfied {
                    None
                } else {
                    Some(self.prompt("Feedback for reopening", "").await?)
                };
                let notice = self
                    .dashboard
                    .review(&self.state, id, satisfied, feedback.as_deref())
                    .await;
                Self::notify(&notice);
                if notice.success {
                    self.list(false).await?;
                }
            }
            ShellCommand::Attach { complaint_id, file } => {
                match records::attach_image(&self.state, complaint_id, &file).await {
                    Ok(record) => println!(
                        "Attached {} ({} bytes) to complaint #{}",
                        record.image.content_type,
                        record.image.data.len(),
                        record.complaint_id
                    ),
                    Err(e) => println!("Attach failed: {e}"),
                }
            }
            ShellCommand::Images => match records::list_images(&self.state).await {
                Ok(items) => print!("{}", render::image_records(&items)),
                Err(e) => println!("Could not load images: {e}"),
            },
            ShellCommand::Image { complaint_id } => {
                match records::show_image(&self.state, complaint_id).await {
                    Ok(record) => print!("{}", render::image_records(std::slice::from_ref(&record))),
                    Err(e) => println!("Could not load image: {e}"),
                }
            }
            ShellCommand::Feedback { complaint_id } => {
                let feedback = self.prompt("Feedback", "").await?;
                match records::set_admin_feedback(&self.state, complaint_id, &feedback).await {
                    Ok(_) => println!("Feedback saved for complaint #{complaint_id}"),
                    Err(e) => println!("Feedback failed: {e}"),
                }
            }
            ShellCommand::Announce => {
                let title = self.prompt("Title", "").await?;
                let body = self.prompt("Body", "").await?;
                match records::post_announcement(&self.state, &title, &body).await {
                    Ok(a) => println!("Announcement {} posted", a.id),
                    Err(e) => println!("Announcement failed: {e}"),
                }
            }
            ShellCommand::Announcements => match records::list_announcements(&self.state).await {
                Ok(items) => print!("{}", render::announcements(&items)),
                Err(e) => println!("Could not load announcements: {e}"),
            },
        }

        Ok(true)
    }

    async fn open(&mut self, path: &str) {
        match navigate(path, &self.state.auth) {
            Navigation::Render(route) => {
                self.route = route;
                println!("-> {route}");
            }
            Navigation::Redirect(route) => {
                self.route = route;
                println!("Not available; redirected to {route}");
                return;
            }
        }

        let shown = match self.route {
            Route::Dashboard => self.list(true).await,
            Route::LowerAdmin | Route::HigherAdmin => {
                match records::list_images(&self.state).await {
                    Ok(items) => print!("{}", render::image_records(&items)),
                    Err(e) => println!("Could not load images: {e}"),
                }
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(e) = shown {
            println!("{e}");
        }
    }

    async fn submit(&mut self) -> anyhow::Result<()> {
        self.route = Route::AddComplaint;
        let categories: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
        let mut form = std::mem::take(&mut self.add_complaint.form);

        form.image = self.prompt("Image URL (optional)", &form.image).await?;
        form.category = self
            .prompt(&format!("Category ({})", categories.join("/")), &form.category)
            .await?;
        form.text = self.prompt("Complaint", &form.text).await?;
        form.block_name = self.prompt("Block name", &form.block_name).await?;
        form.floor_no = self.prompt("Floor No", &form.floor_no).await?;
        form.room_no = self.prompt("Room No (optional)", &form.room_no).await?;

        self.add_complaint.form = form;
        let notice = self.add_complaint.submit(&self.state).await;
        Self::notify(&notice);
        Ok(())
    }

    async fn list(&mut self, reload: bool) -> anyhow::Result<()> {
        if reload || self.dashboard.complaints.is_empty() {
            if let Err(e) = self.dashboard.refresh(&self.state).await {
                Self::notify(&Notice::from_error(&e));
                return Ok(());
            }
        }
        let account = self.state.account()?;
        let visible = self.dashboard.visible(account.as_ref());
        print!("{}", render::complaint_table(&visible, &self.dashboard.query));
        Ok(())
    }
}
