//! CLI command implementations

use std::fmt::Write as _;

use anyhow::Context;
use clap::Subcommand;
use reelscout_core::{ReelscoutConfig, RuntimeMode};
use reelscout_search::pagination::first_item_number;
use reelscout_search::{
    Commit, MediaKind, SearchController, SearchFilters, SearchSession, SessionStatus,
    catalog_for_mode,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::repl::{HELP, ReplCommand, parse_line};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a single search and print one page of results
    Search {
        /// Title text to search for
        query: String,
        /// Restrict to movies or series
        #[arg(short = 't', long = "type")]
        kind: Option<MediaKind>,
        /// Restrict to a release year
        #[arg(short, long)]
        year: Option<u16>,
        /// Page to show
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Print the session as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Start an interactive search session
    Interactive,
}

/// Handle the CLI command
///
/// # Errors
/// - Configuration is invalid or the catalog client cannot be built
/// - Rendering to JSON fails
pub async fn handle_command(command: Commands, mode: RuntimeMode) -> anyhow::Result<()> {
    let config = checked_config(ReelscoutConfig::from_env())?;

    let catalog = catalog_for_mode(mode, &config.catalog).context("building catalog client")?;
    tracing::info!(%mode, catalog = catalog.name(), "Catalog ready");

    let controller = SearchController::new(catalog, &config.search);

    match command {
        Commands::Search {
            query,
            kind,
            year,
            page,
            json,
        } => run_search(controller, query, SearchFilters::new(kind, year), page, json).await,
        Commands::Interactive => run_interactive(controller).await,
    }
}

fn checked_config(config: ReelscoutConfig) -> anyhow::Result<ReelscoutConfig> {
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Rejected configuration");
        anyhow::bail!(e.user_message());
    }
    Ok(config)
}

/// One-shot search: submit with filters, move to the page, print.
///
/// # Errors
/// - Rendering to JSON fails
pub async fn run_search(
    mut controller: SearchController,
    query: String,
    filters: SearchFilters,
    page: u32,
    json: bool,
) -> anyhow::Result<()> {
    if let Err(notice) = controller.submit_search(&query, filters) {
        println!("{notice}");
        return Ok(());
    }
    controller.settle().await;

    if page > 1 && controller.session().status() == SessionStatus::Ready {
        match controller.change_page(page) {
            Ok(_) => {
                controller.settle().await;
            }
            Err(notice) => println!("{notice}"),
        }
    }

    let session = controller.session();
    if json {
        let rendered =
            serde_json::to_string_pretty(&session.view()).context("serializing session")?;
        println!("{rendered}");
    } else {
        print!("{}", render_session(session));
    }

    Ok(())
}

/// Interactive session over stdin.
///
/// Input keeps being accepted while a fetch is outstanding; whatever the
/// catalog answers for superseded requests is ignored.
///
/// # Errors
/// - Reading stdin fails
pub async fn run_interactive(mut controller: SearchController) -> anyhow::Result<()> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                match parse_line(&line) {
                    Ok(ReplCommand::Quit) => break,
                    Ok(command) => dispatch(&mut controller, command),
                    Err(notice) => println!("{notice}"),
                }
            }
            Some(commit) = controller.next_completion() => {
                if let Commit::Applied { .. } = commit {
                    print!("{}", render_session(controller.session()));
                }
            }
        }
    }

    Ok(())
}

fn dispatch(controller: &mut SearchController, command: ReplCommand) {
    let session = controller.session();
    let filters = session.filters();
    let page = session.page();

    let started = match command {
        ReplCommand::Search(text) => controller.submit_query(&text),
        ReplCommand::Page(n) => controller.change_page(n),
        ReplCommand::Next => controller.change_page(page.saturating_add(1)),
        ReplCommand::Prev => controller.change_page(page.saturating_sub(1)),
        ReplCommand::Kind(kind) => controller.change_filters(filters.with_kind(kind)),
        ReplCommand::Year(year) => controller.change_filters(filters.with_year(year)),
        ReplCommand::Show => {
            print!("{}", render_session(controller.session()));
            return;
        }
        ReplCommand::Help => {
            println!("{HELP}");
            return;
        }
        ReplCommand::Quit => return,
    };

    match started {
        Ok(_) => println!("Loading..."),
        Err(notice) => println!("{notice}"),
    }
}

/// Text rendering of the session read model.
pub fn render_session(session: &SearchSession) -> String {
    let mut out = String::new();

    match session.status() {
        SessionStatus::Idle => {
            let _ = writeln!(out, "No search yet.");
        }
        SessionStatus::Loading => {
            let _ = writeln!(out, "Loading...");
        }
        SessionStatus::Empty | SessionStatus::Error => {
            let _ = writeln!(out, "OOPS NOT FOUND!!");
            if let Some(message) = session.error_message() {
                let _ = writeln!(out, "{message}");
            }
        }
        SessionStatus::Ready => {
            let _ = writeln!(
                out,
                "Results for \"{}\" ({}) - page {} of {}",
                session.query(),
                session.filters(),
                session.page(),
                session.total_pages()
            );
            let first = first_item_number(session.page());
            for (offset, movie) in (first..).zip(session.results()) {
                let kind = movie.kind.map_or("-", MediaKind::as_param);
                let _ = writeln!(
                    out,
                    "{offset:>4}. {} ({}) [{kind}]\n      {}\n      poster: {}",
                    movie.title,
                    movie.year,
                    movie.detail_url(),
                    movie.poster
                );
            }
        }
    }

    out
}
