use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nasa_client::{IssClient, NasaClient};
use stargaze_catalog::{
    spawn_periodic, AgencyProducer, Calendar, CalendarView, EventProducer, EventStore,
    FileProducer, Paginator, PlanetaryProducer, SystemClock,
};
use stargaze_common::{format_date, month_from_number, Config, EventType, FilterSpec};

#[derive(Parser)]
#[command(name = "stargaze", about = "Upcoming astronomy events from NASA and partner agencies")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh once and print one page of upcoming events.
    List {
        #[arg(long = "type")]
        kind: Option<EventType>,
        /// 1 to 12.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Refresh once and print the detail view of one event.
    Show { id: String },
    /// Refresh periodically and print the first page after every cycle.
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("stargaze=info".parse()?)
                .add_directive("nasa_client=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::from_env();
    config.log_redacted();

    let calendar = Arc::new(build_calendar(&config)?);

    match cli.command {
        Command::List {
            kind,
            month,
            year,
            page,
        } => {
            let filter = FilterSpec {
                kind,
                month: month.and_then(month_from_number),
                year,
            };
            calendar.apply_filter(filter).await;
            let Some(index) = page.checked_sub(1) else {
                bail!("pages are numbered from 1");
            };
            print_view(&calendar.go_to_page(index)?);
        }
        Command::Show { id } => {
            calendar.load().await;
            let detail = calendar
                .select(&id)
                .with_context(|| format!("no event with id {id}"))?;
            print!("{detail}");
        }
        Command::Watch => {
            let handle = spawn_periodic(calendar.clone(), config.refresh_interval);
            let mut views = calendar.subscribe();
            loop {
                tokio::select! {
                    changed = views.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        print_view(&views.borrow_and_update());
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Shutting down");
                        break;
                    }
                }
            }
            handle.abort();
        }
    }

    Ok(())
}

fn build_calendar(config: &Config) -> Result<Calendar> {
    let clock = Arc::new(SystemClock);

    let nasa = NasaClient::new(&config.nasa_base_url, &config.nasa_api_key, config.http_timeout)?;
    let iss = IssClient::new(&config.iss_base_url, config.http_timeout)?;
    let planetary = Arc::new(PlanetaryProducer::new(nasa, iss, clock.clone()));

    let agency: Arc<dyn EventProducer> = match &config.agency_feed_path {
        Some(path) => {
            info!(path = %path.display(), "Using agency feed file");
            Arc::new(FileProducer::new(path))
        }
        None => Arc::new(AgencyProducer::new(clock.clone())),
    };

    let store = Arc::new(EventStore::new(
        stargaze_catalog::seed_events(),
        planetary,
        agency,
    ));
    let paginator = Paginator::new(config.page_size).context("PAGE_SIZE must be at least 1")?;
    Ok(Calendar::new(store, clock, paginator))
}

fn print_view(view: &CalendarView) {
    for notice in &view.notices {
        println!("* {notice}");
    }
    for event in &view.events {
        println!(
            "{:<28} {:<10} {}  ({})",
            format_date(&event.date),
            event.kind.as_str(),
            event.title,
            event.id
        );
    }
    if view.total_pages > 0 {
        println!(
            "-- page {} of {}, {} events --",
            view.page_index + 1,
            view.total_pages,
            view.total_matches
        );
    }
}
