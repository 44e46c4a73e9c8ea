use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{cancel_pair, ApiClient};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::runtime;
use crate::controller::{
    events::{ChatInput, FormId, KeyPress, UiAction, UiEvent},
    Controller,
};
use crate::ui::{ids, Page};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const UI_EVENT_CAPACITY: usize = 256;

#[derive(Parser, Debug)]
#[command(name = "console", about = "Drive the storefront assistant page against a live backend")]
struct Cli {
    /// Config file; defaults to ./console.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match experts/KOLs for a category.
    Expert {
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Generate a marketing plan, optionally refining it with feedback.
    Marketing {
        #[arg(long)]
        product: String,
        #[arg(long)]
        target: String,
        #[arg(long)]
        goal: String,
        #[arg(long)]
        feedback: Option<String>,
    },
    /// Analyze inventory for a product in a city.
    Inventory {
        #[arg(long)]
        product: String,
        #[arg(long, default_value = "全国")]
        city: String,
        #[arg(long)]
        stock: String,
    },
    /// Interactive chat; each stdin line is sent as one message.
    Chat,
}

struct Session {
    page: Page,
    controller: Controller,
    ui_rx: Receiver<UiEvent>,
    wait_limit: Duration,
}

impl Session {
    fn act(&mut self, action: UiAction) {
        self.controller
            .handle_action(&mut self.page, action, Instant::now());
    }

    fn submit(&mut self, form: FormId) -> Result<()> {
        self.act(UiAction::Submit(form));
        self.wait_idle()
    }

    /// Applies backend completions until no request is outstanding.
    fn wait_idle(&mut self) -> Result<()> {
        let deadline = Instant::now() + self.wait_limit;
        while !self.controller.is_idle() {
            if Instant::now() >= deadline {
                bail!("no completion from the backend worker");
            }
            match self.ui_rx.recv_timeout(POLL_INTERVAL) {
                Ok(event) => self
                    .controller
                    .apply_event(&mut self.page, event, Instant::now()),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => bail!("backend worker stopped"),
            }
            self.page.tick(Instant::now());
        }
        Ok(())
    }

    /// Prints each region's HTML when the result container is shown, then any banner.
    fn print_regions(&self, container: &str, regions: &[&str]) {
        if self.page.is_visible(container) {
            for id in regions {
                println!("#{id}\n{}\n", self.page.render_region(id));
            }
        }
        self.print_banner();
    }

    fn print_banner(&self) {
        if let Some(html) = self.page.banner_html() {
            eprintln!("{html}");
        }
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(session: &mut Session, command: Command) -> Result<()> {
    match command {
        Command::Expert { category, name } => {
            session.page.set_value(ids::CATEGORY, category);
            session.page.set_value(ids::NAME, name);
            session.submit(FormId::ExpertSearch)?;
            session.print_regions(
                ids::RESULT,
                &[ids::SUMMARY, ids::FACTS, ids::INTEREST, ids::LETTER],
            );
        }
        Command::Marketing {
            product,
            target,
            goal,
            feedback,
        } => {
            session.page.set_value(ids::PRODUCT, product);
            session.page.set_value(ids::TARGET, target);
            session.page.set_value(ids::GOAL, goal);
            session.submit(FormId::Marketing)?;
            session.print_regions(ids::MARKETING_RESULT, &[ids::PLAN_CONTENT]);
            if let Some(feedback) = feedback {
                session.page.set_value(ids::FEEDBACK, feedback);
                session.submit(FormId::MarketingRefine)?;
                session.print_regions(ids::MARKETING_RESULT, &[ids::PLAN_CONTENT]);
            }
        }
        Command::Inventory {
            product,
            city,
            stock,
        } => {
            session.page.set_value(ids::INV_PRODUCT, product);
            session.page.set_value(ids::INV_CITY, city);
            session.page.set_value(ids::CURRENT_STOCK, stock);
            session.submit(FormId::Inventory)?;
            session.print_regions(
                ids::INVENTORY_RESULT,
                &[
                    ids::WEATHER_IMPACT,
                    ids::SOCIAL_TRENDS,
                    ids::SEASONAL_EVENTS,
                    ids::INVENTORY_STRATEGY,
                    ids::LOGISTICS_PLAN,
                ],
            );
        }
        Command::Chat => chat_loop(session)?,
    }
    Ok(())
}

fn chat_loop(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let shown = message_count(&session.page);
        session.page.set_value(ids::CHATBOT_INPUT, line.trim_end());
        session.act(UiAction::KeyPress {
            target: ChatInput::Chatbot,
            key: KeyPress::enter(),
        });
        session.wait_idle()?;

        if let Some(messages) = session.page.get(ids::CHATBOT_MESSAGES) {
            let stamp = chrono::Local::now().format("%H:%M:%S");
            for node in messages.content.iter().skip(shown) {
                println!("[{stamp}] {}", node.render());
            }
        }
        session.print_banner();
    }
}

fn message_count(page: &Page) -> usize {
    page.get(ids::CHATBOT_MESSAGES)
        .map(|el| el.content.len())
        .unwrap_or_default()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        settings.request_timeout_secs = timeout_secs;
    }
    settings.clamp_limits();
    init_tracing(&settings.log_filter);
    tracing::info!(base_url = %settings.base_url, "console starting");

    let api = ApiClient::new(&settings.base_url)
        .with_context(|| format!("invalid base url '{}'", settings.base_url))?
        .with_timeout(settings.request_timeout());

    let (cmd_tx, cmd_rx) = bounded(settings.command_queue_capacity);
    let (ui_tx, ui_rx) = bounded(UI_EVENT_CAPACITY);
    let (cancel_handle, cancel) = cancel_pair();
    let worker = runtime::launch(Arc::new(api), cmd_rx, ui_tx, cancel);

    let page = Page::standard(settings.banner_ttl());
    let controller = Controller::bind(&page, cmd_tx);
    let mut session = Session {
        page,
        controller,
        ui_rx,
        wait_limit: settings.request_timeout() + Duration::from_secs(5),
    };

    let outcome = run(&mut session, cli.command);

    cancel_handle.cancel();
    drop(session);
    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    outcome
}
