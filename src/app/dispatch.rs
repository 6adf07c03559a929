use crate::app::terminal::TerminalView;
use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result, bail};
use hannah::config::Config;
use hannah::context::ContextExtractor;
use hannah::page::{Page, page_source_for};
use hannah::panel::NullView;
use hannah::render::Renderer;
use hannah::transport::HttpTransport;
use hannah::widget::{SubmitOutcome, Widget};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

fn transport_for(config: &Config, endpoint: Option<String>) -> Result<Arc<HttpTransport>> {
    let mut transport_config = config.transport.clone();
    if let Some(endpoint) = endpoint {
        let trimmed = endpoint.trim();
        if trimmed.is_empty() {
            bail!("--endpoint cannot be empty");
        }
        transport_config.endpoint = trimmed.to_string();
    }
    let transport = HttpTransport::from_config(&transport_config, &config.persona)?;
    Ok(Arc::new(transport))
}

async fn print_context(config: &Config, location: &str) -> Result<()> {
    let source = page_source_for(location)?;
    let html = source
        .load()
        .await
        .with_context(|| format!("Failed to load page {location}"))?;

    let mut page = Page::parse(&html);
    if let Some(location) = source.location() {
        page = page.with_location(location);
    }
    let extractor = ContextExtractor::new(config.context.clone(), config.persona.clone());
    println!("{}", extractor.context_string(&page));
    Ok(())
}

async fn ask_once(
    config: &Config,
    location: &str,
    endpoint: Option<String>,
    message: &str,
) -> Result<()> {
    let transport = transport_for(config, endpoint)?;
    let page = page_source_for(location)?;
    let mut widget = Widget::mount(config, transport, page, NullView).await?;

    match widget.submit(message).await {
        SubmitOutcome::Ignored => bail!("message is empty"),
        SubmitOutcome::Answered { entry, .. } => {
            if let Some(bubble) = widget.panel().entry(entry) {
                println!("{}", bubble.text);
            }
            Ok(())
        }
        SubmitOutcome::Failed { error, .. } => Err(error.into()),
    }
}

async fn run_chat(config: &Config, location: &str, endpoint: Option<String>) -> Result<()> {
    let transport = transport_for(config, endpoint)?;
    info!(endpoint = %hannah::transport::redact_url(transport.endpoint()), "starting chat");

    let page = page_source_for(location)?;
    let view = TerminalView::new(config.persona.name.clone());
    let mut widget = Widget::mount(config, transport, page, view).await?;
    widget.open();

    println!("Ask about {location}. Commands: /open /close /toggle /history /quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "/quit" | "/exit" => break,
            "/open" => widget.open(),
            "/close" => widget.close(),
            "/toggle" => widget.toggle(),
            "/history" => {
                if widget.log().is_empty() {
                    println!("(no messages yet)");
                }
                for message in widget.log().iter() {
                    println!("[{}] {}", message.role(), message.content());
                }
            }
            text => {
                widget.submit(text).await;
            }
        }
    }
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Context { page } => print_context(&config, &page).await,

        Commands::Render { text } => {
            let renderer = Renderer::from_config(&config.linkify)?;
            println!("{}", renderer.render(&text));
            Ok(())
        }

        Commands::Ask {
            page,
            endpoint,
            message,
        } => ask_once(&config, &page, endpoint, &message).await,

        Commands::Chat { page, endpoint } => run_chat(&config, &page, endpoint).await,
    }
}
