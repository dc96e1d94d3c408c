//! Retouch - visual page editing engine.
//!
//! Headless CLI over the engine: apply instructions to elements of an
//! HTML file, replay persisted edits, manage the mediator credential.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use retouch_bridge::{Bridge, HttpRelay, HttpRelayConfig};
use retouch_config::{Config, ConfigLoader, LogConfig};
use retouch_dom::Document;
use retouch_engine::{EditOutcome, EditorSession};
use retouch_store::{EditStore, FileEditStore};

mod cli;

use cli::{Cli, Commands, CredentialAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        ConfigLoader::load(&cli.config)
            .with_context(|| format!("loading config {}", cli.config.display()))?
    } else {
        Config::default()
    };

    let _log_guard = init_tracing(&config.log);

    let store = open_store(cli.storage_dir.clone(), &config).await?;

    match cli.command {
        Commands::Edit {
            file,
            selector,
            instruction,
            url,
            out,
        } => cmd_edit(&config, store, &file, &selector, &instruction, url, out).await,
        Commands::Replay { file, url, out } => cmd_replay(store, &file, url, out).await,
        Commands::Credential { action } => cmd_credential(store, action).await,
    }
}

fn init_tracing(log: &LogConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    match &log.directory {
        Some(directory) => {
            let appender = RollingFileAppender::new(Rotation::DAILY, directory, "retouch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
            None
        }
    }
}

async fn open_store(
    storage_dir: Option<PathBuf>,
    config: &Config,
) -> anyhow::Result<Arc<FileEditStore>> {
    let root = storage_dir
        .or_else(|| {
            config
                .storage
                .root
                .as_ref()
                .map(|r| PathBuf::from(ConfigLoader::expand_path(r)))
        })
        .unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("retouch")
        });
    let store = FileEditStore::new(&root)
        .await
        .with_context(|| format!("opening storage at {}", root.display()))?;
    Ok(Arc::new(store))
}

/// Load an HTML file into a fresh document.
fn load_document(file: &Path, url: Option<String>) -> anyhow::Result<Document> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let page_url = url.unwrap_or_else(|| {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        format!("http://localhost/{name}")
    });
    let mut doc = Document::new(page_url);
    let nodes = doc
        .parse_fragment(&html)
        .map_err(|e| anyhow::anyhow!("could not parse {}: {e}", file.display()))?;
    let root = doc.root();
    for node in nodes {
        doc.append_child(root, node);
    }
    Ok(doc)
}

fn write_output(doc: &Document, out: Option<PathBuf>) -> anyhow::Result<()> {
    let markup = doc.inner_markup(doc.root());
    match out {
        Some(path) => {
            std::fs::write(&path, markup)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => println!("{markup}"),
    }
    Ok(())
}

async fn cmd_edit(
    config: &Config,
    store: Arc<FileEditStore>,
    file: &Path,
    selector: &str,
    instruction: &str,
    url: Option<String>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let doc = load_document(file, url)?;

    let api_key = match config.mediator.api_key.clone() {
        Some(key) => Some(key),
        None => store.credential().await?,
    };
    let relay = HttpRelay::new(HttpRelayConfig {
        api_key,
        model: config.mediator.model.clone(),
        mediator_base_url: config.mediator.base_url.clone(),
        editor_endpoint: config.editor.endpoint.clone(),
    });

    let store: Arc<dyn EditStore> = store;
    let mut session = EditorSession::new(doc, store, Bridge::new(Arc::new(relay)));
    session.bootstrap().await?;

    let Some(node) = session.document().resolve_selector(selector) else {
        anyhow::bail!("selector matched nothing: {selector}");
    };
    session.select_node(node);

    match session.submit_instruction(instruction).await {
        Ok(EditOutcome::DirectEdit { rules }) => {
            info!(?rules, "applied direct edit");
        }
        Ok(EditOutcome::AiEdit { selector }) => {
            info!(selector = %selector, "applied mediator edit");
        }
        Err(err) => {
            if let Some(notice) = session.notices().last() {
                eprintln!("{}", notice.message);
            }
            return Err(err.into());
        }
    }

    write_output(session.document(), out)
}

async fn cmd_replay(
    store: Arc<FileEditStore>,
    file: &Path,
    url: Option<String>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let doc = load_document(file, url)?;
    let store: Arc<dyn EditStore> = store;
    let relay = HttpRelay::new(HttpRelayConfig::default());
    let mut session = EditorSession::new(doc, store, Bridge::new(Arc::new(relay)));

    let applied = session.bootstrap().await?;
    info!(applied, "replay complete");
    write_output(session.document(), out)
}

async fn cmd_credential(
    store: Arc<FileEditStore>,
    action: CredentialAction,
) -> anyhow::Result<()> {
    match action {
        CredentialAction::Set { key } => {
            store.set_credential(&key).await?;
            println!("credential stored");
        }
        CredentialAction::Show => match store.credential().await? {
            Some(_) => println!("credential configured: yes"),
            None => println!("credential configured: no"),
        },
    }
    Ok(())
}
