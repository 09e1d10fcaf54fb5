pub mod client;
pub mod config;
pub mod export;
pub mod recognition;
pub mod session;
pub mod sync;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use label_core::{LabelForm, RecordId};

pub use client::{ClientError, RecordSource, StoreClient};
pub use config::DeskConfig;
pub use export::{ExportError, export_sheet, open_with_default_app, write_preview};
pub use recognition::{RecognitionBatch, RecognitionError, parse_recognition_output};
pub use session::Session;
pub use sync::{
    MIN_REFRESH_INTERVAL, RefreshHandle, lock_session, refresh_once, spawn_refresh_loop,
};

#[derive(Debug, Parser)]
#[command(name = "label-desk")]
#[command(about = "Manage furniture part labels and print A4 label sheets")]
pub struct Cli {
    /// Base URL of the label store; overrides LABELS_SERVER_URL.
    #[arg(long, global = true, value_name = "URL")]
    server: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List stored labels in store order.
    List,
    /// Add a label.
    Add {
        #[arg(long, default_value = "")]
        room: String,
        #[arg(long, default_value = "")]
        part: String,
        #[arg(long, default_value = "")]
        dim1: String,
        #[arg(long, default_value = "")]
        dim2: String,
        #[arg(long, default_value = "1")]
        quantity: String,
    },
    /// Edit a label. Fields not given keep their stored value.
    Edit {
        id: RecordId,
        #[arg(long)]
        room: Option<String>,
        #[arg(long)]
        part: Option<String>,
        #[arg(long)]
        dim1: Option<String>,
        #[arg(long)]
        dim2: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
    },
    /// Delete a label.
    Delete { id: RecordId },
    /// Delete every label.
    Clear,
    /// Import labels from a saved recognition answer.
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Show one preview page, optionally saving it as PNG or SVG.
    Preview {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write the label sheet PDF and open it.
    Export {
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        no_open: bool,
    },
    /// Keep the list and preview in sync with the store until Ctrl-C.
    Watch {
        #[arg(long)]
        select: Option<RecordId>,
    },
}

pub async fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let mut config = DeskConfig::from_env();
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    let client = StoreClient::new(&config.server_url, config.http_timeout)
        .context("failed to build HTTP client")?;

    match cli.command {
        Commands::List => run_list(&client).await,
        Commands::Add {
            room,
            part,
            dim1,
            dim2,
            quantity,
        } => {
            let form = LabelForm {
                room,
                part,
                dim1,
                dim2,
                quantity,
            };
            let fields = form.validate()?;
            let id = client.create(&fields).await?;
            println!("added [{id}]");
            Ok(())
        }
        Commands::Edit {
            id,
            room,
            part,
            dim1,
            dim2,
            quantity,
        } => {
            let mut session = load_session(&client).await?;
            if !session.select_id(id) {
                bail!(ClientError::NotFound(id));
            }
            let Some(mut form) = session.begin_edit() else {
                bail!(ClientError::NotFound(id));
            };
            for (slot, value) in [
                (&mut form.room, room),
                (&mut form.part, part),
                (&mut form.dim1, dim1),
                (&mut form.dim2, dim2),
                (&mut form.quantity, quantity),
            ] {
                if let Some(v) = value {
                    *slot = v;
                }
            }
            let fields = form.validate()?;
            client.update(id, &fields).await?;
            session.finish_edit();
            println!("updated [{id}]");
            Ok(())
        }
        Commands::Delete { id } => {
            client.delete(id).await?;
            println!("deleted [{id}]");
            Ok(())
        }
        Commands::Clear => {
            client.clear().await?;
            println!("all labels deleted");
            Ok(())
        }
        Commands::Import { file } => run_import(&client, &file).await,
        Commands::Preview { page, output } => {
            run_preview(&client, &config, page, output.as_deref()).await
        }
        Commands::Export { dir, no_open } => {
            let dir = dir.unwrap_or_else(|| config.output_dir.clone());
            run_export(&client, &config, &dir, !no_open).await
        }
        Commands::Watch { select } => run_watch(client, &config, select).await,
    }
}

async fn load_session(client: &StoreClient) -> Result<Session> {
    let records = client.list().await.context("failed to fetch labels")?;
    let mut session = Session::new();
    session.apply_refresh(records);
    Ok(session)
}

fn print_overview(session: &Session) {
    for line in session.summary_lines() {
        println!("{line}");
    }
    println!(
        "{} labels, {} page(s)",
        session.records().len(),
        session.total_pages()
    );
}

async fn run_list(client: &StoreClient) -> Result<()> {
    let session = load_session(client).await?;
    print_overview(&session);
    Ok(())
}

async fn run_import(client: &StoreClient, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let batch = parse_recognition_output(&text)?;
    if batch.accepted.is_empty() {
        println!("no labels detected ({} skipped)", batch.skipped);
        return Ok(());
    }
    let created = client.import(&batch.accepted).await?;
    for rec in &created {
        println!("{}", rec.summary_line());
    }
    println!("imported {} labels ({} skipped)", created.len(), batch.skipped);
    Ok(())
}

async fn run_preview(
    client: &StoreClient,
    config: &DeskConfig,
    page: usize,
    output: Option<&Path>,
) -> Result<()> {
    let mut session = load_session(client).await?;
    for _ in 1..page {
        if !session.next_page() {
            break;
        }
    }
    let frame = session.preview(&config.font_sizes);
    println!("{} ({} labels)", frame.caption(), frame.labels_on_page);
    if let Some(path) = output {
        write_preview(&frame, path)
            .with_context(|| format!("failed to write preview to {}", path.display()))?;
        println!("preview saved to {}", path.display());
    }
    Ok(())
}

async fn run_export(
    client: &StoreClient,
    config: &DeskConfig,
    dir: &Path,
    open: bool,
) -> Result<()> {
    let session = load_session(client).await?;
    let path = export_sheet(session.records(), &config.font_sizes, dir, &config.naming)?;
    println!("sheet saved to {}", path.display());
    if open && let Err(e) = open_with_default_app(&path) {
        eprintln!("warning: {e}");
    }
    Ok(())
}

async fn run_watch(client: StoreClient, config: &DeskConfig, select: Option<RecordId>) -> Result<()> {
    let session = Arc::new(Mutex::new(Session::new()));
    let sizes = config.font_sizes;
    let handle = spawn_refresh_loop(
        Arc::new(client),
        Arc::clone(&session),
        config.refresh_interval,
        move |s: &Session| {
            let frame = s.preview(&sizes);
            println!(
                "-- refresh {}: {} labels, {}",
                s.refresh_count(),
                s.records().len(),
                frame.caption()
            );
            if let Some(rec) = s.selected_record() {
                println!("selected: {}", rec.summary_line());
            }
        },
    );

    // The selection can only be applied once the first snapshot arrived.
    if let Some(id) = select {
        loop {
            tokio::time::sleep(MIN_REFRESH_INTERVAL).await;
            let mut s = lock_session(&session);
            if s.refresh_count() > 0 {
                if !s.select_id(id) {
                    eprintln!("warning: label {id} not found");
                }
                break;
            }
        }
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    handle.shutdown().await;
    Ok(())
}
