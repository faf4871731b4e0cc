// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use doc_archive::utils::logging::{format_error, format_info, format_success, format_warning};
use doc_archive::utils::{Validator, format_kilobytes};
use doc_archive::view::render_chips;
use doc_archive::{
    ActivitySpinner, ArchiveError, ArchiveQuery, CancelToken, Config, DebounceOutcome,
    DocumentApi, DocumentArchive, DocumentCard, DocumentForm, FormField, FormPhase,
    HttpDocumentClient, Route, SelectedFile,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "doc_archive")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Browse, upload and edit documents in a remote document archive", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the archive list once for a filter/search
    List {
        #[arg(long)]
        filter: Option<String>,

        #[arg(long)]
        search: Option<String>,

        /// Archive location such as "/?filter=hr&search=lease"; overrides --filter/--search
        #[arg(long, value_name = "PATH")]
        route: Option<String>,
    },

    /// List the tags available as filters
    Tags,

    /// Show one document with its extracted content
    Show { id: String },

    /// Create a document, optionally uploading a file for OCR first
    Create {
        #[command(flatten)]
        fields: FieldArgs,

        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        #[arg(long)]
        blocked: bool,
    },

    /// Update an existing document
    Edit {
        id: String,

        #[command(flatten)]
        fields: FieldArgs,

        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        #[arg(long)]
        toggle_blocked: bool,
    },

    /// Delete a document
    Delete { id: String },

    /// Interactive archive: each stdin line updates the search text
    Browse {
        #[arg(long, value_name = "PATH")]
        route: Option<String>,
    },
}

#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    title: Option<String>,

    /// Comma separated
    #[arg(long)]
    tags: Option<String>,

    /// Comma separated
    #[arg(long)]
    performers: Option<String>,

    #[arg(long)]
    created_by: Option<String>,

    #[arg(long)]
    file_name: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    expiry_date: Option<String>,
}

impl FieldArgs {
    fn apply<A: DocumentApi + ?Sized>(self, form: &mut DocumentForm<A>) -> doc_archive::Result<()> {
        let values = [
            (FormField::Title, self.title),
            (FormField::Tags, self.tags),
            (FormField::Performers, self.performers),
            (FormField::CreatedBy, self.created_by),
            (FormField::FileName, self.file_name),
            (FormField::ExpiryDate, self.expiry_date),
        ];

        for (field, value) in values {
            if let Some(value) = value {
                form.set_field(field, value)?;
            }
        }
        Ok(())
    }
}

type Api = HttpDocumentClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    doc_archive::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    debug!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::default_config()
    };

    let api = Arc::new(HttpDocumentClient::new(&config.api).context("Failed to build API client")?);
    info!("Using document API at {}", api.base_url());

    match cli.command {
        Commands::List {
            filter,
            search,
            route,
        } => {
            let location = match route {
                Some(route) => archive_location(&route)?,
                None => ArchiveQuery::new(filter.as_deref(), search.as_deref()),
            };
            cmd_list(&config, api, location).await?;
        }
        Commands::Tags => {
            cmd_tags(api).await?;
        }
        Commands::Show { id } => {
            cmd_show(api, &id).await?;
        }
        Commands::Create {
            fields,
            file,
            blocked,
        } => {
            let mut form = DocumentForm::create(api);
            if blocked {
                form.toggle_blocked()?;
            }
            if let Some(path) = file {
                attach_file(&mut form, &path, cli.color).await?;
            }
            fields.apply(&mut form)?;
            save(&mut form, cli.color).await?;
        }
        Commands::Edit {
            id,
            fields,
            file,
            toggle_blocked,
        } => {
            let mut form = open_for_edit(api, &id).await?;
            if let Some(path) = file {
                attach_file(&mut form, &path, cli.color).await?;
            }
            fields.apply(&mut form)?;
            if toggle_blocked {
                form.toggle_blocked()?;
            }
            save(&mut form, cli.color).await?;
        }
        Commands::Delete { id } => {
            cmd_delete(api, &id, cli.color).await?;
        }
        Commands::Browse { route } => {
            let location = match route {
                Some(route) => archive_location(&route)?,
                None => ArchiveQuery::default(),
            };
            cmd_browse(&config, api, location).await?;
        }
    }

    Ok(())
}

fn archive_location(route: &str) -> Result<ArchiveQuery> {
    match Route::parse(route) {
        Some(Route::Archive(query)) => Ok(query),
        Some(other) => bail!("{} is not an archive location", other),
        None => bail!("Unrecognized location: {}", route),
    }
}

fn print_archive(archive: &DocumentArchive<Api>) {
    let chips = archive.chips();
    if !chips.is_empty() {
        println!("{}\n", render_chips(&chips));
    }
    print!("{}", archive.view().render());
    println!("{}", format_info(&format!("Location: {}", archive.location())));
}

async fn cmd_list(config: &Config, api: Arc<Api>, location: ArchiveQuery) -> Result<()> {
    let archive = DocumentArchive::open(api, location, &config.archive);
    archive.load_tags().await;

    if let DebounceOutcome::Completed(Err(e)) = archive.refresh().outcome().await {
        return Err(e).context("Listing documents failed");
    }

    print_archive(&archive);
    Ok(())
}

async fn cmd_tags(api: Arc<Api>) -> Result<()> {
    let tags = api.list_tags(&CancelToken::new()).await;

    if tags.is_empty() {
        println!("{}", format_warning("No tags found"));
        return Ok(());
    }

    for tag in tags {
        println!("  {}", tag.name);
    }
    Ok(())
}

async fn cmd_show(api: Arc<Api>, id: &str) -> Result<()> {
    Validator::validate_document_id(id)?;

    let Some(document) = api.get_by_id(id, &CancelToken::new()).await else {
        println!("{}", format_error("Document not found"));
        bail!("Document not found: {}", id);
    };

    print!("{}", DocumentCard::from(&document).render());
    println!("  Created by: {}", document.created_by);
    println!("\nExtracted Content:\n{}", document.content);
    Ok(())
}

async fn open_for_edit(api: Arc<Api>, id: &str) -> Result<DocumentForm<Api>> {
    match DocumentForm::open_edit(api, id).await {
        Ok(form) => Ok(form),
        Err(ArchiveError::NotFound(_)) => {
            println!("{}", format_error("Document not found"));
            Err(anyhow!("Document not found: {}", id))
        }
        Err(e) => Err(e).context("Failed to open document"),
    }
}

async fn attach_file(form: &mut DocumentForm<Api>, path: &Path, color: bool) -> Result<()> {
    let file = SelectedFile::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    println!(
        "{}",
        format_info(&format!("File: {} ({})", file.name, format_kilobytes(file.size)))
    );

    let spinner = ActivitySpinner::with_color("OCR in progress...", color);
    form.select_file(file).await?;
    spinner.finish();

    if let Some(preview) = form.preview() {
        debug!("Image preview ready ({} bytes)", preview.len());
    }

    match form.phase() {
        FormPhase::OcrDone => {
            let chars = form.ocr_text().map(|t| t.chars().count()).unwrap_or(0);
            println!(
                "{}",
                format_success(&format!("Extracted {} characters of content", chars))
            );
        }
        FormPhase::OcrFailed => {
            println!(
                "{}",
                format_warning("OCR failed; the document can still be saved without content")
            );
        }
        _ => {}
    }
    Ok(())
}

async fn save(form: &mut DocumentForm<Api>, color: bool) -> Result<()> {
    let spinner = ActivitySpinner::with_color("Saving...", color);
    let result = form.submit().await;
    spinner.finish();

    match result {
        Ok(route) => {
            let id = form
                .document_id()
                .map(|id| id.to_string())
                .unwrap_or_default();
            println!("{}", format_success(&format!("Document {} saved", id)));
            println!("{}", format_info(&format!("Location: {}", route)));
            Ok(())
        }
        Err(e) => {
            let message = form
                .last_error()
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string());
            println!("{}", format_error(&message));
            Err(e.into())
        }
    }
}

async fn cmd_delete(api: Arc<Api>, id: &str, color: bool) -> Result<()> {
    let mut form = open_for_edit(api, id).await?;

    let spinner = ActivitySpinner::with_color("Deleting...", color);
    let result = form.delete().await;
    spinner.finish();

    match result {
        Ok(route) => {
            println!("{}", format_success(&format!("Document {} deleted", id)));
            println!("{}", format_info(&format!("Location: {}", route)));
            Ok(())
        }
        Err(e) => {
            let message = form
                .last_error()
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string());
            println!("{}", format_error(&message));
            Err(e.into())
        }
    }
}

async fn cmd_browse(config: &Config, api: Arc<Api>, location: ArchiveQuery) -> Result<()> {
    let archive = Arc::new(DocumentArchive::open(api, location, &config.archive));
    archive.load_tags().await;

    println!(
        "{}",
        format_info("Type to search, `:tag NAME` toggles a filter, `:route PATH` jumps, `:quit` exits")
    );

    let mut watcher = watch_refresh(Arc::clone(&archive), archive.refresh());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let ticket = if let Some(name) = line.strip_prefix(":tag ") {
            archive.toggle_filter(name.trim())
        } else if let Some(route) = line.strip_prefix(":route ") {
            match archive_location(route.trim()) {
                Ok(query) => archive.navigate(query),
                Err(e) => {
                    println!("{}", format_error(&e.to_string()));
                    continue;
                }
            }
        } else if line.trim() == ":quit" {
            break;
        } else {
            archive.set_search(&line)
        };

        watcher = watch_refresh(Arc::clone(&archive), ticket);
    }

    watcher.await.context("Refresh watcher panicked")?;
    Ok(())
}

fn watch_refresh(
    archive: Arc<DocumentArchive<Api>>,
    ticket: doc_archive::DebounceTicket,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match ticket.outcome().await {
            DebounceOutcome::Completed(Ok(())) => print_archive(&archive),
            DebounceOutcome::Completed(Err(e)) if !e.is_cancelled() => {
                println!("{}", format_error(&e.to_string()));
            }
            _ => {}
        }
    })
}
