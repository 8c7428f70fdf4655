use std::error::Error;
use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use sortit::core::capture::{DirectoryCapture, import_capture};
use sortit::core::config::{ResolvedConfig, load_config, resolve};
use sortit::core::export::{export_photos, write_exports};
use sortit::core::gallery::{
    GalleryQuery, delete_photos, move_photos, query_photos, remove_from_album, upload_date,
};
use sortit::core::import::{ImportPayload, ImportPolicy, ImportReport, import_batch};
use sortit::core::model::{AlbumKind, Direction, PhotoSource, SwipeMapping};
use sortit::core::repository::{LocalRepository, PhotoRepository};
use sortit::core::session::SortingSession;
use sortit::core::state::App;
use sortit::core::store::FileStore;

#[derive(Parser)]
#[command(name = "sortit", version, about = "Sort photos into albums with swipe gestures")]
struct Args {
    /// Where photos, albums and settings are stored
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log everything (trace level) to sortit.log
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Sort photos in the terminal UI (default)
    Sort,
    /// Import image files
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Import the newest image from a directory as a camera shot
    Capture { dir: PathBuf },
    /// List albums
    Albums,
    /// Create, delete or edit custom albums
    Album {
        #[command(subcommand)]
        command: AlbumCommand,
    },
    /// List photos, newest first
    List {
        /// Album id to list
        #[arg(long)]
        album: Option<String>,
        /// Name fragment or upload date (YYYY-MM-DD)
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Delete photos everywhere
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Add photos to a custom album
    Move {
        album: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Write photos out as image files
    Export {
        out_dir: PathBuf,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show or change which album each swipe direction sends photos to
    Mapping {
        #[command(subcommand)]
        command: MappingCommand,
    },
    /// Rebuild All Photos, Recent and Camera from the photo list
    Recompute,
    /// Remove all photos, albums and settings
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AlbumCommand {
    Create {
        name: String,
        #[arg(long, default_value = "")]
        icon: String,
    },
    Delete { id: String },
    /// Take photos out of an album, keeping them in the collection
    Remove {
        album: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
enum MappingCommand {
    Show,
    Set { direction: Direction, album: String },
    Reset,
}

type Repo = LocalRepository<FileStore>;

fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("sortit: {e}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(args: Args) -> Result<(), Box<dyn Error>> {
    let config = resolve(&load_config()?, args.data_dir.as_deref());
    init_logger(&config, args.verbose);
    info!("SortIt starting up with data dir {}", config.data_dir.display());

    let store = FileStore::open(&config.data_dir, config.storage_quota_bytes)?;
    let mut repo = LocalRepository::new(store).with_recent_limit(config.recent_limit);
    let policy = ImportPolicy {
        max_bytes: config.max_import_bytes,
    };

    match args.command.unwrap_or(Command::Sort) {
        Command::Sort => {
            let session = SortingSession::new(Box::new(repo));
            sortit::tui::run(App::from_config(session, &config))?;
        }
        Command::Import { files } => {
            let mut payloads = Vec::new();
            for path in &files {
                match ImportPayload::from_path(path) {
                    Ok(payload) => payloads.push(payload),
                    Err(e) => {
                        warn!("Could not read {}: {}", path.display(), e);
                        eprintln!("skipping {}: {e}", path.display());
                    }
                }
            }
            let report = import_batch(&mut repo, payloads, &policy, PhotoSource::Upload)?;
            print_report(&report);
        }
        Command::Capture { dir } => {
            let mut device = DirectoryCapture::new(dir);
            let report = import_capture(&mut repo, &mut device, &policy)?;
            print_report(&report);
        }
        Command::Albums => list_albums(&repo),
        Command::Album { command } => match command {
            AlbumCommand::Create { name, icon } => {
                let album = repo.create_album(&name, &icon)?;
                println!("Created album '{}' ({})", album.display_name, album.id);
            }
            AlbumCommand::Delete { id } => {
                let album = repo.delete_album(&id)?;
                println!("Deleted album '{}'", album.display_name);
                if let Some((direction, _)) = repo.get_swipe_mapping().first_unroutable(&repo.get_albums()) {
                    println!("Note: swiping {direction} still points at a missing album");
                }
            }
            AlbumCommand::Remove { album, ids } => {
                let removed = remove_from_album(&mut repo, &album, &ids)?;
                println!("Removed {removed} photos from '{album}'");
            }
        },
        Command::List {
            album,
            search,
            page,
        } => {
            let query = GalleryQuery {
                album,
                search,
                page: page.saturating_sub(1),
            };
            let result = query_photos(&repo, &query);
            for photo in &result.photos {
                println!(
                    "{:<36}  {}  {:>9}  {}",
                    photo.id,
                    upload_date(photo),
                    photo.byte_size,
                    photo.name
                );
            }
            println!(
                "page {} of {} ({} photos)",
                result.page + 1,
                result.total_pages.max(1),
                result.total_matches
            );
        }
        Command::Delete { ids } => {
            let removed = delete_photos(&mut repo, &ids)?;
            println!("Deleted {removed} photos");
        }
        Command::Move { album, ids } => {
            let moved = move_photos(&mut repo, &album, &ids)?;
            println!("Added {moved} photos to '{album}'");
        }
        Command::Export { out_dir, ids } => {
            let exports = export_photos(&repo, &ids)?;
            for path in write_exports(&out_dir, &exports)? {
                println!("{}", path.display());
            }
        }
        Command::Mapping { command } => match command {
            MappingCommand::Show => print_mapping(&repo.get_swipe_mapping()),
            MappingCommand::Set { direction, album } => {
                let mut mapping = repo.get_swipe_mapping();
                if !mapping.set(direction, &album) {
                    return Err(format!("{direction} always goes to its fixed album").into());
                }
                repo.save_swipe_mapping(&mapping)?;
                print_mapping(&mapping);
            }
            MappingCommand::Reset => {
                let mapping = SwipeMapping::default();
                repo.save_swipe_mapping(&mapping)?;
                print_mapping(&mapping);
            }
        },
        Command::Recompute => {
            repo.recompute_derived_albums()?;
            println!("Rebuilt system albums from {} photos", repo.get_all_photos().len());
        }
        Command::Clear { yes } => {
            if !yes {
                return Err("clear removes every photo and album; pass --yes to confirm".into());
            }
            repo.clear()?;
            println!("Cleared {}", config.data_dir.display());
        }
    }
    Ok(())
}

/// Logs go to `sortit.log` in the data dir, never to the terminal.
fn init_logger(config: &ResolvedConfig, verbose: bool) {
    let level = if verbose {
        LevelFilter::Trace
    } else {
        config.log_level
    };
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if fs::create_dir_all(&config.data_dir).is_err() {
        return;
    }
    if let Ok(log_file) = File::create(config.data_dir.join("sortit.log")) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

fn print_report(report: &ImportReport) {
    for photo in &report.imported {
        println!("+ {} ({})", photo.name, photo.id);
    }
    for (name, reason) in &report.skipped {
        println!("- {} ({})", name, reason.label());
    }
    println!("{}", report.summary());
}

fn list_albums(repo: &Repo) {
    for album in repo.get_albums() {
        let kind = match album.kind {
            AlbumKind::Custom => "custom",
            AlbumKind::System => "system",
        };
        println!(
            "{:<20} {:<7} {:>5}  {}",
            album.id,
            kind,
            album.photos.len(),
            album.label()
        );
    }
}

fn print_mapping(mapping: &SwipeMapping) {
    for direction in Direction::CARDINAL {
        println!(
            "{} {:<5} → {}",
            direction.arrow(),
            direction.label(),
            mapping.get(direction).unwrap_or_default()
        );
    }
}
