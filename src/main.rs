use clap::{Parser, Subcommand};
use picshelf::gallery::{Gallery, IngestConfig, UploadFile};
use picshelf::imaging::{
    OutputFormat, Quality, RustBackend, ThumbnailParams, create_thumbnail, optimize_image,
    probe_dimensions,
};
use picshelf::storage::FsStore;
use picshelf::{config, gallery, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "picshelf")]
#[command(about = "Image upload pipeline and gallery manager")]
#[command(long_about = "\
Image upload pipeline and gallery manager

Files are validated against the upload policy, resized within the configured
bounds (never upscaled), re-encoded, and stored under content-addressed keys.
Galleries are ordered JSON manifests of stored-object URLs.

Typical flow:

  picshelf gen-config > picshelf.toml
  picshelf gallery -m project-7.json add shoot/ --prefix projects/7
  picshelf gallery -m project-7.json list
  picshelf gallery -m project-7.json remove <url>

Run 'picshelf gen-config' for a documented picshelf.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./picshelf.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report pixel dimensions of image files
    Inspect {
        /// Image files to probe
        files: Vec<PathBuf>,
    },
    /// Optimize a single image to disk
    Optimize {
        /// Source image
        file: PathBuf,
        /// Output path
        #[arg(short, long)]
        output: PathBuf,
        /// Override the configured max width
        #[arg(long)]
        max_width: Option<u32>,
        /// Override the configured max height
        #[arg(long)]
        max_height: Option<u32>,
        /// Override the configured quality (1-100)
        #[arg(long)]
        quality: Option<u32>,
        /// Override the configured output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Print a square thumbnail as a data URI
    Thumb {
        /// Source image
        file: PathBuf,
        /// Override the configured thumbnail size
        #[arg(long)]
        size: Option<u32>,
    },
    /// Manage a gallery manifest
    Gallery {
        /// Gallery manifest file
        #[arg(short, long)]
        manifest: PathBuf,

        #[command(subcommand)]
        action: GalleryAction,
    },
    /// Print a stock picshelf.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum GalleryAction {
    /// Validate, optimize, and upload files (directories are walked)
    Add {
        /// Image files or directories
        paths: Vec<PathBuf>,
        /// Storage key prefix, e.g. projects/7
        #[arg(long, default_value = "gallery")]
        prefix: String,
    },
    /// Delete a stored image and drop it from the gallery
    Remove {
        /// The image URL to remove
        url: String,
    },
    /// Replace the gallery order (must list every current URL exactly once)
    Reorder {
        /// All gallery URLs in their new order
        urls: Vec<String>,
    },
    /// Print the gallery in order
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = config::ShelfConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Inspect { files } => {
            let backend = RustBackend::new();
            for path in &files {
                let result = std::fs::read(path)
                    .map_err(|e| e.to_string())
                    .and_then(|bytes| {
                        probe_dimensions(&backend, &bytes).map_err(|e| e.to_string())
                    });
                println!(
                    "{}",
                    output::format_inspect_line(&path.display().to_string(), &result)
                );
            }
        }
        Command::Optimize {
            file,
            output: out_path,
            max_width,
            max_height,
            quality,
            format,
        } => {
            let mut params = config.optimize_params();
            if let Some(w) = max_width {
                params.max_width = w;
            }
            if let Some(h) = max_height {
                params.max_height = h;
            }
            if let Some(q) = quality {
                params.quality = Quality::new(q);
            }
            if let Some(f) = format {
                params.format = f;
            }

            let backend = RustBackend::new();
            let bytes = std::fs::read(&file)?;
            let optimized = optimize_image(&backend, &bytes, &params)?;
            std::fs::write(&out_path, &optimized.bytes)?;

            println!("{} \u{2192} {}", file.display(), out_path.display());
            for line in output::format_optimize_summary(&optimized) {
                println!("{line}");
            }
        }
        Command::Thumb { file, size } => {
            let mut params = config.thumbnail_params();
            if let Some(s) = size {
                params = ThumbnailParams { size: s, ..params };
            }

            let backend = RustBackend::new();
            let bytes = std::fs::read(&file)?;
            let uri = create_thumbnail(&backend, &bytes, &params)?;
            println!("{uri}");
        }
        Command::Gallery { manifest, action } => {
            let store = FsStore::new(&config.store.root, &config.store.base_url);
            let mut gal = Gallery::load(&manifest)?;

            match action {
                GalleryAction::Add { paths, prefix } => {
                    init_thread_pool(&config.processing);

                    let files = collect_upload_files(&paths)?;
                    let ingest_config = IngestConfig {
                        prefix,
                        max_images: config.gallery.max_images,
                        policy: config.upload_policy(),
                        optimize: config.optimize_params(),
                    };

                    let backend = RustBackend::new();
                    let (tx, rx) = std::sync::mpsc::channel();
                    let printer = std::thread::spawn(move || {
                        for event in rx {
                            for line in output::format_ingest_event(&event) {
                                println!("{line}");
                            }
                        }
                    });
                    let outcome =
                        gallery::ingest(&backend, &store, &mut gal, files, &ingest_config, Some(tx));
                    printer.join().unwrap();

                    gal.save(&manifest)?;
                    output::print_ingest_summary(&outcome);
                }
                GalleryAction::Remove { url } => {
                    let outcome = gallery::remove_image(&store, &mut gal, &url);
                    if let Some(reason) = &outcome.delete_error {
                        eprintln!("Warning: store delete failed: {reason}");
                    }
                    if outcome.removed_locally {
                        gal.save(&manifest)?;
                        println!("Removed {url}");
                    } else {
                        println!("URL not in gallery: {url}");
                    }
                }
                GalleryAction::Reorder { urls } => {
                    gallery::reorder(&mut gal, urls)?;
                    gal.save(&manifest)?;
                    output::print_gallery_list(&gal);
                }
                GalleryAction::List => {
                    output::print_gallery_list(&gal);
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Expand file and directory arguments into upload candidates.
///
/// Directories are walked recursively; every regular file is read and handed
/// to the pipeline, so non-image files surface as normal validation
/// rejections instead of being filtered here.
fn collect_upload_files(paths: &[PathBuf]) -> std::io::Result<Vec<UploadFile>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                files.push(UploadFile::read(entry.path())?);
            }
        } else {
            files.push(UploadFile::read(path)?);
        }
    }
    Ok(files)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingSection) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
