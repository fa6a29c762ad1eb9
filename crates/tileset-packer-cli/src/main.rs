use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use image::{DynamicImage, ImageReader};
use serde::Deserialize;
use tileset_packer_core::{pack_layout, pack_sprites, InputImage, PackerConfig};
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "tileset-packer",
    about = "Pack sprites onto fixed-size tileset canvases",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack sprites into tileset pages (PNG + optional JSON manifest)
    Pack(PackArgs),
    /// Layout-only: compute placements and write the JSON manifest (no PNGs, no deletion)
    Layout(PackArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Directory containing source sprites
    #[arg(default_value = ".", help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory (defaults to the input directory)
    #[arg(short, long, help_heading = "Input/Output")]
    out_dir: Option<PathBuf>,
    /// Output name stem; pages are named <stem>_<grid>_<epoch>_<n>.png and
    /// files starting with <stem>_ are excluded from enumeration
    #[arg(short, long, default_value = "tileset", help_heading = "Input/Output")]
    prefix: String,
    /// YAML config file path (overrides layout options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Layout
    /// Canvas width
    #[arg(long, default_value_t = 256, help_heading = "Layout")]
    max_width: u32,
    /// Canvas height
    #[arg(long, default_value_t = 256, help_heading = "Layout")]
    max_height: u32,
    /// Grid alignment step in pixels
    #[arg(long, default_value_t = 48, help_heading = "Layout")]
    grid_size: u32,
    /// Per-sprite width cap; wider sprites are rejected
    #[arg(long, default_value_t = 96, help_heading = "Layout")]
    max_sprite_width: u32,
    /// Per-sprite height cap; taller sprites are rejected
    #[arg(long, default_value_t = 96, help_heading = "Layout")]
    max_sprite_height: u32,

    // Sources
    /// Delete consumed source files after all pages are saved
    #[arg(long, default_value_t = true, action=ArgAction::Set, help_heading = "Sources")]
    delete_sources: bool,

    // Export
    /// Also write a JSON manifest describing pages and placements
    #[arg(long, default_value_t = false, help_heading = "Export")]
    manifest: bool,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: pack and report stats, but write and delete nothing
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet),
        Commands::Layout(args) => run_layout(args),
    }
}

fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = merge_config(cli)?;

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }
    cfg.validate()?;

    let out_dir = cli.out_dir.clone().unwrap_or_else(|| cli.input.clone());
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("create out_dir {}", out_dir.display()))?;

    // Run-unique page prefix; distinct runs never collide on names.
    let run_prefix = format!("{}_{}_{}_", cli.prefix, cfg.grid_size, unix_epoch_secs()?);

    let paths = gather_sources(&cli.input, &cli.prefix, &cli.include, &cli.exclude)?;
    if paths.is_empty() {
        info!(input = %cli.input.display(), "no source sprites found");
        return Ok(());
    }
    let inputs = load_sprites_with_progress(&paths, show_progress)?;
    info!(count = inputs.len(), "loaded source sprites");

    let out = pack_sprites(inputs, cfg)?;
    if !out.unplaced.is_empty() {
        warn!(
            count = out.unplaced.len(),
            "packing stopped early; sprites left unplaced and untouched"
        );
    }

    if !cli.dry_run {
        for (i, p) in out.pages.iter().enumerate() {
            let png_path = out_dir.join(format!("{}{}.png", run_prefix, i + 1));
            p.rgba
                .save(&png_path)
                .with_context(|| format!("write {}", png_path.display()))?;
            info!(?png_path, sprites = p.page.frames.len(), "saved tileset");
        }
        if cli.manifest && !out.pages.is_empty() {
            let json_path = out_dir.join(format!("{}manifest.json", run_prefix));
            let json_value = tileset_packer_core::to_json_array(&out.atlas);
            let json = serde_json::to_string_pretty(&json_value)?;
            fs::write(&json_path, json)
                .with_context(|| format!("write {}", json_path.display()))?;
            info!(?json_path, pages = out.pages.len(), "manifest written");
        }
    }

    info!("{}", out.stats().summary());

    // Deletion runs strictly after the save loop. Per-file failures are
    // reported and do not stop the remaining deletions.
    if cli.delete_sources && !cli.dry_run {
        for key in out.placed_keys() {
            match fs::remove_file(Path::new(key)) {
                Ok(()) => info!(path = key, "deleted source"),
                Err(e) => error!(path = key, error = %e, "failed to delete source"),
            }
        }
    }

    Ok(())
}

fn run_layout(cli: &PackArgs) -> anyhow::Result<()> {
    let cfg = merge_config(cli)?;

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }
    cfg.validate()?;

    let out_dir = cli.out_dir.clone().unwrap_or_else(|| cli.input.clone());
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("create out_dir {}", out_dir.display()))?;
    let run_prefix = format!("{}_{}_{}_", cli.prefix, cfg.grid_size, unix_epoch_secs()?);

    let paths = gather_sources(&cli.input, &cli.prefix, &cli.include, &cli.exclude)?;
    if paths.is_empty() {
        info!(input = %cli.input.display(), "no source sprites found");
        return Ok(());
    }

    // Placements need dimensions only; skip full decoding.
    let mut items: Vec<(String, u32, u32)> = Vec::with_capacity(paths.len());
    for p in &paths {
        let (w, h) = image::image_dimensions(p)
            .with_context(|| format!("read dimensions of {}", p.display()))?;
        items.push((key_for(p), w, h));
    }

    let out = pack_layout(items, cfg)?;
    if !out.unplaced.is_empty() {
        warn!(
            count = out.unplaced.len(),
            "packing stopped early; sprites left unplaced"
        );
    }

    if !cli.dry_run {
        let json_path = out_dir.join(format!("{}manifest.json", run_prefix));
        let json_value = tileset_packer_core::to_json_array(&out.atlas);
        let json = serde_json::to_string_pretty(&json_value)?;
        fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;
        info!(
            ?json_path,
            pages = out.atlas.pages.len(),
            "manifest written (layout-only)"
        );
    }
    info!("{}", out.atlas.stats().summary());
    Ok(())
}

fn merge_config(cli: &PackArgs) -> anyhow::Result<PackerConfig> {
    let base = PackerConfig {
        max_width: cli.max_width,
        max_height: cli.max_height,
        grid_size: cli.grid_size,
        max_sprite_width: cli.max_sprite_width,
        max_sprite_height: cli.max_sprite_height,
    };
    // Config file, if provided, overrides layout options en bloc
    if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        Ok(y.into_packer_config(base))
    } else {
        Ok(base)
    }
}

fn unix_epoch_secs() -> anyhow::Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before unix epoch")?
        .as_secs())
}

/// Sprite sources in `dir`: regular `.png` files (case-insensitive), names
/// not starting with `<stem>_` so earlier runs' outputs are never re-packed.
/// The list is name-sorted; enumeration order is the placement scan order.
fn gather_sources(
    dir: &Path,
    stem: &str,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }

    let output_family = format!("{}_", stem);
    let mut list: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let p = entry.path();
        if !p.is_file() || !is_sprite(p) {
            continue;
        }
        let name = match p.file_name().and_then(|s| s.to_str()) {
            Some(n) => n,
            None => continue,
        };
        if name.starts_with(&output_family) {
            continue;
        }
        if should_skip(p, inc_set.as_ref(), exc_set.as_ref()) {
            continue;
        }
        list.push(p.to_path_buf());
    }
    list.sort();
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_sprite(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if ext == "png"
    )
}

fn key_for(p: &Path) -> String {
    p.to_string_lossy().replace('\\', "/")
}

fn load_sprites_with_progress(paths: &[PathBuf], progress: bool) -> anyhow::Result<Vec<InputImage>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .unwrap(),
        );
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        // An unreadable or undecodable source aborts the whole run.
        let img = load_sprite(p).with_context(|| format!("load sprite {}", p.display()))?;
        list.push(InputImage {
            key: key_for(p),
            image: img,
        });
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_sprite(p: &Path) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::open(p)?.with_guessed_format()?.decode()?;
    Ok(img)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    max_width: Option<u32>,
    max_height: Option<u32>,
    grid_size: Option<u32>,
    max_sprite_width: Option<u32>,
    max_sprite_height: Option<u32>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> PackerConfig {
        if let Some(v) = self.max_width {
            cfg.max_width = v;
        }
        if let Some(v) = self.max_height {
            cfg.max_height = v;
        }
        if let Some(v) = self.grid_size {
            cfg.grid_size = v;
        }
        if let Some(v) = self.max_sprite_width {
            cfg.max_sprite_width = v;
        }
        if let Some(v) = self.max_sprite_height {
            cfg.max_sprite_height = v;
        }
        cfg
    }
}
