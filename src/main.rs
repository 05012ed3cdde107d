use std::{error::Error, fs::File, path::PathBuf, time::Duration};

use clap::Parser;
use landsat_night::{
    parse_day, CacheSettings, Catalog, DateWindow, HttpRemote, HttpRepository, Options, Pipeline,
};

/// Download night-time Landsat 8 scenes listed in a scene list.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Lookup scenes starting from this day (DD-MM-YYYY).
    #[arg(short = 'f')]
    from: Option<String>,

    /// Lookup scenes no older than this day (DD-MM-YYYY).
    #[arg(short = 't')]
    to: Option<String>,

    /// Number of simultaneous parallel downloads.
    #[arg(short = 'n', default_value_t = 4, allow_negative_numbers = true)]
    workers: i64,

    /// Scene list file.
    #[arg(short = 's', default_value = "scene_list")]
    scene_list: PathBuf,

    /// Result of id query.
    #[arg(short = 'r', default_value = "result.txt")]
    result: PathBuf,

    /// Band to download, repeat for more bands.
    #[arg(short = 'b')]
    bands: Vec<u8>,

    /// Download the BQA raster.
    #[arg(long)]
    bqa: bool,

    /// Path where data will be stored.
    #[arg(short = 'p', default_value = "download")]
    download: PathBuf,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 1200)]
    timeout: u64,

    /// Number of attempts for each download.
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Root of the artifact cache.
    #[arg(long, default_value = ".")]
    cache: PathBuf,

    /// Always fetch metadata from the archive.
    #[arg(long)]
    no_cache_meta: bool,

    /// Keep QA and band rasters in the cache.
    #[arg(long)]
    cache_bands: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let start = args.from.as_deref().map(parse_day).transpose()?;
    let end = args.to.as_deref().map(parse_day).transpose()?;

    let opts = Options {
        window: DateWindow::new(start, end)?,
        bands: args.bands,
        quality: args.bqa,
        download_root: args.download,
        retries: args.retries,
        ..Options::default()
    }
    .with_workers(args.workers);

    let catalog = Catalog::open(&args.scene_list)?;
    let out = File::create(&args.result)?;

    let remote = HttpRemote::with_timeout(Duration::from_secs(args.timeout))?;
    let repo = HttpRepository::new(
        remote,
        CacheSettings {
            root: args.cache,
            metadata: !args.no_cache_meta,
            rasters: args.cache_bands,
        },
    );

    let summary = Pipeline::new(repo, opts).run(catalog, out)?;
    log::info!("Wrote {} scene ids to {:?}", summary.written, args.result);

    Ok(())
}
