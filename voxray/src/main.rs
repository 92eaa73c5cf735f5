use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use structopt::StructOpt;

use voxray::files::FileContext;
use voxray::settings::Settings;
use voxray_models::{end_rod, fence, sign, Facing};
use voxray_voxels::{Finalizer, Voxel};

#[derive(Debug, StructOpt)]
struct Opts {
    /// Directory holding settings and saves. Defaults to `<documents>/voxray`.
    #[structopt(long)]
    save_root: Option<PathBuf>,
    #[structopt(subcommand)]
    action: Action,
}

#[derive(Debug, StructOpt)]
enum Action {
    /// Writes a small world containing every block the finalizer knows about.
    GenerateDemo {
        #[structopt(flatten)]
        options: SaveOpts,
    },
    /// Derives neighbor metadata for every voxel of a saved world.
    Finalize {
        #[structopt(flatten)]
        options: FinalizeOpts,
    },
    /// Prints statistics about a saved world.
    Inspect {
        #[structopt(flatten)]
        options: SaveOpts,
    },
    /// Builds the model shape tables and reports their sizes.
    Shapes,
}

#[derive(Debug, StructOpt)]
struct SaveOpts {
    #[structopt(short, long)]
    save_name: String,
}

#[derive(Debug, StructOpt)]
struct FinalizeOpts {
    #[structopt(short, long)]
    save_name: String,
    /// Finalize columns one at a time on the main thread.
    #[structopt(long)]
    sequential: bool,
}

fn run(opt: Opts) -> Result<()> {
    let ctx = match opt.save_root {
        None => FileContext::load_default()?,
        Some(root) => FileContext::new(root),
    };
    ctx.ensure_directories()?;
    let settings = ctx.load_settings()?;

    match &opt.action {
        Action::GenerateDemo { options } => run_generate_demo(&ctx, &settings, options),
        Action::Finalize { options } => run_finalize(&ctx, &settings, options),
        Action::Inspect { options } => run_inspect(&ctx, options),
        Action::Shapes => run_shapes(),
    }
}

fn run_generate_demo(ctx: &FileContext, settings: &Settings, options: &SaveOpts) -> Result<()> {
    let (meta, voxels) = voxray::demo::generate_demo(&settings.demo)?;
    info!("Saving");
    ctx.save_world(&options.save_name, &meta, &voxels)
}

fn run_finalize(ctx: &FileContext, settings: &Settings, options: &FinalizeOpts) -> Result<()> {
    let finalizer = Finalizer::new(&settings.finalize).context("Invalid finalize settings")?;
    let (mut meta, mut voxels) = ctx.load_world(&options.save_name)?;
    if meta.finalized {
        warn!("World {} is already finalized", options.save_name);
    }
    voxels
        .validate_block_ids()
        .context("Checking voxel data before finalization")?;

    let metrics = install_metrics()?;
    let stats = if options.sequential {
        finalizer.finalize_columns(&mut voxels, meta.origin, &meta.columns)
    } else {
        finalizer.finalize_world(&mut voxels, meta.origin, &meta.columns)?
    };
    info!("Finalized: {:?}", stats);
    log_metrics(&metrics);

    meta.finalized = true;
    ctx.save_world(&options.save_name, &meta, &voxels)
}

fn run_inspect(ctx: &FileContext, options: &SaveOpts) -> Result<()> {
    let (meta, voxels) = ctx.load_world(&options.save_name)?;
    info!("World meta: {:?}", meta);
    info!("Loaded world: {:?}", voxels.debug_summary());

    for (block, count) in voxels.block_counts() {
        println!("{:>4} {:<24} {}", block.id(), block.name(), count);
    }
    Ok(())
}

fn run_shapes() -> Result<()> {
    for &facing in Facing::ALL.iter() {
        info!(
            "end rod {:?}: {} quads",
            facing,
            end_rod::END_ROD.get(facing).len()
        );
    }
    info!(
        "sign post: {} angles of {} quads",
        voxray_models::AngledShapes::COUNT,
        sign::SIGN_POST.get(0).len()
    );
    info!(
        "fence: {} quads unconnected, {} fully connected",
        fence::quads(Voxel::default()).len(),
        fence::quads(Voxel::from_raw(0xF << 8)).len()
    );
    Ok(())
}

fn install_metrics() -> Result<metrics_runtime::Controller> {
    let receiver = metrics_runtime::Receiver::builder()
        .build()
        .map_err(|err| anyhow!("Building metrics receiver: {:?}", err))?;
    let controller = receiver.controller();
    receiver.install();
    Ok(controller)
}

fn log_metrics(controller: &metrics_runtime::Controller) {
    use metrics_core::{Builder, Drain, Observe};
    let mut observer = metrics_runtime::observers::YamlBuilder::new().build();
    controller.observe(&mut observer);
    info!("Metrics:\n{}", observer.drain());
}

fn main() {
    env_logger::init();

    match run(Opts::from_args()) {
        Ok(()) => (),
        Err(end_error) => {
            for error in end_error.chain() {
                error!("{}", error);
                error!("========");
            }
        }
    }
}
