//! distmap CLI: distance transforms of PNG masks.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use distmap::image_io::{load_grey, load_mask, save_gray16};
use distmap::{
    euclidean_distance_transform, radius_coordinate, Border, ChannelDump, EdtMethod, GdtOutput,
    Image, Metric, Spacing, TransformConfig, TransformKind, TransformOutput, VdtMethod,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "distmap")]
#[command(about = "Euclidean, vector and grey-weighted distance transforms of binary images")]
#[command(version)]
struct Cli {
    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Euclidean distance transform of a mask image; writes a 16-bit PNG.
    Edt(EdtArgs),

    /// Vector distance transform of a mask image; writes JSON channels.
    Vdt(VdtArgs),

    /// Grey-weighted distance transform; writes a PNG or JSON channels.
    Gdt(GdtArgs),

    /// Run a transform described by a JSON config file.
    Run {
        #[arg(long)]
        config: PathBuf,
    },

    /// Compare methods on a synthetic image with one background pixel.
    Demo(DemoArgs),
}

#[derive(Debug, Clone, Args)]
struct CommonArgs {
    /// Mask image; non-zero pixels are object.
    #[arg(long)]
    input: PathBuf,

    /// Output path; `.json` writes raw channels, anything else a 16-bit PNG.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pixel spacing per axis, comma separated (e.g. `1,0.5`).
    #[arg(long, value_delimiter = ',')]
    spacing: Option<Vec<f64>>,

    /// Multiplier applied before rounding to 16-bit PNG pixels.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,
}

impl CommonArgs {
    fn config(&self, transform: TransformKind) -> CliResult<TransformConfig> {
        Ok(TransformConfig {
            transform,
            spacing: self.spacing.clone().map(Spacing::new).transpose()?,
            input_path: Some(self.input.display().to_string()),
            output_path: self.output.as_ref().map(|p| p.display().to_string()),
            scale: self.scale,
            ..TransformConfig::default()
        })
    }
}

#[derive(Debug, Clone, Args)]
struct EdtArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// separable, square, fast, ties, true or "brute force".
    #[arg(long, default_value = "separable")]
    method: EdtMethod,

    /// Whether pixels outside the image are object or background.
    #[arg(long, default_value = "background")]
    border: Border,
}

#[derive(Debug, Clone, Args)]
struct VdtArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// fast, ties, true or "brute force".
    #[arg(long, default_value = "fast")]
    method: VdtMethod,

    #[arg(long, default_value = "background")]
    border: Border,
}

#[derive(Debug, Clone, Args)]
struct GdtArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Cost image; 16-bit images keep their full range.
    #[arg(long)]
    grey: PathBuf,

    /// Neighbourhood: city, chess, connected:k, chamfer:n.
    #[arg(long, default_value = "city")]
    metric: Metric,

    /// GDT, Euclidean or both.
    #[arg(long, default_value = "GDT")]
    mode: GdtOutput,
}

#[derive(Debug, Clone, Args)]
struct DemoArgs {
    /// Image size along every axis.
    #[arg(long, default_value_t = 64)]
    size: usize,

    /// Number of dimensions.
    #[arg(long, default_value_t = 2)]
    dims: usize,

    /// Single method to run; all methods by default.
    #[arg(long)]
    method: Option<EdtMethod>,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Edt(args) => {
            let mut cfg = args.common.config(TransformKind::Euclidean)?;
            cfg.method = Some(args.method.as_str().to_string());
            cfg.border = args.border;
            execute(&cfg)
        }
        Commands::Vdt(args) => {
            let mut cfg = args.common.config(TransformKind::Vector)?;
            cfg.method = Some(args.method.as_str().to_string());
            cfg.border = args.border;
            execute(&cfg)
        }
        Commands::Gdt(args) => {
            let mut cfg = args.common.config(TransformKind::Grey)?;
            cfg.grey_path = Some(args.grey.display().to_string());
            cfg.metric = args.metric;
            cfg.output = args.mode;
            execute(&cfg)
        }
        Commands::Run { config } => execute(&TransformConfig::load_json(&config)?),
        Commands::Demo(args) => run_demo(&args),
    }
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: bool) {
    let _ = tracing_log::LogTracer::init();
    if verbose && std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "debug");
    }
    distmap::core::init_tracing(false);
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let _ = distmap::core::init_with_level(distmap::core::level_from_env(level));
}

fn execute(cfg: &TransformConfig) -> CliResult<()> {
    let input_path = cfg
        .input_path
        .as_deref()
        .ok_or("config has no input_path")?;
    log::info!("loading mask {input_path}");
    let mask = load_mask(input_path)?;
    let grey = match (&cfg.grey_path, cfg.transform) {
        (Some(path), TransformKind::Grey) => {
            log::info!("loading grey image {path}");
            Some(load_grey(path)?)
        }
        _ => None,
    };

    let started = Instant::now();
    let output = cfg.run(mask.view(), grey.as_ref().map(Image::view))?;
    log::info!(
        "{} transform of {:?} took {:.1} ms",
        cfg.transform.as_str(),
        mask.sizes(),
        started.elapsed().as_secs_f64() * 1e3
    );

    let out_path = cfg.output_path();
    write_output(&output, &out_path, cfg.scale)?;
    log::info!("result written to {}", out_path.display());

    println!("{}", serde_json::to_string_pretty(&output.report())?);
    Ok(())
}

fn write_output(output: &TransformOutput, path: &Path, scale: f32) -> CliResult<()> {
    if path.extension().is_some_and(|ext| ext == "json") {
        ChannelDump::from_output(output).write_json(path)?;
        return Ok(());
    }
    match output {
        TransformOutput::Scalar(img) => save_gray16(img, scale, path)?,
        TransformOutput::Channels(img) if img.channel_count() == 1 => {
            let channel = Image::from_vec(img.sizes(), img.channel(0).to_vec())?;
            save_gray16(&channel, scale, path)?
        }
        TransformOutput::Channels(img) => {
            return Err(format!(
                "{} channels cannot be written as a PNG; use a .json output",
                img.channel_count()
            )
            .into())
        }
    }
    Ok(())
}

fn run_demo(args: &DemoArgs) -> CliResult<()> {
    let sizes = vec![args.size; args.dims];
    let centre = args.size / 2;
    let mask = Image::from_fn(&sizes, |c| c.iter().any(|&x| x != centre))?;
    let expected = radius_coordinate(&sizes)?;
    let spacing = Spacing::isotropic(args.dims);

    let methods: Vec<EdtMethod> = match args.method {
        Some(m) => vec![m],
        None => EdtMethod::ALL.to_vec(),
    };

    let mut rows = Vec::new();
    for method in methods {
        if method.raster_kernel().is_some() && !(2..=3).contains(&args.dims) {
            log::warn!("skipping {method}: raster methods need 2 or 3 dimensions");
            continue;
        }
        let started = Instant::now();
        let d = euclidean_distance_transform(mask.view(), &spacing, Border::Object, method)?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1e3;
        let d = if method == EdtMethod::Square {
            d.map(f32::sqrt)
        } else {
            d
        };
        let max_error = d.max_abs_difference(&expected).unwrap_or(f32::NAN);
        log::info!("{method}: max error {max_error:.2e}, {elapsed_ms:.1} ms");
        rows.push(serde_json::json!({
            "method": method.as_str(),
            "max_error": max_error,
            "elapsed_ms": elapsed_ms,
        }));
    }

    let report = serde_json::json!({ "sizes": sizes, "methods": rows });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
