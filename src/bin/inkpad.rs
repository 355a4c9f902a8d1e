use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "inkpad", version)]
struct Cli {
    /// Log stroke and normalization details to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a stroke script onto a surface and write it as a PNG.
    Draw(DrawArgs),
    /// Convert an image file into a model input tensor (JSON).
    Normalize(NormalizeArgs),
}

#[derive(Parser, Debug)]
struct DrawArgs {
    /// Input stroke script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also normalize the final raster and write the tensor here.
    #[arg(long)]
    tensor_out: Option<PathBuf>,

    #[command(flatten)]
    tensor: TensorArgs,
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    /// Input image (any format the `image` crate decodes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output tensor JSON path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    tensor: TensorArgs,
}

#[derive(clap::Args, Debug)]
struct TensorArgs {
    /// Target tensor width.
    #[arg(long, default_value_t = 28)]
    width: u32,

    /// Target tensor height.
    #[arg(long, default_value_t = 28)]
    height: u32,

    #[arg(long, value_enum, default_value_t = ChannelChoice::Mean)]
    channels: ChannelChoice,

    #[arg(long, value_enum, default_value_t = RangeChoice::Unit)]
    range: RangeChoice,

    /// Keep dark-on-light polarity.
    #[arg(long)]
    no_invert: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChannelChoice {
    Mean,
    Luminance,
    Rgb,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RangeChoice {
    Unit,
    Signed,
}

impl TensorArgs {
    fn options(&self) -> inkpad::NormalizeOptions {
        inkpad::NormalizeOptions {
            channels: match self.channels {
                ChannelChoice::Mean => inkpad::ChannelMode::Mean,
                ChannelChoice::Luminance => inkpad::ChannelMode::Luminance,
                ChannelChoice::Rgb => inkpad::ChannelMode::Rgb,
            },
            invert: !self.no_invert,
            range: match self.range {
                RangeChoice::Unit => inkpad::ValueRange::Unit,
                RangeChoice::Signed => inkpad::ValueRange::Signed,
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Draw(args) => cmd_draw(args),
        Command::Normalize(args) => cmd_normalize(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn read_script_json(path: &Path) -> anyhow::Result<inkpad::StrokeScript> {
    let f = File::open(path).with_context(|| format!("open stroke script '{}'", path.display()))?;
    let r = BufReader::new(f);
    let script: inkpad::StrokeScript =
        serde_json::from_reader(r).with_context(|| "parse stroke script JSON")?;
    Ok(script)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn write_tensor(path: &Path, tensor: &inkpad::Tensor) -> anyhow::Result<()> {
    ensure_parent(path)?;
    let f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    serde_json::to_writer(BufWriter::new(f), tensor)
        .with_context(|| format!("write tensor '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_draw(args: DrawArgs) -> anyhow::Result<()> {
    let script = read_script_json(&args.in_path)?;
    let raster = script.render()?;

    ensure_parent(&args.out)?;
    raster.save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());

    if let Some(tensor_out) = &args.tensor_out {
        let tensor = inkpad::normalize(
            &raster,
            args.tensor.width,
            args.tensor.height,
            &args.tensor.options(),
        )?;
        write_tensor(tensor_out, &tensor)?;
    }
    Ok(())
}

fn cmd_normalize(args: NormalizeArgs) -> anyhow::Result<()> {
    let raster = inkpad::RasterImage::open(&args.in_path)?;
    let tensor = inkpad::normalize(
        &raster,
        args.tensor.width,
        args.tensor.height,
        &args.tensor.options(),
    )?;
    write_tensor(&args.out, &tensor)
}
