use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use chart_history::api::{CardFormat, ChartWidget, PromoCard, WidgetConfig, load_dataset_file};
use chart_history::core::GapPolicy;
use chart_history::interaction::WheelInput;
use chart_history::render::{RenderFrame, Renderer, TextSummaryRenderer};
use chart_history::{ChartResult, telemetry};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "chart_history_report")]
#[command(author, version, about = "Summarize an artist chart-history export")]
struct Args {
    /// Chart export (bare dataset or {success, data} envelope)
    dataset: PathBuf,

    /// Number of chart weeks in the window
    #[arg(long, default_value = "10")]
    visible: usize,

    /// Scroll the window to this thumb position (0-100)
    #[arg(long)]
    scroll: Option<f64>,

    /// Wheel notches to zoom; positive zooms out, negative zooms in
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    zoom: i32,

    /// Wheel notches to pan; positive moves forward in time
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pan: i32,

    /// Break a song's line after this many weeks off the chart
    #[arg(long, default_value = "26")]
    gap_weeks: u32,

    /// Print the widget snapshot as JSON instead of the text summary
    #[arg(long)]
    snapshot: bool,

    /// Describe a promo card for this song
    #[arg(long)]
    card: Option<String>,

    /// Promo card size
    #[arg(long, value_enum, default_value = "square")]
    card_format: CardFormatArg,

    /// Write the chart (or the card) as PNG
    #[cfg(feature = "cairo-backend")]
    #[arg(long)]
    png: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CardFormatArg {
    Square,
    Story,
    Landscape,
}

impl From<CardFormatArg> for CardFormat {
    fn from(value: CardFormatArg) -> Self {
        match value {
            CardFormatArg::Square => CardFormat::Square,
            CardFormatArg::Story => CardFormat::Story,
            CardFormatArg::Landscape => CardFormat::Landscape,
        }
    }
}

fn main() -> ExitCode {
    let _ = telemetry::init_tracing_with_filter("warn");
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> ChartResult<()> {
    let dataset = load_dataset_file(&args.dataset)?;
    let policy = GapPolicy::new(args.gap_weeks).validate()?;

    if let Some(song) = &args.card {
        let card = PromoCard::from_dataset(&dataset, song, policy, args.card_format.into())?;
        let frame = card.compose()?;
        #[cfg(feature = "cairo-backend")]
        if let Some(path) = &args.png {
            return write_png(&frame, path);
        }
        return TextSummaryRenderer::new(io::stdout().lock()).render(&frame);
    }

    let config = WidgetConfig::new(dataset.name.clone())
        .with_initial_visible_count(args.visible)
        .with_gap_policy(policy);
    config.validate()?;

    let mut widget = ChartWidget::new(TextSummaryRenderer::new(io::sink()), config.clone())?;
    widget.set_dataset(dataset)?;
    if let Some(percentage) = args.scroll {
        widget.scroll_to_percentage(percentage)?;
    }
    for _ in 0..args.zoom.unsigned_abs() {
        widget.on_wheel(WheelInput::zoom(f64::from(args.zoom.signum())))?;
    }
    for _ in 0..args.pan.unsigned_abs() {
        widget.on_wheel(WheelInput::pan(f64::from(args.pan.signum())))?;
    }

    if args.snapshot {
        println!("{}", widget.snapshot_json_contract_v1_pretty()?);
        return Ok(());
    }

    #[cfg(feature = "cairo-backend")]
    if let Some(path) = &args.png {
        let frame = chart_history::api::build_render_frame(
            &widget.chart_view(),
            config.viewport,
            widget.thumb_geometry(),
            config.scrollbar,
        )?;
        return write_png(&frame, path);
    }

    let frame = RenderFrame::summary(config.viewport, widget.chart_view());
    TextSummaryRenderer::new(io::stdout().lock()).render(&frame)
}

#[cfg(feature = "cairo-backend")]
fn write_png(frame: &RenderFrame, path: &std::path::Path) -> ChartResult<()> {
    use chart_history::render::CairoRenderer;

    let mut renderer = CairoRenderer::for_viewport(frame.viewport)?;
    renderer.render(frame)?;
    let mut file = std::fs::File::create(path)?;
    renderer.write_png(&mut file)
}
