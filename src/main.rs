//! timeline-chart - Command Line Entry Point
//!
//! Renders chart documents to SVG, prints scale diagnostics, or opens the
//! interactive viewer.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use timeline_chart::{
    chart::{ChartProps, TimelineChart},
    config::ChartDocument,
    frontend::TimelineViewerApp,
    interaction::{nearest_point_index, ChartCallbacks},
    render::{ApproxTextMeasure, SvgOptions, X_TICK_COUNT},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Interactive time-series timeline charts.
#[derive(Parser, Debug)]
#[command(name = "timeline-chart")]
#[command(about = "Render and explore metric timeline charts", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a chart document as SVG
    Render {
        /// Chart document (JSON or TOML)
        document: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the chart width
        #[arg(long)]
        width: Option<f64>,

        /// Override the chart height
        #[arg(long)]
        height: Option<f64>,

        /// Highlight the point at this RFC 3339 date
        #[arg(long)]
        selected: Option<String>,
    },

    /// Print scale domains, ticks and optionally the point nearest to a position
    Inspect {
        /// Chart document (JSON or TOML)
        document: PathBuf,

        /// Pixel offset from the plot's left edge
        #[arg(long)]
        at: Option<f64>,
    },

    /// Open the interactive viewer
    View {
        /// Chart document (JSON or TOML)
        document: PathBuf,
    },
}

fn load_document(path: &PathBuf) -> Result<ChartDocument> {
    ChartDocument::load(path).with_context(|| format!("Failed to load chart document {:?}", path))
}

fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    value
        .parse::<DateTime<Utc>>()
        .with_context(|| format!("Invalid date {:?}, expected RFC 3339", value))
}

fn render(
    document: PathBuf,
    output: Option<PathBuf>,
    width: Option<f64>,
    height: Option<f64>,
    selected: Option<String>,
) -> Result<()> {
    let mut doc = load_document(&document)?;
    if let Some(width) = width {
        doc.chart.width = width;
    }
    if let Some(height) = height {
        doc.chart.height = height;
    }
    if let Some(selected) = selected {
        doc.chart.selected_date = Some(parse_date(&selected)?);
    }

    let chart = TimelineChart::new(ChartProps::from_document(doc), ChartCallbacks::new());
    if chart.state().is_none() {
        tracing::warn!("Chart has no drawable area, writing an empty SVG");
    }
    let svg = chart.to_svg(&ApproxTextMeasure, &SvgOptions::default());

    match output {
        Some(path) => {
            std::fs::write(&path, svg).with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Wrote {:?}", path);
        }
        None => print!("{}", svg),
    }
    Ok(())
}

fn inspect(document: PathBuf, at: Option<f64>) -> Result<()> {
    let doc = load_document(&document)?;
    let max_y_ticks = doc.chart.max_y_ticks_count;
    let chart = TimelineChart::new(ChartProps::from_document(doc), ChartCallbacks::new());
    let Some(scales) = chart.scales() else {
        anyhow::bail!(
            "Chart {}x{} has no drawable area after padding",
            chart.config().width,
            chart.config().height
        );
    };

    let [start, end] = scales.x.domain();
    println!("series:   {}", chart.series().len());
    println!("x domain: {} .. {}", start.to_rfc3339(), end.to_rfc3339());
    println!("x range:  {:?} (full data {:?})", scales.x.range(), scales.max_x_range);
    let x_ticks: Vec<String> = scales
        .x
        .ticks(X_TICK_COUNT)
        .iter()
        .map(|t| scales.x.tick_format(t))
        .collect();
    println!("x ticks:  {}", x_ticks.join(", "));

    let y_domain: Vec<String> = scales.y.domain_values().iter().map(|v| v.to_string()).collect();
    println!("y domain: {}", y_domain.join(", "));
    let y_ticks: Vec<String> = scales.y.ticks(max_y_ticks).iter().map(|v| v.to_string()).collect();
    println!("y ticks:  {}", y_ticks.join(", "));

    if let Some(x) = at {
        let date = scales.x.invert(x);
        let nearest = chart
            .series()
            .first()
            .and_then(|s| nearest_point_index(&s.points, &date).map(|i| (i, &s.points[i])));
        match nearest {
            Some((index, point)) => {
                println!("at {}px: {} -> point {} at {}", x, date.to_rfc3339(), index, point.x.to_rfc3339());
                for series in chart.series() {
                    let value = series.value_at(index).map_or_else(|| "-".to_string(), |v| v.to_string());
                    println!("  {}: {}", series.name, value);
                }
            }
            None => println!("at {}px: {} -> no points", x, date.to_rfc3339()),
        }
    }
    Ok(())
}

fn view(document: PathBuf) -> Result<()> {
    let doc = load_document(&document)?;
    let title = format!("{} - timeline-chart", doc.name);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 480.0])
            .with_min_inner_size([480.0, 240.0])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(
        "timeline-chart",
        native_options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(TimelineViewerApp::new(cc, doc, Some(document))))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Viewer failed: {}", e))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,timeline_chart=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match args.command {
        Command::Render {
            document,
            output,
            width,
            height,
            selected,
        } => render(document, output, width, height, selected),
        Command::Inspect { document, at } => inspect(document, at),
        Command::View { document } => view(document),
    }
}
