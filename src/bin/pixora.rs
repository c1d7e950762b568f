use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use pixora::{
    SectionPlan, Stage, StageConfig, site,
    text::{
        metric::metric_tokens,
        segment::{Granularity, segment},
    },
};

#[derive(Parser, Debug)]
#[command(name = "pixora", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the numeric metrics found in a sentence as JSON.
    Metrics {
        /// Text to scan.
        text: String,
    },
    /// Print the inline wrapper markup of a split reveal.
    Segment {
        /// Unit of the split.
        #[arg(long, value_enum, default_value_t = SplitChoice::Letter)]
        granularity: SplitChoice,
        /// Text to split.
        text: String,
    },
    /// Mount section plans on the page, replay a scroll path and print the digest as JSON.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Section plans JSON (an array), or `builtin` for the page's own plans.
    #[arg(long = "in", default_value = "builtin")]
    in_path: String,

    /// Stage config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scroll offsets visited in order.
    #[arg(long, value_delimiter = ',')]
    scroll: Vec<f64>,

    /// Frames run after each scroll step.
    #[arg(long, default_value_t = 60)]
    frames: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SplitChoice {
    Letter,
    Word,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("PIXORA_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Metrics { text } => {
            println!("{}", serde_json::to_string_pretty(&metric_tokens(&text))?);
            Ok(())
        }
        Command::Segment { granularity, text } => {
            let granularity = match granularity {
                SplitChoice::Letter => Granularity::Letter,
                SplitChoice::Word => Granularity::Word,
            };
            println!("{}", segment(&text, granularity).render_markup());
            Ok(())
        }
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_plans(arg: &str) -> anyhow::Result<Vec<SectionPlan>> {
    if arg == "builtin" {
        return Ok(site::plans()?);
    }
    let json =
        std::fs::read_to_string(arg).with_context(|| format!("open section plans '{arg}'"))?;
    let plans: Vec<SectionPlan> =
        serde_json::from_str(&json).with_context(|| "parse section plans JSON")?;
    for plan in &plans {
        plan.validate()?;
    }
    Ok(plans)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("open stage config '{}'", path.display()))?;
            StageConfig::from_json(&json)?
        }
        None => StageConfig::default(),
    };
    let plans = read_plans(&args.in_path)?;

    let doc = site::document(config.viewport)?;
    let mut stage = Stage::new(doc, config)?;
    stage.mount_all(&plans)?;
    stage.run_frames(args.frames);
    for y in &args.scroll {
        stage.scroll_to(*y);
        stage.run_frames(args.frames);
    }

    println!("{}", serde_json::to_string_pretty(&stage.digest())?);
    Ok(())
}
