use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use payprobe::application::orchestrator::{Probe, ProbeOrchestrator};
use payprobe::domain::config::{Config, DEFAULT_CONFIG_ENDPOINT, HarnessSettings};
use payprobe::infrastructure::http::HttpConfigEndpoint;
use payprobe::infrastructure::in_memory::InMemorySurfaces;
use payprobe::infrastructure::simulated::{SimulatedClientFactory, SimulationPlan, UserAction};
use payprobe::interfaces::report::ReportWriter;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const CARD_SURFACE: &str = "card-element";
const TOKEN_SURFACE: &str = "token-element";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Probes to run, in order. Runs every probe when none are given.
    #[arg(value_enum)]
    probes: Vec<ProbeArg>,

    #[arg(long, env = "PAYPROBE_PUBLISHABLE_KEY", default_value = "")]
    publishable_key: String,

    #[arg(long, env = "PAYPROBE_BUSINESS_ID", default_value = "")]
    business_id: String,

    /// Falls back to a demo placeholder when absent.
    #[arg(long, env = "PAYPROBE_SDK_TOKEN")]
    sdk_token: Option<String>,

    /// Config-lookup URL used by the CORS probe.
    #[arg(long, env = "PAYPROBE_CONFIG_ENDPOINT", default_value = DEFAULT_CONFIG_ENDPOINT)]
    config_endpoint: String,

    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Run the probes without initializing the SDK first.
    #[arg(long)]
    skip_init: bool,

    /// What the simulated end user does with each mounted widget.
    #[arg(long, value_enum, default_value_t = WidgetAction::Complete)]
    widget_action: WidgetAction,

    #[arg(long, default_value = "Card declined")]
    decline_reason: String,

    /// Clear the widget surfaces before the end user acts.
    #[arg(long)]
    clear_before_action: bool,

    /// Make SDK construction fail with this message.
    #[arg(long)]
    fail_construction: Option<String>,

    /// Make payment-intent creation fail with this message.
    #[arg(long)]
    fail_intent: Option<String>,

    /// Make widget mounts fail with this message.
    #[arg(long)]
    fail_mount: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProbeArg {
    Intent,
    Card,
    Token,
    Cors,
}

impl ProbeArg {
    fn probe(self) -> Probe {
        match self {
            ProbeArg::Intent => Probe::PaymentIntent,
            ProbeArg::Card => Probe::CardWidget {
                target: CARD_SURFACE.to_string(),
            },
            ProbeArg::Token => Probe::TokenWidget {
                target: TOKEN_SURFACE.to_string(),
            },
            ProbeArg::Cors => Probe::Cors,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WidgetAction {
    Complete,
    Fail,
    Cancel,
    Abandon,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::new(cli.publishable_key, cli.business_id);
    config.sdk_token = cli.sdk_token;

    let settings = HarnessSettings {
        config_endpoint: cli.config_endpoint,
        http_timeout: Duration::from_secs(cli.timeout_secs),
    };

    let factory = SimulatedClientFactory::new(SimulationPlan {
        construction_error: cli.fail_construction,
        intent_error: cli.fail_intent,
        mount_error: cli.fail_mount,
    });
    let driver = factory.driver();
    let endpoint = HttpConfigEndpoint::new(&settings).into_diagnostic()?;
    let surfaces = Arc::new(InMemorySurfaces::with_surfaces([CARD_SURFACE, TOKEN_SURFACE]));

    let harness = ProbeOrchestrator::new(Box::new(factory), Box::new(endpoint), surfaces)
        .with_config(config);

    let probes = if cli.probes.is_empty() {
        vec![ProbeArg::Intent, ProbeArg::Card, ProbeArg::Token, ProbeArg::Cors]
    } else {
        cli.probes
    };

    let stdout = io::stdout();
    let mut report = ReportWriter::new(stdout.lock());
    let mut events = harness.results().subscribe();

    if !cli.skip_init {
        harness.initialize().await;
        report.write_published(&mut events).into_diagnostic()?;
    }

    for arg in probes {
        harness.run(arg.probe()).await;
        report.write_published(&mut events).into_diagnostic()?;
    }

    if cli.clear_before_action {
        harness.clear_surface(CARD_SURFACE);
        harness.clear_surface(TOKEN_SURFACE);
    }

    for widget in driver.drain() {
        match cli.widget_action {
            WidgetAction::Complete => widget.act(UserAction::Complete),
            WidgetAction::Fail => widget.act(UserAction::Fail(cli.decline_reason.clone())),
            WidgetAction::Cancel => widget.act(UserAction::Cancel),
            WidgetAction::Abandon => drop(widget),
        }
    }
    report.write_published(&mut events).into_diagnostic()?;

    report
        .write_log(&harness.log().entries())
        .into_diagnostic()?;

    Ok(())
}
