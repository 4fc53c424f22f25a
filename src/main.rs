use checkout_flow::application::controller::PaymentFlowController;
use checkout_flow::config::Config;
use checkout_flow::domain::method::PaymentMethod;
use checkout_flow::domain::ports::{
    CardDetails, CardFieldHandle, PaymentIntentApiHandle, ProcessorClientHandle,
};
use checkout_flow::domain::session::{CheckoutSession, LineItem, MinorUnits};
use checkout_flow::infrastructure::backend::HttpPaymentIntentApi;
use checkout_flow::infrastructure::scripted::{ScriptedIntentApi, ScriptedProcessor};
use checkout_flow::infrastructure::stripe::StripeProcessorClient;
use checkout_flow::interfaces::cli::{CliCardField, SummaryRenderer};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Name on the card
    #[arg(long)]
    card_holder: String,

    /// Card number (defaults to the standard test card)
    #[arg(long, default_value = "4242424242424242")]
    card_number: String,

    #[arg(long, default_value_t = 12)]
    exp_month: u8,

    #[arg(long, default_value_t = 2030)]
    exp_year: u16,

    #[arg(long, default_value = "123")]
    cvc: String,

    /// Run against scripted in-process adapters instead of live services
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let session = demo_order().into_diagnostic()?;

    let card_field: CardFieldHandle = Arc::new(CliCardField::collected(CardDetails {
        number: cli.card_number,
        exp_month: cli.exp_month,
        exp_year: cli.exp_year,
        cvc: cli.cvc,
    }));

    let (processor, intent_api): (ProcessorClientHandle, PaymentIntentApiHandle) = if cli.offline {
        (
            Arc::new(ScriptedProcessor::ready()),
            Arc::new(ScriptedIntentApi::succeeded()),
        )
    } else {
        // Configuration gate: with no usable key the flow never starts.
        if let Err(warning) = config.checked_key() {
            let stdout = io::stdout();
            let mut renderer = SummaryRenderer::new(stdout.lock(), &config.currency);
            renderer.write_config_warning(&warning).into_diagnostic()?;
            return Ok(());
        }
        (
            Arc::new(StripeProcessorClient::new(&config).into_diagnostic()?),
            Arc::new(HttpPaymentIntentApi::new(&config).into_diagnostic()?),
        )
    };

    let controller =
        PaymentFlowController::new(&config, processor, intent_api, card_field, session);
    controller.set_card_holder(&cli.card_holder);
    controller.select_method(PaymentMethod::Card);

    {
        let stdout = io::stdout();
        let mut renderer = SummaryRenderer::new(stdout.lock(), &config.currency);
        renderer
            .write_methods(controller.selected_method())
            .into_diagnostic()?;
        renderer.write_summary(controller.session()).into_diagnostic()?;
    }

    controller.submit().await;

    if let Some(outcome) = controller.outcome() {
        let stdout = io::stdout();
        let mut renderer = SummaryRenderer::new(stdout.lock(), &config.currency);
        renderer.write_outcome(&outcome).into_diagnostic()?;
    }
    Ok(())
}

fn demo_order() -> checkout_flow::error::Result<CheckoutSession> {
    let items = vec![
        LineItem::new("Product 1", 1, MinorUnits::new(15000))?,
        LineItem::new("Product 2", 1, MinorUnits::new(15499))?,
    ];
    CheckoutSession::new(items, MinorUnits::new(129), MinorUnits::ZERO)
}
