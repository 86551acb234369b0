use std::sync::Arc;

use bdr_assist::config::Config;
use bdr_assist::integrations::{AssistantClient, HubSpotClient, SlackClient};
use bdr_assist::router::{
    Dispatcher, ErrorReporter, ErrorSink, HandlerRegistry, RoutingTable, WorkflowKind,
};
use bdr_assist::server;
use bdr_assist::workflows::{DraftWorkflow, EnrichWorkflow, FollowupWorkflow, PrepWorkflow};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    let hubspot = Arc::new(HubSpotClient::from_config(&config).unwrap_or_else(|_| {
        eprintln!("Error: HUBSPOT_API_KEY not set");
        eprintln!("  export HUBSPOT_API_KEY=pat-...");
        std::process::exit(1);
    }));
    let slack = Arc::new(SlackClient::from_config(&config).unwrap_or_else(|_| {
        eprintln!("Error: SLACK_BOT_TOKEN not set");
        eprintln!("  export SLACK_BOT_TOKEN=xoxb-...");
        std::process::exit(1);
    }));
    let assistant = Arc::new(AssistantClient::from_config(&config).unwrap_or_else(|_| {
        eprintln!("Error: ANTHROPIC_API_KEY not set");
        eprintln!("  export ANTHROPIC_API_KEY=sk-ant-...");
        std::process::exit(1);
    }));

    eprintln!("🤖 BDR Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   Team channel: {}", config.slack_team_channel);
    eprintln!("   Error channel: {}", config.slack_error_channel);
    eprintln!(
        "   HubSpot webhook: http://0.0.0.0:{}/webhook/hubspot",
        config.port
    );

    // ── Workflow handlers ───────────────────────────────────────────────
    let mut registry = HandlerRegistry::new();
    registry.register(
        WorkflowKind::Enrich,
        Arc::new(EnrichWorkflow::new(
            Arc::clone(&hubspot),
            Arc::clone(&slack),
            config.slack_team_channel.clone(),
            config.high_priority_score,
        )),
    );
    registry.register(
        WorkflowKind::Draft,
        Arc::new(DraftWorkflow::new(
            Arc::clone(&hubspot),
            Arc::clone(&assistant),
            Arc::clone(&slack),
            config.slack_team_channel.clone(),
        )),
    );
    registry.register(
        WorkflowKind::Followup,
        Arc::new(FollowupWorkflow::new(
            Arc::clone(&hubspot),
            Arc::clone(&slack),
            config.slack_team_channel.clone(),
        )),
    );
    registry.register(
        WorkflowKind::Prep,
        Arc::new(PrepWorkflow::new(
            Arc::clone(&hubspot),
            Arc::clone(&assistant),
            Arc::clone(&slack),
            config.slack_team_channel.clone(),
        )),
    );

    // ── Router ──────────────────────────────────────────────────────────
    let reporter = ErrorReporter::new(Arc::clone(&slack) as Arc<dyn ErrorSink>);
    let dispatcher = Arc::new(Dispatcher::new(
        RoutingTable::hubspot_defaults(),
        registry,
        reporter,
    ));

    let app = server::app(dispatcher);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
