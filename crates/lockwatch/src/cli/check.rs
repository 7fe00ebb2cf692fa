use anyhow::Result;
use clap::Parser;
use console::style;
use lockwatch::lockwatch_core::config::LockwatchConfig;
use lockwatch::lockwatch_runtime::{DashboardModel, Monitor, NodeCard, NodeRole};
use lockwatch::init_logging;

/// Poll the cluster once.
#[derive(Parser)]
pub struct CheckCommand {
    /// Configuration file path. Falls back to the local three-node layout.
    #[arg(short, long, default_value = "lockwatch.toml")]
    pub config: String,

    /// Print the projection as JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckCommand {
    /// Execute the check command.
    pub async fn execute(self) -> Result<()> {
        let config = if std::path::Path::new(&self.config).exists() {
            LockwatchConfig::from_file(&self.config)?
        } else {
            LockwatchConfig::default_local()
        };
        init_logging(&config.logging, self.verbose)?;

        let monitor = Monitor::from_config(&config)?;
        let model = monitor.run_cycle().await.model;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&model)?);
        } else {
            print_model(&model);
        }

        if model.reachable_nodes == 0 {
            anyhow::bail!("No node in the cluster answered");
        }
        Ok(())
    }
}

fn print_model(model: &DashboardModel) {
    println!();
    for card in &model.nodes {
        let line = format_node(card);
        match card.role {
            NodeRole::Leader => println!("  {}", style(line).green().bold()),
            NodeRole::Offline => println!("  {}", style(line).red()),
            _ => println!("  {}", line),
        }
    }
    println!();

    match model.leader_name() {
        Some(name) => println!("  Leader:   {}", style(name).bold()),
        None => println!("  Leader:   {}", style("none").yellow()),
    }
    if let Some(stats) = &model.stats {
        println!("  Sessions: {}", stats.sessions);
        println!("  Locks:    {}", stats.locks);
        println!("  Fence:    {}", stats.fence_counter);
    }
    println!(
        "  Checked at {}",
        model.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
}

/// One table row: name, role, term and readiness.
fn format_node(card: &NodeCard) -> String {
    let term = card
        .term
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());
    let ready = match card.role {
        NodeRole::Offline => "-",
        _ if card.ready => "ready",
        _ => "not ready",
    };
    format!(
        "{:<12} {:<9} term {:<6} {}",
        card.display_name,
        card.role.as_str(),
        term,
        ready
    )
}
