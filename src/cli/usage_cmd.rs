use anyhow::Result;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::config::AppConfig;
use crate::core::models::usage::UsageInfo;
use crate::core::providers::fetch::{fetch_all, ProviderOutcome};

/// Fetch every enabled provider and print the results.
///
/// Per-provider failures render as warning sections next to the providers
/// that succeeded; only zero successes is a hard failure (exit 1).
pub async fn run(config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let entries = config.enabled_providers();
    if entries.is_empty() {
        eprintln!("No providers enabled. Run `plantrack config init` to set one up.");
        std::process::exit(1);
    }

    if opts.verbose {
        for entry in &entries {
            eprintln!("Fetching usage for {}...", entry.id);
        }
    }

    let outcomes = fetch_all(&entries).await;
    let succeeded = outcomes.iter().filter(|o| o.result.is_ok()).count();

    match opts.format {
        OutputFormat::Text => print_text(&outcomes, opts),
        OutputFormat::Json => print_json(&outcomes, opts)?,
    }

    if succeeded == 0 {
        eprintln!("No usage data retrieved.");
        std::process::exit(1);
    }
    Ok(())
}

fn print_text(outcomes: &[ProviderOutcome], opts: &OutputOptions) {
    let mut sections: Vec<String> = Vec::new();
    for outcome in outcomes {
        match &outcome.result {
            Ok(usage) => sections.push(renderer::render_provider(usage, opts.use_color)),
            Err(e) => sections.push(renderer::render_error(
                &outcome.id,
                &e.to_string(),
                opts.use_color,
            )),
        }
    }
    println!("{}", sections.join("\n\n"));
}

fn print_json(outcomes: &[ProviderOutcome], opts: &OutputOptions) -> Result<()> {
    let payloads: Vec<&UsageInfo> = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .collect();

    let json = if opts.pretty {
        serde_json::to_string_pretty(&payloads)?
    } else {
        serde_json::to_string(&payloads)?
    };
    println!("{}", json);

    for outcome in outcomes {
        if let Err(e) = &outcome.result {
            eprintln!("Error fetching {}: {}", outcome.id, e);
        }
    }
    Ok(())
}
