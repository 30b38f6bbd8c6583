use std::time::Duration;

use anyhow::Result;

use crate::cli::output::OutputOptions;
use crate::cli::renderer;
use crate::core::config::AppConfig;
use crate::core::providers::fetch::fetch_all;

/// Compact status-line mode, the terminal stand-in for a menubar display.
///
/// Without `--interval` it prints one line and exits. With it, the loop
/// refetches and reprints every cycle; cycles never overlap because the loop
/// awaits each fan-out before ticking again. Fetch failures show up as a "!"
/// marker per provider instead of aborting the display.
pub async fn run(config: &AppConfig, interval: Option<u64>, opts: &OutputOptions) -> Result<()> {
    let entries = config.enabled_providers();
    if entries.is_empty() {
        eprintln!("No providers enabled. Run `plantrack config init` to set one up.");
        std::process::exit(1);
    }

    match interval {
        None => {
            let outcomes = fetch_all(&entries).await;
            println!("{}", renderer::render_status_line(&outcomes, opts.use_color));
            if outcomes.iter().all(|o| o.result.is_err()) {
                eprintln!("No usage data retrieved.");
                std::process::exit(1);
            }
        }
        Some(secs) => {
            let mut ticker = tokio::time::interval(Duration::from_secs(secs.max(1)));
            loop {
                ticker.tick().await;
                let outcomes = fetch_all(&entries).await;
                println!("{}", renderer::render_status_line(&outcomes, opts.use_color));
                if opts.verbose {
                    for outcome in &outcomes {
                        if let Err(e) = &outcome.result {
                            eprintln!("Error fetching {}: {}", outcome.id, e);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
