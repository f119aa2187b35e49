use std::path::Path;
use std::sync::Arc;

use console::{style, Term};
use tracing::{debug, info};

use crate::api::{ApiClient, BodyMessageResolver};
use crate::cli::commands::StopArgs;
use crate::config;
use crate::control::{ConfirmationFlow, StopScanAction, StopScanCoordinator, SubmitPolicy, ViewInvalidator};
use crate::errors::ScanCtlError;
use crate::models::{ActionResult, ScanIdentifier};

/// Runs the interactive stop flow. `Ok(None)` means the user backed out.
pub async fn handle_stop(args: StopArgs) -> Result<Option<ActionResult>, ScanCtlError> {
    let mut config = config::load_config(args.config.as_deref().map(Path::new)).await?;
    config::apply_overrides(&mut config, args.base_url.clone(), None);
    config::validate_config(&config)?;

    let scan_type = args.scan_type.unwrap_or(config.stop.default_scan_type);
    let policy = if args.all { SubmitPolicy::All } else { config.stop.policy };
    let assume_yes = args.yes || config.stop.assume_yes;

    let client = ApiClient::new(&config.api)?;
    info!(base_url = %client.base_url(), scan_type = %scan_type, policy = %policy, "Preparing stop request");

    let invalidator = Arc::new(ViewInvalidator::default());
    let mut events = invalidator.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            debug!(scan_type = %event.scan_type, scans = event.scan_ids.len(), at = %event.at, "Cached scan views invalidated");
        }
    });

    let coordinator = StopScanCoordinator::new(Arc::new(client), Arc::new(BodyMessageResolver::default()));
    let action = StopScanAction::new(coordinator, invalidator, policy);
    let mut flow = ConfirmationFlow::new(Arc::new(action), scan_type);

    flow.request_cancel(args.scan_ids.into_iter().map(ScanIdentifier::from).collect())?;

    // Prompts go to stderr so --json output stays clean.
    let term = Term::stderr();
    render_prompt(&term, flow.selection(), policy)?;

    if !assume_yes && !ask(&term, "Are you sure you want to cancel? [y/N] ")? {
        flow.dismiss()?;
        term.write_line("Nothing was cancelled.")?;
        return Ok(None);
    }

    loop {
        let record = flow.confirm().await?;
        if record.success {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                term.write_line(&format!("{}", style("Cancel scan started").green().bold()))?;
            }
            return Ok(Some(record));
        }

        let message = record.message.clone().unwrap_or_default();
        term.write_line(&format!("{}", style(&message).red()))?;

        if assume_yes || args.json || !ask(&term, "Retry? [y/N] ")? {
            flow.dismiss()?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            return Ok(Some(record));
        }
    }
}

fn render_prompt(term: &Term, selection: &[ScanIdentifier], policy: SubmitPolicy) -> Result<(), ScanCtlError> {
    let title = if selection.len() > 1 { "Cancel scans" } else { "Cancel scan" };
    term.write_line(&format!("{}", style(title).bold()))?;
    for id in selection {
        term.write_line(&format!("  {}", style(id).dim()))?;
    }
    if selection.len() > 1 && policy == SubmitPolicy::FirstOnly {
        term.write_line(&format!(
            "{}",
            style(format!("Only {} will be cancelled (use --all to cancel every scan).", selection[0])).yellow()
        ))?;
    }
    term.write_line("The selected scan will be cancelled.")?;
    Ok(())
}

fn ask(term: &Term, question: &str) -> Result<bool, ScanCtlError> {
    term.write_str(question)?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
