use std::time::Duration;

use anyhow::{Result, bail};
use console::style;

use super::{CommonFlags, parse_common_flags, parse_watch_flags};
use crate::client::GatewayClient;
use crate::core::spacelift::SpaceliftService;
use crate::core::spacelift::types::{RunTriggerResult, Stack, StackState};
use crate::core::{config, terminal};

/// Stack commands either talk to Spacelift directly (local config) or to a
/// running gateway (`--api-url`).
enum Source {
    Gateway(GatewayClient),
    Direct(SpaceliftService),
}

impl Source {
    fn from_flags(flags: &CommonFlags) -> Result<Self> {
        if flags.api_url.is_empty() {
            let config = config::load(flags.config.as_deref())?;
            Ok(Source::Direct(SpaceliftService::new(&config.spacelift)))
        } else {
            Ok(Source::Gateway(GatewayClient::new(&flags.api_url)))
        }
    }

    async fn stacks(&self) -> Result<Vec<Stack>> {
        match self {
            Source::Gateway(client) => client.get_stacks().await,
            Source::Direct(service) => Ok(service.get_stacks().await?),
        }
    }

    async fn trigger(&self, stack_id: &str) -> Result<RunTriggerResult> {
        match self {
            Source::Gateway(client) => client.trigger_run(stack_id).await,
            Source::Direct(service) => Ok(service.trigger_run(stack_id).await?),
        }
    }
}

pub async fn list(args: &[String]) -> Result<()> {
    let common = parse_common_flags(args, 2);
    let watch = parse_watch_flags(args, 2);
    let source = Source::from_flags(&common)?;

    if !watch.watch {
        render_table(&source.stacks().await?);
        return Ok(());
    }

    // Fetch immediately, then on a fixed cadence. Ctrl-C tears the timer
    // down with the process; an in-flight fetch is never cancelled mid-call.
    let mut ticker = tokio::time::interval(Duration::from_secs(watch.interval_secs));
    loop {
        ticker.tick().await;
        match source.stacks().await {
            Ok(stacks) => render_table(&stacks),
            Err(e) => terminal::print_error(&format!("{}", e)),
        }
    }
}

pub async fn trigger(args: &[String]) -> Result<()> {
    let stack_id = match args.get(2) {
        Some(v) if !v.starts_with('-') => v.clone(),
        _ => bail!("usage: spacedock run <stack-id> [--config PATH | --api-url URL]"),
    };
    let common = parse_common_flags(args, 3);
    let source = Source::from_flags(&common)?;

    let result = source.trigger(&stack_id).await?;
    terminal::print_success(&format!(
        "Run {} triggered for stack {} (state {})",
        result.id, stack_id, result.state
    ));
    Ok(())
}

fn render_table(stacks: &[Stack]) {
    if stacks.is_empty() {
        terminal::print_info("No stacks found.");
        return;
    }

    let id_w = column_width(stacks.iter().map(|s| s.id.len()), "ID".len());
    let name_w = column_width(stacks.iter().map(|s| s.name.len()), "NAME".len());
    let branch_w = column_width(stacks.iter().map(|s| s.branch.len()), "BRANCH".len());

    println!(
        "{}",
        style(format!(
            "{:<id_w$}  {:<name_w$}  {:<16}  {:<branch_w$}  {}",
            "ID", "NAME", "STATE", "BRANCH", "SPACE"
        ))
        .bold()
    );
    for stack in stacks {
        println!(
            "{:<id_w$}  {:<name_w$}  {}  {:<branch_w$}  {}",
            stack.id,
            stack.name,
            styled_state(stack.state),
            stack.branch,
            stack.space_details.name
        );
    }
}

fn column_width(lengths: impl Iterator<Item = usize>, header: usize) -> usize {
    lengths.max().unwrap_or(0).max(header)
}

fn styled_state(state: StackState) -> console::StyledObject<String> {
    // Pad before styling so ANSI escapes do not skew the column width.
    let padded = format!("{:<16}", state.as_str());
    match state {
        StackState::Finished | StackState::Confirmed => style(padded).green(),
        StackState::Failed | StackState::Stopped | StackState::Discarded => style(padded).red(),
        StackState::None => style(padded).dim(),
        _ => style(padded).yellow(),
    }
}
