use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use console::style;
use serde_json::Value;

use crate::actions::{ActionContext, builtin_actions};
use crate::core::spacelift::SpaceliftService;
use crate::core::terminal::{self, GuideSection};
use crate::core::{config, config::Config};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActionFlags {
    pub input: String,
    pub dry_run: bool,
    pub config: Option<PathBuf>,
}

impl Default for ActionFlags {
    fn default() -> Self {
        Self {
            input: "{}".to_string(),
            dry_run: false,
            config: None,
        }
    }
}

pub(crate) fn parse_action_flags(args: &[String], start: usize) -> ActionFlags {
    let mut flags = ActionFlags::default();
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--input" | "-i" => {
                if i + 1 < args.len() {
                    flags.input = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--dry-run" => {
                flags.dry_run = true;
                i += 1;
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    flags.config = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    flags
}

pub async fn run(args: &[String]) -> Result<()> {
    let selector = args.get(2).filter(|v| !v.starts_with('-')).cloned();
    let flags = parse_action_flags(args, if selector.is_some() { 3 } else { 2 });

    // Listing works without credentials; executing needs the real config.
    let config = match config::load(flags.config.as_deref()) {
        Ok(config) => config,
        Err(_) if selector.is_none() => Config {
            spacelift: Default::default(),
            server: Default::default(),
        },
        Err(e) => return Err(e),
    };

    let service = Arc::new(SpaceliftService::new(&config.spacelift));
    let actions = builtin_actions(service);

    let Some(id) = selector else {
        let mut section = GuideSection::new("Workflow actions");
        for action in &actions {
            section = section.command(action.id(), action.description());
        }
        section.print();
        println!(
            "\n {} {} action <id> [--input JSON] [--dry-run]\n",
            style("Usage:").bold(),
            style("spacedock").green()
        );
        return Ok(());
    };

    let Some(action) = actions.iter().find(|a| a.id() == id) else {
        let known: Vec<&str> = actions.iter().map(|a| a.id()).collect();
        bail!("unknown action {:?} (available: {})", id, known.join(", "));
    };

    let input: Value = serde_json::from_str(&flags.input).context("--input must be valid JSON")?;

    let mut ctx = ActionContext::new(flags.dry_run);
    action.run(&mut ctx, input).await?;

    if flags.dry_run {
        terminal::print_warn("Dry run: no changes were made.");
        return Ok(());
    }

    terminal::print_success(&format!("Action {} completed", action.id()));
    for (key, value) in ctx.outputs() {
        terminal::print_status(key, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn action_flags_parse_input_and_dry_run() {
        let parsed = parse_action_flags(
            &args(&[
                "spacedock",
                "action",
                "spacelift:trigger-run",
                "--input",
                r#"{"stackId":"vpc"}"#,
                "--dry-run",
            ]),
            3,
        );
        assert_eq!(parsed.input, r#"{"stackId":"vpc"}"#);
        assert!(parsed.dry_run);
    }

    #[test]
    fn action_flags_default_to_empty_input() {
        let parsed = parse_action_flags(&args(&["spacedock", "action", "x"]), 3);
        assert_eq!(parsed, ActionFlags::default());
    }
}
