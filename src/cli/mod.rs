mod action_cmd;
mod serve;
mod stacks;

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::core::terminal::{self, GuideSection};

fn print_help() {
    terminal::print_banner();

    GuideSection::new("Gateway")
        .command("serve", "Run the gateway API server")
        .print();

    GuideSection::new("Stacks")
        .command("stacks", "List stacks (--watch to poll on an interval)")
        .command("run", "Trigger a run for a stack")
        .print();

    GuideSection::new("Automation")
        .command("action", "List or execute workflow actions")
        .print();

    println!(
        "\n {} {} <command> [flags]\n",
        style("Usage:").bold(),
        style("spacedock").green()
    );
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("help");

    match command {
        "serve" => serve::run(&args).await,
        "stacks" => stacks::list(&args).await,
        "run" => stacks::trigger(&args).await,
        "action" => action_cmd::run(&args).await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        other => {
            terminal::print_error(&format!("Unknown command: {}", other));
            print_help();
            std::process::exit(2)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CommonFlags {
    pub config: Option<PathBuf>,
    pub api_url: String,
}

/// Flags shared by the stack commands: an optional config path for direct
/// Spacelift access, or an `--api-url` pointing at a running gateway.
pub(crate) fn parse_common_flags(args: &[String], start: usize) -> CommonFlags {
    let mut flags = CommonFlags::default();
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    flags.config = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--api-url" => {
                if i + 1 < args.len() {
                    flags.api_url = args[i + 1].clone();
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

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ServeFlags {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
}

pub(crate) fn parse_serve_flags(args: &[String], start: usize) -> ServeFlags {
    let mut flags = ServeFlags::default();
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--host" => {
                if i + 1 < args.len() {
                    flags.host = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--port" => {
                if i + 1 < args.len() {
                    flags.port = args[i + 1].parse().ok();
                    i += 2;
                } else {
                    i += 1;
                }
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

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WatchFlags {
    pub watch: bool,
    pub interval_secs: u64,
}

const DEFAULT_WATCH_INTERVAL_SECS: u64 = 10;

pub(crate) fn parse_watch_flags(args: &[String], start: usize) -> WatchFlags {
    let mut flags = WatchFlags {
        watch: false,
        interval_secs: DEFAULT_WATCH_INTERVAL_SECS,
    };
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--watch" | "-w" => {
                flags.watch = true;
                i += 1;
            }
            "--interval" => {
                if i + 1 < args.len() {
                    flags.interval_secs = args[i + 1]
                        .parse()
                        .unwrap_or(DEFAULT_WATCH_INTERVAL_SECS)
                        .max(1);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn common_flags_parse_config_and_api_url() {
        let parsed = parse_common_flags(
            &args(&["spacedock", "stacks", "--config", "/tmp/s.toml", "--api-url", "http://127.0.0.1:7490"]),
            2,
        );
        assert_eq!(parsed.config, Some(PathBuf::from("/tmp/s.toml")));
        assert_eq!(parsed.api_url, "http://127.0.0.1:7490");
    }

    #[test]
    fn common_flags_default_to_direct_mode() {
        let parsed = parse_common_flags(&args(&["spacedock", "stacks"]), 2);
        assert_eq!(parsed, CommonFlags::default());
    }

    #[test]
    fn serve_flags_parse_host_and_port() {
        let parsed = parse_serve_flags(
            &args(&["spacedock", "serve", "--host", "0.0.0.0", "--port", "9000"]),
            2,
        );
        assert_eq!(parsed.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(parsed.port, Some(9000));
        assert_eq!(parsed.config, None);
    }

    #[test]
    fn serve_flags_ignore_dangling_value() {
        let parsed = parse_serve_flags(&args(&["spacedock", "serve", "--port"]), 2);
        assert_eq!(parsed.port, None);
    }

    #[test]
    fn watch_flags_parse_interval() {
        let parsed = parse_watch_flags(
            &args(&["spacedock", "stacks", "--watch", "--interval", "5"]),
            2,
        );
        assert!(parsed.watch);
        assert_eq!(parsed.interval_secs, 5);
    }

    #[test]
    fn watch_interval_never_drops_below_one_second() {
        let parsed = parse_watch_flags(
            &args(&["spacedock", "stacks", "--watch", "--interval", "0"]),
            2,
        );
        assert_eq!(parsed.interval_secs, 1);
    }
}
