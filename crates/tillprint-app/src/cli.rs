// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use tillprint_core::config::SpoolerBackend;
use tillprint_core::{AppConfig, Result};

use crate::{commands, server};

#[derive(Parser, Debug)]
#[command(
    name = "tillprint",
    about = "Print POS receipts to local CUPS printers, queueing them while a printer is offline",
    version
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List the printers the spooler knows about and exit
    Printers,
    /// Render a JSON receipt file and write the text preview to stdout
    Preview(PreviewArgs),
}

/// Flags accepted by every subcommand.
#[derive(Args, Debug, Default)]
pub(crate) struct GlobalArgs {
    /// JSON config file (defaults to $TILLPRINT_CONFIG, then the data directory)
    #[arg(long, global = true)]
    pub(crate) config: Option<PathBuf>,
    /// Spooler backend: `cups` or `memory`
    #[arg(long, global = true)]
    pub(crate) spooler: Option<SpoolerBackend>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<IpAddr>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// Receipt JSON: either `{ "type": .., "receipt": {..} }` or the bare receipt
    pub(crate) file: PathBuf,
    /// Receipt type; overrides any `type` in the file
    #[arg(long = "type", short = 't')]
    pub(crate) receipt_type: Option<String>,
}

impl GlobalArgs {
    /// Load configuration and apply the flags on top.  Flags beat the
    /// environment, which beats the file.
    pub(crate) fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(backend) = self.spooler {
            config.spooler.backend = backend;
        }
        Ok(config)
    }
}

impl ServeArgs {
    pub(crate) fn apply(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        config.validate()
    }
}

pub(crate) async fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(&cli.global, args).await,
        Command::Printers => commands::list_printers(&cli.global).await,
        Command::Preview(args) => commands::preview(&cli.global, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["tillprint"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_flags_parse() {
        let cli = Cli::try_parse_from([
            "tillprint",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--spooler",
            "memory",
        ])
        .unwrap();
        assert_eq!(cli.global.spooler, Some(SpoolerBackend::Memory));
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.host, Some("0.0.0.0".parse().unwrap()));
                assert_eq!(args.port, Some(8080));
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn bad_spooler_is_rejected() {
        assert!(Cli::try_parse_from(["tillprint", "--spooler", "lpd"]).is_err());
    }

    #[test]
    fn serve_flags_override_config() {
        let mut config = AppConfig::default();
        let args = ServeArgs {
            host: None,
            port: Some(9100),
        };
        args.apply(&mut config).unwrap();
        assert_eq!(config.server.port, 9100);
        assert!(config.server.host.is_loopback());
    }

    #[test]
    fn preview_takes_type_flag() {
        let cli =
            Cli::try_parse_from(["tillprint", "preview", "r.json", "--type", "cash_expense"])
                .unwrap();
        match cli.command {
            Some(Command::Preview(args)) => {
                assert_eq!(args.file, PathBuf::from("r.json"));
                assert_eq!(args.receipt_type.as_deref(), Some("cash_expense"));
            }
            other => panic!("expected preview, got {other:?}"),
        }
    }
}
