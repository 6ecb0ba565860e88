//! Argument parsing

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use todosync_engine::{ExportConfig, SourceConfig, SyncConfig, DEFAULT_FILE_TYPES};
use todosync_extract::ExtensionSet;
use todosync_remote::{RemoteConfig, API_TOKEN_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, WORKSPACE_ID_ENV};

/// Parsed invocation
#[derive(Debug)]
pub(crate) enum Invocation {
    Sync {
        config: SyncConfig,
        api_key: Option<String>,
        workspace_id: Option<String>,
        base_url: String,
    },
    Export {
        source: SourceConfig,
        export: ExportConfig,
    },
}

impl Invocation {
    /// Remote settings for a sync; `None` when no credential was given
    pub(crate) fn remote_config(
        api_key: Option<String>,
        workspace_id: Option<String>,
        base_url: String,
    ) -> Option<RemoteConfig> {
        let mut config = RemoteConfig::new(api_key?).with_base_url(base_url);
        if let Some(workspace_id) = workspace_id {
            config = config.with_workspace_id(workspace_id);
        }
        Some(config)
    }
}

fn source_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("dir")
                .long("dir")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory to scan for TODO markers"),
        )
        .arg(
            Arg::new("file-types")
                .long("file-types")
                .default_value(DEFAULT_FILE_TYPES)
                .help("Comma-separated file extensions to scan (e.g. .tex,.py,.md)"),
        )
}

fn export_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("export-json")
                .long("export-json")
                .action(ArgAction::SetTrue)
                .help("Export TODOs to a JSON file"),
        )
        .arg(
            Arg::new("json-path")
                .long("json-path")
                .value_parser(value_parser!(PathBuf))
                .help("Path to the JSON export [default: <dir>/todo.json]"),
        )
        .arg(
            Arg::new("export-md")
                .long("export-md")
                .action(ArgAction::SetTrue)
                .help("Export TODOs as Markdown tables"),
        )
        .arg(
            Arg::new("md-path")
                .long("md-path")
                .value_parser(value_parser!(PathBuf))
                .help("Path to the Markdown export [default: <dir>/README.md]"),
        )
}

/// Build the command tree
pub(crate) fn command() -> Command {
    let sync = export_args(source_args(
        Command::new("sync")
            .about("Sync TODO markers with Motion")
            .arg(
                Arg::new("api-key")
                    .long("api-key")
                    .env(API_TOKEN_ENV)
                    .hide_env_values(true)
                    .help("Motion API key"),
            )
            .arg(
                Arg::new("ledger")
                    .long("ledger")
                    .value_parser(value_parser!(PathBuf))
                    .help("Ledger file [default: <dir>/.todosync-ledger.json]"),
            )
            .arg(
                Arg::new("workspace-id")
                    .long("workspace-id")
                    .env(WORKSPACE_ID_ENV)
                    .help("Motion workspace to sync with"),
            )
            .arg(
                Arg::new("base-url")
                    .long("base-url")
                    .env(BASE_URL_ENV)
                    .default_value(DEFAULT_BASE_URL)
                    .help("Motion API root"),
            )
            .arg(
                Arg::new("dry-run")
                    .long("dry-run")
                    .action(ArgAction::SetTrue)
                    .help("Show what would change without touching Motion or the ledger"),
            ),
    ));

    let export = export_args(source_args(
        Command::new("export").about("Export TODO markers to JSON or Markdown"),
    ));

    Command::new("todosync")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Keep TODO markers in sync with Motion tasks")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("debug")
                .long("debug")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(sync)
        .subcommand(export)
}

fn source_from(args: &ArgMatches) -> SourceConfig {
    let mut source = SourceConfig::new(
        args.get_one::<PathBuf>("dir")
            .cloned()
            .unwrap_or_default(),
    );
    if let Some(types) = args.get_one::<String>("file-types") {
        source = source.with_extensions(ExtensionSet::parse(types));
    }
    source
}

fn export_from(args: &ArgMatches) -> ExportConfig {
    let mut export = ExportConfig::new();
    if args.get_flag("export-json") {
        export = export.with_json(args.get_one::<PathBuf>("json-path").cloned());
    }
    if args.get_flag("export-md") {
        export = export.with_markdown(args.get_one::<PathBuf>("md-path").cloned());
    }
    export
}

/// Turn matches into an [`Invocation`]; `None` for an unknown subcommand
pub(crate) fn invocation(matches: &ArgMatches) -> Option<Invocation> {
    match matches.subcommand()? {
        ("sync", args) => {
            let source = source_from(args);
            let mut config = SyncConfig::new(source.dir.clone())
                .with_extensions(source.extensions)
                .with_dry_run(args.get_flag("dry-run"))
                .with_export(export_from(args));
            if let Some(ledger) = args.get_one::<PathBuf>("ledger") {
                config = config.with_ledger_path(ledger.clone());
            }
            Some(Invocation::Sync {
                config,
                api_key: args.get_one::<String>("api-key").cloned(),
                workspace_id: args.get_one::<String>("workspace-id").cloned(),
                base_url: args
                    .get_one::<String>("base-url")
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            })
        }
        ("export", args) => Some(Invocation::Export {
            source: source_from(args),
            export: export_from(args),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Invocation {
        let matches = command().try_get_matches_from(args).unwrap();
        invocation(&matches).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn sync_defaults() {
        let Invocation::Sync {
            config, base_url, ..
        } = parse(&["todosync", "sync", "--dir", "paper", "--api-key", "k"])
        else {
            panic!("expected sync");
        };
        assert_eq!(config.source.dir, PathBuf::from("paper"));
        assert_eq!(config.source.extensions.as_slice(), &["tex"]);
        assert!(!config.dry_run);
        assert!(!config.export.any());
        assert_eq!(config.ledger_target(), PathBuf::from("paper/.todosync-ledger.json"));
        assert_eq!(base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn sync_flags() {
        let Invocation::Sync {
            config,
            api_key,
            workspace_id,
            ..
        } = parse(&[
            "todosync",
            "--debug",
            "sync",
            "--dir",
            "paper",
            "--file-types",
            ".tex,.py",
            "--api-key",
            "secret",
            "--workspace-id",
            "ws1",
            "--ledger",
            "state.json",
            "--dry-run",
            "--export-md",
            "--md-path",
            "TODO.md",
        ])
        else {
            panic!("expected sync");
        };
        assert!(config.dry_run);
        assert_eq!(config.source.extensions.as_slice(), &["tex", "py"]);
        assert_eq!(config.ledger_target(), PathBuf::from("state.json"));
        assert_eq!(
            config.export.markdown_target(&config.source.dir),
            PathBuf::from("TODO.md")
        );
        assert!(!config.export.json);
        assert_eq!(api_key.as_deref(), Some("secret"));
        assert_eq!(workspace_id.as_deref(), Some("ws1"));
    }

    #[test]
    fn export_requires_dir() {
        assert!(command().try_get_matches_from(["todosync", "export"]).is_err());
    }

    #[test]
    fn export_paths() {
        let Invocation::Export { source, export } = parse(&[
            "todosync",
            "export",
            "--dir",
            "paper",
            "--export-json",
        ]) else {
            panic!("expected export");
        };
        assert_eq!(export.json_target(&source.dir), PathBuf::from("paper/todo.json"));
        assert!(!export.markdown);
    }

    #[test]
    fn remote_config_needs_key() {
        assert!(Invocation::remote_config(None, None, DEFAULT_BASE_URL.into()).is_none());
        let config =
            Invocation::remote_config(Some("k".into()), Some("ws".into()), "http://x".into())
                .unwrap();
        assert_eq!(config.workspace_id.as_deref(), Some("ws"));
        assert_eq!(config.base_url, "http://x");
    }
}
