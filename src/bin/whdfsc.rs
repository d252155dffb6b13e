//! whdfsc: command-line client for WebHDFS-style gateways.
//!
//! Usage:
//!   whdfsc [--config FILE] [--rest-api URL] [--username U --password P] [--insecure] <COMMAND>
//!
//! Connection settings come from `~/.whdfsc.json` unless `--config` points
//! elsewhere; flags override file values.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use webhdfs::{Config, CreateOptions, FileStatus, FileType, Session, WebHdfsError};

const CONFIG_FILE: &str = ".whdfsc.json";

#[derive(Parser, Debug)]
#[command(name = "whdfsc", version, about = "WebHDFS command-line client")]
struct Cli {
    /// JSON config file (default: ~/.whdfsc.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Gateway base URL, e.g. http://namenode:9870/webhdfs/v1
    #[arg(long, global = true)]
    rest_api: Option<String>,

    #[arg(long, global = true)]
    username: Option<String>,

    #[arg(long, global = true)]
    password: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Log every gateway request
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the home directory
    Home,
    /// List directories
    Ls { paths: Vec<String> },
    /// Print file status as JSON
    Stat {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print content summaries
    Du { paths: Vec<String> },
    /// Write file contents to stdout
    Cat {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Download a file
    Get {
        remote: String,
        local: Option<PathBuf>,
        /// Replace an existing local file
        #[arg(short, long)]
        force: bool,
    },
    /// Upload a file
    Put {
        local: PathBuf,
        remote: Option<String>,
        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
        #[arg(short, long, default_value = webhdfs::DEFAULT_PERMISSION)]
        mode: String,
    },
    /// Append a local file to a remote file
    Append { local: PathBuf, remote: String },
    /// Create directories
    Mkdir {
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(short, long, default_value = webhdfs::DEFAULT_PERMISSION)]
        mode: String,
    },
    /// Move or rename
    Mv {
        #[arg(required = true, num_args = 2..)]
        paths: Vec<String>,
    },
    /// Delete files or directories
    Rm {
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(short, long)]
        recursive: bool,
    },
    /// Change owner, as OWNER, OWNER:GROUP or :GROUP
    Chown {
        owner_group: String,
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Change permission bits (octal)
    Chmod {
        mode: String,
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Create empty files or update timestamps
    Touch {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Create a symbolic link LINK pointing to TARGET
    Ln {
        target: String,
        link: String,
        /// Create missing parent directories
        #[arg(short, long)]
        parents: bool,
    },
    /// Append SOURCES to TARGET on the server side
    Concat {
        target: String,
        #[arg(required = true)]
        sources: Vec<String>,
    },
}

/// Result of one target that did not fail at the protocol level.
enum Outcome {
    Done,
    Unchanged,
}

impl From<bool> for Outcome {
    fn from(changed: bool) -> Self {
        if changed {
            Outcome::Done
        } else {
            Outcome::Unchanged
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "webhdfs=debug" } else { "webhdfs=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> webhdfs::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => match dirs::home_dir().map(|home| home.join(CONFIG_FILE)) {
            Some(path) if path.exists() => Config::from_file(path)?,
            _ => Config::default(),
        },
    };

    if let Some(rest_api) = &cli.rest_api {
        config.rest_api = rest_api.clone();
    }
    if let Some(username) = &cli.username {
        config.username = Some(username.clone());
    }
    if let Some(password) = &cli.password {
        config.password = Some(password.clone());
    }
    if cli.insecure {
        config.insecure = true;
    }
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let session = match load_config(&cli).and_then(|config| Session::connect(&config)) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("whdfsc: {}", e);
            return ExitCode::from(2);
        }
    };

    let failures = run(&session, cli.command);
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Run one command; returns the number of failed targets.
fn run(session: &Session, command: Command) -> usize {
    match command {
        Command::Home => each(&[String::new()], |_| {
            println!("{}", session.home());
            Ok(Outcome::Done)
        }),
        Command::Ls { paths } => {
            let paths = or_home(paths);
            let show_headers = paths.len() > 1;
            each(&paths, |path| {
                let entries = session.list_status(path)?;
                if show_headers {
                    println!("{}:", session.resolve(path));
                }
                for entry in &entries {
                    let name = if entry.path_suffix.is_empty() {
                        path
                    } else {
                        entry.path_suffix.as_str()
                    };
                    println!("{}", format_entry(entry, name));
                }
                Ok(Outcome::Done)
            })
        }
        Command::Stat { paths } => each(&paths, |path| {
            let status = session.file_status(path)?;
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(Outcome::Done)
        }),
        Command::Du { paths } => each(&or_home(paths), |path| {
            let summary = session.content_summary(path)?;
            println!(
                "{:>14} {:>14} {}",
                summary.length,
                summary.space_consumed,
                session.resolve(path)
            );
            Ok(Outcome::Done)
        }),
        Command::Cat { paths } => each(&paths, |path| {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            session.read_to(path, &mut out)?;
            out.flush()?;
            Ok(Outcome::Done)
        }),
        Command::Get {
            remote,
            local,
            force,
        } => each(&[remote], |remote| {
            let local = match &local {
                Some(local) => local.clone(),
                None => default_local_name(session, remote)?,
            };
            check_local_target(&local, force)?;
            session.get(remote, &local)?;
            Ok(Outcome::Done)
        }),
        Command::Put {
            local,
            remote,
            force,
            mode,
        } => {
            let remote = match remote {
                Some(remote) => remote,
                None => match local.file_name() {
                    Some(name) => name.to_string_lossy().into_owned(),
                    None => {
                        eprintln!("whdfsc: {}: cannot derive a remote name", local.display());
                        return 1;
                    }
                },
            };
            let options = CreateOptions::new().permission(mode).overwrite(force);
            each(&[remote], |remote| {
                session.put(remote, &local, &options)?;
                Ok(Outcome::Done)
            })
        }
        Command::Append { local, remote } => each(&[remote], |remote| {
            session.append_file(remote, &local)?;
            Ok(Outcome::Done)
        }),
        Command::Mkdir { paths, mode } => {
            each(&paths, |path| Ok(session.mkdirs(path, &mode)?.into()))
        }
        Command::Mv { mut paths } => {
            let dest = paths.pop().unwrap_or_default();
            if paths.len() > 1 {
                // Several sources: move each into the destination directory.
                each(&paths, |src| {
                    let name = src.rsplit('/').find(|s| !s.is_empty()).unwrap_or(src);
                    let target = format!("{}/{}", session.resolve(&dest), name);
                    Ok(session.rename(src, &target)?.into())
                })
            } else {
                each(&paths, |src| Ok(session.rename(src, &dest)?.into()))
            }
        }
        Command::Rm { paths, recursive } => {
            each(&paths, |path| Ok(session.delete(path, recursive)?.into()))
        }
        Command::Chown { owner_group, paths } => {
            let (owner, group) = match owner_group.split_once(':') {
                Some((owner, group)) => (owner, Some(group)),
                None => (owner_group.as_str(), None),
            };
            each(&paths, |path| {
                session.set_owner(path, Some(owner), group)?;
                Ok(Outcome::Done)
            })
        }
        Command::Chmod { mode, paths } => each(&paths, |path| {
            session.set_permission(path, &mode)?;
            Ok(Outcome::Done)
        }),
        Command::Touch { paths } => each(&paths, |path| {
            session.touch(path)?;
            Ok(Outcome::Done)
        }),
        Command::Ln {
            target,
            link,
            parents,
        } => each(&[link], |link| {
            session.create_symlink(link, &target, parents)?;
            Ok(Outcome::Done)
        }),
        Command::Concat { target, sources } => each(&[target], |target| {
            session.concat(target, &sources)?;
            Ok(Outcome::Done)
        }),
    }
}

/// Apply `op` to every target, reporting failures without stopping.
fn each<F>(targets: &[String], mut op: F) -> usize
where
    F: FnMut(&str) -> webhdfs::Result<Outcome>,
{
    let mut failures = 0;
    for target in targets {
        match op(target) {
            Ok(Outcome::Done) => {}
            Ok(Outcome::Unchanged) => {
                eprintln!("whdfsc: {}: nothing changed", target);
                failures += 1;
            }
            Err(e) => {
                eprintln!("whdfsc: {}: {}", target, e);
                failures += 1;
            }
        }
    }
    failures
}

fn or_home(paths: Vec<String>) -> Vec<String> {
    if paths.is_empty() {
        vec![String::new()]
    } else {
        paths
    }
}

fn default_local_name(session: &Session, remote: &str) -> webhdfs::Result<PathBuf> {
    let resolved = session.resolve(remote);
    let name = resolved
        .segments()
        .last()
        .map(|name| Path::new(name).to_path_buf());
    name.ok_or_else(|| {
        WebHdfsError::InvalidArgument("cannot derive a local file name".to_string())
    })
}

/// Refuse to replace an existing local file unless forced.
fn check_local_target(local: &Path, force: bool) -> webhdfs::Result<()> {
    if local.exists() && !force {
        return Err(WebHdfsError::InvalidArgument(format!(
            "{} already exists (use --force to overwrite)",
            local.display()
        )));
    }
    Ok(())
}

fn format_entry(entry: &FileStatus, name: &str) -> String {
    let kind = match entry.file_type {
        FileType::Directory => 'd',
        FileType::Symlink => 'l',
        FileType::File => '-',
    };
    let mut line = format!(
        "{}{:>4} {:<10} {:<10} {:>12} {}",
        kind, entry.permission, entry.owner, entry.group, entry.length, name
    );
    if let Some(target) = &entry.symlink {
        line.push_str(" -> ");
        line.push_str(target);
    }
    line
}
