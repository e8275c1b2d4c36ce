// Entrypoint for the CLI.
// - Loads `.env` files and builds the config once, then hands it to the
//   client; nothing reads the environment after this point.
// - Works out what to do (and reads the file to upload) before logging in,
//   so bad arguments never cost a network round trip.
// - Returns `anyhow::Result` so any error exits non-zero with a message.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pastebiner::api::PastebinClient;
use pastebiner::config::{load_env_files, Config};
use pastebiner::ui::{print_pastes, print_report, with_spinner, TerminalConfirm};
use pastebiner::upload::UploadRequest;
use pastebiner::workflow::run_upload;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Upload a file to pastebin, replacing older pastes of the same name.
#[derive(Parser, Debug)]
#[command(name = "pastebiner", version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    /// Extra `.env` file with credentials.
    #[arg(long, env = "PASTEBINER_ENV_FILE", global = true)]
    env_file: Option<PathBuf>,

    /// Name (with extension) for content piped on stdin.
    #[arg(long, default_value = "untitled.text")]
    name: String,

    /// File to upload; its extension becomes the paste format. Reads stdin
    /// when omitted and stdin is not a terminal.
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List your pastes.
    List,
    /// Show your account details.
    Info,
    /// Log in and print the user session key.
    Login,
    /// Print the raw contents of a paste.
    #[command(visible_alias = "get")]
    Show { key: String },
    /// Delete one of your pastes.
    Delete { key: String },
}

#[derive(Debug)]
enum Action {
    Login,
    List,
    Info,
    Show(String),
    Delete(String),
    Upload(UploadRequest),
}

/// Decide what to run. `piped` is stdin when it is not a terminal.
fn plan<R: Read>(cli: Cli, config: &Config, piped: Option<R>) -> anyhow::Result<Action> {
    let action = match (cli.command, cli.file) {
        (Some(Command::Login), _) => Action::Login,
        (Some(Command::List), _) => Action::List,
        (Some(Command::Info), _) => Action::Info,
        (Some(Command::Show { key }), _) => Action::Show(key),
        (Some(Command::Delete { key }), _) => Action::Delete(key),
        (None, Some(file)) => Action::Upload(
            UploadRequest::from_path(&file, config)
                .with_context(|| format!("cannot upload {}", file.display()))?,
        ),
        (None, None) => match piped {
            Some(reader) => Action::Upload(
                UploadRequest::from_reader(&cli.name, reader, config)
                    .context("cannot upload stdin")?,
            ),
            None => bail!("provide one file name"),
        },
    };
    Ok(action)
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    load_env_files(cli.env_file.as_deref())?;
    let config = Config::from_env().context("failed to read config")?;

    let stdin = io::stdin();
    let piped = (!stdin.is_terminal()).then(|| stdin.lock());
    let action = plan(cli, &config, piped)?;

    let client = PastebinClient::from_config(config).context("failed to build HTTP client")?;
    let user_key = with_spinner("Logging in...", || client.login())?.context("login failed")?;
    info!("logged in");

    match action {
        Action::Login => println!("{user_key}"),
        Action::List => {
            let pastes = with_spinner("Listing pastes...", || client.list_pastes(&user_key))?
                .context("failed to list pastes")?;
            print_pastes(&pastes);
        }
        Action::Info => {
            let details = client
                .user_details(&user_key)
                .context("failed to fetch account details")?;
            print!("{details}");
        }
        Action::Show(key) => {
            let text = client
                .show_paste(&user_key, &key)
                .with_context(|| format!("failed to fetch paste {key}"))?;
            println!("{text}");
        }
        Action::Delete(key) => {
            let res = client
                .delete_paste(&user_key, &key)
                .with_context(|| format!("failed to delete paste {key}"))?;
            if res.is_bad_request() {
                bail!("failed to delete paste {key}: {}", res.body.trim());
            }
            println!("{}", res.body);
        }
        Action::Upload(request) => {
            let report = run_upload(&client, &user_key, &request, &mut TerminalConfirm)
                .context("upload failed")?;
            print_report(&report);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Cursor;

    fn config() -> Config {
        Config::from_vars(|_| None).unwrap()
    }

    fn plan_args(args: &[&str], piped: Option<&str>) -> anyhow::Result<Action> {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        plan(cli, &config(), piped.map(|s| Cursor::new(s.as_bytes().to_vec())))
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn nothing_to_upload_fails_before_any_request() {
        let err = plan_args(&["pastebiner"], None).unwrap_err();
        assert_eq!(err.to_string(), "provide one file name");
    }

    #[test]
    fn bad_file_name_fails_before_any_request() {
        let err = plan_args(&["pastebiner", "noext"], None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<pastebiner::PastebinError>(),
            Some(pastebiner::PastebinError::Configuration(_))
        ));
    }

    #[test]
    fn piped_stdin_is_uploaded_under_the_given_name() {
        match plan_args(&["pastebiner", "--name", "notes.md"], Some("# hi")).unwrap() {
            Action::Upload(request) => {
                assert_eq!(request.name, "notes");
                assert_eq!(request.format, "md");
                assert_eq!(request.content, b"# hi");
            }
            other => panic!("unexpected: {other:?}"),
        }

        match plan_args(&["pastebiner"], Some("x")).unwrap() {
            Action::Upload(request) => assert_eq!(request.name, "untitled"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn subcommands_map_to_actions() {
        assert!(matches!(plan_args(&["pastebiner", "list"], None).unwrap(), Action::List));
        assert!(matches!(plan_args(&["pastebiner", "info"], None).unwrap(), Action::Info));
        assert!(matches!(
            plan_args(&["pastebiner", "get", "Xy12"], None).unwrap(),
            Action::Show(key) if key == "Xy12"
        ));
        assert!(matches!(
            plan_args(&["pastebiner", "delete", "abc"], Some("ignored")).unwrap(),
            Action::Delete(key) if key == "abc"
        ));
    }
}
