use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use replayn::output;
use replayn::shell::{self, ShellCommand};
use replayn::{Executor, ExecutorConfig, KeyValue, Outcome, RawRequestConfig, Session};

#[derive(Parser, Debug)]
#[command(name = "replayn")]
#[command(author, version, about = "Compose, send and replay HTTP requests", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(short, long, default_value = "pretty", global = true)]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long, default_value = "false", global = true)]
    verbose: bool,

    /// Transport timeout in seconds (no timeout when unset)
    #[arg(long, env = "REPLAYN_TIMEOUT", global = true)]
    timeout: Option<u64>,

    /// Maximum number of redirects to follow
    #[arg(long, default_value = "10", global = true)]
    max_redirects: usize,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long, env = "REPLAYN_INSECURE", default_value = "false", global = true)]
    insecure: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and send a single request
    Send {
        /// HTTP method (GET/POST/PUT/DELETE etc.)
        #[arg(required = true)]
        method: String,

        /// Absolute URL
        #[arg(required = true)]
        url: String,

        /// Parameter row (format: "key=value"), can repeat
        #[arg(short = 'q', long = "param")]
        params: Vec<String>,

        /// Header row (format: "Header-Name: value"), can repeat
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Body text
        #[arg(short = 'd', long = "data")]
        body: Option<String>,

        /// Print the request that would be sent instead of sending it
        #[arg(long, default_value = "false")]
        dry_run: bool,
    },

    /// Edit a request interactively, send it and replay it
    Shell,

    /// Generate shell completions
    Completions {
        #[arg(required = true)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
    Compact,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if args.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::WARN.into()
            }),
        )
        .init();

    let config = ExecutorConfig {
        timeout: args.timeout.map(Duration::from_secs),
        max_redirects: args.max_redirects,
        accept_invalid_certs: args.insecure,
        ..ExecutorConfig::default()
    };

    match args.command {
        Command::Send {
            method,
            url,
            params,
            headers,
            body,
            dry_run,
        } => {
            let form = RawRequestConfig {
                method,
                url,
                params: parse_rows(&params, shell::parse_param_pair, "parameter")?,
                headers: parse_rows(&headers, shell::parse_header_line, "header")?,
                body_text: body.unwrap_or_default(),
            };

            if dry_run {
                let descriptor = replayn::build(&form).context("Cannot build request")?;
                match args.format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&descriptor)?),
                    _ => output::print_descriptor_pretty(&descriptor),
                }
                return Ok(());
            }

            let executor = Executor::new(&config).context("Failed to build HTTP client")?;
            let mut session = Session::new(executor);
            session.set_form(form);

            let outcome = session.send().await;
            render(&outcome, args.format);
            if outcome.error().is_some() {
                std::process::exit(1);
            }
        }
        Command::Shell => {
            let executor = Executor::new(&config).context("Failed to build HTTP client")?;
            run_shell(Session::new(executor), args.format).await?;
        }
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Args::command(), "replayn", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn parse_rows(
    raw: &[String],
    parse: fn(&str) -> Option<KeyValue>,
    what: &str,
) -> Result<Vec<KeyValue>> {
    raw.iter()
        .map(|r| parse(r).with_context(|| format!("Invalid {what}: {r:?}")))
        .collect()
}

fn render(outcome: &Outcome, format: OutputFormat) {
    match format {
        OutputFormat::Pretty => output::print_outcome_pretty(outcome),
        OutputFormat::Json => println!("{}", output::print_outcome_json(outcome)),
        OutputFormat::Compact => println!("{}", output::print_outcome_compact(outcome)),
    }
}

async fn run_shell(mut session: Session, format: OutputFormat) -> Result<()> {
    println!("replayn shell, type help for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        let command = shell::parse_line(&line);
        if command.apply(session.form_mut()) {
            continue;
        }

        match command {
            ShellCommand::Send => {
                println!("Sending...");
                let outcome = session.send().await;
                render(&outcome, format);
            }
            ShellCommand::Replay => {
                let outcome = session.replay().await;
                render(&outcome, format);
            }
            ShellCommand::Show => show_form(&session),
            ShellCommand::Clear => {
                session.reset();
                println!("Cleared");
            }
            ShellCommand::Help => println!("{}", shell::HELP),
            ShellCommand::Quit => break,
            ShellCommand::Invalid(message) => eprintln!("{message}"),
            _ => {}
        }
    }

    Ok(())
}

fn show_form(session: &Session) {
    let form = session.form();
    println!("method: {}", form.method);
    println!("url:    {}", form.url);
    for p in &form.params {
        println!("param:  {} = {}", p.key, p.value);
    }
    for h in &form.headers {
        println!("header: {}: {}", h.key, h.value);
    }
    if !form.body_text.is_empty() {
        println!("body:   {}", form.body_text);
    }
    println!();

    match session.preview() {
        Ok(descriptor) => output::print_descriptor_pretty(&descriptor),
        Err(e) => eprintln!("{e}"),
    }
}
