use std::fs;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};

use subrelay::interfaces::convert_subscription;
use subrelay::models::{override_total, SubscriptionUserInfo};
use subrelay::utils::http::is_http_url;
use subrelay::web_handlers::relay::{serve, RelaySnapshot};

/// Default output path for the saved document.
const DEFAULT_OUTPUT_FILE: &str = "subscriptions/config.yaml";

/// Convert proxy subscription links into a Clash configuration and republish it locally
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Subscription URL or raw link payload; read from stdin when omitted
    input: Option<String>,

    /// Write the document to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Serve the document on a local subscription URL
    #[arg(short, long)]
    serve: bool,

    /// Listen port for the local subscription server
    #[arg(short, long, value_name = "PORT", default_value_t = 25500)]
    port: u16,

    /// Clash template file the proxies are merged into
    #[arg(short, long, value_name = "FILE", default_value = "template.yaml")]
    template: PathBuf,

    /// Quota in gigabytes replacing a zero `total=` in the traffic metadata
    #[arg(long, value_name = "GB")]
    total_gb: Option<u64>,
}

#[actix_web::main]
async fn main() {
    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    // Parse command line arguments
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(mut args: Args) -> anyhow::Result<()> {
    let input = match args.input.take() {
        Some(input) => input,
        None => read_input().context("failed to read subscription input")?,
    };
    let input = input.trim().to_string();
    if input.is_empty() {
        bail!("no subscription input given");
    }

    let result = convert_subscription(&input, &args.template)
        .await
        .context("conversion failed")?;

    let (save_to, run_server) = resolve_sinks(&args)?;

    let mut user_info = result.user_info;
    if let Some(raw) = user_info.clone() {
        if SubscriptionUserInfo::parse(&raw).has_zero_total() {
            if let Some(gb) = resolve_total_gb(args.total_gb)? {
                user_info = Some(override_total(&raw, gb));
                info!("total traffic quota overridden to {} GB", gb);
            }
        }
    } else if !is_http_url(&input) {
        info!("raw link input carries no traffic metadata");
    }

    if let Some(path) = &save_to {
        write_document(path, &result.document)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("configuration saved to {}", path.display());
    }

    if run_server {
        let snapshot = RelaySnapshot {
            document: result.document,
            user_info,
        };
        serve(snapshot, args.port)
            .await
            .context("local subscription server failed")?;
    }

    Ok(())
}

/// Reads the subscription input: an interactive prompt on a terminal,
/// otherwise the whole of stdin so piped payloads keep their newlines.
fn read_input() -> io::Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        print!("Subscription URL or links: ");
        io::stdout().flush()?;
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        Ok(line)
    } else {
        let mut payload = String::new();
        stdin.lock().read_to_string(&mut payload)?;
        Ok(payload)
    }
}

/// Decides where the document goes. Explicit flags win; with none given, a
/// terminal gets the mode menu and a pipe defaults to saving the file.
fn resolve_sinks(args: &Args) -> io::Result<(Option<PathBuf>, bool)> {
    if args.output.is_some() || args.serve {
        return Ok((args.output.clone(), args.serve));
    }
    if !io::stdin().is_terminal() {
        return Ok((Some(PathBuf::from(DEFAULT_OUTPUT_FILE)), false));
    }

    println!("Output mode:");
    println!("  1. serve a local subscription URL");
    println!("  2. save the YAML file");
    println!("  3. both");
    print!("Choice [2]: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let default_path = PathBuf::from(DEFAULT_OUTPUT_FILE);
    Ok(match line.trim() {
        "1" => (None, true),
        "3" => (Some(default_path), true),
        "" | "2" => (Some(default_path), false),
        other => {
            warn!("unrecognized choice '{}', saving the file", other);
            (Some(default_path), false)
        }
    })
}

/// Picks the override quota: the flag wins, otherwise ask on a terminal.
fn resolve_total_gb(flag: Option<u64>) -> io::Result<Option<u64>> {
    if flag.is_some() {
        return Ok(flag);
    }
    if !io::stdin().is_terminal() {
        return Ok(None);
    }

    info!("server reports a zero total quota (unlimited or unset)");
    print!("Total traffic limit in GB (enter to keep): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim();
    if answer.is_empty() {
        return Ok(None);
    }
    match answer.parse::<u64>() {
        Ok(gb) => Ok(Some(gb)),
        Err(_) => {
            warn!("not a number, keeping the reported quota");
            Ok(None)
        }
    }
}

/// Writes the document, creating the output directory when needed.
fn write_document(path: &Path, document: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, document)
}
