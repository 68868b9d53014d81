//! Console order book viewer for one Gemini symbol.
//!
//! Usage:
//!   gemini-feed <symbol> [book levels]
//!
//! The book renders to stdout; diagnostics go to stderr so they never
//! interleave with the rendered rows. Quit with ENTER or Ctrl-C.

use tokio::io::AsyncBufReadExt;

use gemini_feed::{FeedClient, Subscription};

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <symbol> [book levels]", program);
    std::process::exit(2);
}

/// Resolves when the user presses ENTER (or stdin reaches EOF)
async fn wait_for_enter() {
    let mut line = String::new();
    let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let _ = stdin.read_line(&mut line).await;
}

#[tokio::main]
async fn main() {
    // Diagnostics to stderr; stdout belongs to the book
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gemini_feed=info".parse().expect("valid directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "gemini-feed".to_string());

    let symbol = match args.next() {
        Some(symbol) => symbol,
        None => usage(&program),
    };

    let levels = match args.next() {
        Some(raw) => match raw.parse::<usize>() {
            Ok(levels) if levels >= 1 => levels,
            _ => usage(&program),
        },
        None => 1,
    };

    if args.next().is_some() {
        usage(&program);
    }

    let subscription = match Subscription::new(symbol, levels) {
        Ok(subscription) => subscription,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let mut client = FeedClient::new(subscription, std::io::stdout());

    // Dropping the run future tears the session down; no callback or
    // task outlives the select
    tokio::select! {
        result = client.run() => {
            if let Err(e) = result {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        _ = wait_for_enter() => {}
        _ = tokio::signal::ctrl_c() => {}
    }
}
