use anyhow::{Context, Result};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use memkv::{
    input::{parse_line, InputError},
    Engine, EngineConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = EngineConfig::from_args(std::env::args()).context("invalid command line")?;

    subscriber_config(&config.log_level)?;

    let engine = Engine::new(config.clone());

    if !config.subscribe_channels.is_empty() {
        let subscription = engine.pub_sub().subscribe(&config.subscribe_channels).await;
        let shutdown = engine.shutdown_signal();

        tokio::spawn(async move {
            subscription
                .listen(
                    |message| println!("[{}] {}", message.channel, message.payload),
                    shutdown,
                )
                .await;
        });
    }

    let session = engine.session();
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let (name, arguments) = match parse_line(&line) {
            Ok(parsed) => parsed,
            Err(InputError::EmptyLine) => continue,
            Err(e) => {
                stdout
                    .write_all(format!("(error) ERR {}\n", e).as_bytes())
                    .await?;
                continue;
            }
        };

        if name.eq_ignore_ascii_case("quit") {
            break;
        }

        let output = match session.execute(&name, arguments).await {
            Ok(reply) => reply.to_string(),
            Err(e) => format!("(error) {}", e.as_string()),
        };

        stdout.write_all(format!("{}\n", output).as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("input closed");
    engine.shutdown();

    Ok(())
}

/// Configures a tracing subscriber that logs to STDERR so replies on STDOUT stay clean.
fn subscriber_config(log_level: &str) -> Result<()> {
    let level = log_level
        .parse::<Level>()
        .with_context(|| format!("invalid log level '{}'", log_level))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting tracing default subscriber failed")
}
