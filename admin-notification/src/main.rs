use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use admin_notification::bell::{ClickBus, NotificationBell};
use admin_notification::config::AppConfig;
use admin_notification::console::{self, Command};
use admin_notification::source::HttpNotificationSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    admin_shared::telemetry::init_tracing("admin-notification");

    let config = AppConfig::load()?;
    config.log_summary();

    let source = Arc::new(HttpNotificationSource::new(
        &config.api_base_url,
        config.request_timeout(),
    )?);
    let clicks = ClickBus::new();
    let bell = NotificationBell::new(source, config.credentials(), config.poll_interval());

    // The bell's background work lives exactly as long as this guard.
    let mounted = bell.mount(&clicks);

    println!("{}", console::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupt received");
                break;
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to read stdin");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => println!("{}", console::execute(&bell, &clicks, command).await),
                    Err(e) => println!("{e}\n{}", console::HELP),
                }
            }
        }
    }

    mounted.unmount().await;
    Ok(())
}
