use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use movie_search::config::AppConfig;
use movie_search::external::MovieApiClient;
use movie_search::services::{ResponseCache, SearchController, SearchSnapshot};
use movie_search::ui::{self, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // 日志写到 stderr，避免和页面输出混在一起
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;
    let client = MovieApiClient::from_config(&config)?;
    let cache = ResponseCache::from_config(&config);

    tracing::info!("Movie API: {}", client.base_url());
    match config.cache_ttl {
        Some(ttl) => tracing::info!(
            "Response cache enabled (ttl: {:?}, capacity: {})",
            ttl,
            config.cache_capacity
        ),
        None => tracing::info!("Response cache disabled"),
    }

    let mut controller = SearchController::new(Arc::new(client), cache);
    let mut updates = controller.subscribe();

    controller.start().await;
    print_frame(&controller, &mut updates);
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) if ui::is_recoverable_read_error(&e) => {
                        tracing::warn!("Ignoring unreadable input line: {}", e);
                        println!("Input line is not valid UTF-8, ignored");
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };
                if !handle_line(&mut controller, &mut updates, &line).await {
                    break;
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                print_frame(&controller, &mut updates);
            }
        }
    }

    if let Some(cache) = controller.cache() {
        tracing::debug!("Cache stats on exit: {:?}", cache.stats());
    }
    tracing::info!("Bye");
    Ok(())
}

/// 处理一行输入，返回 false 表示退出
async fn handle_line(
    controller: &mut SearchController,
    updates: &mut watch::Receiver<SearchSnapshot>,
    line: &str,
) -> bool {
    let command = match ui::parse_command(line) {
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            return true;
        }
    };

    match command {
        Command::Set { field, value } => {
            if let Err(e) = controller.set_field(&field, &value).await {
                println!("{}", e);
                return true;
            }
            print_frame(controller, updates);
        }
        Command::Action(action) => {
            controller.dispatch(action).await;
            print_frame(controller, updates);
        }
        Command::Show => print_frame(controller, updates),
        Command::Query => println!("{}", controller.query()),
        Command::Help => {
            println!("{}", ui::HELP_TEXT);
            println!("  ({})", ui::render::slider_hint());
        }
        Command::Quit => return false,
        Command::Noop => {}
    }
    true
}

fn print_frame(controller: &SearchController, updates: &mut watch::Receiver<SearchSnapshot>) {
    let snapshot = updates.borrow_and_update().clone();
    println!();
    println!("{}", ui::render_page(controller.filters(), &snapshot.state));
}
