use std::io::Write as _;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use support_widget::templates::render_welcome;
use support_widget::{ChatGateway, ChatRole, FileStore, HttpGateway, KeyValueStore, SupportWidget};

const DEFAULT_ENDPOINT: &str = "http://localhost:4000/api/demo-chat";

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("support_widget=warn")),
        )
        .init();

    let slug = std::env::args().nth(1).unwrap_or_else(|| "demo".to_string());
    let endpoint =
        std::env::var("CHAT_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
    let state_dir = std::env::var("WIDGET_STATE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("support-widget")
        });

    let mut widget =
        SupportWidget::initialize(&slug, HttpGateway::new(endpoint), FileStore::new(state_dir));

    println!("{} Support", widget.company_name());
    println!("{}", render_welcome(widget.company_name()));
    println!();

    widget.refresh_company_info().await;
    print_catalog(&widget);
    println!("Commands: /reset starts a new conversation, /quit exits.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(&widget);
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                tracing::warn!("stdin read failed: {err}");
                break;
            }
        };
        let text = line.trim().to_string();

        match text.as_str() {
            "/quit" | "/exit" => break,
            "/reset" => {
                widget.reset_conversation();
                println!(
                    "Started a new conversation (session {}).",
                    widget.session_id()
                );
                continue;
            }
            _ => {}
        }

        if !widget.products_loaded() {
            println!("Catalog is still loading; try again in a moment.");
            continue;
        }

        // An empty line accepts the pre-seeded suggestion, like the
        // prefilled input field on the demo page.
        let outgoing = if text.is_empty() {
            widget.input().to_string()
        } else {
            text
        };
        if outgoing.trim().is_empty() {
            continue;
        }

        let before = widget.messages().len();
        widget.send_message(&outgoing).await;
        report_turn(&widget, before);
    }
}

fn prompt<G: ChatGateway, S: KeyValueStore>(widget: &SupportWidget<G, S>) {
    if widget.input().is_empty() {
        print!("> ");
    } else {
        print!("(enter to send \"{}\")\n> ", widget.input());
    }
    let _ = std::io::stdout().flush();
}

fn print_catalog<G: ChatGateway, S: KeyValueStore>(widget: &SupportWidget<G, S>) {
    if widget.products().is_empty() {
        println!("Supported products: (loading...)");
        return;
    }
    let line = widget
        .products()
        .iter()
        .map(|p| {
            if widget.identified_product() == Some(p.as_str()) {
                format!("[{p}]")
            } else {
                p.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    println!("Supported products: {line}");
}

fn report_turn<G: ChatGateway, S: KeyValueStore>(widget: &SupportWidget<G, S>, before: usize) {
    if let Some(err) = widget.last_error() {
        println!("! {err}");
    }
    for message in &widget.messages()[before..] {
        if message.role == ChatRole::Assistant {
            println!("{}: {}", widget.company_name(), message.content);
        }
    }
    if let Some(product) = widget.identified_product() {
        println!("(identified product: {product})");
    }
}
