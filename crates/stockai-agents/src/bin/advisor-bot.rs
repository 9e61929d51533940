//! Advisor Bot CLI
//!
//! An interactive command-line interface for the analysis agents.
//!
//! # Usage
//!
//! ```bash
//! # Optional: configure an LLM overlay
//! export STOCKAI_PROVIDER="anthropic"        # openai | anthropic | google
//! export ANTHROPIC_API_KEY="sk-ant-..."
//! export STOCKAI_MODEL="claude-3-5-sonnet-20241022"
//!
//! # Run the bot
//! cargo run --bin advisor-bot -p stockai-agents
//! ```

use std::env;
use std::io::{self, BufRead, Write};

use stockai_agents::service::{AgentService, AnalyzeRequest, ChatRequest};
use stockai_agents::{AnalysisResult, LlmProvider};

fn print_banner() {
    println!(
        r"
+--------------------------------------------------------------+
|                       Advisor Bot                            |
|                                                              |
|  Commands:                                                   |
|    /advisor <symbol>      - Combined advisory verdict        |
|    /fundamental <symbol>  - Fundamental analysis             |
|    /technical <symbol>    - Technical analysis               |
|    /risk <symbol>         - Risk profile                     |
|    /sentiment <symbol>    - Market sentiment                 |
|    /news <symbol>         - Latest news digest               |
|    /ticker <symbol>       - Set chat context ticker          |
|    /exit                  - Exit                             |
|                                                              |
|  Or ask in natural language:                                 |
|    'Should I buy AAPL here?'                                 |
+--------------------------------------------------------------+
"
    );
}

/// Read the optional LLM overlay configuration from the environment
fn llm_config_from_env() -> (Option<String>, Option<String>, Option<String>) {
    let provider = env::var("STOCKAI_PROVIDER").ok();
    let api_key = match provider.as_deref().and_then(|p| p.parse::<LlmProvider>().ok()) {
        Some(LlmProvider::OpenAi) => env::var("OPENAI_API_KEY").ok(),
        Some(LlmProvider::Anthropic) => env::var("ANTHROPIC_API_KEY").ok(),
        Some(LlmProvider::Google) => env::var("GOOGLE_API_KEY").ok(),
        _ => None,
    };
    let model = env::var("STOCKAI_MODEL").ok();
    (provider, api_key, model)
}

fn print_result(result: &AnalysisResult) {
    if let Some(error) = result.error() {
        println!("Error: {error}\n");
        return;
    }
    if let Some(rating) = result.rating() {
        println!("Rating: {rating}");
    }
    if let Some(summary) = result.summary() {
        println!("\n{summary}");
    }
    if !result.key_metrics.is_empty() {
        println!("\nKey metrics:");
        for (name, value) in result.key_metrics.iter() {
            println!("  {name}: {value}");
        }
    }
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "warn,stockai_agents=info".to_string()),
        )
        .init();

    print_banner();

    let (provider, api_key, model) = llm_config_from_env();
    match (&provider, &api_key) {
        (Some(p), Some(_)) => println!("LLM overlay: {p}\n"),
        _ => println!("LLM overlay: none (set STOCKAI_PROVIDER and the provider's API key)\n"),
    }

    let service = AgentService::yahoo();
    let mut chat_ticker: Option<String> = None;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("advisor> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input == "/exit" {
            println!("Goodbye!");
            break;
        }

        if let Some(rest) = input.strip_prefix("/ticker ") {
            chat_ticker = Some(rest.trim().to_uppercase());
            println!("Chat context set to {}\n", rest.trim().to_uppercase());
            continue;
        }

        if let Some((command, symbol)) = parse_analysis_command(input) {
            let request = AnalyzeRequest {
                ticker: symbol,
                kind: command,
                provider: provider.clone(),
                api_key: api_key.clone(),
                model: model.clone(),
                period: None,
            };
            let result = service.analyze(&request).await;
            print_result(&result);
            continue;
        }

        // Anything else is free-form chat
        let request = ChatRequest {
            message: input.to_string(),
            ticker: chat_ticker.clone(),
            provider: provider.clone(),
            api_key: api_key.clone(),
            model: model.clone(),
        };
        match service.chat(&request).await {
            Ok(response) => println!("{}\n", response.text),
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    Ok(())
}

/// Split a `/command <symbol>` line into its analysis kind and symbol
fn parse_analysis_command(input: &str) -> Option<(String, String)> {
    let rest = input.strip_prefix('/')?;
    let (command, symbol) = rest.split_once(' ')?;
    let command = command.to_lowercase();
    match command.as_str() {
        "advisor" | "fundamental" | "technical" | "risk" | "sentiment" | "news" => {
            Some((command, symbol.trim().to_uppercase()))
        }
        _ => None,
    }
}
