//! Stream one prompt through a configured provider and print the
//! canonical events
//!
//! Run with: cargo run --example stream_demo -- llmwire.yaml claude "Say hello"
//!
//! Set `RUST_LOG=llmwire_core=debug` to see retry and request logs.

use anyhow::{bail, Context, Result};
use llmwire_core::config::load_from_yaml;
use llmwire_core::protocol::{ApiType, BodyWriter, StreamEventType};
use llmwire_core::providers::{anthropic, gemini, openai, Provider};
use tracing_subscriber::EnvFilter;

fn build_messages(api: ApiType, prompt: &str) -> Result<String> {
    let mut buf = BodyWriter::new();
    buf.raw("[")?;
    match api {
        ApiType::Anthropic => anthropic::build_user_message(&mut buf, prompt)?,
        ApiType::Gemini => gemini::build_user_message(&mut buf, prompt)?,
        ApiType::OpenAI | ApiType::OpenAICompatible => {
            openai::build_user_message(&mut buf, prompt)?
        }
    }
    buf.raw("]")?;
    Ok(buf.into_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(path), Some(name)) = (args.next(), args.next()) else {
        bail!("usage: stream_demo <config.yaml> <provider> [prompt]");
    };
    let prompt = args.next().unwrap_or_else(|| "Say hello in one sentence.".to_string());

    let config = load_from_yaml(&path).with_context(|| format!("loading {}", path))?;
    let entry = config
        .provider(&name)
        .with_context(|| format!("no provider named '{}'", name))?;
    let provider = config.build_provider(&name)?;

    let request = entry.effective_request_config();
    let messages = build_messages(entry.api, &prompt)?;
    let response = provider.send_message(&request, &messages, None).await?;

    println!(
        "{} answered HTTP {} after {} attempt(s)",
        provider.name(),
        response.status,
        provider.total_attempts()
    );

    if !response.is_success() {
        println!("{}", response.text());
        return Ok(());
    }

    // Compatible vendors without streaming answer with plain JSON
    if !request.stream {
        println!("{}", response.text());
        return Ok(());
    }

    for event in response.events(entry.api) {
        match event.event_type {
            StreamEventType::TextDelta => {
                print!("{}", event.text.as_deref().unwrap_or_default());
            }
            StreamEventType::Stop => {
                println!("\n[stop: {:?}]", event.stop_reason);
            }
            other => {
                if let Some(usage) = &event.usage {
                    println!("[{:?}: {:?}]", other, usage);
                }
            }
        }
    }

    Ok(())
}
