//! Live tests against an OpenAI-compatible provider.
//!
//! These tests spend API credit. Put `OPENAI_API_KEY` (and optionally
//! `OPENAI_BASE_URL`) in `.env`, then run:
//! cargo test --package panelcraft_models --features api -- --ignored

#![cfg(feature = "api")]

use futures::StreamExt;
use panelcraft_core::{Genre, PanelCount, StoryRequestBuilder};
use panelcraft_interface::{ReferenceImageGenerator, ScriptGenerator};
use panelcraft_models::{OpenAICompatibleClient, ProviderConfigBuilder};

fn client() -> anyhow::Result<OpenAICompatibleClient> {
    dotenvy::dotenv().ok();
    let mut builder = ProviderConfigBuilder::default();
    builder.api_key(std::env::var("OPENAI_API_KEY")?);
    if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
        builder.base_url(url);
    }
    Ok(OpenAICompatibleClient::new(builder.build()?)?)
}

#[tokio::test]
#[ignore] // Requires OPENAI_API_KEY
async fn test_script_stream_yields_json_array() -> anyhow::Result<()> {
    let client = client()?;
    let request = StoryRequestBuilder::default()
        .idea("a cat teaches a dog to climb a tree")
        .genre(Genre::Comedy)
        .panel_count(PanelCount::new(5)?)
        .build()?;

    let mut fragments = client.stream_script(&request).await?;
    let mut text = String::new();
    let mut count = 0;
    while let Some(fragment) = fragments.next().await {
        text.push_str(&fragment?);
        count += 1;
    }

    assert!(count > 1, "expected more than one fragment");
    assert!(text.contains('['));
    assert!(text.contains("imagePrompt"));
    Ok(())
}

#[tokio::test]
#[ignore] // Requires OPENAI_API_KEY
async fn test_reference_image() -> anyhow::Result<()> {
    let client = client()?;
    let image = client
        .generate_reference("a lighthouse keeper befriends a storm", Genre::Fantasy)
        .await?;
    assert!(!image.extension().is_empty());
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_bad_key_is_rejected() -> anyhow::Result<()> {
    let config = ProviderConfigBuilder::default()
        .api_key("sk-invalid")
        .build()?;
    let client = OpenAICompatibleClient::new(config)?;
    let request = StoryRequestBuilder::default()
        .idea("anything")
        .genre(Genre::Drama)
        .panel_count(PanelCount::new(5)?)
        .build()?;
    assert!(client.stream_script(&request).await.is_err());
    Ok(())
}
