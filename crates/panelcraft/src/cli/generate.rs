//! `generate` and `genres` command handlers.

use super::GenerateArgs;
use panelcraft::{
    ComicController, ComicServicesBuilder, ConsoleNarrator, DirectoryExporter, Genre, Intent,
    IntentOutcome, LoggingObserver, OpenAICompatibleClient, PanelCount, PanelcraftConfig,
    SessionSnapshot, StoryRequest, StoryRequestBuilder, VoiceHandle,
};
use panelcraft_error::{SessionError, SessionErrorKind};
use std::str::FromStr;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

/// Script, illustrate, download and narrate one comic.
#[tracing::instrument(skip_all, fields(placeholder = args.placeholder, narrate = args.narrate))]
pub async fn run_generate(config: PanelcraftConfig, args: GenerateArgs) -> anyhow::Result<()> {
    let request = story_request(&config, &args)?;
    let pipeline = config
        .pipeline()
        .clone()
        .with_placeholder_mode(args.placeholder || *config.pipeline().placeholder_mode());

    let client = Arc::new(OpenAICompatibleClient::new(config.provider().clone())?);
    let services = ComicServicesBuilder::default()
        .scripts(client.clone())
        .reviser(client.clone())
        .references(client.clone())
        .images(client)
        .narrator(Arc::new(ConsoleNarrator::new(*config.narration().words_per_minute())))
        .observer(Arc::new(LoggingObserver::new()))
        .exporter(Arc::new(DirectoryExporter::default()))
        .build()?;
    let controller = ComicController::new(services, pipeline);

    let voice = args
        .voice
        .clone()
        .map(VoiceHandle::from)
        .or_else(|| config.narration().voice().clone());
    controller.handle(Intent::SelectVoice(voice)).await?;

    info!(idea = %request.idea(), genre = %request.genre(), panels = %request.panel_count(), "Writing script");
    controller.handle(Intent::Generate(request)).await?;
    let snapshot = controller.snapshot().await;
    print_script(&snapshot);
    if !snapshot.script_complete() {
        anyhow::bail!(
            "script incomplete: {}",
            snapshot.error.as_deref().unwrap_or("the model stopped early")
        );
    }

    if let IntentOutcome::Generated(summary) = controller.handle(Intent::Approve).await? {
        println!(
            "\n{} of {} panels illustrated",
            summary.ready.len(),
            summary.ready.len() + summary.failed.len()
        );
        if !summary.failed.is_empty() {
            warn!(failed = ?summary.failed, "Some panels have no image");
        }
    }

    if let Some(dir) = args.out.clone() {
        if let IntentOutcome::Exported(report) = controller.handle(Intent::DownloadAll(dir.clone())).await? {
            println!("Saved {} files to {}", report.written().len(), dir.display());
            if !report.skipped().is_empty() {
                println!("Skipped panels {:?}", report.skipped());
            }
        }
    }

    if args.narrate {
        controller.handle(Intent::Play).await?;
        tokio::select! {
            _ = controller.playback().wait() => debug!("Playback finished"),
            _ = tokio::signal::ctrl_c() => {
                controller.handle(Intent::Pause).await?;
                info!("Playback interrupted");
            }
        }
    }
    Ok(())
}

/// Print the genres `--genre` accepts.
pub fn list_genres() {
    for genre in Genre::iter() {
        println!("{:<14} {}", genre.to_string(), genre.art_style());
    }
}

fn story_request(config: &PanelcraftConfig, args: &GenerateArgs) -> anyhow::Result<StoryRequest> {
    let genre = match &args.genre {
        Some(name) => Genre::from_str(name)
            .map_err(|_| SessionError::new(SessionErrorKind::UnknownGenre(name.clone())))?,
        None => *config.session().default_genre(),
    };
    let panel_count = match args.panels {
        Some(count) => PanelCount::new(count)?,
        None => *config.session().default_panel_count(),
    };
    Ok(StoryRequestBuilder::default()
        .idea(args.idea.clone())
        .genre(genre)
        .panel_count(panel_count)
        .build()?)
}

fn print_script(snapshot: &SessionSnapshot) {
    println!("\n{} ({})\n", snapshot.idea.trim(), snapshot.genre);
    for panel in &snapshot.panels {
        println!("{:>2}. {}", panel.index(), panel.script());
        if !panel.panel_text().trim().is_empty() {
            println!("    \"{}\"", panel.panel_text().trim());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(genre: Option<&str>, panels: Option<u8>) -> GenerateArgs {
        GenerateArgs {
            idea: "a ghost runs a bakery".to_string(),
            genre: genre.map(str::to_string),
            panels,
            placeholder: true,
            out: None,
            narrate: false,
            voice: None,
        }
    }

    #[test]
    fn flags_override_configured_defaults() {
        let config = PanelcraftConfig::default();
        let request = story_request(&config, &args(Some("Sci-Fi"), Some(9))).unwrap();
        assert_eq!(request.genre(), &Genre::SciFi);
        assert_eq!(request.panel_count().get(), 9);

        let request = story_request(&config, &args(None, None)).unwrap();
        assert_eq!(request.genre(), config.session().default_genre());
        assert_eq!(request.panel_count(), config.session().default_panel_count());
    }

    #[test]
    fn bad_flags_are_rejected() {
        let config = PanelcraftConfig::default();
        let err = story_request(&config, &args(Some("opera"), None)).unwrap_err();
        assert!(err.to_string().contains("opera"));
        assert!(story_request(&config, &args(None, Some(12))).is_err());
    }
}
