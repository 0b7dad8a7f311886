/// Seedtune - command line client for the recommendation backend
use anyhow::Context;
use clap::{Parser, Subcommand};
use seedtune_cli::{AppConfig, UserSettings};
use seedtune_client::{
    BackendClient, CredentialProvider, RecommendationSeeds, RefreshingCredentials,
    StaticCredentials, StreamingClient, Tokens,
};
use seedtune_core::{playable_tracks, RecommendationKind, Track};
use seedtune_playback::{PlaybackEvent, PlaybackHandle, PlaybackSession, SilentEngine};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "seedtune")]
#[command(about = "Browse playlists and recommendations, play track previews", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SEEDTUNE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the user's playlists
    Playlists,
    /// List the tracks of a playlist
    Tracks {
        /// Backend playlist id
        playlist_id: i64,
    },
    /// List liked songs
    Liked,
    /// List recommendation history
    History {
        /// Only entries of this kind (track, playlist or my)
        #[arg(short, long)]
        kind: Option<RecommendationKind>,
    },
    /// List the stored tracks of a recommendation
    Recommendation {
        /// Recommendation id from the history
        recommendation_id: String,
    },
    /// Fetch fresh tracks for a stored recommendation and save them
    Recommend {
        /// Recommendation id from the history
        recommendation_id: String,
        /// Number of tracks to request
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// Play the previews of a playlist in order
    Preview {
        /// Backend playlist id (0 for liked songs)
        playlist_id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "seedtune=info,seedtune_client=info,seedtune_playback=info".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    let user = config.require_user()?.clone();

    let credentials = credentials(&config, &user)?;
    let backend = BackendClient::new(&config.backend, credentials.clone())?;

    match cli.command {
        Commands::Playlists => list_playlists(&backend, &user).await?,
        Commands::Tracks { playlist_id } => {
            let tracks = playlist_tracks(&backend, playlist_id).await?;
            print_tracks(&tracks);
        }
        Commands::Liked => {
            let tracks = playlist_tracks(&backend, seedtune_core::LIKED_PLAYLIST_ID).await?;
            print_tracks(&tracks);
        }
        Commands::History { kind } => list_history(&backend, &user, kind).await?,
        Commands::Recommendation { recommendation_id } => {
            let tracks = backend.recommendation_tracks(&recommendation_id).await?;
            print_tracks(&tracks);
        }
        Commands::Recommend {
            recommendation_id,
            limit,
        } => {
            let streaming = StreamingClient::new(&config.streaming, credentials)?;
            recommend(&backend, &streaming, &recommendation_id, limit).await?;
        }
        Commands::Preview { playlist_id } => {
            let tracks = playlist_tracks(&backend, playlist_id).await?;
            let engine = Arc::new(SilentEngine::new(config.playback.engine_config()));
            let session = PlaybackSession::spawn(engine, config.playback.session_config());
            preview(&session, tracks).await?;
        }
    }

    Ok(())
}

fn credentials(
    config: &AppConfig,
    user: &UserSettings,
) -> anyhow::Result<Arc<dyn CredentialProvider>> {
    match &user.refresh_token {
        Some(refresh_token) => {
            let tokens = Tokens {
                access_token: user.access_token.clone(),
                refresh_token: refresh_token.clone(),
                spotify_id: user.spotify_id.clone(),
            };
            Ok(Arc::new(RefreshingCredentials::new(&config.backend, tokens)?))
        }
        None => Ok(Arc::new(StaticCredentials::new(user.access_token.clone()))),
    }
}

async fn list_playlists(backend: &BackendClient, user: &UserSettings) -> anyhow::Result<()> {
    let playlists = backend.playlists(&user.spotify_id).await?;

    if playlists.is_empty() {
        println!("No playlists");
        return Ok(());
    }

    for playlist in playlists {
        println!(
            "{:>6}  {} ({} tracks)",
            playlist.id, playlist.title, playlist.total_tracks
        );
    }
    Ok(())
}

async fn playlist_tracks(backend: &BackendClient, playlist_id: i64) -> anyhow::Result<Vec<Track>> {
    let entries = backend
        .playlist_tracks(playlist_id)
        .await
        .with_context(|| format!("Failed to load playlist {playlist_id}"))?;

    Ok(entries.into_iter().map(|entry| entry.track).collect())
}

fn print_tracks(tracks: &[Track]) {
    for (index, track) in tracks.iter().enumerate() {
        let marker = if track.is_playable() { ' ' } else { '-' };
        println!(
            "{:>3}{marker} {} - {}",
            index + 1,
            track.artist_names(),
            track.title
        );
    }
}

async fn list_history(
    backend: &BackendClient,
    user: &UserSettings,
    kind: Option<RecommendationKind>,
) -> anyhow::Result<()> {
    let history = backend.history(&user.spotify_id).await?;

    for recommendation in history
        .into_iter()
        .filter(|r| kind.map_or(true, |kind| r.recommendation_type == kind))
    {
        println!(
            "{}  [{}] {}",
            recommendation.recommendation_id,
            recommendation.recommendation_type.as_str(),
            recommendation.title
        );
    }
    Ok(())
}

async fn recommend(
    backend: &BackendClient,
    streaming: &StreamingClient,
    recommendation_id: &str,
    limit: u32,
) -> anyhow::Result<()> {
    let recommendation = backend.recommendation(recommendation_id).await?;
    let seeds = RecommendationSeeds::from_recommendation(&recommendation);
    if seeds.is_empty() {
        anyhow::bail!("Recommendation {recommendation_id} has no seeds");
    }

    let tracks = streaming.recommendations(&seeds, limit).await?;
    backend
        .save_recommendation_tracks(recommendation_id, &tracks)
        .await?;

    tracing::info!(count = tracks.len(), "Saved recommended tracks");
    print_tracks(&tracks);
    Ok(())
}

async fn preview(session: &PlaybackHandle, tracks: Vec<Track>) -> anyhow::Result<()> {
    let tracks = playable_tracks(tracks);
    if tracks.is_empty() {
        anyhow::bail!("No track in this playlist has a preview");
    }

    let mut events = session.events();
    session.play_track_list(tracks).await?;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(PlaybackEvent::TrackChanged { .. }) => {
                    if let Some(track) = session.snapshot().current_track {
                        println!("▶ {} - {}", track.artist_names(), track.title);
                    }
                }
                Ok(PlaybackEvent::QueueEnded) | Err(RecvError::Closed) => break,
                Ok(PlaybackEvent::Error { message }) => {
                    tracing::warn!(error = %message, "Playback error");
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Event stream lagged");
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    session.shutdown().await?;
    Ok(())
}
