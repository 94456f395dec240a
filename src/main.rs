use clap::Parser;
use tracing_subscriber::EnvFilter;

use yoto_cli::api::models::DeviceCommand;
use yoto_cli::auth::authenticated_client;
use yoto_cli::cli::{
    AuthCommands, ChapterCommands, Cli, Commands, DeviceCommands, EntryCommands, IconCommands,
    PlaylistCommands, TrackCommands,
};
use yoto_cli::commands::{self, CommandError};
use yoto_cli::config::ConfigStore;
use yoto_cli::output;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let store = ConfigStore::from_env()?;

    // Auth subcommands manage credentials themselves; everything else
    // needs an authenticated client first.
    let command = match cli.command {
        Commands::Auth { command } => {
            return match command {
                AuthCommands::Login => commands::auth::login(&store).await,
                AuthCommands::Logout => commands::auth::logout(&store).await,
                AuthCommands::Status => commands::auth::status(&store).await,
            };
        }
        command => command,
    };

    let api = authenticated_client(&store).await?;

    match command {
        Commands::Auth { .. } => unreachable!("handled above"),
        Commands::Device { command } => match command {
            DeviceCommands::List { json } => commands::device::list(&api, json).await,
            DeviceCommands::Show { device_id, json } => {
                commands::device::show(&api, &device_id, json).await
            }
            DeviceCommands::Play { device_id } => {
                commands::device::command(&api, &device_id, DeviceCommand::Play).await
            }
            DeviceCommands::Pause { device_id } => {
                commands::device::command(&api, &device_id, DeviceCommand::Pause).await
            }
            DeviceCommands::Stop { device_id } => {
                commands::device::command(&api, &device_id, DeviceCommand::Stop).await
            }
            DeviceCommands::Next { device_id } => {
                commands::device::command(&api, &device_id, DeviceCommand::Next).await
            }
            DeviceCommands::Previous { device_id } => {
                commands::device::command(&api, &device_id, DeviceCommand::Previous).await
            }
            DeviceCommands::Volume { device_id, level } => {
                commands::device::command(&api, &device_id, DeviceCommand::SetVolume(level)).await
            }
        },
        Commands::Playlist { command } => match command {
            PlaylistCommands::List { json } => commands::playlist::list(&api, json).await,
            PlaylistCommands::Show {
                card_id,
                playable,
                json,
            } => commands::playlist::show(&api, &card_id, playable, json).await,
            PlaylistCommands::Create {
                title,
                description,
                author,
            } => commands::playlist::create(&api, &title, description, author).await,
            PlaylistCommands::Edit {
                card_id,
                title,
                description,
                author,
                playback_type,
            } => {
                commands::playlist::edit(
                    &api,
                    &card_id,
                    commands::playlist::EditOptions {
                        title,
                        description,
                        author,
                        playback_type,
                    },
                )
                .await
            }
            PlaylistCommands::Delete { card_id } => {
                commands::playlist::delete(&api, &card_id).await
            }
        },
        Commands::Chapter { command } => match command {
            ChapterCommands::Add {
                card_id,
                title,
                icon,
                file,
                json,
            } => {
                commands::chapter::add(
                    &api,
                    &card_id,
                    &title,
                    commands::chapter::AddOptions {
                        icon,
                        file,
                        json,
                        default_icon: None,
                    },
                )
                .await
            }
            ChapterCommands::Edit {
                card_id,
                chapter_idx,
                title,
                icon,
            } => commands::chapter::edit(&api, &card_id, chapter_idx, title, icon).await,
            ChapterCommands::Delete {
                card_id,
                chapter_idx,
            } => commands::chapter::delete(&api, &card_id, chapter_idx).await,
        },
        Commands::Track { command } => match command {
            TrackCommands::Add {
                card_id,
                chapter_idx,
                title,
                source,
                icon,
                duration,
            } => {
                commands::track::add(
                    &api,
                    &card_id,
                    chapter_idx,
                    &title,
                    &source,
                    commands::track::AddOptions {
                        icon,
                        duration: duration.map(|d| d as f64),
                    },
                )
                .await
            }
            TrackCommands::Edit {
                card_id,
                chapter_idx,
                track_idx,
                title,
                icon,
                url,
                on_end,
            } => {
                commands::track::edit(
                    &api,
                    &card_id,
                    chapter_idx,
                    track_idx,
                    commands::track::EditOptions {
                        title,
                        icon,
                        url,
                        on_end,
                    },
                )
                .await
            }
            TrackCommands::Delete {
                card_id,
                chapter_idx,
                track_idx,
            } => commands::track::delete(&api, &card_id, chapter_idx, track_idx).await,
            TrackCommands::Upload {
                file,
                json,
                no_wait,
            } => commands::track::upload(&api, &file, !no_wait, json).await,
            TrackCommands::Status {
                upload_id,
                json,
                wait,
            } => commands::track::status(&api, &upload_id, wait, json).await,
        },
        Commands::Entry { command } => match command {
            EntryCommands::Add {
                card_id,
                title,
                file,
                icon,
                json,
            } => {
                commands::entry::add(
                    &api,
                    &card_id,
                    &title,
                    commands::entry::AddOptions {
                        icon,
                        file,
                        json,
                        default_icon: None,
                    },
                )
                .await
            }
            EntryCommands::Update {
                card_id,
                entry_idx,
                title,
                icon,
            } => commands::entry::update(&api, &card_id, entry_idx, title, icon).await,
            EntryCommands::Delete { card_id, entry_idx } => {
                commands::entry::delete(&api, &card_id, entry_idx).await
            }
        },
        Commands::Icon { command } => match command {
            IconCommands::List { mine, tag, json } => {
                commands::icon::list(&api, mine, tag, json).await
            }
            IconCommands::Upload {
                file,
                no_convert,
                json,
            } => commands::icon::upload(&api, &file, !no_convert, json).await,
        },
    }
}
