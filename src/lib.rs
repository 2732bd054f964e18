// VizSorter - Sorting Algorithm Race Visualizer
// Module declarations

use std::sync::Arc;
use tauri::Manager;

mod audio;
mod commands;
mod input;
mod race;
mod sorter;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .setup(|app| {
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }

            // Tone worker plus the two animation sessions
            app.manage(Arc::new(audio::TonePlayer::new()));
            app.manage(commands::PlaybackState::default());
            app.manage(commands::RaceState::default());

            log::info!("VizSorter initialized successfully");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::list_algorithms,
            commands::generate_array,
            commands::parse_array,
            commands::run_sort,
            commands::start_playback,
            commands::stop_playback,
            commands::is_playing,
            commands::start_race,
            commands::pause_race,
            commands::resume_race,
            commands::stop_race,
            commands::race_status,
            commands::set_sound_enabled,
            commands::is_sound_enabled,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
