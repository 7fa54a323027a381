//! Kanban Board Frontend Entry Point

mod app;
mod commands;
mod components;
mod config;
mod context;
mod store;

use app::App;
use leptos::prelude::*;
use log::LevelFilter;

fn main() {
    console_error_panic_hook::set_once();

    let page = config::load_page_config();
    let _ = rolling_logger::init_logger("Kanban", page.board.log_capacity, LevelFilter::Debug);
    if let Some(err) = &page.config_error {
        log::warn!("[BOARD] Ignoring stored config: {}", err);
    }
    log::info!(
        "[BOARD] Starting project {} as {} ({})",
        page.project_id,
        page.role,
        page.board.sync_mode.as_str()
    );

    mount_to_body(move || view! { <App page=page /> });
}
