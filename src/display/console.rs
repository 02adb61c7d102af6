//! Console reference implementation of the presentation boundary
//!
//! Renders snapshots as tables in the terminal, honoring the user's card and
//! section preferences and the expanded-region tracker. This is the adapter
//! the `streamdash` binary mounts; the web console implements the same trait
//! elsewhere.

use super::{ DisplayStateTracker, PresentationAdapter };
use crate::core::StatsSnapshot;
use crate::logger::{ self, LogTag };
use crate::prefs::PreferenceStore;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ ContentArrangement, Table };
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{ AtomicBool, Ordering };

struct RenderContext {
    tracker: Arc<DisplayStateTracker>,
    prefs: Arc<PreferenceStore>,
}

#[derive(Default)]
pub struct ConsoleAdapter {
    context: Mutex<Option<RenderContext>>,
    loading: AtomicBool,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire up the tracker and preference store owned by the session this
    /// adapter renders for. Called once after the session is built.
    pub fn attach(&self, tracker: Arc<DisplayStateTracker>, prefs: Arc<PreferenceStore>) {
        *self.context.lock() = Some(RenderContext { tracker, prefs });
    }

    fn render(&self, stats: &StatsSnapshot, is_cached: bool) {
        let guard = self.context.lock();
        let Some(context) = guard.as_ref() else {
            logger::warning(LogTag::Display, "Console adapter not attached, dropping render");
            return;
        };

        let prefs = context.prefs.current();

        println!();
        if is_cached {
            println!("{}", "── Dashboard (cached) ──".dimmed());
        } else {
            println!("{}", "── Dashboard ──".bold());
        }

        // Stat cards in the user's order, hidden ones skipped
        let mut cards = Table::new();
        cards.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
        for id in &prefs.cards.order {
            if !prefs.cards.is_visible(id) {
                continue;
            }
            if let Some(value) = card_value(stats, id) {
                cards.add_row(vec![card_label(id).to_string(), value]);
            }
        }
        println!("{cards}");

        // Sections in the user's order; collapsed sections show a header only
        for id in &prefs.sections.order {
            if !prefs.sections.is_visible(id) {
                continue;
            }
            if !context.tracker.is_region_open(id) {
                println!("{}", format!("▸ {} (collapsed)", section_label(id)).dimmed());
                continue;
            }
            println!("{}", format!("▾ {}", section_label(id)).bold());
            render_section(stats, id);
        }
    }
}

fn card_label(id: &str) -> &str {
    match id {
        "total-users" => "Total users",
        "active-subscriptions" => "Active subscriptions",
        "expiring-soon" => "Expiring within 7 days",
        "monthly-revenue" => "Monthly revenue",
        "plex-streams" => "Plex streams",
        "iptv-connections" => "IPTV connections",
        other => other,
    }
}

fn card_value(stats: &StatsSnapshot, id: &str) -> Option<String> {
    match id {
        "total-users" => Some(stats.total_users.to_string()),
        "active-subscriptions" => Some(stats.active_subscriptions.to_string()),
        "expiring-soon" => Some(stats.expiring_soon.to_string()),
        "monthly-revenue" => Some(format!("${:.2}", stats.monthly_revenue)),
        "plex-streams" => Some(
            stats.plex_servers
                .iter()
                .map(|s| s.active_sessions)
                .sum::<u64>()
                .to_string()
        ),
        "iptv-connections" => Some(
            stats.iptv_panels
                .iter()
                .map(|p| p.active_connections)
                .sum::<u64>()
                .to_string()
        ),
        _ => None,
    }
}

fn section_label(id: &str) -> &str {
    match id {
        "overview" => "Overview",
        "plex-servers" => "Plex servers",
        "iptv-panels" => "IPTV panels",
        "live-streams" => "Live streams",
        "watch-highlights" => "Watch highlights (30 days)",
        other => other,
    }
}

fn render_section(stats: &StatsSnapshot, id: &str) {
    match id {
        "overview" => {
            println!(
                "  {} users, {} active subscriptions, {} streams right now",
                stats.total_users,
                stats.active_subscriptions,
                stats.total_active_streams()
            );
        }
        "plex-servers" => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Server", "Status", "Streams", "Transcoding", "CPU %", "Mem %", "Items"]);
            for server in &stats.plex_servers {
                table.add_row(vec![
                    server.name.clone(),
                    status_cell(server.online),
                    server.active_sessions.to_string(),
                    server.transcoding_sessions.to_string(),
                    format!("{:.1}", server.cpu_usage_percent),
                    format!("{:.1}", server.memory_usage_percent),
                    server.total_media_items.to_string()
                ]);
            }
            println!("{table}");
        }
        "iptv-panels" => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Panel", "Status", "Connections"]);
            for panel in &stats.iptv_panels {
                table.add_row(vec![
                    panel.name.clone(),
                    status_cell(panel.online),
                    format!("{}/{}", panel.active_connections, panel.max_connections)
                ]);
            }
            println!("{table}");
        }
        "live-streams" => {
            match &stats.live {
                Some(live) if !live.sessions.is_empty() => {
                    let mut table = Table::new();
                    table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
                    table.set_header(vec!["User", "Title", "Server", "Player", "Transcoding"]);
                    for session in &live.sessions {
                        table.add_row(vec![
                            session.username.clone(),
                            session.title.clone(),
                            session.server.clone(),
                            session.player.clone(),
                            if session.transcoding { "yes".to_string() } else { "no".to_string() }
                        ]);
                    }
                    println!("{table}");
                }
                Some(_) => println!("  no active streams"),
                None => println!("{}", "  live detail unavailable".dimmed()),
            }
        }
        "watch-highlights" => {
            match &stats.watch {
                Some(watch) => {
                    for item in watch.most_watched_movies.iter().take(5) {
                        println!("  {}: {} plays ({} users)", item.title, item.play_count, item.unique_users);
                    }
                    for user in watch.most_active_users.iter().take(5) {
                        println!("  {}: {} plays", user.username, user.play_count);
                    }
                }
                None => println!("{}", "  watch statistics not computed yet".dimmed()),
            }
        }
        _ => {}
    }
}

fn status_cell(online: bool) -> String {
    if online {
        "ONLINE".green().to_string()
    } else {
        "OFFLINE".red().to_string()
    }
}

impl PresentationAdapter for ConsoleAdapter {
    fn on_display(&self, stats: &StatsSnapshot, is_cached: bool) {
        self.render(stats, is_cached);
    }

    fn on_loading_state_change(&self, active: bool) {
        let was_active = self.loading.swap(active, Ordering::SeqCst);
        if active && !was_active {
            println!("{}", "refreshing…".dimmed());
        }
    }

    fn on_display_error(&self, message: &str) {
        println!("{}", message.red().bold());
        println!("{}", "Last known data shown if available; next auto-refresh retries in 30s.".dimmed());
    }
}
