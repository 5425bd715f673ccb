//! Text rendering of the session board
//!
//! Votes stay masked until the round is revealed: a checkmark only tells
//! the table who has voted, never what.

use chrono::Utc;
use poker_domain::{Backlog, GameState, Roster, SessionConfig};

/// Render the board the way the table sees it.
pub fn board(
    config: &SessionConfig,
    roster: &Roster,
    backlog: &Backlog,
    state: &GameState,
) -> String {
    let mut out = String::new();

    let project = config.project_name.as_deref().unwrap_or("(unnamed)");
    out.push_str(&format!(
        "Project {project} — rule: {}, mode: {}\n",
        config.secondary_rule, config.play_mode
    ));

    if state.coffee.is_paused(Utc::now()) {
        if let Some(end) = state.coffee.end {
            out.push_str(&format!("Coffee break until {}\n", end.format("%H:%M:%S")));
        }
    }

    let round = &state.round;
    match backlog.get(round.cursor) {
        Some(item) => {
            out.push_str(&format!(
                "Item {}/{}: {} (round {})\n",
                round.cursor + 1,
                backlog.len(),
                item.title,
                round.round
            ));
            if let Some(description) = &item.description {
                out.push_str(&format!("  {description}\n"));
            }

            let label = if round.revealed { "revealed" } else { "hidden" };
            out.push_str(&format!("  votes ({label}):\n"));
            for player in roster.players() {
                let cell = match round.votes.card_for(&player.id) {
                    Some(card) if round.revealed => card.to_string(),
                    Some(_) => "✔".to_string(),
                    None => "—".to_string(),
                };
                out.push_str(&format!("    {:<12} {cell}\n", player.name));
            }
        }
        None => {
            out.push_str("Backlog complete — estimates:\n");
            for item in backlog.items() {
                let estimate = item
                    .estimate
                    .map(|card| card.to_string())
                    .unwrap_or_else(|| "—".to_string());
                out.push_str(&format!("    {:<24} {estimate}\n", item.title));
            }
        }
    }

    out
}
