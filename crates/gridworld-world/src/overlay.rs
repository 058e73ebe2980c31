//! Screen-anchored text panels drawn over a player's view.
//!
//! An [`Overlay`] is a block of text whose first line is screen row 1 and
//! whose glyphs are laid out from column 1. Positions past the end of a
//! line (or past the last line) are transparent, so the world shows
//! through around the panel.
//!
//! Two panels exist: the static help card and the profile card, which the
//! simulation core rebuilds from live actor state on every refresh.

use core::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Width of the text area inside a panel frame, in glyphs.
const PANEL_TEXT_WIDTH: usize = 28;

/// Shadow glyph drawn along the right and bottom edges of a panel.
const SHADOW: char = '▒';

/// Which panel an overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    /// Static command reference.
    Help,
    /// Live actor status, refreshed periodically.
    Profile,
}

impl OverlayKind {
    /// Return `true` for overlays that must be rebuilt from actor state
    /// while they stay installed.
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Profile)
    }
}

/// The actor fields shown on the profile panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfilePanel<'a> {
    /// Actor identifier; truncated to fit the title row.
    pub id: &'a str,
    /// Actor glyph.
    pub glyph: char,
    /// Current health.
    pub health: u32,
    /// Health ceiling.
    pub max_health: u32,
    /// Current energy.
    pub energy: u32,
    /// Energy ceiling.
    pub max_energy: u32,
    /// Times killed.
    pub deaths: u32,
    /// Kills scored.
    pub kills: u32,
}

/// A rendered panel ready to be composited over a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    /// Which panel this is.
    kind: OverlayKind,
    /// Glyph rows; row 0 is screen row 1.
    rows: Vec<Vec<char>>,
}

impl Overlay {
    /// Build an overlay from text, one screen row per line.
    pub fn from_text(kind: OverlayKind, text: &str) -> Self {
        let rows = text
            .split('\n')
            .map(|line| line.chars().filter(|c| *c != '\r').collect())
            .collect();
        Self { kind, rows }
    }

    /// The help card.
    pub fn help() -> Self {
        Self::from_text(OverlayKind::Help, &help_text())
    }

    /// The profile card for the given actor state.
    pub fn profile(panel: &ProfilePanel<'_>) -> Self {
        Self::from_text(OverlayKind::Profile, &profile_text(panel))
    }

    /// Which panel this is.
    pub const fn kind(&self) -> OverlayKind {
        self.kind
    }

    /// The glyph at 1-based screen position `(x, y)`, or `None` where the
    /// panel is transparent.
    pub fn glyph_at(&self, x: i32, y: i32) -> Option<char> {
        let col = usize::try_from(x.checked_sub(1)?).ok()?;
        let row = usize::try_from(y.checked_sub(1)?).ok()?;
        self.rows.get(row)?.get(col).copied()
    }
}

/// Frame a set of text rows, with a title block separated from the body.
fn framed(title: &[String], body: &[String]) -> String {
    let rule: String = "─".repeat(PANEL_TEXT_WIDTH.saturating_add(2));
    let double: String = "═".repeat(PANEL_TEXT_WIDTH.saturating_add(2));
    let shadow_width = PANEL_TEXT_WIDTH.saturating_add(4);
    let shadow: String = core::iter::repeat_n(SHADOW, shadow_width).collect();
    let width = PANEL_TEXT_WIDTH;

    // Leading blank row keeps the card off the top edge of the screen.
    let mut out = String::from("\n");
    let _ = writeln!(out, "┌{rule}┐");
    for line in title {
        let _ = writeln!(out, "│ {line:<width$} │{SHADOW}");
    }
    let _ = writeln!(out, "╞{double}╡{SHADOW}");
    for line in body {
        let _ = writeln!(out, "│ {line:<width$} │{SHADOW}");
    }
    let _ = writeln!(out, "└{rule}┘{SHADOW}");
    let _ = write!(out, " {shadow}");
    out
}

/// Text of the help card.
pub fn help_text() -> String {
    let title = [String::from("Help"), String::from("Basic info")];
    let body = [
        String::from("Each command must be started"),
        String::from("with \">\"."),
        String::new(),
        String::from("- help    - clear"),
        String::from("- resize W H"),
        String::from("- profile - attack"),
        String::new(),
        String::from("Move with mw ma ms md"),
    ];
    framed(&title, &body)
}

/// Text of the profile card.
pub fn profile_text(panel: &ProfilePanel<'_>) -> String {
    let title = [format!("User Info {:>12.12} {:>3}", panel.id, panel.glyph)];
    let body = [
        format!("Life:   {:>3} / {}", panel.health, panel.max_health),
        format!("Energy: {:>3} / {}", panel.energy, panel.max_energy),
        format!("Deaths: {:>3}", panel.deaths),
        format!("Kills:  {:>3}", panel.kills),
    ];
    framed(&title, &body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_panel() -> ProfilePanel<'static> {
        ProfilePanel {
            id: "alice",
            glyph: '☆',
            health: 2,
            max_health: 3,
            energy: 14,
            max_energy: 150,
            deaths: 1,
            kills: 4,
        }
    }

    #[test]
    fn first_line_is_row_one_and_columns_are_one_based() {
        let overlay = Overlay::from_text(OverlayKind::Help, "ab\ncd");
        assert_eq!(overlay.glyph_at(1, 1), Some('a'));
        assert_eq!(overlay.glyph_at(2, 2), Some('d'));
        assert_eq!(overlay.glyph_at(3, 1), None);
        assert_eq!(overlay.glyph_at(1, 3), None);
        assert_eq!(overlay.glyph_at(0, 1), None);
        assert_eq!(overlay.glyph_at(1, -4), None);
    }

    #[test]
    fn help_card_leaves_top_row_transparent() {
        let help = Overlay::help();
        assert_eq!(help.kind(), OverlayKind::Help);
        assert_eq!(help.glyph_at(1, 1), None);
        assert_eq!(help.glyph_at(1, 2), Some('┌'));
        assert!(help_text().contains("Move with mw ma ms md"));
    }

    #[test]
    fn framed_rows_share_one_width() {
        let text = profile_text(&sample_panel());
        let widths: Vec<usize> = text
            .lines()
            .skip(1)
            .map(|l| l.chars().count())
            .collect();
        let first = *widths.first().unwrap();
        // The top rule has no shadow column; every other row has one.
        assert!(widths.iter().skip(1).all(|w| *w == first.saturating_add(1)));
    }

    #[test]
    fn profile_card_shows_actor_state() {
        let text = profile_text(&sample_panel());
        assert!(text.contains("alice"));
        assert!(text.contains('☆'));
        assert!(text.contains("Life:     2 / 3"));
        assert!(text.contains("Energy:  14 / 150"));
        assert!(text.contains("Deaths:   1"));
        assert!(text.contains("Kills:    4"));
        assert!(Overlay::profile(&sample_panel()).kind().is_live());
        assert!(!OverlayKind::Help.is_live());
    }

    #[test]
    fn long_ids_are_truncated() {
        let panel = ProfilePanel {
            id: "a-very-long-player-identifier",
            ..sample_panel()
        };
        let text = profile_text(&panel);
        assert!(text.contains("a-very-long-"));
        assert!(!text.contains("identifier"));
    }
}
