//! Plain-text rendering of recommendation cards.

use std::fmt::Write;

use cinerec_core::{EnrichmentState, RecommendationItem};

const UNKNOWN_GENRE: &str = "Unknown Genre";

/// Poster line for a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poster {
    /// Lookups were switched off.
    Skipped,
    Found(String),
    Unavailable,
}

impl From<&EnrichmentState> for Poster {
    fn from(state: &EnrichmentState) -> Self {
        match &state.resource_url {
            Some(url) => Poster::Found(url.clone()),
            None => Poster::Unavailable,
        }
    }
}

pub fn genre_line(genres: &[String]) -> String {
    if genres.is_empty() {
        UNKNOWN_GENRE.to_string()
    } else {
        genres.join(" · ")
    }
}

/// Render one card. Every line is indented under a numbered title.
pub fn render_card(index: usize, item: &RecommendationItem, poster: &Poster) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>2}. {}", index, item.title);
    let _ = writeln!(out, "    {}", genre_line(&item.genres).to_uppercase());
    if !item.reason.is_empty() {
        let _ = writeln!(out, "    {}", item.reason);
    }
    let _ = writeln!(
        out,
        "    Score: {:.3}  [{}]",
        item.score,
        item.source.to_uppercase()
    );
    match poster {
        Poster::Skipped => {}
        Poster::Found(url) => {
            let _ = writeln!(out, "    Poster: {}", url);
        }
        Poster::Unavailable => {
            let _ = writeln!(out, "    poster unavailable");
        }
    }
    out
}

/// Render a full list under `heading`.
pub fn render_list(heading: &str, items: &[RecommendationItem], posters: &[Poster]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading);
    let _ = writeln!(out, "{}", "=".repeat(heading.chars().count()));

    if items.is_empty() {
        let _ = writeln!(out, "No recommendations yet.");
        return out;
    }

    for (i, item) in items.iter().enumerate() {
        let poster = posters.get(i).unwrap_or(&Poster::Skipped);
        out.push('\n');
        out.push_str(&render_card(i + 1, item, poster));
    }
    out
}
