//! Server-rendered markup for the game pages.
//!
//! Everything coming from storage (labels, URLs) goes through
//! [`ammonia::clean_text`] before it reaches the page.

use std::fmt::Write;

use ammonia::clean_text;

use crate::{services::selector::Question, state::session::ScoreReport};

/// Hyperlink offered to the player to get back on track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Target of the link.
    pub href: &'static str,
    /// Visible text of the link.
    pub label: &'static str,
}

impl Link {
    /// Build a link from its target and text.
    pub const fn new(href: &'static str, label: &'static str) -> Self {
        Self { href, label }
    }

    fn render(&self) -> String {
        format!(r#"<a href="{}">{}</a>"#, self.href, self.label)
    }
}

fn layout(body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Face Match</title></head><body>{body}</body></html>"
    )
}

/// Plain message followed by a recovery link.
pub fn message_page(message: &str, link: &Link) -> String {
    layout(&format!("<p>{} {}</p>", clean_text(message), link.render()))
}

/// Question page: the name to find, one form per picture and a skip button.
pub fn question_page(question: &Question) -> String {
    let mut body = format!("<p>Who is {}?</p>", clean_text(&question.target.label));
    for (index, photo) in question.choices.iter().enumerate() {
        let _ = write!(
            body,
            r#"<img src="{url}" width="100" alt="Choice {number}"><form action="/check" method="post"><input type="hidden" name="guess" value="{id}"><button type="submit">Select</button></form>"#,
            url = clean_text(&photo.url),
            number = index + 1,
            id = photo.id,
        );
    }
    body.push_str(
        r#"<form action="/skip" method="post"><button type="submit">Skip</button></form>"#,
    );
    layout(&body)
}

/// Score page with a link back into the game.
pub fn score_page(report: &ScoreReport) -> String {
    let (text, link) = match report {
        ScoreReport::NotStarted => (
            "No questions answered yet.".to_string(),
            Link::new("/game", "Start playing"),
        ),
        ScoreReport::InProgress(score) => (
            format!("Your current score is {}%.", score.formatted()),
            Link::new("/game", "Keep playing"),
        ),
        ScoreReport::Final(score) => (
            format!("Your final score is {}%.", score.formatted()),
            Link::new("/game", "Play again"),
        ),
    };
    layout(&format!("<p>{text} {}</p>", link.render()))
}
