//! Display-ready projection of the detail load state

use super::media::extract_media_numbers;
use crate::detail::{LoadFailure, LoadState};
use crate::records::CharacterDetail;

/// Banner shown above every character
pub const DETAIL_TITLE: &str = "Star Wars Universe.";

/// Shown while a load is pending
pub const LOADING_MESSAGE: &str = "Loading character data...";

/// Shown under every failure reason
pub const RETRY_HINT: &str = "Please try again later.";

/// Label of the navigation back to the listing
pub const BACK_LABEL: &str = "Return to home";

/// One labelled row of the attribute table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Row label
    pub label: &'static str,
    /// Row value
    pub value: String,
}

/// Everything the detail page renders for a loaded character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    /// Fixed banner
    pub title:      &'static str,
    /// Character name
    pub name:       String,
    /// First character of the name
    pub initial:    String,
    /// `"Film "` followed by the film numbers
    pub films:      String,
    /// Attribute rows in display order
    pub attributes: Vec<Attribute>,
}

impl DetailView {
    /// Derive the view from a merged record
    pub fn from_detail(detail: &CharacterDetail) -> Self {
        let character = detail.character();
        let row = |label, value: &str| Attribute {
            label,
            value: value.to_string(),
        };

        Self {
            title:      DETAIL_TITLE,
            name:       character.name.clone(),
            initial:    character.name.chars().next().map(String::from).unwrap_or_default(),
            films:      format!("Film {}", extract_media_numbers(&character.films)),
            attributes: vec![
                row("Birth year", &character.birth_year),
                row("Gender", &character.gender),
                row("Hair", &character.hair_color),
                row("Eyes", &character.eye_color),
                row("Mass", &character.mass),
                row("Skin", &character.skin_color),
                row("Home planet", detail.homeworld_name()),
            ],
        }
    }
}

/// What a failed load shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureView {
    /// The classified reason
    pub reason:     String,
    /// Generic retry suggestion
    pub hint:       &'static str,
    /// Label of the navigation back to the listing
    pub back_label: &'static str,
}

/// The detail page for each load state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailScreen {
    /// Nothing to show yet
    Blank,
    /// Loading indicator
    Loading(&'static str),
    /// Failure message with retry hint and way back
    Failed(FailureView),
    /// The loaded character
    Ready(DetailView),
}

impl DetailScreen {
    /// Map a load state to what should be on screen
    pub fn from_state(state: &LoadState) -> Self {
        match state {
            LoadState::Idle => Self::Blank,
            LoadState::Pending => Self::Loading(LOADING_MESSAGE),
            LoadState::Failed(failure) => Self::Failed(FailureView::from_failure(failure)),
            LoadState::Ready(detail) => Self::Ready(DetailView::from_detail(detail)),
        }
    }
}

impl FailureView {
    /// Wrap a failure reason with the retry hint and back navigation
    pub fn from_failure(failure: &LoadFailure) -> Self {
        Self {
            reason:     failure.reason().to_string(),
            hint:       RETRY_HINT,
            back_label: BACK_LABEL,
        }
    }
}
