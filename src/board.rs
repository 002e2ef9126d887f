//! In-memory projection of the backing store that the page is rendered from.
//!
//! `ToyBoard` owns one record per toy id, the ordered list of rendered cards,
//! the create-form draft and the form visibility. It never talks to the store
//! itself; the controller feeds it store results.

use crate::models::{NewToy, Toy, ToyForm, ToyId};
use crate::view::{BoardView, CardView};
use std::collections::HashMap;

/// Visibility of the create-form container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormVisibility {
    #[default]
    Hidden,
    Shown,
}

impl FormVisibility {
    pub fn toggled(self) -> Self {
        match self {
            FormVisibility::Hidden => FormVisibility::Shown,
            FormVisibility::Shown => FormVisibility::Hidden,
        }
    }

    pub fn is_shown(self) -> bool {
        self == FormVisibility::Shown
    }

    /// CSS `display` value for the container.
    pub fn css_display(self) -> &'static str {
        match self {
            FormVisibility::Shown => "block",
            FormVisibility::Hidden => "none",
        }
    }
}

/// A like request that has been issued but not yet answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeTicket {
    pub id: ToyId,
    pub seq: u64,
    pub likes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// The store's count was taken; carries the new count.
    Applied(u64),
    /// A newer response for the same toy already landed.
    Stale,
    /// The toy is not on the board.
    Unknown,
}

#[derive(Debug)]
struct ToyRecord {
    toy: Toy,
    issued_seq: u64,
    applied_seq: u64,
    // Highest count requested while likes are in flight.
    requested_likes: u64,
    in_flight: usize,
}

impl ToyRecord {
    fn new(toy: Toy) -> Self {
        let requested_likes = toy.likes;
        Self {
            toy,
            issued_seq: 0,
            applied_seq: 0,
            requested_likes,
            in_flight: 0,
        }
    }

    fn finish_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.requested_likes = self.toy.likes;
        }
    }
}

#[derive(Debug, Default)]
pub struct ToyBoard {
    visibility: FormVisibility,
    form: ToyForm,
    records: HashMap<ToyId, ToyRecord>,
    // Render order; the same id may appear more than once.
    cards: Vec<ToyId>,
}

impl ToyBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> FormVisibility {
        self.visibility
    }

    pub fn form(&self) -> &ToyForm {
        &self.form
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Last server-confirmed like count for a toy.
    pub fn likes_of(&self, id: &ToyId) -> Option<u64> {
        self.records.get(id).map(|record| record.toy.likes)
    }

    pub fn toggle(&mut self) -> FormVisibility {
        self.visibility = self.visibility.toggled();
        self.visibility
    }

    pub fn hide_on_submit_success(&mut self) {
        self.visibility = FormVisibility::Hidden;
    }

    /// Appends a card for `toy`. A toy that is already on the board gets a
    /// second card backed by the same record, refreshed to this state.
    pub fn render_card(&mut self, toy: Toy) {
        let id = toy.id.clone();
        match self.records.get_mut(&id) {
            Some(record) => {
                record.toy = toy;
                if record.in_flight == 0 {
                    record.requested_likes = record.toy.likes;
                }
            }
            None => {
                self.records.insert(id.clone(), ToyRecord::new(toy));
            }
        }
        self.cards.push(id);
    }

    /// Keeps the submitted fields as the form draft and returns the create body.
    pub fn begin_submit(&mut self, form: ToyForm) -> NewToy {
        let body = NewToy::from_form(&form);
        self.form = form;
        body
    }

    /// Renders the created toy, clears the form and hides it.
    pub fn finish_submit(&mut self, created: Toy) {
        self.render_card(created);
        self.form.clear();
        self.hide_on_submit_success();
    }

    /// Issues the next like for `id`, counting from the confirmed likes or the
    /// highest value already requested, whichever is larger.
    pub fn begin_like(&mut self, id: &ToyId) -> Option<LikeTicket> {
        let record = self.records.get_mut(id)?;
        let likes = record.toy.likes.max(record.requested_likes).saturating_add(1);
        record.requested_likes = likes;
        record.issued_seq += 1;
        record.in_flight += 1;
        Some(LikeTicket {
            id: id.clone(),
            seq: record.issued_seq,
            likes,
        })
    }

    /// Applies the store's answer to a like unless a newer answer already landed.
    pub fn apply_like(&mut self, ticket: &LikeTicket, updated: Toy) -> LikeOutcome {
        let Some(record) = self.records.get_mut(&ticket.id) else {
            return LikeOutcome::Unknown;
        };
        let outcome = if ticket.seq > record.applied_seq {
            record.applied_seq = ticket.seq;
            record.toy.likes = updated.likes;
            record.toy.name = updated.name;
            record.toy.image = updated.image;
            LikeOutcome::Applied(record.toy.likes)
        } else {
            LikeOutcome::Stale
        };
        record.finish_request();
        outcome
    }

    /// Forgets a like whose request failed. The displayed count is untouched.
    pub fn fail_like(&mut self, ticket: &LikeTicket) {
        if let Some(record) = self.records.get_mut(&ticket.id) {
            record.finish_request();
        }
    }

    pub fn view(&self) -> BoardView {
        let cards = self
            .cards
            .iter()
            .filter_map(|id| self.records.get(id))
            .map(|record| CardView::from_toy(&record.toy))
            .collect();
        BoardView {
            form_visible: self.visibility.is_shown(),
            form_display: self.visibility.css_display(),
            form: self.form.clone(),
            cards,
        }
    }
}
