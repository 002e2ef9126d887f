//! The toy board event loop.
//!
//! A single task owns the [`ToyBoard`] and handles one event at a time. Store
//! calls run as separate tasks and report back through the same channel, so a
//! slow request never blocks toggles, submits or further likes.

use crate::{
    board::{LikeOutcome, LikeTicket, ToyBoard},
    domain::ToyRepository,
    errors::{BoardError, StoreError},
    models::{Toy, ToyForm, ToyId},
    view::BoardView,
};
use std::{future::Future, sync::Arc};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

enum Event {
    // --- From the page ---
    ToggleForm,
    Submit(ToyForm),
    Like(ToyId),
    Snapshot(oneshot::Sender<BoardView>),
    WhenSettled(oneshot::Sender<()>),

    // --- From store tasks ---
    Loaded(Result<Vec<Toy>, StoreError>),
    Created(Result<Toy, StoreError>),
    Liked {
        ticket: LikeTicket,
        result: Result<Toy, StoreError>,
    },
}

/// Cheap, cloneable sender side of the controller.
#[derive(Clone, Debug)]
pub struct BoardHandle {
    events: mpsc::UnboundedSender<Event>,
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Event::ToggleForm => "ToggleForm",
            Event::Submit(_) => "Submit",
            Event::Like(_) => "Like",
            Event::Snapshot(_) => "Snapshot",
            Event::WhenSettled(_) => "WhenSettled",
            Event::Loaded(_) => "Loaded",
            Event::Created(_) => "Created",
            Event::Liked { .. } => "Liked",
        };
        f.write_str(name)
    }
}

impl BoardHandle {
    fn send(&self, event: Event) -> Result<(), BoardError> {
        self.events
            .send(event)
            .map_err(|_| BoardError::ControllerStopped)
    }

    pub fn toggle_form(&self) -> Result<(), BoardError> {
        self.send(Event::ToggleForm)
    }

    pub fn submit(&self, form: ToyForm) -> Result<(), BoardError> {
        self.send(Event::Submit(form))
    }

    pub fn like(&self, id: ToyId) -> Result<(), BoardError> {
        self.send(Event::Like(id))
    }

    /// Current state of the board as it would be rendered.
    pub async fn snapshot(&self) -> Result<BoardView, BoardError> {
        let (reply, rx) = oneshot::channel();
        self.send(Event::Snapshot(reply))?;
        rx.await.map_err(|_| BoardError::ControllerStopped)
    }

    /// Resolves once no store request is in flight.
    pub async fn settled(&self) -> Result<(), BoardError> {
        let (reply, rx) = oneshot::channel();
        self.send(Event::WhenSettled(reply))?;
        rx.await.map_err(|_| BoardError::ControllerStopped)
    }
}

pub struct BoardController {
    board: ToyBoard,
    repo: Arc<dyn ToyRepository>,
    // Weak so the loop ends once every handle and store task is gone.
    events_tx: mpsc::WeakUnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    in_flight: usize,
    settle_waiters: Vec<oneshot::Sender<()>>,
}

impl BoardController {
    /// Spawns the controller task. The toy list is requested as soon as it starts.
    pub fn spawn(repo: Arc<dyn ToyRepository>) -> (BoardHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = BoardController {
            board: ToyBoard::new(),
            repo,
            events_tx: tx.downgrade(),
            events_rx: rx,
            in_flight: 0,
            settle_waiters: Vec::new(),
        };
        let task = tokio::spawn(controller.run());
        (BoardHandle { events: tx }, task)
    }

    async fn run(mut self) {
        tracing::info!("Toy board controller started");
        self.load();
        while let Some(event) = self.events_rx.recv().await {
            self.handle(event);
        }
        tracing::info!("Toy board controller stopped");
    }

    fn load(&mut self) {
        let repo = Arc::clone(&self.repo);
        self.dispatch(async move { Event::Loaded(repo.list_all().await) });
    }

    // Runs a store call on its own task and feeds the result back as an event.
    fn dispatch<F>(&mut self, call: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        let Some(tx) = self.events_tx.upgrade() else {
            tracing::debug!("No board handles left, dropping store call");
            return;
        };
        self.in_flight += 1;
        tokio::spawn(async move {
            let event = call.await;
            if tx.send(event).is_err() {
                tracing::debug!("Board controller gone before store call finished");
            }
        });
    }

    fn handle(&mut self, event: Event) {
        tracing::trace!(?event, "Handling board event");
        match event {
            Event::ToggleForm => {
                let visibility = self.board.toggle();
                tracing::debug!(?visibility, "Toggled create form");
            }
            Event::Submit(form) => {
                let body = self.board.begin_submit(form);
                let repo = Arc::clone(&self.repo);
                self.dispatch(async move { Event::Created(repo.create(&body).await) });
            }
            Event::Like(id) => match self.board.begin_like(&id) {
                Some(ticket) => {
                    tracing::debug!(toy_id = %id, seq = ticket.seq, likes = ticket.likes, "Sending like");
                    let repo = Arc::clone(&self.repo);
                    self.dispatch(async move {
                        let result = repo.update_likes(&ticket.id, ticket.likes).await;
                        Event::Liked { ticket, result }
                    });
                }
                None => tracing::warn!(toy_id = %id, "Like for a toy that is not on the board"),
            },
            Event::Snapshot(reply) => {
                if reply.send(self.board.view()).is_err() {
                    tracing::debug!("Snapshot requester went away");
                }
            }
            Event::WhenSettled(reply) => {
                if self.in_flight == 0 {
                    let _ = reply.send(());
                } else {
                    self.settle_waiters.push(reply);
                }
            }
            Event::Loaded(result) => {
                match result {
                    Ok(toys) => {
                        tracing::info!("Rendering {} toys", toys.len());
                        for toy in toys {
                            self.board.render_card(toy);
                        }
                    }
                    Err(e) => tracing::error!(error = %e, "Error fetching toys"),
                }
                self.request_finished();
            }
            Event::Created(result) => {
                match result {
                    Ok(toy) => {
                        tracing::info!(toy_id = %toy.id, name = %toy.name, "Toy created");
                        self.board.finish_submit(toy);
                    }
                    Err(e) => tracing::error!(error = %e, "Error creating new toy"),
                }
                self.request_finished();
            }
            Event::Liked { ticket, result } => {
                match result {
                    Ok(updated) => match self.board.apply_like(&ticket, updated) {
                        LikeOutcome::Applied(likes) => {
                            tracing::debug!(toy_id = %ticket.id, likes, "Likes updated")
                        }
                        LikeOutcome::Stale => tracing::debug!(
                            toy_id = %ticket.id,
                            seq = ticket.seq,
                            "Discarding stale like response"
                        ),
                        LikeOutcome::Unknown => {
                            tracing::warn!(toy_id = %ticket.id, "Like response for unknown toy")
                        }
                    },
                    Err(e) => {
                        tracing::error!(toy_id = %ticket.id, error = %e, "Error updating likes");
                        self.board.fail_like(&ticket);
                    }
                }
                self.request_finished();
            }
        }
    }

    fn request_finished(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            for waiter in self.settle_waiters.drain(..) {
                let _ = waiter.send(());
            }
        }
    }
}
