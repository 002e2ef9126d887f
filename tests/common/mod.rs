#![allow(dead_code)]

use async_trait::async_trait;
use std::{
    future::Future,
    net::SocketAddr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Duration,
};
use tokio::{net::TcpListener, sync::oneshot};
use toy_board::{
    domain::ToyRepository,
    errors::StoreError,
    models::{NewToy, Toy, ToyId},
};

pub fn toy(id: &str, name: &str, likes: u64) -> Toy {
    Toy {
        id: ToyId::from(id),
        name: name.to_string(),
        image: format!("{}.png", name.to_lowercase()),
        likes,
    }
}

fn unavailable(method: &'static str) -> StoreError {
    StoreError::Status {
        method,
        url: "memory://toys".into(),
        status: 503,
    }
}

/// A like request held back until the test answers it.
pub struct PendingLike {
    pub id: ToyId,
    pub likes: u64,
    reply: oneshot::Sender<Result<Toy, StoreError>>,
}

impl PendingLike {
    pub fn answer(self, toy: Toy) {
        let _ = self.reply.send(Ok(toy));
    }

    pub fn fail(self) {
        let _ = self.reply.send(Err(unavailable("PATCH")));
    }
}

/// In-memory `ToyRepository` with switchable failures.
#[derive(Default)]
pub struct ScriptedRepository {
    toys: Mutex<Vec<Toy>>,
    next_id: AtomicU64,
    fail_list: bool,
    fail_create: bool,
    fail_likes: bool,
    gate_likes: bool,
    pub created: Mutex<Vec<NewToy>>,
    pub patches: Mutex<Vec<(ToyId, u64)>>,
    pub pending_likes: Mutex<Vec<PendingLike>>,
}

impl ScriptedRepository {
    pub fn with_toys(toys: Vec<Toy>) -> Self {
        let next_id = toys.len() as u64 + 1;
        Self {
            toys: Mutex::new(toys),
            next_id: AtomicU64::new(next_id),
            ..Default::default()
        }
    }

    pub fn next_id(self, id: u64) -> Self {
        self.next_id.store(id, Ordering::SeqCst);
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_likes(mut self) -> Self {
        self.fail_likes = true;
        self
    }

    /// Like requests wait in `pending_likes` until answered.
    pub fn gated_likes(mut self) -> Self {
        self.gate_likes = true;
        self
    }

    pub fn take_pending_likes(&self) -> Vec<PendingLike> {
        std::mem::take(&mut *self.pending_likes.lock().unwrap())
    }

    pub fn pending_like_count(&self) -> usize {
        self.pending_likes.lock().unwrap().len()
    }
}

#[async_trait]
impl ToyRepository for ScriptedRepository {
    async fn list_all(&self) -> Result<Vec<Toy>, StoreError> {
        if self.fail_list {
            return Err(unavailable("GET"));
        }
        Ok(self.toys.lock().unwrap().clone())
    }

    async fn create(&self, toy: &NewToy) -> Result<Toy, StoreError> {
        self.created.lock().unwrap().push(toy.clone());
        if self.fail_create {
            return Err(unavailable("POST"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Toy {
            id: ToyId::from(id.to_string()),
            name: toy.name.clone(),
            image: toy.image.clone(),
            likes: toy.likes,
        };
        self.toys.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_likes(&self, id: &ToyId, likes: u64) -> Result<Toy, StoreError> {
        self.patches.lock().unwrap().push((id.clone(), likes));
        if self.fail_likes {
            return Err(unavailable("PATCH"));
        }
        if self.gate_likes {
            let (reply, rx) = oneshot::channel();
            self.pending_likes.lock().unwrap().push(PendingLike {
                id: id.clone(),
                likes,
                reply,
            });
            return rx.await.unwrap_or_else(|_| Err(unavailable("PATCH")));
        }
        let mut toys = self.toys.lock().unwrap();
        let toy = toys
            .iter_mut()
            .find(|toy| &toy.id == id)
            .ok_or_else(|| unavailable("PATCH"))?;
        toy.likes = likes;
        Ok(toy.clone())
    }
}

/// Polls `condition` until it holds, failing the test after two seconds.
pub async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not met in time");
}

/// Serves `router` on an ephemeral local port.
pub async fn serve(router: axum::Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Awaits `fut` with a two second ceiling.
pub async fn within<T>(fut: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(2), fut)
        .await
        .expect("timed out")
}
