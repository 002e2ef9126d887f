use crate::errors::StoreError;
use crate::models::{NewToy, Toy, ToyId};
use async_trait::async_trait;

/// Operations the board needs from the backing store.
#[async_trait]
pub trait ToyRepository: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// Lists every toy, in store order.
    async fn list_all(&self) -> Result<Vec<Toy>, StoreError>;

    /// Creates a toy and returns it with its store-assigned id.
    async fn create(&self, toy: &NewToy) -> Result<Toy, StoreError>;

    /// Sets the like count of a toy and returns the store's view of it.
    async fn update_likes(&self, id: &ToyId, likes: u64) -> Result<Toy, StoreError>;
}
