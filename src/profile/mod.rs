pub mod cache;
pub mod model;

pub use cache::{ProfileCache, ProfileSnapshot};
pub use model::Profile;
