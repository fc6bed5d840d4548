// core/src/lib.rs
pub mod errors;
pub mod metrics;
pub mod models;
pub mod session;
pub mod storage;
pub mod store;
pub mod surface;

pub use errors::WorkoutError;
pub use metrics::{registry, Metrics};
pub use models::{Coordinates, KindData, Workout, WorkoutDraft, WorkoutKind, WorkoutPatch};
pub use session::Session;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, KEY_WORKOUTS, KEY_WORKOUTS_SORT};
pub use store::{SortMode, WorkoutStore};
pub use surface::{
    GeolocationError, GeolocationProvider, ListSurface, MapSurface, MarkerRegistry,
};
