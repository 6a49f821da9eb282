pub mod distributor;
pub mod intents;
pub mod types;
pub mod walker;

pub use distributor::{Distribution, distribute};
pub use intents::{IntentBook, aggregate, to_pending_order};
pub use types::{
    ClearingBounds, ClearingVolumes, PendingOrder, Side, SideVolume, TickBook, TickBucket,
};
pub use walker::{WalkReport, Walker};
