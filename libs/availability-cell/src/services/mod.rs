pub mod availability;
pub mod clock;
pub mod day_code;
pub mod engine;
pub mod exclusion;
pub mod slots;
pub mod store;
pub mod window;

pub use availability::{AvailabilityQuery, AvailabilityReport, AvailabilityService};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{compute_availability, ScheduleSnapshot};
pub use store::{ScheduleStore, SupabaseScheduleStore};
