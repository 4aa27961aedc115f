pub mod clock;
pub mod machine;
pub mod preconditions;
pub mod step;

pub use clock::{Clock, FixedClock, SystemClock};
pub use machine::{item_id, WizardError, WizardSnapshot, WizardStateMachine};
pub use preconditions::check_transition;
pub use step::WizardStep;
