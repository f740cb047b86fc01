pub mod explore;
pub mod wizard;

pub use explore::{ExploreController, ExploreDeps, ExploreEvent, ExploreState};
pub use wizard::{Direction, Stage, WizardController, WizardEvent, WizardState};
