//! Jobwatch core: pure state machine for the input gate and the job stream projections.
mod effect;
mod gate;
mod input;
mod msg;
mod projection;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use gate::{evaluate, GateDecision};
pub use input::{
    has_accepted_extension, InputGroup, InputSets, SelectedFile, SelectionError,
    ACCEPTED_EXTENSIONS,
};
pub use msg::{Msg, StreamEvent};
pub use projection::{RunLog, StatusSnapshot};
pub use state::{AppState, RunId, RunOutcome};
pub use update::update;
pub use view_model::{AppViewModel, Banner, GroupView, Severity};
