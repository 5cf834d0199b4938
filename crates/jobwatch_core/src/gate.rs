use crate::{InputGroup, InputSets};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Ready,
    /// Missing groups, always in declaration order.
    NeedsConfirmation(Vec<InputGroup>),
}

/// Checks that every input group has at least one file.
pub fn evaluate(inputs: &InputSets) -> GateDecision {
    let missing: Vec<InputGroup> = InputGroup::ALL
        .into_iter()
        .filter(|group| inputs.files(*group).is_empty())
        .collect();

    if missing.is_empty() {
        GateDecision::Ready
    } else {
        GateDecision::NeedsConfirmation(missing)
    }
}
