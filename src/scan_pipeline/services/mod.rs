mod bounded_fanout;
mod finding_reconciler;
mod gate_evaluator;
mod poller;

pub use bounded_fanout::BoundedFanout;
pub use finding_reconciler::{
    ChangedLineQuery, CommitMatches, DuplicateMatchPolicy, FindingReconciler, MatchedFinding,
};
pub use gate_evaluator::GateEvaluator;
pub use poller::{PollPolicy, Poller};
