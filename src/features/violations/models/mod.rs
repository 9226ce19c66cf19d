mod violation;

pub use violation::{
    NewViolation, StatusTransition, Violation, ViolationDecision, ViolationFilter,
    ViolationReason, ViolationRow, ViolationStatus,
};
