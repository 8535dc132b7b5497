//! Best-effort notification delivery.
//!
//! The emitter never reports failure to its caller: a missing sink, a
//! rejected publish or a timeout are logged and otherwise ignored.

pub mod emitter;
pub mod sink;
