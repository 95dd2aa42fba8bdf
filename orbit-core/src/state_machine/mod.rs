//! Explicit state machine for one interview session.
//!
//! The design separates:
//! - **State**: what the client knows (`InterviewState`)
//! - **Events**: what happened (`Event`)
//! - **Effects**: what to do (`Effect`)
//! - **Transition**: pure function `(State, Event) -> (State, Vec<Effect>)`
//!
//! The interpreter executes effects against the transport and returns result
//! events; the driver owns the single authoritative state and feeds those
//! events back through the transition function.

pub mod driver;
pub mod effect;
pub mod event;
pub mod interpreter;
pub mod state;
pub mod transition;

pub use driver::InterviewDriver;
pub use effect::*;
pub use event::*;
pub use state::*;
pub use transition::*;
