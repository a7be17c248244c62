//! Runtime orchestration: dispatch, rescue mode, clocks, persistence and the session.

pub mod clock;
pub mod dispatcher;
pub mod persistence;
pub mod rescue;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dispatcher::{CommandDispatcher, DispatchContext};
pub use rescue::{RescueControl, RescueMode};
pub use session::TerminalSession;
