pub mod emulator;
pub mod emulator_state;
pub mod error;
pub mod io;
mod trap;

pub use common::misc::sign_extend;
pub use emulator::{Config, Emulator, ExecRet, PutspBase};
pub use emulator_state::{Cond, EmulatorState};
pub use error::ExecError;
pub use io::MMIOHandler;
