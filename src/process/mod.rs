pub mod interpreter;
pub mod output;
pub mod runner;

pub use interpreter::{Interpreter, PosixShell, PowerShell, native_interpreter};
pub use output::{ExecutionOutcome, MAX_OUTPUT_CHARS, NO_OUTPUT, Termination, Truncation};
pub use runner::{DEFAULT_TIMEOUT, ProcessRunner};
