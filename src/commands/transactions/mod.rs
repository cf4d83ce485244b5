mod discard;
mod exec;
mod multi;

pub use discard::{discard, DiscardArguments};
pub use exec::{exec, ExecArguments};
pub use multi::{multi, MultiArguments};
