pub mod confirmation;
pub mod status_prober;

pub use confirmation::{AlwaysAbort, AlwaysContinue, ConsoleConfirmer, Confirmer, Decision};
pub use status_prober::probe;
