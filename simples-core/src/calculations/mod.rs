//! Simples Nacional calculations.
//!
//! The pieces compose bottom-up: [`window`] aggregates trailing revenue,
//! [`bracket`] maps it to a table row, [`rate`] derives the effective rate
//! and tax split, [`headroom`] measures distance to the caps, and
//! [`simulation`] runs them over a whole ledger.

pub mod bracket;
pub mod common;
pub mod headroom;
pub mod rate;
pub mod simulation;
pub mod window;

pub use bracket::resolve_bracket;
pub use headroom::{Headroom, headroom};
pub use rate::{TaxSplit, effective_rate, tax_split};
pub use simulation::SimplesCalculator;
pub use window::{TrailingWindow, WINDOW_SIZE, cumulative_sums, trailing_window};
