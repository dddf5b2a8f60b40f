//! Fairness-constrained capital allocation across competing strategies.
//!
//! A Beta-Bernoulli Thompson-sampling bandit that re-weights a fixed set of
//! strategies ("arms") toward better performers round by round, while a hard
//! minimum-allocation floor keeps every strategy funded — an unlucky start
//! never starves a late bloomer out of the portfolio.
//!
//! The crate is a pure library: it performs no I/O, owns no network or file
//! surface, and is driven by an embedding loop that executes the funded
//! strategy, observes the outcome, and feeds the reward back in:
//!
//! ```
//! use fairalloc::Allocator;
//!
//! let mut allocator = Allocator::new(3, 0.10)?;
//! for _ in 0..100 {
//!     let sel = allocator.select();
//!     // ... execute sel.arm for one period, observe pnl ...
//!     let pnl = 1.0;
//!     allocator.update(sel.arm, pnl)?;
//! }
//! # Ok::<(), fairalloc::AllocError>(())
//! ```

pub mod allocator;
pub mod error;
pub mod posterior;
pub mod simulate;

pub use allocator::{Allocator, Selection};
pub use error::AllocError;
pub use posterior::{PosteriorSnapshot, PosteriorStore};
