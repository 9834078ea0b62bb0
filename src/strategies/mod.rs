//! Strategy Pool: deterministic scoring strategies over a draw sequence.

pub mod context;
pub mod pool;

pub use context::StrategyContext;
pub use pool::PoolMember;
