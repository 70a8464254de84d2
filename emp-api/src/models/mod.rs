pub mod department;
pub mod employee;

// Re-export models for easier access
pub use department::*;
pub use employee::*;
