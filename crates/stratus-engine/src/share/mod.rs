//! Share link tokens.

pub mod token;

pub use token::ShareTokenGenerator;
