pub mod book;
pub mod fine;
pub mod loan;
pub mod member;
pub mod validation;

pub use book::*;
pub use loan::*;
pub use member::*;
