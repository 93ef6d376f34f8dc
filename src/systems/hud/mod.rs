pub mod quest;

pub use self::quest::*;
