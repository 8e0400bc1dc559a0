pub mod cover;
pub mod outcome;
pub mod results;
