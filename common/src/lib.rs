pub mod model;
pub mod outcome;
pub mod requests;
