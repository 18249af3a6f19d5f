pub mod games;
pub mod login;
