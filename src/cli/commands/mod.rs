pub mod config;
pub mod health;
pub mod inspect;
pub mod reset;
pub mod run;
pub mod worker;
