pub mod deploy;
pub mod health;
pub mod scale;
pub mod status;
pub mod validate;
