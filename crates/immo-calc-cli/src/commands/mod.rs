pub mod evaluate;
pub mod portfolio;
pub mod projection;
pub mod property;
pub mod scenario;
pub mod settings;
