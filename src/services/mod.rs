pub mod activities;
pub mod attendance;
pub mod auth;
pub mod badges;
pub mod classes;
pub mod milestones;
pub mod reports;
pub mod roadmap;
pub mod stats;
pub mod students;
pub mod users;
