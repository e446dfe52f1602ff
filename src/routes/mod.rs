pub mod activities;
pub mod admin;
pub mod attendance;
pub mod auth;
pub mod badges;
pub mod classes;
pub mod health;
pub mod milestones;
pub mod reports;
pub mod roadmap;
pub mod students;
