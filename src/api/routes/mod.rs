pub mod auth;
pub mod children;
pub mod health;
pub mod reports;
pub mod review;
pub mod snapshots;
