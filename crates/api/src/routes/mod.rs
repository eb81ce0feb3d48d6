pub mod agreement;
pub mod announcement;
pub mod apartment;
pub mod auth;
pub mod coupon;
pub mod payment;
pub mod stats;
pub mod user;
