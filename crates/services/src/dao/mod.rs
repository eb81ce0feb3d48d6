pub mod agreement;
pub mod announcement;
pub mod apartment;
pub mod base;
pub mod coupon;
pub mod payment;
pub mod user;

pub use base::BaseDao;
