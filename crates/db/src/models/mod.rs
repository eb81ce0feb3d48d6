mod agreement;
mod announcement;
mod apartment;
mod coupon;
mod payment;
mod user;

pub use agreement::{Agreement, AgreementStatus};
pub use announcement::Announcement;
pub use apartment::{Apartment, ApartmentStatus};
pub use coupon::{Coupon, CouponStatus};
pub use payment::{Payment, PaymentStatus};
pub use user::{Role, User};
