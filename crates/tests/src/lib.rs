
#[cfg(test)]
mod auth_tests;
#[cfg(test)]
mod coupon_tests;
#[cfg(test)]
mod payment_tests;
