use std::sync::Arc;

use homehaven_config::Settings;
use homehaven_services::{
    AuthService,
    dao::{
        agreement::AgreementDao, announcement::AnnouncementDao, apartment::ApartmentDao,
        coupon::CouponDao, payment::PaymentDao, user::UserDao,
    },
    workflows::{AgreementWorkflow, CouponWorkflow, PaymentWorkflow},
};
use mongodb::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub apartments: Arc<ApartmentDao>,
    pub coupons: Arc<CouponDao>,
    pub announcements: Arc<AnnouncementDao>,
    pub agreements: Arc<AgreementDao>,
    pub payments: Arc<PaymentDao>,
    pub agreement_flow: Arc<AgreementWorkflow>,
    pub coupon_flow: Arc<CouponWorkflow>,
    pub payment_flow: Arc<PaymentWorkflow>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let users = Arc::new(UserDao::new(&db));
        let apartments = Arc::new(ApartmentDao::new(&db));
        let coupons = Arc::new(CouponDao::new(&db));
        let announcements = Arc::new(AnnouncementDao::new(&db));
        let agreements = Arc::new(AgreementDao::new(&db));
        let payments = Arc::new(PaymentDao::new(&db));

        let agreement_flow = Arc::new(AgreementWorkflow::new(
            users.clone(),
            agreements.clone(),
            apartments.clone(),
        ));
        let coupon_flow = Arc::new(CouponWorkflow::new(coupons.clone(), payments.clone()));
        let payment_flow = Arc::new(PaymentWorkflow::new(payments.clone(), agreements.clone()));

        Self {
            db,
            settings,
            auth,
            users,
            apartments,
            coupons,
            announcements,
            agreements,
            payments,
            agreement_flow,
            coupon_flow,
            payment_flow,
        }
    }
}
