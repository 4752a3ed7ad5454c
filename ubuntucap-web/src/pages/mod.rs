mod about;
mod auth;
mod contact;
mod credit;
mod dashboard;
mod error;
mod landing;
mod loans;
mod mpesa;
mod profile;

pub use about::AboutPage;
pub use auth::AuthPage;
pub use contact::ContactPage;
pub use credit::CreditPage;
pub use dashboard::DashboardPage;
pub use error::ErrorPage;
pub use landing::LandingPage;
pub use loans::LoansPage;
pub use mpesa::MpesaPage;
pub use profile::ProfilePage;
