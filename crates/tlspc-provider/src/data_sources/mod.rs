//! Read-only lookups

pub mod ca_product;
pub mod certificate_template;
pub mod user;

pub use ca_product::CaProductDataSource;
pub use certificate_template::CertificateTemplateDataSource;
pub use user::UserDataSource;
