pub mod email_verification;
pub mod idea;
pub mod notification;
pub mod oauth;
pub mod tenant;
pub mod user;
