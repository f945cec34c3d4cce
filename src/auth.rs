pub mod extract;
pub mod jwt;
pub mod password;
pub mod policy;
