pub mod access;
pub mod authority;
