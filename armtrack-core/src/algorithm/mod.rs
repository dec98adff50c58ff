pub mod fk;
pub mod pinv;
