pub mod machines;
pub mod sessions;
pub mod users;
pub mod withdrawals;
