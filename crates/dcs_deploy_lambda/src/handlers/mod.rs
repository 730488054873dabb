pub mod query;
pub mod settle;
pub mod upsert;
