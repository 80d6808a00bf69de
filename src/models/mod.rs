// Wire models for the console command/query boundary

pub mod requests;
pub mod responses;
