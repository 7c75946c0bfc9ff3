pub mod address;
pub mod dtos;
pub mod geo;
pub mod operating_hours;
pub mod page;
pub mod photo;
pub mod requests;
pub mod restaurant;
pub mod review;
pub mod user;
