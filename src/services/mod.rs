pub mod geolocation;
pub mod photo;
pub mod restaurant;
pub mod review;
pub mod storage;
