pub mod combine;
pub mod completion;
pub mod info;
pub mod payload;
pub mod robots;
