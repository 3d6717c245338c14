//! Document services for the diary backend

pub mod diary;
pub mod requests;

pub use diary::DiaryService;
pub use requests::AdminRequestService;
