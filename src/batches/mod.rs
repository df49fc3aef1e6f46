// Batch (class/cohort) management: creation, rosters, and announcements

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use error::BatchError;
pub use models::{
    AddStudentsRequest, AnnouncementView, Batch, BatchDetail, BatchSummary, CreateAnnouncementRequest,
    CreateBatchRequest, StudentInfo, TeacherInfo,
};
pub use repository::BatchRepository;
pub use service::BatchService;
