//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod credit_repo;
pub mod image_repo;
pub mod model_repo;
pub mod profile_repo;
pub mod sample_repo;
pub mod user_headshot_repo;
pub mod user_tune_repo;

pub use credit_repo::CreditRepo;
pub use image_repo::ImageRepo;
pub use model_repo::ModelRepo;
pub use profile_repo::ProfileRepo;
pub use sample_repo::SampleRepo;
pub use user_headshot_repo::UserHeadshotRepo;
pub use user_tune_repo::UserTuneRepo;
