pub(crate) mod jobs_model;
pub(crate) mod jobs_runner;

pub use jobs_model::Job;
pub use jobs_runner::{run_job, spawn_runner, JobContext, JobQueue, DEFAULT_QUEUE_CAPACITY};
