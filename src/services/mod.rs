pub mod jobs;
pub mod submissions;
