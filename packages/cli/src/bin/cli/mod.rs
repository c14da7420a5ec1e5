pub mod drafts;
pub mod outreach;
pub mod planning;
pub mod posting;
pub mod requests;
pub mod storage;
pub mod utils;
