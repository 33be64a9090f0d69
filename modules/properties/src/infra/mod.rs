pub mod broadcast;
pub mod storage;
